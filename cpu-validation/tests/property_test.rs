use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use phosphor_cpu_validation::{assert_step_invariants, fuzz_memory, random_cpu, CpuSnapshot, LEGAL_OPCODES};

/// Invariant 1: after every successful `step`, SP stays a valid 8-bit
/// index, PC stays a valid 16-bit address, status bit 5 is set, and the
/// cycle counter strictly increases. Fuzzes every known opcode against
/// random operands and random initial register state.
#[test]
fn step_upholds_core_invariants_across_random_programs() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);

    for &opcode in LEGAL_OPCODES {
        for _ in 0..50 {
            let mut memory = fuzz_memory();
            let base: u16 = rng.gen_range(0x0000..0xFF00);
            let mut program = vec![opcode];
            for _ in 0..3 {
                program.push(rng.r#gen());
            }
            memory.load_segment(base, &program);

            let mut cpu = random_cpu(&mut rng);
            cpu.pc = base;
            let before = CpuSnapshot::of(&cpu);

            if cpu.step(&mut memory).is_ok() {
                assert_step_invariants(&before, &cpu);
                assert!(
                    (cpu.sp as u32) <= 0xFF,
                    "SP escaped its 8-bit range for opcode {opcode:#04X}"
                );
            }
        }
    }
}

/// Invariant 3: JSR immediately followed by RTS at the target leaves
/// every register but PC unchanged, and PC lands just past JSR's operand.
#[test]
fn jsr_then_rts_round_trips_registers() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let mut memory = fuzz_memory();
        memory.load_segment(0x8000, &[0x20, 0x10, 0x80]);
        memory.load_segment(0x8010, &[0x60]);

        let mut cpu = random_cpu(&mut rng);
        cpu.pc = 0x8000;
        cpu.sp = 0xFF;
        let before = CpuSnapshot::of(&cpu);

        cpu.step(&mut memory).unwrap();
        cpu.step(&mut memory).unwrap();

        assert_eq!(cpu.pc, 0x8003);
        assert_eq!(cpu.a, before.a);
        assert_eq!(cpu.x, before.x);
        assert_eq!(cpu.y, before.y);
        assert_eq!(cpu.sp, before.sp);
        assert_eq!(cpu.p, before.p);
    }
}

/// Invariant 4: PHA/PLA round-trips the accumulator; PHP/PLP round-trips
/// P ignoring Break and Unused.
#[test]
fn push_pull_round_trips_are_identity() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..20 {
        let mut memory = fuzz_memory();
        memory.load_segment(0x0300, &[0x48, 0x68, 0x08, 0x28]);
        let mut cpu = random_cpu(&mut rng);
        cpu.pc = 0x0300;
        cpu.sp = 0xFF;
        let original_a = cpu.a;
        let original_p = cpu.p;

        cpu.step(&mut memory).unwrap(); // PHA
        cpu.a = !cpu.a;
        cpu.step(&mut memory).unwrap(); // PLA
        assert_eq!(cpu.a, original_a);

        cpu.step(&mut memory).unwrap(); // PHP
        cpu.p = 0;
        cpu.step(&mut memory).unwrap(); // PLP
        assert_eq!(cpu.p | 0x10, original_p | 0x10);
    }
}
