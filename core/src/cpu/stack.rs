//! PHA/PLA/PHP/PLP, their 65C02 X/Y siblings, and BRK.

use super::{Cpu, FLAG_B, FLAG_I, FLAG_U};
use crate::memory::Memory;

impl Cpu {
    pub(super) fn op_pha(&mut self, memory: &mut Memory) {
        self.charge(1);
        let a = self.a;
        self.push_byte(memory, a);
    }

    pub(super) fn op_pla(&mut self, memory: &mut Memory) {
        self.charge(2);
        let v = self.pop_byte(memory);
        self.a = v;
        self.set_nz(v);
    }

    pub(super) fn op_php(&mut self, memory: &mut Memory) {
        self.charge(1);
        let pushed = self.p | FLAG_B | FLAG_U;
        self.push_byte(memory, pushed);
    }

    pub(super) fn op_plp(&mut self, memory: &mut Memory) {
        self.charge(2);
        let v = self.pop_byte(memory);
        self.p = (v & !FLAG_B) | FLAG_U;
    }

    pub(super) fn op_phx(&mut self, memory: &mut Memory) {
        self.charge(1);
        let x = self.x;
        self.push_byte(memory, x);
    }

    pub(super) fn op_plx(&mut self, memory: &mut Memory) {
        self.charge(2);
        let v = self.pop_byte(memory);
        self.x = v;
        self.set_nz(v);
    }

    pub(super) fn op_phy(&mut self, memory: &mut Memory) {
        self.charge(1);
        let y = self.y;
        self.push_byte(memory, y);
    }

    pub(super) fn op_ply(&mut self, memory: &mut Memory) {
        self.charge(2);
        let v = self.pop_byte(memory);
        self.y = v;
        self.set_nz(v);
    }

    pub(super) fn op_brk(&mut self, memory: &mut Memory) {
        let _signature_padding = self.read_byte(memory);
        let pc = self.pc;
        self.push_word(memory, pc);
        let pushed = self.p | FLAG_B | FLAG_U;
        self.push_byte(memory, pushed);
        self.set_flag(FLAG_I, true);
        let lo = memory.read(0xFFFE) as u16;
        self.charge(1);
        let hi = memory.read(0xFFFF) as u16;
        self.charge(1);
        self.pc = (hi << 8) | lo;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pia::Pia;
    use crate::video::Video;
    use std::sync::{Arc, Mutex};

    fn new_memory() -> Memory {
        Memory::new(
            Arc::new(Mutex::new(Video::new())),
            Arc::new(Mutex::new(Pia::new())),
        )
    }

    #[test]
    fn pha_pla_round_trip_preserves_accumulator() {
        let mut memory = new_memory();
        memory.load_segment(0x0300, &[0x48, 0x68]);
        let mut cpu = Cpu::new();
        cpu.pc = 0x0300;
        cpu.sp = 0xFF;
        cpu.a = 0x77;
        cpu.step(&mut memory).unwrap();
        cpu.a = 0x00;
        cpu.step(&mut memory).unwrap();
        assert_eq!(cpu.a, 0x77);
        assert_eq!(cpu.sp, 0xFF);
        assert_eq!(cpu.cycles, 7);
    }

    #[test]
    fn php_plp_round_trip_ignores_break_and_unused() {
        let mut memory = new_memory();
        memory.load_segment(0x0300, &[0x08, 0x28]);
        let mut cpu = Cpu::new();
        cpu.pc = 0x0300;
        cpu.sp = 0xFF;
        cpu.p = 0b1010_0101;
        let expected = cpu.p;
        cpu.step(&mut memory).unwrap();
        cpu.p = 0;
        cpu.step(&mut memory).unwrap();
        assert_eq!(cpu.p | FLAG_U, expected | FLAG_U);
    }

    #[test]
    fn brk_vectors_through_irq_vector_with_break_set() {
        let mut memory = new_memory();
        memory.write_word(0xFFFE, 0x9000);
        memory.load_segment(0x0300, &[0x00, 0xFF]);
        let mut cpu = Cpu::new();
        cpu.pc = 0x0300;
        cpu.sp = 0xFF;
        cpu.step(&mut memory).unwrap();
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.cycles, 7);
        let pushed_p = memory.read(0x01FD);
        assert_eq!(pushed_p & FLAG_B, FLAG_B);
        assert!(cpu.flag(FLAG_I));
    }
}
