//! ASL/LSR/ROL/ROR on the accumulator and on memory. Each helper
//! extracts the carry-out bit, computes the shifted/rotated result, and
//! sets flags from it.

use super::{Cpu, FLAG_C};
use crate::memory::Memory;

impl Cpu {
    fn perform_asl(&mut self, value: u8) -> u8 {
        let carry_out = value & 0x80 != 0;
        let result = value << 1;
        self.set_flag(FLAG_C, carry_out);
        self.set_nz(result);
        result
    }

    fn perform_lsr(&mut self, value: u8) -> u8 {
        let carry_out = value & 0x01 != 0;
        let result = value >> 1;
        self.set_flag(FLAG_C, carry_out);
        self.set_nz(result);
        result
    }

    fn perform_rol(&mut self, value: u8) -> u8 {
        let carry_in = if self.flag(FLAG_C) { 1 } else { 0 };
        let carry_out = value & 0x80 != 0;
        let result = (value << 1) | carry_in;
        self.set_flag(FLAG_C, carry_out);
        self.set_nz(result);
        result
    }

    fn perform_ror(&mut self, value: u8) -> u8 {
        let carry_in = if self.flag(FLAG_C) { 0x80 } else { 0 };
        let carry_out = value & 0x01 != 0;
        let result = (value >> 1) | carry_in;
        self.set_flag(FLAG_C, carry_out);
        self.set_nz(result);
        result
    }

    pub(super) fn op_asl_accumulator(&mut self) {
        let a = self.a;
        self.a = self.perform_asl(a);
        self.charge(1);
    }

    pub(super) fn op_asl_zp(&mut self, memory: &mut Memory) {
        let addr = self.addr_zp_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_asl(v);
        memory.write(addr, r);
    }

    pub(super) fn op_asl_zp_x(&mut self, memory: &mut Memory) {
        let addr = self.addr_zp_x_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_asl(v);
        memory.write(addr, r);
    }

    pub(super) fn op_asl_abs(&mut self, memory: &mut Memory) {
        let addr = self.addr_abs_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_asl(v);
        memory.write(addr, r);
    }

    pub(super) fn op_asl_abs_x(&mut self, memory: &mut Memory) {
        let addr = self.addr_abs_x_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_asl(v);
        memory.write(addr, r);
    }

    pub(super) fn op_lsr_accumulator(&mut self) {
        let a = self.a;
        self.a = self.perform_lsr(a);
        self.charge(1);
    }

    pub(super) fn op_lsr_zp(&mut self, memory: &mut Memory) {
        let addr = self.addr_zp_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_lsr(v);
        memory.write(addr, r);
    }

    pub(super) fn op_lsr_zp_x(&mut self, memory: &mut Memory) {
        let addr = self.addr_zp_x_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_lsr(v);
        memory.write(addr, r);
    }

    pub(super) fn op_lsr_abs(&mut self, memory: &mut Memory) {
        let addr = self.addr_abs_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_lsr(v);
        memory.write(addr, r);
    }

    pub(super) fn op_lsr_abs_x(&mut self, memory: &mut Memory) {
        let addr = self.addr_abs_x_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_lsr(v);
        memory.write(addr, r);
    }

    pub(super) fn op_rol_accumulator(&mut self) {
        let a = self.a;
        self.a = self.perform_rol(a);
        self.charge(1);
    }

    pub(super) fn op_rol_zp(&mut self, memory: &mut Memory) {
        let addr = self.addr_zp_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_rol(v);
        memory.write(addr, r);
    }

    pub(super) fn op_rol_zp_x(&mut self, memory: &mut Memory) {
        let addr = self.addr_zp_x_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_rol(v);
        memory.write(addr, r);
    }

    pub(super) fn op_rol_abs(&mut self, memory: &mut Memory) {
        let addr = self.addr_abs_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_rol(v);
        memory.write(addr, r);
    }

    pub(super) fn op_rol_abs_x(&mut self, memory: &mut Memory) {
        let addr = self.addr_abs_x_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_rol(v);
        memory.write(addr, r);
    }

    pub(super) fn op_ror_accumulator(&mut self) {
        let a = self.a;
        self.a = self.perform_ror(a);
        self.charge(1);
    }

    pub(super) fn op_ror_zp(&mut self, memory: &mut Memory) {
        let addr = self.addr_zp_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_ror(v);
        memory.write(addr, r);
    }

    pub(super) fn op_ror_zp_x(&mut self, memory: &mut Memory) {
        let addr = self.addr_zp_x_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_ror(v);
        memory.write(addr, r);
    }

    pub(super) fn op_ror_abs(&mut self, memory: &mut Memory) {
        let addr = self.addr_abs_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_ror(v);
        memory.write(addr, r);
    }

    pub(super) fn op_ror_abs_x(&mut self, memory: &mut Memory) {
        let addr = self.addr_abs_x_rmw(memory);
        let v = memory.read(addr);
        let r = self.perform_ror(v);
        memory.write(addr, r);
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
    fn asl_zero_page_costs_five_cycles_and_sets_carry() {
        let mut memory = new_memory();
        memory.write(0x0010, 0x81);
        memory.load_segment(0x0300, &[0x06, 0x10]);
        let mut cpu = Cpu::new();
        cpu.pc = 0x0300;
        cpu.step(&mut memory).unwrap();
        assert_eq!(memory.read(0x0010), 0x02);
        assert!(cpu.flag(FLAG_C));
        assert_eq!(cpu.cycles, 5);
    }

    #[test]
    fn ror_accumulator_rotates_carry_into_bit_seven() {
        let mut memory = new_memory();
        let mut cpu = Cpu::new();
        cpu.set_flag(FLAG_C, true);
        cpu.a = 0x01;
        memory.load_segment(0x0300, &[0x6A]);
        cpu.pc = 0x0300;
        cpu.step(&mut memory).unwrap();
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.flag(FLAG_C));
        assert_eq!(cpu.cycles, 2);
    }
}
