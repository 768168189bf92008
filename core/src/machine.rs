//! Composition root: wires Memory, Video, PIA, and CPU together, loads
//! the ROM image, and drives the fetch-execute loop.

use std::sync::{Arc, Mutex};

use crate::cpu::Cpu;
use crate::error::BootError;
use crate::memory::Memory;
use crate::pia::{FileHost, Pia};
use crate::reset::{ResetCircuit, Timing};
use crate::segment::SegmentTable;
use crate::video::Video;

pub struct Machine {
    pub cpu: Cpu,
    memory: Memory,
    video: Arc<Mutex<Video>>,
    pia: Arc<Mutex<Pia>>,
    reset_circuit: ResetCircuit,
    timing: Timing,
}

impl Machine {
    pub fn new() -> Self {
        let video = Arc::new(Mutex::new(Video::new()));
        let pia = Arc::new(Mutex::new(Pia::new()));
        let memory = Memory::new(Arc::clone(&video), Arc::clone(&pia));
        Self {
            cpu: Cpu::new(),
            memory,
            video,
            pia,
            reset_circuit: ResetCircuit::default(),
            timing: Timing::default(),
        }
    }

    pub fn video_handle(&self) -> Arc<Mutex<Video>> {
        Arc::clone(&self.video)
    }

    pub fn pia_handle(&self) -> Arc<Mutex<Pia>> {
        Arc::clone(&self.pia)
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Loads `rom` per `segments`, then triggers power-on reset. Fatal on
    /// any `BootError` — the caller should not start `run` afterwards.
    pub fn power_on(&mut self, rom: &[u8], segments: &SegmentTable) -> Result<(), BootError> {
        segments.load_into(rom, &mut self.memory)?;
        self.reset_circuit.power_on(&mut self.cpu, &self.memory);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.reset_circuit.manual_reset(&mut self.cpu, &self.memory);
    }

    /// Runs up to `max_cycles` instructions. The PIA's file-transfer hook
    /// runs strictly between instructions, never during one. Stops early
    /// on an unknown opcode without propagating the error — callers that
    /// care can inspect `self.cpu` afterwards.
    pub fn run(&mut self, max_cycles: u64, host: &mut dyn FileHost) {
        let start_cycles = self.cpu.cycles;
        for _ in 0..max_cycles {
            if self.cpu.step(&mut self.memory).is_err() {
                break;
            }
            self.pia
                .lock()
                .unwrap()
                .process_file_operations(&mut self.memory, host);
        }
        let elapsed = self.cpu.cycles - start_cycles;
        self.timing.pace(elapsed, std::time::Instant::now());
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileTransferError;
    use crate::segment::{SegmentRecord, CODE, JUMPS, VECS};

    struct NullHost;
    impl FileHost for NullHost {
        fn load(&mut self, _filename: &str) -> Result<Vec<u8>, FileTransferError> {
            Err(FileTransferError::EmptySelection)
        }
        fn save(&mut self, _filename: &str, _data: &[u8]) -> Result<(), FileTransferError> {
            Ok(())
        }
    }

    fn small_rom() -> (Vec<u8>, SegmentTable) {
        let mut rom = Vec::new();
        rom.extend_from_slice(&[0xE8, 0xEA]); // INX; NOP at CODE
        rom.extend_from_slice(&[0xEA]); // JUMPS
        rom.extend_from_slice(&[0, 0, 0, 0, 0x00, 0xF0]); // VECS: reset -> $F000
        let table = SegmentTable::new(vec![
            SegmentRecord {
                name: CODE.to_string(),
                start: 0xF000,
                size: 2,
            },
            SegmentRecord {
                name: JUMPS.to_string(),
                start: 0xFF00,
                size: 1,
            },
            SegmentRecord {
                name: VECS.to_string(),
                start: 0xFFFA,
                size: 6,
            },
        ]);
        (rom, table)
    }

    #[test]
    fn power_on_then_run_executes_loaded_code() {
        let (rom, table) = small_rom();
        let mut machine = Machine::new();
        machine.power_on(&rom, &table).unwrap();
        assert_eq!(machine.cpu.pc, 0xF000);
        let mut host = NullHost;
        machine.run(2, &mut host);
        assert_eq!(machine.cpu.x, 1);
    }

    #[test]
    fn power_on_fails_loudly_on_missing_segment() {
        let mut rom = Vec::new();
        rom.extend_from_slice(&[0xEA]);
        let table = SegmentTable::new(vec![SegmentRecord {
            name: CODE.to_string(),
            start: 0xF000,
            size: 1,
        }]);
        let mut machine = Machine::new();
        assert!(machine.power_on(&rom, &table).is_err());
    }

    #[test]
    fn video_write_is_observable_through_shared_handle() {
        let machine = Machine::new();
        let video = machine.video_handle();
        video.lock().unwrap().write_screen(0x0400, b'A');
        assert_eq!(video.lock().unwrap().snapshot().buffer[0], b'A');
    }
}
