//! Error taxonomy for the hardware core.
//!
//! Mirrors the manual-enum-plus-Display style used throughout this crate's
//! ROM loading and device code: no `thiserror`, just `std::error::Error`
//! impls written by hand.

use std::fmt;
use std::path::PathBuf;

/// Returned by [`crate::cpu::Cpu::step`] when the fetched opcode has no
/// handler. Not fatal: `run()` simply stops its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionError {
    pub opcode: u8,
    pub pc: u16,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown opcode 0x{:02X} at 0x{:04X}",
            self.opcode, self.pc
        )
    }
}

impl std::error::Error for ExecutionError {}

/// Fatal boot-time failures. `Machine::power_on` must fail loudly rather
/// than start the CPU with a half-loaded address space.
#[derive(Debug)]
pub enum BootError {
    /// The ROM image file could not be read.
    RomUnreadable { path: PathBuf, source: std::io::Error },
    /// The segment table is missing one of the required CODE/JUMPS/VECS
    /// records.
    MissingSegment(&'static str),
    /// A segment's declared range does not fit within the ROM image
    /// bytes actually read from disk.
    SegmentOutOfRange {
        name: String,
        offset: usize,
        len: usize,
        rom_len: usize,
    },
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RomUnreadable { path, source } => {
                write!(f, "cannot read ROM image {}: {source}", path.display())
            }
            Self::MissingSegment(name) => write!(f, "segment table missing required '{name}'"),
            Self::SegmentOutOfRange {
                name,
                offset,
                len,
                rom_len,
            } => write!(
                f,
                "segment '{name}' wants bytes {offset}..{} but ROM image is only {rom_len} bytes",
                offset + len
            ),
        }
    }
}

impl std::error::Error for BootError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RomUnreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Reflected to the guest as file-status `Error`. Never terminates the
/// process; the firmware is expected to poll and report it.
#[derive(Debug)]
pub enum FileTransferError {
    Io(std::io::Error),
    InvalidRange { start: u16, end: u16 },
    EmptySelection,
}

impl fmt::Display for FileTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "file I/O error: {e}"),
            Self::InvalidRange { start, end } => {
                write!(f, "invalid save range ${start:04X}..=${end:04X}")
            }
            Self::EmptySelection => write!(f, "no filename selected"),
        }
    }
}

impl std::error::Error for FileTransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FileTransferError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
