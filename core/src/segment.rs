//! ROM segment placement. The textual manifest itself is parsed outside
//! this crate (see the `cli` crate's loader); this module only consumes
//! the already-parsed `(name, start, size)` records and copies bytes out
//! of the flat ROM image into [`Memory`].

use crate::error::BootError;
use crate::memory::Memory;

pub const CODE: &str = "CODE";
pub const JUMPS: &str = "JUMPS";
pub const VECS: &str = "VECS";

const REQUIRED_SEGMENTS: [&str; 3] = [CODE, JUMPS, VECS];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRecord {
    pub name: String,
    pub start: u16,
    pub size: usize,
}

/// An ordered set of segment placements, one entry per name. Segments are
/// expected to appear in the ROM image in the same order they're listed
/// here, concatenated with no padding.
#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    records: Vec<SegmentRecord>,
}

impl SegmentTable {
    pub fn new(records: Vec<SegmentRecord>) -> Self {
        Self { records }
    }

    fn require(&self, name: &'static str) -> Result<&SegmentRecord, BootError> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .ok_or(BootError::MissingSegment(name))
    }

    /// Validates that CODE, JUMPS, and VECS are all present.
    pub fn validate(&self) -> Result<(), BootError> {
        for name in REQUIRED_SEGMENTS {
            self.require(name)?;
        }
        Ok(())
    }

    /// Copies each segment's bytes from `rom` into `memory` at its
    /// declared start address. File offsets are the running sum of the
    /// sizes of segments listed before it, per this table's order.
    pub fn load_into(&self, rom: &[u8], memory: &mut Memory) -> Result<(), BootError> {
        self.validate()?;
        let mut offset = 0usize;
        for record in &self.records {
            let end = offset + record.size;
            if end > rom.len() {
                return Err(BootError::SegmentOutOfRange {
                    name: record.name.clone(),
                    offset,
                    len: record.size,
                    rom_len: rom.len(),
                });
            }
            memory.load_segment(record.start, &rom[offset..end]);
            offset = end;
        }
        Ok(())
    }
}
