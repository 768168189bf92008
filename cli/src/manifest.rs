//! Parser for the segment-table manifest. The core does not parse this
//! format itself (spec §6); this is the "assembly toolchain" side of
//! that boundary.
//!
//! One record per line: `NAME START END` in hex, e.g. `CODE F000 FDFF`.
//! Blank lines and lines starting with `#` are ignored.

use std::fmt;

use phosphor_core::segment::{SegmentRecord, SegmentTable};

#[derive(Debug)]
pub enum ManifestError {
    MalformedLine { line_no: usize, text: String },
    BadHex { line_no: usize, field: &'static str },
    EndBeforeStart { line_no: usize },
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine { line_no, text } => {
                write!(f, "line {line_no}: expected 'NAME START END', got '{text}'")
            }
            Self::BadHex { line_no, field } => {
                write!(f, "line {line_no}: '{field}' is not valid hex")
            }
            Self::EndBeforeStart { line_no } => {
                write!(f, "line {line_no}: end address is before start address")
            }
        }
    }
}

impl std::error::Error for ManifestError {}

pub fn parse(text: &str) -> Result<SegmentTable, ManifestError> {
    let mut records = Vec::new();
    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [name, start, end] = fields[..] else {
            return Err(ManifestError::MalformedLine {
                line_no,
                text: line.to_string(),
            });
        };
        let start = u16::from_str_radix(start, 16).map_err(|_| ManifestError::BadHex {
            line_no,
            field: "start",
        })?;
        let end = u16::from_str_radix(end, 16).map_err(|_| ManifestError::BadHex {
            line_no,
            field: "end",
        })?;
        if end < start {
            return Err(ManifestError::EndBeforeStart { line_no });
        }
        records.push(SegmentRecord {
            name: name.to_string(),
            start,
            size: end as usize - start as usize + 1,
        });
    }
    Ok(SegmentTable::new(records))
}
