//! Peripheral Interface Adapter: keyboard ring buffer and host-mediated
//! file-transfer state machine, exposed through the mapped register
//! window at `$DC00..=$DC21`.

use crate::error::FileTransferError;
use crate::memory::Memory;

pub const PIA_BASE: u16 = 0xDC00;
pub const PIA_END: u16 = 0xDC21;

const KEYBOARD_CAPACITY: usize = 32;
const FILENAME_LEN: usize = 12;

const OFF_PORT_A_DATA: u16 = 0x00;
const OFF_PORT_A_DDR: u16 = 0x01;
const OFF_PORT_A_CTRL: u16 = 0x02;
const OFF_PORT_B_DATA: u16 = 0x03;
const OFF_PORT_B_DDR: u16 = 0x04;
const OFF_PORT_B_CTRL: u16 = 0x05;
const OFF_FILE_COMMAND: u16 = 0x10;
const OFF_FILE_STATUS: u16 = 0x11;
const OFF_FILE_ADDR_LO: u16 = 0x12;
const OFF_FILE_ADDR_HI: u16 = 0x13;
const OFF_FILENAME_START: u16 = 0x14;
const OFF_FILENAME_END: u16 = 0x1F;
const OFF_FILE_END_LO: u16 = 0x20;
const OFF_FILE_END_HI: u16 = 0x21;

const CTRL_DATA_AVAILABLE: u8 = 0x01;
const CTRL_BUFFER_FULL: u8 = 0x02;
const CTRL_INTERRUPT_FLAG: u8 = 0x04;
const CTRL_INTERRUPT_ENABLE: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileCommand {
    Idle = 0,
    Load = 1,
    Save = 2,
}

impl FileCommand {
    fn from_byte(byte: u8) -> Self {
        match byte {
            1 => Self::Load,
            2 => Self::Save,
            _ => Self::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileStatus {
    Idle = 0,
    InProgress = 1,
    Success = 2,
    Error = 3,
}

/// Host-side implementation of filesystem access. `cli` backs this with
/// `std::fs`; tests back it with an in-memory stand-in.
pub trait FileHost {
    fn load(&mut self, filename: &str) -> Result<Vec<u8>, FileTransferError>;
    fn save(&mut self, filename: &str, data: &[u8]) -> Result<(), FileTransferError>;
}

struct KeyboardRing {
    buffer: [u8; KEYBOARD_CAPACITY],
    head: usize,
    tail: usize,
    count: usize,
}

impl KeyboardRing {
    fn new() -> Self {
        Self {
            buffer: [0; KEYBOARD_CAPACITY],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    fn enqueue(&mut self, byte: u8) {
        if self.count == KEYBOARD_CAPACITY {
            return;
        }
        self.buffer[self.head] = byte;
        self.head = (self.head + 1) % KEYBOARD_CAPACITY;
        self.count += 1;
    }

    fn dequeue(&mut self) -> u8 {
        if self.count == 0 {
            return 0;
        }
        let byte = self.buffer[self.tail];
        self.tail = (self.tail + 1) % KEYBOARD_CAPACITY;
        self.count -= 1;
        byte
    }
}

struct FileTransferRecord {
    command: FileCommand,
    status: FileStatus,
    target_addr: u16,
    end_addr: u16,
    filename: [u8; FILENAME_LEN],
}

impl FileTransferRecord {
    fn new() -> Self {
        Self {
            command: FileCommand::Idle,
            status: FileStatus::Idle,
            target_addr: 0,
            end_addr: 0,
            filename: [0; FILENAME_LEN],
        }
    }

    fn filename_str(&self) -> String {
        let end = self
            .filename
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(FILENAME_LEN);
        String::from_utf8_lossy(&self.filename[..end]).into_owned()
    }
}

/// A transfer the host must service, read out of the PIA's register
/// state without holding any lock across the actual I/O.
enum PendingOperation {
    Load { filename: String, target: u16 },
    Save { filename: String, start: u16, end: u16 },
}

pub struct Pia {
    port_a_ddr: u8,
    port_a_ctrl: u8,
    port_b_data: u8,
    port_b_ddr: u8,
    port_b_ctrl: u8,
    keyboard: KeyboardRing,
    file: FileTransferRecord,
    last_error: Option<FileTransferError>,
}

impl Default for Pia {
    fn default() -> Self {
        Self::new()
    }
}

impl Pia {
    pub fn new() -> Self {
        Self {
            port_a_ddr: 0,
            port_a_ctrl: 0,
            port_b_data: 0,
            port_b_ddr: 0,
            port_b_ctrl: 0,
            keyboard: KeyboardRing::new(),
            file: FileTransferRecord::new(),
            last_error: None,
        }
    }

    /// The reason the most recent file transfer failed, if any. The guest
    /// only ever sees a bare `FileStatus::Error` code; this is for hosts
    /// and tests that want the underlying cause.
    pub fn last_error(&self) -> Option<&FileTransferError> {
        self.last_error.as_ref()
    }

    /// Called from the host input thread. Safe to call while the CPU is
    /// concurrently reading the data register — both paths go through
    /// the same `Arc<Mutex<Pia>>` guard.
    pub fn add_keypress(&mut self, byte: u8) {
        self.keyboard.enqueue(byte);
    }

    fn recompute_status_bits(&mut self) {
        let available = self.keyboard.count > 0;
        let full = self.keyboard.count == KEYBOARD_CAPACITY;
        let interrupt_enable = self.port_a_ctrl & CTRL_INTERRUPT_ENABLE != 0;

        self.port_a_ctrl &=
            !(CTRL_DATA_AVAILABLE | CTRL_BUFFER_FULL | CTRL_INTERRUPT_FLAG);
        if available {
            self.port_a_ctrl |= CTRL_DATA_AVAILABLE;
        }
        if full {
            self.port_a_ctrl |= CTRL_BUFFER_FULL;
        }
        if available && interrupt_enable {
            self.port_a_ctrl |= CTRL_INTERRUPT_FLAG;
        }
    }

    pub fn read(&mut self, offset: u16) -> u8 {
        match offset {
            OFF_PORT_A_DATA => {
                let byte = self.keyboard.dequeue();
                self.recompute_status_bits();
                byte
            }
            OFF_PORT_A_DDR => self.port_a_ddr,
            OFF_PORT_A_CTRL => {
                self.recompute_status_bits();
                self.port_a_ctrl
            }
            OFF_PORT_B_DATA => self.port_b_data,
            OFF_PORT_B_DDR => self.port_b_ddr,
            OFF_PORT_B_CTRL => self.port_b_ctrl,
            OFF_FILE_COMMAND => self.file.command as u8,
            OFF_FILE_STATUS => self.file.status as u8,
            OFF_FILE_ADDR_LO => self.file.target_addr as u8,
            OFF_FILE_ADDR_HI => (self.file.target_addr >> 8) as u8,
            OFF_FILENAME_START..=OFF_FILENAME_END => {
                self.file.filename[(offset - OFF_FILENAME_START) as usize]
            }
            OFF_FILE_END_LO => self.file.end_addr as u8,
            OFF_FILE_END_HI => (self.file.end_addr >> 8) as u8,
            _ => 0,
        }
    }

    pub fn write(&mut self, offset: u16, value: u8) {
        match offset {
            OFF_PORT_A_DATA => {}
            OFF_PORT_A_DDR => self.port_a_ddr = value,
            OFF_PORT_A_CTRL => {
                self.port_a_ctrl = value;
                self.recompute_status_bits();
            }
            OFF_PORT_B_DATA => self.port_b_data = value,
            OFF_PORT_B_DDR => self.port_b_ddr = value,
            OFF_PORT_B_CTRL => self.port_b_ctrl = value,
            OFF_FILE_COMMAND => {
                self.file.command = FileCommand::from_byte(value);
                if matches!(self.file.command, FileCommand::Load | FileCommand::Save) {
                    self.file.status = FileStatus::InProgress;
                }
            }
            OFF_FILE_STATUS => {
                self.file.status = match value {
                    1 => FileStatus::InProgress,
                    2 => FileStatus::Success,
                    3 => FileStatus::Error,
                    _ => FileStatus::Idle,
                }
            }
            OFF_FILE_ADDR_LO => {
                self.file.target_addr = (self.file.target_addr & 0xFF00) | value as u16;
            }
            OFF_FILE_ADDR_HI => {
                self.file.target_addr = (self.file.target_addr & 0x00FF) | ((value as u16) << 8);
            }
            OFF_FILENAME_START..=OFF_FILENAME_END => {
                self.file.filename[(offset - OFF_FILENAME_START) as usize] = value;
            }
            OFF_FILE_END_LO => {
                self.file.end_addr = (self.file.end_addr & 0xFF00) | value as u16;
            }
            OFF_FILE_END_HI => {
                self.file.end_addr = (self.file.end_addr & 0x00FF) | ((value as u16) << 8);
            }
            _ => {}
        }
    }

    fn take_pending(&self) -> Option<PendingOperation> {
        if self.file.status != FileStatus::InProgress {
            return None;
        }
        match self.file.command {
            FileCommand::Load => Some(PendingOperation::Load {
                filename: self.file.filename_str(),
                target: self.file.target_addr,
            }),
            FileCommand::Save => Some(PendingOperation::Save {
                filename: self.file.filename_str(),
                start: self.file.target_addr,
                end: self.file.end_addr,
            }),
            FileCommand::Idle => None,
        }
    }

    fn finish(&mut self, status: FileStatus) {
        self.file.status = status;
        self.file.command = FileCommand::Idle;
    }

    /// Records `err` for [`Pia::last_error`] and finishes the transfer as
    /// `FileStatus::Error`.
    fn fail(&mut self, err: FileTransferError) {
        self.last_error = Some(err);
        self.finish(FileStatus::Error);
    }

    /// Host-side half of the file-transfer protocol. Must be called
    /// strictly between CPU instructions, never during one, because it
    /// may perform blocking host I/O.
    pub fn process_file_operations(&mut self, memory: &mut Memory, host: &mut dyn FileHost) {
        let Some(op) = self.take_pending() else {
            return;
        };

        match op {
            PendingOperation::Load { filename, target } => {
                if filename.is_empty() {
                    self.fail(FileTransferError::EmptySelection);
                    return;
                }
                match host.load(&filename) {
                    Ok(data) => {
                        for (i, byte) in data.iter().enumerate() {
                            match target.checked_add(i as u16) {
                                Some(addr) => memory.write(addr, *byte),
                                None => break,
                            }
                        }
                        self.finish(FileStatus::Success);
                    }
                    Err(e) => self.fail(e),
                }
            }
            PendingOperation::Save {
                filename,
                start,
                end,
            } => {
                if filename.is_empty() {
                    self.fail(FileTransferError::EmptySelection);
                    return;
                }
                if end < start {
                    self.fail(FileTransferError::InvalidRange { start, end });
                    return;
                }
                let span = end as u32 - start as u32 + 1;
                let mut data = Vec::with_capacity(span as usize);
                let mut addr = start;
                for _ in 0..span {
                    data.push(memory.read(addr));
                    if addr == u16::MAX {
                        break;
                    }
                    addr += 1;
                }
                match host.save(&filename, &data) {
                    Ok(()) => self.finish(FileStatus::Success),
                    Err(e) => self.fail(e),
                }
            }
        }
    }
}
