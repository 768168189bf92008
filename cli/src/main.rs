mod config;
mod file_host;
mod manifest;

use std::io::Read;
use std::process::ExitCode;
use std::thread;

use clap::Parser;
use phosphor_core::error::BootError;
use phosphor_core::machine::Machine;
use phosphor_core::reset::Timing;

use file_host::LocalFileHost;

fn main() -> ExitCode {
    let args = config::Args::parse();
    let resolved = match config::resolve(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("phosphor: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rom = match std::fs::read(&resolved.rom) {
        Ok(bytes) => bytes,
        Err(e) => {
            let e = BootError::RomUnreadable { path: resolved.rom.clone(), source: e };
            eprintln!("phosphor: boot failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let manifest_text = match std::fs::read_to_string(&resolved.segments) {
        Ok(text) => text,
        Err(e) => {
            eprintln!(
                "phosphor: cannot read segment table {}: {e}",
                resolved.segments.display()
            );
            return ExitCode::FAILURE;
        }
    };
    let segments = match manifest::parse(&manifest_text) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("phosphor: bad segment table: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut machine =
        Machine::new().with_timing(Timing::new(resolved.frequency_hz, resolved.pace));
    if let Err(e) = machine.power_on(&rom, &segments) {
        eprintln!("phosphor: boot failed: {e}");
        return ExitCode::FAILURE;
    }

    let pia = machine.pia_handle();
    thread::spawn(move || {
        let mut stdin = std::io::stdin();
        let mut byte = [0u8; 1];
        while stdin.read_exact(&mut byte).is_ok() {
            pia.lock().unwrap().add_keypress(byte[0]);
        }
    });

    let mut host = LocalFileHost::new(&resolved.file_root);
    machine.run(resolved.max_cycles, &mut host);

    ExitCode::SUCCESS
}
