//! Command-line arguments layered over an optional TOML config file.

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "phosphor", about = "Headless 65C02 microcomputer emulator")]
pub struct Args {
    /// Path to the flat ROM image (CODE+JUMPS+VECS concatenated).
    #[arg(long)]
    pub rom: Option<PathBuf>,

    /// Path to the segment-table manifest.
    #[arg(long)]
    pub segments: Option<PathBuf>,

    /// Directory the PIA's file-transfer commands read/write.
    #[arg(long)]
    pub file_root: Option<PathBuf>,

    /// Target CPU clock frequency in Hz.
    #[arg(long)]
    pub frequency_hz: Option<u64>,

    /// Enable cycle pacing to the target frequency (disabled by default,
    /// which runs as fast as the host allows).
    #[arg(long)]
    pub pace: bool,

    /// Maximum instructions to execute before exiting.
    #[arg(long, default_value_t = 1_000_000)]
    pub max_cycles: u64,

    /// Path to a TOML config file overriding the defaults below. Falls
    /// back to `$XDG_CONFIG_HOME/phosphor/config.toml` when unset.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub rom: Option<PathBuf>,
    pub segments: Option<PathBuf>,
    pub file_root: Option<PathBuf>,
    pub frequency_hz: Option<u64>,
    pub pace: Option<bool>,
}

pub struct ResolvedConfig {
    pub rom: PathBuf,
    pub segments: PathBuf,
    pub file_root: PathBuf,
    pub frequency_hz: u64,
    pub pace: bool,
    pub max_cycles: u64,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingRom,
    MissingSegments,
    Io(std::io::Error),
    Toml(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRom => write!(f, "no ROM path given on the command line or in config"),
            Self::MissingSegments => {
                write!(f, "no segment-table path given on the command line or in config")
            }
            Self::Io(e) => write!(f, "{e}"),
            Self::Toml(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("phosphor").join("config.toml"))
}

pub fn resolve(args: Args) -> Result<ResolvedConfig, ConfigError> {
    let config_path = args.config.clone().or_else(default_config_path);
    let file_config = match config_path {
        Some(path) if path.exists() => {
            let text = std::fs::read_to_string(path)?;
            toml::from_str(&text)?
        }
        _ => FileConfig::default(),
    };

    let rom = args.rom.or(file_config.rom).ok_or(ConfigError::MissingRom)?;
    let segments = args
        .segments
        .or(file_config.segments)
        .ok_or(ConfigError::MissingSegments)?;
    let file_root = args
        .file_root
        .or(file_config.file_root)
        .unwrap_or_else(std::env::temp_dir);
    let frequency_hz = args.frequency_hz.or(file_config.frequency_hz).unwrap_or(1_000_000);
    let pace = args.pace || file_config.pace.unwrap_or(false);

    Ok(ResolvedConfig {
        rom,
        segments,
        file_root,
        frequency_hz,
        pace,
        max_cycles: args.max_cycles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> Args {
        Args {
            rom: None,
            segments: None,
            file_root: None,
            frequency_hz: None,
            pace: false,
            max_cycles: 10,
            config: None,
        }
    }

    #[test]
    fn missing_rom_is_an_error() {
        let args = Args {
            segments: Some(PathBuf::from("segments.txt")),
            ..bare_args()
        };
        assert!(matches!(resolve(args), Err(ConfigError::MissingRom)));
    }

    #[test]
    fn cli_args_take_priority_and_fill_defaults() {
        let args = Args {
            rom: Some(PathBuf::from("rom.bin")),
            segments: Some(PathBuf::from("segments.txt")),
            config: Some(PathBuf::from("/nonexistent/phosphor.toml")),
            ..bare_args()
        };
        let resolved = resolve(args).unwrap();
        assert_eq!(resolved.rom, PathBuf::from("rom.bin"));
        assert_eq!(resolved.frequency_hz, 1_000_000);
        assert!(!resolved.pace);
    }
}
