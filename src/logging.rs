use std::error::Error;
use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode, WriteLogger};

/// 0 = warn, 1 = info, 2 = debug, 3+ = trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// env_logger to stderr by default (RUST_LOG still overrides); with a log
/// file, simplelog writes to both the terminal and the file.
pub fn init(verbosity: u8, log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let level = level_for(verbosity);
    match log_file {
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_env("RUST_LOG")
                .try_init()?;
        }
        Some(path) => {
            let config = ConfigBuilder::new().set_time_format_rfc3339().build();
            let loggers: Vec<Box<dyn SharedLogger>> = vec![
                TermLogger::new(level, config.clone(), TerminalMode::Stderr, ColorChoice::Auto),
                WriteLogger::new(level, config, File::create(path)?),
            ];
            CombinedLogger::init(loggers)?;
        }
    }
    Ok(())
}
