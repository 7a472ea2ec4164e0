use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Where log output goes. The drill screen owns the terminal, so a running
/// session logs to a file; maintenance commands log to stderr.
pub enum LogDestination<'a> {
    Stderr,
    Directory(&'a Path),
}

pub fn log_file_name(started: DateTime<Utc>) -> String {
    format!("sightright_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Install the global logger. `RUST_LOG` still overrides the level chosen by
/// `debug`. Returns the log file path when logging to a directory.
pub fn init(debug: bool, destination: LogDestination<'_>) -> io::Result<Option<PathBuf>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .parse_env(Env::default())
        .format_timestamp_millis();

    let path = match destination {
        LogDestination::Stderr => {
            builder.target(Target::Stderr);
            None
        }
        LogDestination::Directory(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(Utc::now()));
            let file = File::create(&path)?;
            builder.target(Target::Pipe(Box::new(file)));
            Some(path)
        }
    };

    builder.try_init().map_err(io::Error::other)?;
    Ok(path)
}
