use std::fs::OpenOptions;

use env_logger::{Builder, Env, Target};

use crate::storage;

pub enum LogTarget {
    Stderr,
    /// Append to the state-dir log file; used while the terminal UI owns the screen.
    File,
}

pub fn init(target: LogTarget) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));

    match target {
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
        }
        LogTarget::File => {
            let path = storage::get_log_path();
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => {
                    builder.target(Target::Pipe(Box::new(file)));
                }
                Err(e) => {
                    eprintln!("Warning: Could not open log file {}: {}", path.display(), e);
                    builder.filter_level(log::LevelFilter::Off);
                }
            }
        }
    }

    let _ = builder.try_init();
}
