//! Logging setup, driven by environment variables.
//!
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: "trace" | "debug" | "info" | "warn" | "error" (default "info")
//! - LOG_FILE_PATH: log file base path in file mode (default "logs/launchpad.log")

use chrono::Utc;
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, File},
    path::Path,
};

/// File mode rolls the log per UTC day: "logs/launchpad.log" becomes
/// "logs/launchpad-2026-08-06.log".
fn rolled_path(base: &str) -> String {
    let date = Utc::now().format("%Y-%m-%d");
    match base.strip_suffix(".log") {
        Some(stem) => format!("{stem}-{date}.log"),
        None => format!("{base}-{date}.log"),
    }
}

pub fn setup_logging() {
    let mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
    let level = env::var("LOG_LEVEL")
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    if mode.eq_ignore_ascii_case("file") {
        let base = env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/launchpad.log".to_string());
        let path = rolled_path(&base);

        if let Some(parent) = Path::new(&path).parent() {
            create_dir_all(parent).expect("Failed to create log directory");
        }
        let file = File::create(&path)
            .unwrap_or_else(|e| panic!("Unable to create log file {}: {}", path, e));

        WriteLogger::init(level, Config::default(), file)
            .expect("Failed to initialize file logger");
    } else {
        SimpleLogger::init(level, Config::default()).expect("Failed to initialize simple logger");
    }

    info!("Logging is successfully configured (mode: {})", mode);
}
