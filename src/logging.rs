//! File-backed tracing setup.
//!
//! Diagnostics go to `receptar.log` in the data directory rather than the
//! terminal, so the TUI screen stays intact. The filter is taken from
//! `RECEPTAR_LOG` and defaults to `info`. Setup failures disable logging
//! but never the application.

use std::fs;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::app_dirs;

const FILTER_ENV: &str = "RECEPTAR_LOG";
const LOG_FILE: &str = "receptar.log";

pub(crate) fn initialize() {
    let dir = match app_dirs::get_data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("receptar: logging disabled: {err}");
            return;
        }
    };
    if let Err(err) = fs::create_dir_all(&dir) {
        eprintln!("receptar: logging disabled: {err}");
        return;
    }

    let path = dir.join(LOG_FILE);
    let file = match fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("receptar: logging disabled: {err}");
            return;
        }
    };

    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}
