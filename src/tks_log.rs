// Logger setup
// The TUI owns the terminal, so log output goes to a file and only when RUST_LOG is set

use chrono::Local;
use directories::ProjectDirs;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Log file location, next to the per-project data directory
pub fn log_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "xhbl", env!("CARGO_PKG_NAME"))?;
    Some(proj.data_local_dir().join(format!("{}.log", env!("CARGO_PKG_NAME"))))
}

/// Initialize env_logger if RUST_LOG is present; otherwise logging stays off
pub fn init() {
    if env::var_os("RUST_LOG").is_none() {
        return;
    }
    let Some(path) = log_path() else { return };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
    log::info!("logging to {}", path.display());
}
