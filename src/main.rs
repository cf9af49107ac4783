// Entry point for the Minesweeper TUI application
// Sets up logging, validates configuration, loads language strings and launches the UI

use std::error::Error;
use std::process;

// Module declarations
mod tks_board; // Cells, mine placement, reveal cascade
mod tks_color; // Cross-terminal palette
mod tks_config; // Board parameters and preferences
mod tks_game; // Round controller and render instructions
mod tks_lang; // Multi-language string resources
mod tks_log; // File-backed logger
mod tks_ui; // Terminal UI rendering and event handling

use tks_config::{load_or_create_config, ConfigError};
use tks_lang::Lang;
use tks_ui::run as run_ui;

fn main() -> Result<(), Box<dyn Error>> {
    tks_log::init();

    let cfg = load_or_create_config();
    // Reject impossible boards before touching the terminal
    let game_cfg = match cfg.game_config() {
        Ok(game_cfg) => game_cfg,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            eprintln!("{}", config_error_message(&e));
            process::exit(2);
        }
    };
    log::info!("starting with {:?}", game_cfg);

    let lang = Lang::new(&cfg.language);
    log::debug!("ui language: {}", lang.current_lang);
    run_ui(&cfg, game_cfg, &lang)
}

fn config_error_message(e: &ConfigError) -> String {
    let path = tks_config::config_path().map(|p| p.display().to_string()).unwrap_or_else(|| "config file".to_string());
    format!("{}: invalid configuration in {}: {}", env!("CARGO_PKG_NAME"), path, e)
}
