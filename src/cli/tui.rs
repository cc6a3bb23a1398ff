//! TUI command handler.

use super::{SourceOptions, exit_codes, start_controller};
use crate::config::AppConfig;
use crate::tui::{PreflightApp, run_tui};
use anyhow::{Context, Result};

/// Run the interactive preflight screen until the user quits.
///
/// A failed initial fetch is not fatal here; it is shown in the status bar
/// and the user can reload.
pub fn run_tui_command(config: &AppConfig, options: &SourceOptions) -> Result<i32> {
    let controller = start_controller(config, options)?;
    let mut app = PreflightApp::new(controller);

    run_tui(&mut app, &config.tui).context("terminal UI failed")?;

    // Dropping the app cancels any pending registration.
    drop(app);
    Ok(exit_codes::SUCCESS)
}
