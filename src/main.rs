//! Dock2Tauri - run any Docker image as a native desktop application.
//!
//! This binary wires the launch pipeline to the command line: one run starts
//! one container, wraps it in a Tauri window or builds native bundles, and
//! cleans up unconditionally on exit.

use dock2tauri::cli;
use dock2tauri::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            let output = OutputManager::new(false);
            output.error(&format!("Fatal error: {e}"));

            // Show recovery suggestions for critical errors
            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            process::exit(1);
        }
    }
}
