//! Command line interface for dock2tauri.
//!
//! Argument parsing, colored output, and the top-level entry point that
//! turns parsed arguments into a launch request.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::error::{CliError, Result};
use crate::launcher::{self, LaunchMode, RunRequest};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();

    if let Err(validation_error) = args.validate() {
        return Err(CliError::InvalidArguments {
            reason: validation_error,
        }
        .into());
    }

    let config = RuntimeConfig::new();
    let request = request_from_args(&args);
    launcher::run(request, &config).await
}

/// Build an immutable launch request from parsed arguments.
///
/// A local Dockerfile argument without an explicit mode flag defaults to
/// build mode with export enabled, matching the historical launcher behavior.
pub fn request_from_args(args: &Args) -> RunRequest {
    let is_local_descriptor = std::path::Path::new(&args.image).is_file();

    let mode = if args.build || args.target.is_some() || is_local_descriptor {
        LaunchMode::Build
    } else {
        LaunchMode::Dev
    };

    RunRequest {
        image_or_path: args.image.clone(),
        host_port: args.host_port,
        container_port: args.container_port,
        mode,
        explicit_target: args.target.clone(),
        cross_enabled: args.cross,
        health_url: args.health_url.clone(),
        timeout_secs: args.timeout,
        cross_candidates: args.cross_targets.clone(),
        tauri_dir: args.tauri_dir.clone(),
    }
}
