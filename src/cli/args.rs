//! Command line argument parsing and validation.
//!
//! This module provides minimal CLI argument parsing.
//! The tool is designed to "just work" - point it at an image, it launches.

use clap::Parser;

/// Docker-to-desktop bridge launcher
#[derive(Parser, Debug)]
#[command(
    name = "dock2tauri",
    version,
    about = "Transform any Docker container into a native desktop application",
    long_about = "Run a Docker image (or build one from a local Dockerfile) and wrap the \
service it exposes in a Tauri desktop window, optionally packaging native installers.

Usage:
  dock2tauri nginx:alpine 8088 80
  dock2tauri ./examples/pwa/Dockerfile 8088 80
  dock2tauri nginx:alpine 8088 80 --build --cross

Passing a local Dockerfile defaults to build mode with artifact export enabled."
)]
pub struct Args {
    /// Docker image reference, or path to a local Dockerfile
    #[arg(index = 1, value_name = "IMAGE_OR_DOCKERFILE")]
    pub image: String,

    /// Host port to bind to
    #[arg(index = 2, value_name = "HOST_PORT", default_value_t = 8088)]
    pub host_port: u16,

    /// Container port to expose
    #[arg(index = 3, value_name = "CONTAINER_PORT", default_value_t = 80)]
    pub container_port: u16,

    /// Build release bundles instead of launching the dev window
    #[arg(long)]
    pub build: bool,

    /// Explicit target triple to build for (implies --build)
    #[arg(long, value_name = "TRIPLE")]
    pub target: Option<String>,

    /// Enable cross-compilation targets on top of the native build
    #[arg(long)]
    pub cross: bool,

    /// Health check URL override (default: http://localhost:<HOST_PORT>)
    #[arg(long, value_name = "URL")]
    pub health_url: Option<String>,

    /// Readiness poll timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,

    /// Comma-separated cross-target candidate list
    #[arg(
        long,
        env = "DOCK2TAURI_CROSS_TARGETS",
        value_name = "TRIPLES",
        default_value = "x86_64-pc-windows-gnu,aarch64-unknown-linux-gnu"
    )]
    pub cross_targets: String,

    /// Directory containing the Tauri shell project
    #[arg(long, value_name = "DIR", default_value = "src-tauri")]
    pub tauri_dir: std::path::PathBuf,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.image.is_empty() {
            return Err("Image reference or Dockerfile path is required".to_string());
        }

        if self.host_port == 0 {
            return Err("Host port must be non-zero".to_string());
        }

        if self.container_port == 0 {
            return Err("Container port must be non-zero".to_string());
        }

        if self.timeout == 0 {
            return Err("Readiness timeout must be at least 1 second".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new() -> Self {
        Self {
            output: super::OutputManager::new(log::log_enabled!(log::Level::Debug)),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message (shown when RUST_LOG enables debug)
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print progress message
    pub fn progress(&self, message: &str) {
        let _ = self.output.progress(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}
