//! # Dock2Tauri
//!
//! Transform any Docker container into a native desktop application.
//!
//! The launcher resolves an image reference (or builds one from a local
//! Dockerfile), runs it with an explicit port mapping, waits for the service
//! to answer, generates a run-scoped ephemeral Tauri configuration, and
//! either opens a dev window against the live container or drives
//! `cargo tauri build` per feasible packaging target, exporting everything
//! produced into a `dist/<platform>/` tree.
//!
//! ## Usage
//!
//! ```bash
//! dock2tauri nginx:alpine 8088 80            # dev window
//! dock2tauri nginx:alpine 8088 80 --build    # native bundles into dist/
//! dock2tauri ./examples/pwa/Dockerfile       # build from a local context
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod build;
pub mod cli;
pub mod docker;
pub mod error;
pub mod export;
pub mod launcher;
pub mod manifest;
pub mod mobile;
pub mod toolchain;

// Re-export main types for public API
pub use build::{BuildOrchestrator, BuildResult, TargetState};
pub use cli::Args;
pub use docker::{CleanupGuard, ContainerHandle};
pub use error::{CliError, DockerError, LaunchError, Result};
pub use launcher::{LaunchMode, RunRequest};
pub use manifest::{Manifest, TauriConf};
pub use toolchain::ToolchainReport;
