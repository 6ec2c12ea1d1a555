//! Error types for dock2tauri launch operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dock2tauri operations
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Main error type for all dock2tauri operations
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Docker engine errors
    #[error("Docker error: {0}")]
    Docker(#[from] DockerError),

    /// Manifest generation errors
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Native build errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Docker engine errors
#[derive(Error, Debug)]
pub enum DockerError {
    /// Docker binary not found or daemon not responding
    #[error("Docker daemon unavailable: {reason}")]
    DaemonUnavailable {
        /// Reason for the error
        reason: String,
    },

    /// Local image build failed
    #[error("Image build failed for tag '{tag}': {reason}")]
    ImageBuildFailed {
        /// Local tag the build was producing
        tag: String,
        /// Reason for the error
        reason: String,
    },

    /// Container start failed
    #[error("Failed to start container '{name}': {stderr}")]
    ContainerStartFailed {
        /// Derived container name
        name: String,
        /// Docker's stderr, surfaced verbatim
        stderr: String,
    },

    /// A docker subcommand failed
    #[error("Docker command failed: {command} - {reason}")]
    CommandFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// Manifest generation errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Could not write the ephemeral config file
    #[error("Failed to write manifest at {path}: {reason}")]
    WriteFailed {
        /// Temp path the manifest was written to
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },

    /// Image reference produced an empty identity after sanitization
    #[error("Image reference '{image}' yields no usable identity characters")]
    EmptyIdentity {
        /// Offending image reference
        image: String,
    },
}

/// Native build errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Required build tool missing from PATH
    #[error("Build tool not found: {tool} - {reason}")]
    ToolMissing {
        /// Tool binary name
        tool: String,
        /// Reason for the error
        reason: String,
    },

    /// Could not spawn or wait on the tauri CLI
    #[error("Build invocation failed: {command} - {reason}")]
    InvocationFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl LaunchError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            LaunchError::Docker(DockerError::DaemonUnavailable { .. }) => vec![
                "Install Docker: https://docs.docker.com/get-docker/".to_string(),
                "Start the daemon: sudo systemctl start docker (Linux)".to_string(),
                "Verify with: docker info".to_string(),
            ],
            LaunchError::Docker(DockerError::ContainerStartFailed { .. }) => vec![
                "Check whether the host port is already bound: docker ps".to_string(),
                "Verify the image exists locally or is pullable: docker pull <image>".to_string(),
            ],
            LaunchError::Docker(DockerError::ImageBuildFailed { .. }) => vec![
                "Inspect the Dockerfile for syntax errors".to_string(),
                "Retry the build manually: docker build <context>".to_string(),
            ],
            LaunchError::Build(BuildError::ToolMissing { tool, .. }) => vec![
                format!("Install the missing tool: {}", tool),
                "Install the Tauri CLI: cargo install tauri-cli".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if this error is recoverable without operator intervention
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            LaunchError::Docker(DockerError::DaemonUnavailable { .. })
                | LaunchError::Cli(CliError::InvalidArguments { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daemon_unavailable_is_not_recoverable() {
        let err: LaunchError = DockerError::DaemonUnavailable {
            reason: "not running".to_string(),
        }
        .into();
        assert!(!err.is_recoverable());
        assert!(!err.recovery_suggestions().is_empty());
    }

    #[test]
    fn io_errors_convert_and_stay_recoverable() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = LaunchError::from(io);
        assert!(matches!(err, LaunchError::Io(_)));
        assert!(err.is_recoverable());
    }
}
