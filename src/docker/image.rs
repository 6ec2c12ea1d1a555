//! Docker image resolution for launch runs.
//!
//! Turns a registry reference or a local Dockerfile path into a runnable
//! image reference, building the image when a local build context is given.

use crate::cli::RuntimeConfig;
use crate::error::{DockerError, Result};
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::timeout;

/// Timeout for Docker info check (5 seconds)
/// Quick daemon availability check shouldn't take long
pub const DOCKER_INFO_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout for Docker image build operations (30 minutes)
/// Image builds can take a long time due to base image downloads, apt updates, etc.
pub const DOCKER_BUILD_TIMEOUT: Duration = Duration::from_secs(1800);

/// Platform-specific Docker startup instructions
#[cfg(target_os = "macos")]
const DOCKER_START_HELP: &str = "Start Docker Desktop from Applications or Spotlight";

#[cfg(target_os = "linux")]
const DOCKER_START_HELP: &str = "Start Docker daemon: sudo systemctl start docker";

#[cfg(target_os = "windows")]
const DOCKER_START_HELP: &str = "Start Docker Desktop from the Start menu";

/// Per-process discriminator so repeated local builds never collide on a tag.
static TAG_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Checks if Docker is installed and the daemon is running.
///
/// # Returns
///
/// * `Ok(())` - Docker is available
/// * `Err` - Docker is not installed or daemon is not running
pub async fn check_docker_available() -> Result<()> {
    if which::which("docker").is_err() {
        return Err(DockerError::DaemonUnavailable {
            reason: format!(
                "Docker command not found on PATH.\n\
                 \n\
                 Install from: https://docs.docker.com/get-docker/\n\
                 {}",
                DOCKER_START_HELP
            ),
        }
        .into());
    }

    let status_result = timeout(
        DOCKER_INFO_TIMEOUT,
        Command::new("docker")
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
    )
    .await;

    match status_result {
        // Timeout occurred
        Err(_) => Err(DockerError::DaemonUnavailable {
            reason: format!(
                "Docker daemon check timed out after {} seconds.\n\
                 \n\
                 This usually means Docker is not responding.\n\
                 {}\n\
                 \n\
                 If Docker is running, check: docker ps",
                DOCKER_INFO_TIMEOUT.as_secs(),
                DOCKER_START_HELP
            ),
        }
        .into()),

        // Command succeeded
        Ok(Ok(status)) if status.success() => Ok(()),

        // Docker command exists but daemon isn't responding
        Ok(Ok(status)) => Err(DockerError::DaemonUnavailable {
            reason: format!(
                "Docker daemon is not responding (exit code: {}).\n\
                 \n\
                 {}",
                status.code().unwrap_or(-1),
                DOCKER_START_HELP
            ),
        }
        .into()),

        // Spawn failed even though the binary resolved
        Ok(Err(e)) => Err(DockerError::DaemonUnavailable {
            reason: format!("Failed to invoke docker: {}", e),
        }
        .into()),
    }
}

/// Resolves an image argument into a runnable image reference.
///
/// If the argument names an existing file it is treated as a Dockerfile: its
/// parent directory becomes the build context, a unique local tag is derived,
/// and `docker build` runs to completion. Build failure is fatal. Any other
/// string passes through unchanged.
pub async fn resolve(image_or_path: &str, config: &RuntimeConfig) -> Result<String> {
    let path = Path::new(image_or_path);
    if !path.is_file() {
        log::debug!("'{}' is not a local file, using as image reference", image_or_path);
        return Ok(image_or_path.to_string());
    }

    let tag = derive_local_tag(path);
    let context = path.parent().unwrap_or(Path::new("."));

    config.progress(&format!(
        "Building image {} from {}...",
        tag,
        path.display()
    ));
    build_image(path, context, &tag, config).await?;
    config.success_println(&format!("Image built: {}", tag));

    Ok(tag)
}

/// Derives a deterministic-but-unique local tag for a Dockerfile build.
///
/// The base comes from the build context directory name, lowercased and
/// stripped to `[a-z0-9_.-]`; a timestamp plus a per-process counter is
/// appended so concurrent and repeated runs never collide.
pub fn derive_local_tag(dockerfile: &Path) -> String {
    let base = dockerfile
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("local");

    let sanitized: String = base
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'))
        .collect();

    let sanitized = if sanitized.is_empty() {
        "local".to_string()
    } else {
        sanitized
    };

    let seq = TAG_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!(
        "dock2tauri-{}-{}-{}",
        sanitized,
        chrono::Utc::now().timestamp(),
        seq
    )
}

/// Builds the Docker image from a Dockerfile, streaming build output.
async fn build_image(
    dockerfile: &Path,
    context: &Path,
    tag: &str,
    config: &RuntimeConfig,
) -> Result<()> {
    let mut child = Command::new("docker")
        .arg("build")
        .arg("-t")
        .arg(tag)
        .arg("-f")
        .arg(dockerfile)
        .arg(context)
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| DockerError::ImageBuildFailed {
            tag: tag.to_string(),
            reason: e.to_string(),
        })?;

    // Stream stdout line-by-line
    if let Some(stdout) = child.stdout.take() {
        let reader = BufReader::new(stdout);
        let mut lines = reader.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            config.indent(&line);
        }
    }

    // Wait with timeout - handle timeout explicitly to kill child
    let status = tokio::time::timeout(DOCKER_BUILD_TIMEOUT, child.wait()).await;

    let status = match status {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            return Err(DockerError::ImageBuildFailed {
                tag: tag.to_string(),
                reason: e.to_string(),
            }
            .into());
        }
        Err(_elapsed) => {
            config.warning_println("Docker build timed out, terminating process...");

            if let Err(e) = child.kill().await {
                log::warn!("Failed to kill docker build process: {}", e);
            }
            // Reap zombie with a short bounded wait
            let _ = tokio::time::timeout(Duration::from_secs(10), child.wait()).await;

            return Err(DockerError::ImageBuildFailed {
                tag: tag.to_string(),
                reason: format!(
                    "Docker build timed out after {} minutes.\n\
                     \n\
                     Possible causes:\n\
                     • Slow network connection to Docker registry\n\
                     • Large base image download\n\
                     \n\
                     Check network connection or retry manually with docker build",
                    DOCKER_BUILD_TIMEOUT.as_secs() / 60
                ),
            }
            .into());
        }
    };

    if !status.success() {
        return Err(DockerError::ImageBuildFailed {
            tag: tag.to_string(),
            reason: format!(
                "Build failed with exit code: {}",
                status.code().unwrap_or(-1)
            ),
        }
        .into());
    }

    Ok(())
}
