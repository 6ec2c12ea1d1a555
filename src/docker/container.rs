//! Container lifecycle management.
//!
//! Starts exactly one container per run, evicting any prior occupant of the
//! host port or the derived name first. The engine's live state is the single
//! source of truth; nothing about port or name ownership is cached in-process.

use crate::cli::RuntimeConfig;
use crate::error::{DockerError, Result};
use tokio::process::Command;

/// Handle to the single container owned by a run.
///
/// Exclusively owned by the lifecycle manager; the cleanup guard stops and
/// removes it on every exit path.
#[derive(Debug, Clone)]
pub struct ContainerHandle {
    /// Engine-assigned container id
    pub id: String,
    /// Derived deterministic container name
    pub name: String,
    /// Host port the service is mapped to
    pub host_port: u16,
    /// Port exposed inside the container
    pub container_port: u16,
}

/// Derives a deterministic container name from image and host port.
///
/// Relaunching the same image on the same port intentionally replaces the
/// prior instance.
pub fn derive_container_name(image: &str, host_port: u16) -> String {
    let sanitized: String = image
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    format!("dock2tauri-{}-{}", sanitized, host_port)
}

/// Stops any container publishing the host port and removes any container
/// holding the derived name.
///
/// Both operations are best-effort: a missing occupant is the normal case and
/// never an error.
pub async fn evict_conflicts(name: &str, host_port: u16, config: &RuntimeConfig) {
    let ps = Command::new("docker")
        .args(["ps", "-q", "--filter", &format!("publish={}", host_port)])
        .output()
        .await;

    if let Ok(output) = ps {
        let ids = String::from_utf8_lossy(&output.stdout);
        for id in ids.split_whitespace() {
            config.verbose_println(&format!("Stopping container {} on port {}", id, host_port));
            let _ = Command::new("docker").args(["stop", id]).output().await;
        }
    }

    // Remove a stale container with our name, running or not
    let _ = Command::new("docker").args(["rm", "-f", name]).output().await;
}

/// Starts the container with explicit port mapping and an automatic restart
/// policy.
///
/// Start failure is fatal; Docker's stderr is surfaced verbatim.
pub async fn start_container(
    image: &str,
    name: &str,
    host_port: u16,
    container_port: u16,
    config: &RuntimeConfig,
) -> Result<ContainerHandle> {
    config.progress(&format!(
        "Launching container {} ({} -> {})...",
        name, host_port, container_port
    ));

    let output = Command::new("docker")
        .args([
            "run",
            "-d",
            "-p",
            &format!("{}:{}", host_port, container_port),
            "--name",
            name,
            "--restart",
            "unless-stopped",
            image,
        ])
        .output()
        .await
        .map_err(|e| DockerError::CommandFailed {
            command: "docker run".to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(DockerError::ContainerStartFailed {
            name: name.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
    config.success_println(&format!("Container launched: {}", &id[..12.min(id.len())]));
    config.println(&format!("Access at: http://localhost:{}", host_port));

    Ok(ContainerHandle {
        id,
        name: name.to_string(),
        host_port,
        container_port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_deterministic() {
        assert_eq!(
            derive_container_name("nginx:alpine", 8088),
            derive_container_name("nginx:alpine", 8088)
        );
    }

    #[test]
    fn name_encodes_image_and_port() {
        let name = derive_container_name("nginx:alpine", 8088);
        assert_eq!(name, "dock2tauri-nginx-alpine-8088");
    }

    #[test]
    fn name_replaces_slashes() {
        let name = derive_container_name("ghcr.io/acme/web:1.0", 9000);
        assert!(!name.contains('/'));
        assert!(!name.contains(':'));
        assert!(name.ends_with("-9000"));
    }
}
