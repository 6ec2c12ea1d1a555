//! RAII guard for per-run resource cleanup.
//!
//! Registered once, immediately after the container starts; releases the
//! container and the ephemeral manifest on every exit path - normal return,
//! error return, or interrupt-driven unwind.

use std::path::PathBuf;
use std::time::Duration;
use wait_timeout::ChildExt;

/// RAII guard covering the container and the ephemeral manifest file.
///
/// Cleanup runs exactly once: explicit invocation and Drop share the same
/// idempotent path, and "already removed" is never an error.
#[derive(Debug, Default)]
pub struct CleanupGuard {
    container_name: Option<String>,
    manifest_path: Option<PathBuf>,
}

impl CleanupGuard {
    /// Creates an empty guard with nothing registered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the container to remove on release.
    pub fn register_container(&mut self, name: &str) {
        self.container_name = Some(name.to_string());
    }

    /// Registers the manifest temp file to delete on release.
    pub fn register_manifest(&mut self, path: PathBuf) {
        self.manifest_path = Some(path);
    }

    /// Releases all registered resources. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(name) = self.container_name.take() {
            remove_container(&name);
        }

        if let Some(path) = self.manifest_path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => log::debug!("Removed manifest {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    eprintln!("Warning: Failed to remove manifest {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        self.release();
        // Note: We deliberately ignore all errors and don't panic
        // Drop must never panic, and we're already in an error/cleanup path
    }
}

/// Best-effort container removal with timeout protection.
///
/// Uses spawn() + wait_timeout() instead of output() to avoid infinite hangs
/// if the Docker daemon becomes unresponsive.
fn remove_container(name: &str) {
    let mut child = match std::process::Command::new("docker")
        .args(["rm", "-f", name])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(_) => {
            // Can't even spawn docker (e.g. binary not found); give up gracefully
            return;
        }
    };

    // Docker daemon should respond instantly if alive (just removing a container entry)
    let timeout = Duration::from_secs(5);
    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            // "No such container" exits non-zero; that is the already-removed
            // case and not worth more than a debug line.
            if !status.success() {
                log::debug!(
                    "docker rm -f {} exited with code {}",
                    name,
                    status.code().unwrap_or(-1)
                );
            }
        }
        Ok(None) => {
            // Timeout reached - kill the hanging docker command to prevent a zombie
            let _ = child.kill();
            let _ = child.wait();

            eprintln!(
                "Warning: Timed out cleaning up container '{}' after {} seconds. \
                 Docker daemon may be down.",
                name,
                timeout.as_secs()
            );
        }
        Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("manifest.json");
        std::fs::write(&manifest, "{}").unwrap();

        let mut guard = CleanupGuard::new();
        guard.register_manifest(manifest.clone());

        guard.release();
        assert!(!manifest.exists());

        // Double release (simulated double interrupt) must not panic
        guard.release();
        guard.release();
    }

    #[test]
    fn missing_manifest_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut guard = CleanupGuard::new();
        guard.register_manifest(dir.path().join("never-written.json"));
        guard.release();
    }

    #[test]
    fn empty_guard_drops_cleanly() {
        let _guard = CleanupGuard::new();
    }
}
