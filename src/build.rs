//! Native build orchestration.
//!
//! Drives `cargo tauri build` once per feasible target through an explicit
//! per-target state machine. A failed target never halts iteration - one
//! broken toolchain must not block an otherwise-working one - and partially
//! produced artifacts are still collected afterwards.

use crate::cli::RuntimeConfig;
use crate::error::{BuildError, Result};
use crate::toolchain::ToolchainReport;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Timeout for a single tauri build invocation (30 minutes)
/// Full cargo builds plus packaging can be slow on cold caches
pub const TAURI_BUILD_TIMEOUT: Duration = Duration::from_secs(1800);

/// Lifecycle of one build target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Queued, not yet attempted
    Pending,
    /// tauri build currently running
    Building,
    /// Build exited zero
    Succeeded,
    /// Build exited non-zero or failed to spawn
    Failed,
}

impl TargetState {
    /// Advances the state machine; invalid transitions are programming errors.
    pub fn advance(self, success: Option<bool>) -> TargetState {
        match (self, success) {
            (TargetState::Pending, None) => TargetState::Building,
            (TargetState::Building, Some(true)) => TargetState::Succeeded,
            (TargetState::Building, Some(false)) => TargetState::Failed,
            (state, _) => state,
        }
    }
}

/// Outcome of one attempted target.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Target triple, `None` for the native target
    pub target: Option<String>,
    /// Whether the build invocation exited zero
    pub success: bool,
    /// Bundle output directory, when one was produced
    pub bundle_dir: Option<PathBuf>,
}

/// Drives tauri invocations against one run's manifest.
#[derive(Debug)]
pub struct BuildOrchestrator {
    manifest_path: PathBuf,
    tauri_dir: PathBuf,
}

impl BuildOrchestrator {
    /// Creates an orchestrator bound to the run's manifest and shell project.
    pub fn new(manifest_path: PathBuf, tauri_dir: PathBuf) -> Self {
        Self {
            manifest_path,
            tauri_dir,
        }
    }

    /// Verifies the tauri CLI is invokable before any build is attempted.
    pub async fn check_tauri_cli() -> Result<()> {
        if which::which("cargo").is_err() {
            return Err(BuildError::ToolMissing {
                tool: "cargo".to_string(),
                reason: "Rust toolchain not found on PATH".to_string(),
            }
            .into());
        }

        let status = Command::new("cargo")
            .args(["tauri", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| BuildError::ToolMissing {
                tool: "cargo tauri".to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(BuildError::ToolMissing {
                tool: "cargo tauri".to_string(),
                reason: "tauri CLI not installed (cargo install tauri-cli)".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Builds every planned target in order, isolating per-target failure.
    pub async fn build_all(
        &self,
        triples: &[Option<String>],
        config: &RuntimeConfig,
    ) -> Vec<BuildResult> {
        let mut results = Vec::with_capacity(triples.len());

        for triple in triples {
            let mut state = TargetState::Pending;
            let label = triple.as_deref().unwrap_or("native");

            config.progress(&format!("Building target: {}", label));
            state = state.advance(None);
            debug_assert_eq!(state, TargetState::Building);

            let success = self.build_one(triple.as_deref(), config).await;
            state = state.advance(Some(success));

            match state {
                TargetState::Succeeded => {
                    config.success_println(&format!("Target {} built", label));
                }
                _ => {
                    config.warning_println(&format!(
                        "Target {} failed, continuing with remaining targets",
                        label
                    ));
                }
            }

            let bundle_dir = self.bundle_dir(triple.as_deref());
            results.push(BuildResult {
                target: triple.clone(),
                success,
                bundle_dir: bundle_dir.is_dir().then_some(bundle_dir),
            });
        }

        results
    }

    /// Runs one tauri build invocation, capturing its exit status without
    /// propagating failure.
    async fn build_one(&self, triple: Option<&str>, config: &RuntimeConfig) -> bool {
        let args = tauri_build_args(&self.manifest_path, triple);

        let child = Command::new("cargo")
            .args(&args)
            .current_dir(&self.tauri_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn();

        let mut child = match child {
            Ok(child) => child,
            Err(e) => {
                config.warning_println(&format!("Could not spawn cargo tauri build: {}", e));
                return false;
            }
        };

        if let Some(stdout) = child.stdout.take() {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                config.indent(&line);
            }
        }

        match tokio::time::timeout(TAURI_BUILD_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                config.warning_println(&format!("tauri build wait failed: {}", e));
                false
            }
            Err(_elapsed) => {
                config.warning_println(&format!(
                    "tauri build timed out after {} minutes, terminating...",
                    TAURI_BUILD_TIMEOUT.as_secs() / 60
                ));
                if let Err(e) = child.kill().await {
                    log::warn!("Failed to kill tauri build process: {}", e);
                }
                let _ = tokio::time::timeout(Duration::from_secs(10), child.wait()).await;
                false
            }
        }
    }

    /// Runs the interactive dev window in the foreground.
    ///
    /// The exit status of this invocation drives the process exit code.
    pub async fn run_dev(&self, config: &RuntimeConfig) -> Result<i32> {
        config.progress("Launching Tauri dev window...");

        let config_arg = self.manifest_path.to_string_lossy();
        let status = Command::new("cargo")
            .args(["tauri", "dev", "--config", config_arg.as_ref()])
            .current_dir(&self.tauri_dir)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| BuildError::InvocationFailed {
                command: "cargo tauri dev".to_string(),
                reason: e.to_string(),
            })?;

        Ok(status.code().unwrap_or(1))
    }

    /// Bundle output directory for a target under the shell project.
    pub fn bundle_dir(&self, triple: Option<&str>) -> PathBuf {
        let mut dir = self.tauri_dir.join("target");
        if let Some(triple) = triple {
            dir = dir.join(triple);
        }
        dir.join("release").join("bundle")
    }
}

/// Plans the attempt order for a run: the native target always first, the
/// explicit triple next, feasible cross triples last. Duplicates collapse.
pub fn plan_targets(
    explicit: Option<&str>,
    report: &ToolchainReport,
    cross_enabled: bool,
) -> Vec<Option<String>> {
    let mut targets: Vec<Option<String>> = vec![None];

    if let Some(triple) = explicit
        && !targets.contains(&Some(triple.to_string()))
    {
        targets.push(Some(triple.to_string()));
    }

    if cross_enabled {
        for triple in &report.cross_triples {
            if !targets.contains(&Some(triple.clone())) {
                targets.push(Some(triple.clone()));
            }
        }
    }

    targets
}

/// Pure argument assembly for one tauri build invocation.
pub fn tauri_build_args(manifest: &Path, triple: Option<&str>) -> Vec<String> {
    let mut args = vec![
        "tauri".to_string(),
        "build".to_string(),
        "--config".to_string(),
        manifest.to_string_lossy().into_owned(),
    ];
    if let Some(triple) = triple {
        args.push("--target".to_string());
        args.push(triple.to_string());
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn report(cross: &[&str]) -> ToolchainReport {
        ToolchainReport {
            packagers: BTreeSet::new(),
            cross_triples: cross.iter().map(|s| s.to_string()).collect(),
            host_os: "linux",
            host_arch: "x86_64",
        }
    }

    #[test]
    fn state_machine_happy_path() {
        let state = TargetState::Pending.advance(None);
        assert_eq!(state, TargetState::Building);
        assert_eq!(state.advance(Some(true)), TargetState::Succeeded);
        assert_eq!(state.advance(Some(false)), TargetState::Failed);
    }

    #[test]
    fn terminal_states_are_sticky() {
        assert_eq!(TargetState::Succeeded.advance(Some(false)), TargetState::Succeeded);
        assert_eq!(TargetState::Failed.advance(None), TargetState::Failed);
    }

    #[test]
    fn native_target_is_always_first() {
        let targets = plan_targets(None, &report(&["x86_64-pc-windows-gnu"]), true);
        assert_eq!(targets[0], None);
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn cross_targets_require_opt_in() {
        let targets = plan_targets(None, &report(&["x86_64-pc-windows-gnu"]), false);
        assert_eq!(targets, vec![None]);
    }

    #[test]
    fn explicit_target_precedes_cross_set() {
        let targets = plan_targets(
            Some("aarch64-unknown-linux-gnu"),
            &report(&["x86_64-pc-windows-gnu"]),
            true,
        );
        assert_eq!(
            targets,
            vec![
                None,
                Some("aarch64-unknown-linux-gnu".to_string()),
                Some("x86_64-pc-windows-gnu".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_targets_collapse() {
        let targets = plan_targets(
            Some("x86_64-pc-windows-gnu"),
            &report(&["x86_64-pc-windows-gnu"]),
            true,
        );
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn build_args_include_config_path() {
        let args = tauri_build_args(Path::new("/tmp/m.json"), None);
        assert_eq!(args, vec!["tauri", "build", "--config", "/tmp/m.json"]);
    }

    #[test]
    fn build_args_append_target_triple() {
        let args = tauri_build_args(Path::new("/tmp/m.json"), Some("x86_64-pc-windows-gnu"));
        assert_eq!(args[4], "--target");
        assert_eq!(args[5], "x86_64-pc-windows-gnu");
    }

    #[test]
    fn bundle_dir_nests_triple_before_release() {
        let orchestrator =
            BuildOrchestrator::new(PathBuf::from("/tmp/m.json"), PathBuf::from("src-tauri"));
        assert_eq!(
            orchestrator.bundle_dir(None),
            PathBuf::from("src-tauri/target/release/bundle")
        );
        assert_eq!(
            orchestrator.bundle_dir(Some("x86_64-pc-windows-gnu")),
            PathBuf::from("src-tauri/target/x86_64-pc-windows-gnu/release/bundle")
        );
    }
}
