//! Host toolchain probing.
//!
//! Computes one immutable [`ToolchainReport`] per run and threads it into the
//! build orchestrator, instead of re-probing at each decision point. Tests
//! inject synthetic reports.

use std::collections::BTreeSet;
use std::process::Stdio;
use tokio::process::Command;

/// Environment variable forcing AppImage into the feasible set.
pub const ENV_FORCE_APPIMAGE: &str = "DOCK2TAURI_FORCE_APPIMAGE";

/// Environment variable forcing AppImage out of the feasible set.
pub const ENV_SKIP_APPIMAGE: &str = "DOCK2TAURI_SKIP_APPIMAGE";

/// Immutable snapshot of what the host can package and cross-compile.
///
/// Invariant: a target appears in `packagers` only if every tool it requires
/// independently confirmed success on a trivial self-check.
#[derive(Debug, Clone)]
pub struct ToolchainReport {
    /// Feasible native-packaging back-ends (tauri bundle target names)
    pub packagers: BTreeSet<String>,
    /// Installed cross-compilation triples that passed feasibility filtering
    pub cross_triples: BTreeSet<String>,
    /// Host operating system
    pub host_os: &'static str,
    /// Host architecture
    pub host_arch: &'static str,
}

impl ToolchainReport {
    /// Whether packaging should be active at all.
    ///
    /// Invoking the bundler with an empty target list is a known failure mode
    /// of the underlying tool, so zero feasible targets deactivates bundling
    /// instead.
    pub fn bundle_active(&self) -> bool {
        !self.packagers.is_empty()
    }
}

/// Probes the host once and returns the report for this run.
///
/// `cross_candidates` is the comma-separated candidate triple list;
/// cross feasibility additionally requires the triple to be installed per
/// rustup and to survive [`filter_cross_triples`].
pub async fn probe(cross_enabled: bool, cross_candidates: &str) -> ToolchainReport {
    let packagers = probe_packagers().await;

    let cross_triples = if cross_enabled {
        let installed = installed_rustup_triples().await;
        let candidates: Vec<String> = cross_candidates
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        filter_cross_triples(
            &candidates,
            &installed,
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
        .into_iter()
        .collect()
    } else {
        BTreeSet::new()
    };

    ToolchainReport {
        packagers,
        cross_triples,
        host_os: std::env::consts::OS,
        host_arch: std::env::consts::ARCH,
    }
}

/// Determines feasible packaging back-ends for the host OS.
///
/// Non-Linux hosts get a fixed, OS-appropriate list without probing.
async fn probe_packagers() -> BTreeSet<String> {
    match std::env::consts::OS {
        "linux" => probe_linux_packagers().await,
        "macos" => ["dmg", "app"].iter().map(|s| s.to_string()).collect(),
        "windows" => ["nsis", "msi"].iter().map(|s| s.to_string()).collect(),
        _ => BTreeSet::new(),
    }
}

/// Probes Linux packaging back-ends individually.
async fn probe_linux_packagers() -> BTreeSet<String> {
    let mut packagers = BTreeSet::new();

    if which::which("dpkg-deb").is_ok() {
        packagers.insert("deb".to_string());
    } else {
        log::info!("dpkg-deb not found, skipping deb packaging");
    }

    if which::which("rpmbuild").is_ok() {
        packagers.insert("rpm".to_string());
    } else {
        log::info!("rpmbuild not found, skipping rpm packaging");
    }

    let linuxdeploy_ok = helper_self_check("linuxdeploy").await;
    let appimagetool_ok = helper_self_check("appimagetool").await;
    if appimage_feasible(linuxdeploy_ok, appimagetool_ok, appimage_override()) {
        packagers.insert("appimage".to_string());
    } else {
        log::info!("AppImage helpers unavailable, skipping appimage packaging");
    }

    packagers
}

/// Reads the AppImage force/skip override from the environment.
///
/// Skip wins over force when both are set.
fn appimage_override() -> Option<bool> {
    if env_flag(ENV_SKIP_APPIMAGE) {
        Some(false)
    } else if env_flag(ENV_FORCE_APPIMAGE) {
        Some(true)
    } else {
        None
    }
}

fn env_flag(name: &str) -> bool {
    matches!(std::env::var(name).as_deref(), Ok("1") | Ok("true") | Ok("yes"))
}

/// Pure feasibility decision for the AppImage back-end.
///
/// Both helper binaries must independently pass their self-check; an explicit
/// override wins regardless of probe result.
pub fn appimage_feasible(
    linuxdeploy_ok: bool,
    appimagetool_ok: bool,
    override_flag: Option<bool>,
) -> bool {
    match override_flag {
        Some(forced) => forced,
        None => linuxdeploy_ok && appimagetool_ok,
    }
}

/// Runs a trivial `--version` self-check on an AppImage helper binary.
///
/// `APPIMAGE_EXTRACT_AND_RUN=1` lets the helpers run in sandboxes without
/// FUSE, which the type-2 AppImage runtime otherwise requires.
async fn helper_self_check(binary: &str) -> bool {
    if which::which(binary).is_err() {
        return false;
    }

    match Command::new(binary)
        .arg("--version")
        .env("APPIMAGE_EXTRACT_AND_RUN", "1")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        Ok(status) => status.success(),
        Err(e) => {
            log::debug!("{} self-check failed to run: {}", binary, e);
            false
        }
    }
}

/// Queries rustup for installed target triples.
///
/// A missing rustup simply yields an empty set; cross builds then degrade to
/// nothing rather than failing the run.
pub async fn installed_rustup_triples() -> BTreeSet<String> {
    let output = Command::new("rustup")
        .args(["target", "list", "--installed"])
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        Ok(output) => {
            log::debug!(
                "rustup target list exited with {}",
                output.status.code().unwrap_or(-1)
            );
            BTreeSet::new()
        }
        Err(e) => {
            log::debug!("rustup not available: {}", e);
            BTreeSet::new()
        }
    }
}

/// Filters candidate cross triples down to the feasible set.
///
/// A triple survives only if it is installed, is not the native target
/// itself (a triple is a no-op only when both its OS and arch match the
/// host; aarch64 Linux from x86_64 Linux is a real cross build), and does
/// not require an exotic cross-SDK this host cannot provide (targeting
/// macOS from elsewhere needs osxcross; MSVC targets need the Windows SDK).
pub fn filter_cross_triples(
    candidates: &[String],
    installed: &BTreeSet<String>,
    host_os: &str,
    host_arch: &str,
) -> Vec<String> {
    candidates
        .iter()
        .filter(|triple| {
            if !installed.contains(*triple) {
                log::info!("Cross target {} not installed, skipping", triple);
                return false;
            }
            if triple_os(triple) == host_os && triple_arch(triple) == host_arch {
                log::debug!("Cross target {} is the native target, skipping", triple);
                return false;
            }
            if triple.contains("apple") && host_os != "macos" && which::which("o64-clang").is_err()
            {
                log::info!(
                    "Cross target {} requires osxcross (o64-clang not found), skipping",
                    triple
                );
                return false;
            }
            if triple.ends_with("-msvc") && host_os != "windows" {
                log::info!("Cross target {} requires the MSVC toolchain, skipping", triple);
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Architecture component of a target triple.
fn triple_arch(triple: &str) -> &str {
    triple.split('-').next().unwrap_or(triple)
}

/// Maps a target triple to its OS family name.
fn triple_os(triple: &str) -> &'static str {
    if triple.contains("windows") {
        "windows"
    } else if triple.contains("apple") || triple.contains("darwin") {
        "macos"
    } else if triple.contains("linux") {
        "linux"
    } else {
        "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn appimage_needs_both_helpers() {
        assert!(appimage_feasible(true, true, None));
        assert!(!appimage_feasible(true, false, None));
        assert!(!appimage_feasible(false, true, None));
        assert!(!appimage_feasible(false, false, None));
    }

    #[test]
    fn appimage_override_wins() {
        assert!(appimage_feasible(false, false, Some(true)));
        assert!(!appimage_feasible(true, true, Some(false)));
    }

    #[test]
    fn uninstalled_triples_are_filtered() {
        let candidates = vec!["x86_64-pc-windows-gnu".to_string()];
        let feasible = filter_cross_triples(&candidates, &BTreeSet::new(), "linux", "x86_64");
        assert!(feasible.is_empty());
    }

    #[test]
    fn native_triple_is_filtered() {
        let candidates = vec!["x86_64-unknown-linux-gnu".to_string()];
        let installed = set(&["x86_64-unknown-linux-gnu"]);
        let feasible = filter_cross_triples(&candidates, &installed, "linux", "x86_64");
        assert!(feasible.is_empty());
    }

    #[test]
    fn foreign_arch_same_os_triple_survives() {
        // arm64 Linux from x86_64 Linux is a real cross build, and this
        // triple is the default candidate list's second entry
        let candidates = vec!["aarch64-unknown-linux-gnu".to_string()];
        let installed = set(&["aarch64-unknown-linux-gnu"]);
        let feasible = filter_cross_triples(&candidates, &installed, "linux", "x86_64");
        assert_eq!(feasible, candidates);
    }

    #[test]
    fn installed_foreign_os_triples_survive() {
        let candidates = vec![
            "x86_64-pc-windows-gnu".to_string(),
            "aarch64-unknown-linux-gnu".to_string(),
        ];
        let installed = set(&["x86_64-pc-windows-gnu", "aarch64-unknown-linux-gnu"]);
        let feasible = filter_cross_triples(&candidates, &installed, "macos", "aarch64");
        assert_eq!(feasible, candidates);
    }

    #[test]
    fn apple_targets_excluded_without_osxcross() {
        let candidates = vec!["x86_64-apple-darwin".to_string()];
        let installed = set(&["x86_64-apple-darwin"]);
        // Probing o64-clang on a dev box will not find it
        let feasible = filter_cross_triples(&candidates, &installed, "linux", "x86_64");
        assert!(feasible.is_empty());
    }

    #[test]
    fn msvc_targets_excluded_off_windows() {
        let candidates = vec!["x86_64-pc-windows-msvc".to_string()];
        let installed = set(&["x86_64-pc-windows-msvc"]);
        let feasible = filter_cross_triples(&candidates, &installed, "linux", "x86_64");
        assert!(feasible.is_empty());
    }

    #[test]
    fn empty_report_deactivates_bundling() {
        let report = ToolchainReport {
            packagers: BTreeSet::new(),
            cross_triples: BTreeSet::new(),
            host_os: "linux",
            host_arch: "x86_64",
        };
        assert!(!report.bundle_active());
    }
}
