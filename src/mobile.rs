//! Optional Android build path.
//!
//! Strictly best-effort: attempted only when the tauri CLI reports mobile
//! support and an Android SDK is detectable, and every failure is logged and
//! swallowed rather than propagated.

use crate::cli::RuntimeConfig;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use walkdir::WalkDir;

/// Attempts an Android APK build and copies any result into
/// `dist/android-apk/`. Never fails the run.
pub async fn try_android_build(tauri_dir: &Path, dist_root: &Path, config: &RuntimeConfig) {
    if !android_supported().await {
        config.verbose_println("tauri CLI has no android support, skipping mobile build");
        return;
    }

    if !android_sdk_detected() {
        config.println("Android SDK not detected, skipping mobile build");
        return;
    }

    config.progress("Attempting Android APK build (best effort)...");

    let status = Command::new("cargo")
        .args(["tauri", "android", "build"])
        .current_dir(tauri_dir)
        .kill_on_drop(true)
        .status()
        .await;

    match status {
        Ok(status) if status.success() => {
            let copied = collect_apks(tauri_dir, dist_root, config);
            if copied > 0 {
                config.success_println(&format!("Exported {} APK(s) to dist/android-apk", copied));
            } else {
                config.warning_println("Android build succeeded but produced no APK");
            }
        }
        Ok(status) => {
            config.warning_println(&format!(
                "Android build failed (exit code {}), skipping",
                status.code().unwrap_or(-1)
            ));
        }
        Err(e) => {
            config.warning_println(&format!("Could not run Android build: {}", e));
        }
    }
}

/// Whether the installed tauri CLI knows the `android` subcommand.
async fn android_supported() -> bool {
    match Command::new("cargo")
        .args(["tauri", "android", "--help"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        Ok(status) => status.success(),
        Err(_) => false,
    }
}

/// Detects an Android SDK via environment variables or an adb binary on PATH.
fn android_sdk_detected() -> bool {
    std::env::var_os("ANDROID_HOME").is_some()
        || std::env::var_os("ANDROID_SDK_ROOT").is_some()
        || which::which("adb").is_ok()
}

/// Copies every `.apk` under the shell project into `dist/android-apk/`.
fn collect_apks(tauri_dir: &Path, dist_root: &Path, config: &RuntimeConfig) -> usize {
    let dest = dist_root.join("android-apk");
    if let Err(e) = std::fs::create_dir_all(&dest) {
        config.warning_println(&format!("Could not create {}: {}", dest.display(), e));
        return 0;
    }

    let mut copied = 0;
    for entry in WalkDir::new(tauri_dir.join("gen"))
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some("apk")
        {
            let target = dest.join(entry.file_name());
            match std::fs::copy(entry.path(), &target) {
                Ok(_) => copied += 1,
                Err(e) => {
                    config.warning_println(&format!(
                        "Skipping {}: {}",
                        entry.path().display(),
                        e
                    ));
                }
            }
        }
    }

    copied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apk_collection_handles_missing_gen_dir() {
        let config = RuntimeConfig::new();
        let work = tempfile::tempdir().unwrap();
        let copied = collect_apks(work.path(), &work.path().join("dist"), &config);
        assert_eq!(copied, 0);
    }

    #[test]
    fn apks_are_copied_into_dist() {
        let config = RuntimeConfig::new();
        let work = tempfile::tempdir().unwrap();
        let apk_dir = work.path().join("gen/android/app/build/outputs/apk/release");
        std::fs::create_dir_all(&apk_dir).unwrap();
        std::fs::write(apk_dir.join("app-release.apk"), b"apk").unwrap();

        let dist = work.path().join("dist");
        let copied = collect_apks(work.path(), &dist, &config);
        assert_eq!(copied, 1);
        assert!(dist.join("android-apk/app-release.apk").exists());
    }
}
