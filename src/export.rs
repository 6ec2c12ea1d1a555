//! Artifact export and distribution tree indexing.
//!
//! Relocates produced bundles into a canonical `dist/<platform>/` tree,
//! flattening nested bundle subfolders, and writes install instructions per
//! platform plus a root index of everything actually produced. Copy failures
//! are logged, never fatal - compilation may succeed while packaging
//! produces nothing, and that is a warning, not an error.

use crate::build::BuildResult;
use crate::cli::RuntimeConfig;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Maps a build target to its canonical platform folder name.
///
/// `None` (the native target) maps from the host OS and architecture;
/// unknown triples pass through verbatim.
pub fn platform_dir_name(triple: Option<&str>) -> String {
    match triple {
        None => format!(
            "{}-{}",
            os_label(std::env::consts::OS),
            arch_label(std::env::consts::ARCH)
        ),
        Some(triple) => match triple {
            "x86_64-unknown-linux-gnu" => "linux-x64".to_string(),
            "aarch64-unknown-linux-gnu" => "linux-arm64".to_string(),
            "x86_64-pc-windows-gnu" | "x86_64-pc-windows-msvc" => "windows-x64".to_string(),
            "x86_64-apple-darwin" => "macos-x64".to_string(),
            "aarch64-apple-darwin" => "macos-arm64".to_string(),
            other => other.to_string(),
        },
    }
}

fn os_label(os: &str) -> &str {
    match os {
        "macos" => "macos",
        "windows" => "windows",
        other => other,
    }
}

fn arch_label(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "aarch64" => "arm64",
        other => other,
    }
}

/// Exports every attempted target into the distribution tree and writes the
/// root index.
///
/// Returns the platform folder names actually produced.
pub fn export_all(
    dist_root: &Path,
    results: &[BuildResult],
    config: &RuntimeConfig,
) -> Vec<String> {
    let mut produced = Vec::new();

    for result in results {
        let platform = platform_dir_name(result.target.as_deref());
        match &result.bundle_dir {
            Some(bundle_dir) => {
                if export_target(dist_root, &platform, bundle_dir, config) {
                    produced.push(platform);
                }
            }
            None => {
                config.warning_println(&format!(
                    "No bundle directory for {}, nothing to export",
                    platform
                ));
            }
        }
    }

    if let Err(e) = write_index(dist_root, &produced) {
        config.warning_println(&format!("Could not write dist index: {}", e));
    }

    produced
}

/// Copies one target's bundle files into `dist/<platform>/` and writes the
/// platform README.
///
/// Returns whether any artifact file landed in the folder.
pub fn export_target(
    dist_root: &Path,
    platform: &str,
    bundle_dir: &Path,
    config: &RuntimeConfig,
) -> bool {
    let dest = dist_root.join(platform);
    if let Err(e) = std::fs::create_dir_all(&dest) {
        config.warning_println(&format!("Could not create {}: {}", dest.display(), e));
        return false;
    }

    let copied = copy_flattened(bundle_dir, &dest, config);
    if copied == 0 {
        config.warning_println(&format!(
            "Bundle directory {} contained no files",
            bundle_dir.display()
        ));
        return false;
    }

    if let Err(e) = write_platform_readme(&dest, platform) {
        config.warning_println(&format!("Could not write platform README: {}", e));
    }

    config.success_println(&format!(
        "Exported {} artifact(s) to {}",
        copied,
        dest.display()
    ));
    true
}

/// Copies every regular file under `src` directly into `dest`, flattening
/// nested subfolders. Individual copy failures are logged and skipped.
fn copy_flattened(src: &Path, dest: &Path, config: &RuntimeConfig) -> usize {
    let mut copied = 0;

    for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name();
        let target = dest.join(file_name);
        match std::fs::copy(entry.path(), &target) {
            Ok(_) => {
                config.verbose_println(&format!("Copied {}", entry.path().display()));
                copied += 1;
            }
            Err(e) => {
                config.warning_println(&format!(
                    "Skipping {}: {}",
                    entry.path().display(),
                    e
                ));
            }
        }
    }

    copied
}

/// Writes the per-platform install instructions document.
///
/// Covers every bundle format that may be present; a given run usually
/// produces a subset.
fn write_platform_readme(dir: &Path, platform: &str) -> std::io::Result<()> {
    let body = format!(
        "# Dock2Tauri bundles: {platform}\n\
         \n\
         Artifacts in this folder were produced by `cargo tauri build` and\n\
         copied here by dock2tauri. Depending on the host toolchain you may\n\
         find any of the formats below.\n\
         \n\
         ## Debian/Ubuntu (.deb)\n\
         \n\
         ```sh\n\
         sudo dpkg -i <name>.deb\n\
         ```\n\
         \n\
         ## Fedora/RHEL (.rpm)\n\
         \n\
         ```sh\n\
         sudo rpm -i <name>.rpm\n\
         ```\n\
         \n\
         ## AppImage\n\
         \n\
         ```sh\n\
         chmod +x <name>.AppImage\n\
         ./<name>.AppImage   # add APPIMAGE_EXTRACT_AND_RUN=1 without FUSE\n\
         ```\n\
         \n\
         ## macOS (.dmg / .app)\n\
         \n\
         Open the `.dmg` and drag the app into Applications, or copy the\n\
         `.app` bundle directly.\n\
         \n\
         ## Windows (.exe / .msi)\n\
         \n\
         Run the NSIS `.exe` or `.msi` installer.\n"
    );
    std::fs::write(dir.join("README.md"), body)
}

/// Writes the root-level index enumerating the platform folders produced.
pub fn write_index(dist_root: &Path, platforms: &[String]) -> std::io::Result<()> {
    std::fs::create_dir_all(dist_root)?;

    let mut body = String::from(
        "# Dock2Tauri distribution tree\n\n\
         Native bundles produced by the last build run, one folder per platform.\n\n",
    );

    if platforms.is_empty() {
        body.push_str("No platform bundles were produced in this run.\n");
    } else {
        for platform in platforms {
            body.push_str(&format!("- [`{platform}/`]({platform}/README.md)\n"));
        }
    }

    std::fs::write(dist_root.join("README.md"), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildResult;

    #[test]
    fn known_triples_map_to_canonical_folders() {
        assert_eq!(
            platform_dir_name(Some("aarch64-unknown-linux-gnu")),
            "linux-arm64"
        );
        assert_eq!(platform_dir_name(Some("x86_64-pc-windows-gnu")), "windows-x64");
        assert_eq!(platform_dir_name(Some("x86_64-pc-windows-msvc")), "windows-x64");
        assert_eq!(platform_dir_name(Some("aarch64-apple-darwin")), "macos-arm64");
    }

    #[test]
    fn unknown_triples_pass_through_verbatim() {
        assert_eq!(
            platform_dir_name(Some("riscv64gc-unknown-linux-gnu")),
            "riscv64gc-unknown-linux-gnu"
        );
    }

    #[test]
    fn native_target_uses_host_labels() {
        let name = platform_dir_name(None);
        assert!(name.contains('-'));
        #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
        assert_eq!(name, "linux-x64");
    }

    #[test]
    fn export_flattens_and_writes_readme() {
        let config = RuntimeConfig::new();
        let work = tempfile::tempdir().unwrap();
        let bundle = work.path().join("bundle");
        std::fs::create_dir_all(bundle.join("deb")).unwrap();
        std::fs::create_dir_all(bundle.join("appimage")).unwrap();
        std::fs::write(bundle.join("deb/app_1.0.0_amd64.deb"), b"deb").unwrap();
        std::fs::write(bundle.join("appimage/app.AppImage"), b"ai").unwrap();

        let dist = work.path().join("dist");
        assert!(export_target(&dist, "linux-x64", &bundle, &config));

        let platform_dir = dist.join("linux-x64");
        assert!(platform_dir.join("app_1.0.0_amd64.deb").exists());
        assert!(platform_dir.join("app.AppImage").exists());
        assert!(platform_dir.join("README.md").exists());
    }

    #[test]
    fn missing_bundle_dir_warns_but_completes() {
        let config = RuntimeConfig::new();
        let work = tempfile::tempdir().unwrap();
        let results = vec![BuildResult {
            target: None,
            success: true,
            bundle_dir: None,
        }];

        let produced = export_all(&work.path().join("dist"), &results, &config);
        assert!(produced.is_empty());
        // Index is still written
        assert!(work.path().join("dist/README.md").exists());
    }

    #[test]
    fn failed_target_does_not_block_sibling_export() {
        let config = RuntimeConfig::new();
        let work = tempfile::tempdir().unwrap();
        let bundle = work.path().join("bundle");
        std::fs::create_dir_all(&bundle).unwrap();
        std::fs::write(bundle.join("app.deb"), b"deb").unwrap();

        let results = vec![
            BuildResult {
                target: Some("x86_64-pc-windows-gnu".to_string()),
                success: false,
                bundle_dir: None,
            },
            BuildResult {
                target: Some("aarch64-unknown-linux-gnu".to_string()),
                success: true,
                bundle_dir: Some(bundle),
            },
        ];

        let dist = work.path().join("dist");
        let produced = export_all(&dist, &results, &config);
        assert_eq!(produced, vec!["linux-arm64".to_string()]);
        assert!(dist.join("linux-arm64/app.deb").exists());

        let index = std::fs::read_to_string(dist.join("README.md")).unwrap();
        assert!(index.contains("linux-arm64"));
        assert!(!index.contains("windows-x64"));
    }
}
