//! Library-level tests for the launch pipeline pieces that do not need a
//! running Docker daemon.

use dock2tauri::build::BuildResult;
use dock2tauri::cli::{Args, RuntimeConfig, request_from_args};
use dock2tauri::launcher::LaunchMode;
use dock2tauri::manifest::{self, LaunchMode as Mode};
use dock2tauri::toolchain::ToolchainReport;
use dock2tauri::{docker, export};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn args(image: &str) -> Args {
    Args {
        image: image.to_string(),
        host_port: 8088,
        container_port: 80,
        build: false,
        target: None,
        cross: false,
        health_url: None,
        timeout: 30,
        cross_targets: "x86_64-pc-windows-gnu,aarch64-unknown-linux-gnu".to_string(),
        tauri_dir: PathBuf::from("src-tauri"),
    }
}

fn synthetic_report(packagers: &[&str]) -> ToolchainReport {
    ToolchainReport {
        packagers: packagers.iter().map(|s| s.to_string()).collect(),
        cross_triples: BTreeSet::new(),
        host_os: "linux",
        host_arch: "x86_64",
    }
}

#[test]
fn image_reference_defaults_to_dev_mode() {
    let request = request_from_args(&args("nginx:alpine"));
    assert_eq!(request.mode, LaunchMode::Dev);
    assert_eq!(request.host_port, 8088);
    assert_eq!(request.container_port, 80);
}

#[test]
fn build_flag_selects_build_mode() {
    let mut a = args("nginx:alpine");
    a.build = true;
    assert_eq!(request_from_args(&a).mode, LaunchMode::Build);
}

#[test]
fn local_dockerfile_defaults_to_build_mode() {
    let dir = tempfile::tempdir().unwrap();
    let dockerfile = dir.path().join("Dockerfile");
    std::fs::write(&dockerfile, "FROM nginx:alpine\n").unwrap();

    let request = request_from_args(&args(dockerfile.to_str().unwrap()));
    assert_eq!(request.mode, LaunchMode::Build);
}

#[test]
fn explicit_target_implies_build_mode() {
    let mut a = args("nginx:alpine");
    a.target = Some("x86_64-pc-windows-gnu".to_string());
    assert_eq!(request_from_args(&a).mode, LaunchMode::Build);
}

#[test]
fn dev_manifest_points_at_mapped_host_port() {
    // Scenario: nginx:alpine on 8088:80 in dev mode
    let conf = manifest::build_conf(
        "nginx:alpine",
        8088,
        Mode::Dev,
        &synthetic_report(&["deb", "appimage"]),
        "../app",
    )
    .unwrap();

    assert_eq!(conf.build.dev_url.as_deref(), Some("http://localhost:8088"));
    assert!(conf.bundle.active);
    assert_eq!(conf.bundle.targets, vec!["appimage", "deb"]);
}

#[test]
fn release_manifest_with_no_packagers_keeps_bundle_inactive() {
    let conf = manifest::build_conf(
        "nginx:alpine",
        8088,
        Mode::Build,
        &synthetic_report(&[]),
        "../app",
    )
    .unwrap();

    assert!(!conf.bundle.active);
    assert!(conf.bundle.targets.is_empty());
    assert!(conf.build.dev_url.is_none());
}

#[test]
fn container_name_derivation_matches_image_and_port() {
    assert_eq!(
        docker::derive_container_name("nginx:alpine", 8088),
        "dock2tauri-nginx-alpine-8088"
    );
}

#[test]
fn export_tree_contains_copied_files_and_index() {
    let config = RuntimeConfig::new();
    let work = tempfile::tempdir().unwrap();
    let bundle = work.path().join("bundle");
    std::fs::create_dir_all(&bundle).unwrap();
    std::fs::write(bundle.join("x.deb"), b"x").unwrap();
    std::fs::write(bundle.join("y.rpm"), b"y").unwrap();

    let results = vec![BuildResult {
        target: Some("aarch64-unknown-linux-gnu".to_string()),
        success: true,
        bundle_dir: Some(bundle),
    }];

    let dist = work.path().join("dist");
    let produced = export::export_all(&dist, &results, &config);
    assert_eq!(produced, vec!["linux-arm64".to_string()]);

    assert!(dist.join("linux-arm64/x.deb").exists());
    assert!(dist.join("linux-arm64/y.rpm").exists());
    assert!(dist.join("linux-arm64/README.md").exists());
    assert!(dist.join("README.md").exists());
}

#[test]
fn cleanup_guard_survives_double_release() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("m.json");
    std::fs::write(&manifest_path, "{}").unwrap();

    let mut guard = dock2tauri::CleanupGuard::new();
    guard.register_manifest(manifest_path.clone());
    guard.release();
    guard.release();
    assert!(!manifest_path.exists());
}
