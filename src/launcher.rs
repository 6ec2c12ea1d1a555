//! The launch pipeline.
//!
//! One strictly sequential run: resolve image, start container, poll
//! readiness, generate manifest, probe toolchain, build per target, export
//! artifacts, optionally build Android. The cleanup guard registered right
//! after container start covers normal return, error return, and Ctrl-C
//! uniformly.

use crate::build::{self, BuildOrchestrator};
use crate::cli::RuntimeConfig;
use crate::docker::{self, CleanupGuard, ContainerHandle};
use crate::error::Result;
use crate::manifest::{self, Manifest};
use crate::toolchain;
use crate::{export, mobile};
use std::path::{Path, PathBuf};

pub use crate::manifest::LaunchMode;

/// Immutable description of one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Registry reference or path to a local Dockerfile
    pub image_or_path: String,
    /// Host port to bind
    pub host_port: u16,
    /// Port exposed inside the container
    pub container_port: u16,
    /// Dev window or release build
    pub mode: LaunchMode,
    /// Explicit target triple, attempted after the native target
    pub explicit_target: Option<String>,
    /// Whether feasible cross targets are attempted too
    pub cross_enabled: bool,
    /// Health check URL override
    pub health_url: Option<String>,
    /// Readiness poll timeout in seconds
    pub timeout_secs: u64,
    /// Comma-separated cross-target candidate list
    pub cross_candidates: String,
    /// Tauri shell project directory
    pub tauri_dir: PathBuf,
}

/// Executes one run end to end and returns the process exit code.
pub async fn run(request: RunRequest, config: &RuntimeConfig) -> Result<i32> {
    let _ = config.output().section("Dock2Tauri - Docker to Desktop Bridge");

    docker::check_docker_available().await?;

    let image = docker::resolve(&request.image_or_path, config).await?;

    let name = docker::derive_container_name(&image, request.host_port);
    docker::evict_conflicts(&name, request.host_port, config).await;

    let handle =
        docker::start_container(&image, &name, request.host_port, request.container_port, config)
            .await?;

    // Single cleanup registration point: from here on, every exit path -
    // including the Ctrl-C branch below - releases through this guard.
    let mut guard = CleanupGuard::new();
    guard.register_container(&handle.name);

    let exit = tokio::select! {
        result = run_pipeline(&request, &image, &handle, &mut guard, config) => result,
        _ = tokio::signal::ctrl_c() => {
            config.println("");
            config.warning_println("Interrupted, cleaning up...");
            Ok(130)
        }
    };

    guard.release();
    exit
}

/// The post-start pipeline, cancelled as a unit on interrupt.
async fn run_pipeline(
    request: &RunRequest,
    image: &str,
    handle: &ContainerHandle,
    guard: &mut CleanupGuard,
    config: &RuntimeConfig,
) -> Result<i32> {
    let health_url = request
        .health_url
        .clone()
        .unwrap_or_else(|| docker::default_health_url(handle.host_port));
    docker::wait_for_service(&health_url, request.timeout_secs, config).await;

    let report = toolchain::probe(request.cross_enabled, &request.cross_candidates).await;
    config.verbose_println(&format!(
        "Toolchain: packagers={:?} cross={:?} host={}/{}",
        report.packagers, report.cross_triples, report.host_os, report.host_arch
    ));
    if !report.bundle_active() && request.mode == LaunchMode::Build {
        config.warning_println(
            "No packaging tools detected; building a bare executable without installers",
        );
    }

    let frontend_dist = manifest::resolve_frontend_dist(&request.image_or_path);
    let manifest = Manifest::generate(
        image,
        handle.host_port,
        request.mode,
        &report,
        &frontend_dist,
    )?;
    guard.register_manifest(manifest.path.clone());

    BuildOrchestrator::check_tauri_cli().await?;
    let orchestrator =
        BuildOrchestrator::new(manifest.path.clone(), request.tauri_dir.clone());

    match request.mode {
        LaunchMode::Dev => orchestrator.run_dev(config).await,
        LaunchMode::Build => {
            let targets = build::plan_targets(
                request.explicit_target.as_deref(),
                &report,
                request.cross_enabled,
            );
            let results = orchestrator.build_all(&targets, config).await;

            let dist_root = Path::new("dist");
            let produced = export::export_all(dist_root, &results, config);

            let failed = results.iter().filter(|r| !r.success).count();
            let _ = config.output().section("Build summary");
            for result in &results {
                let label = result.target.as_deref().unwrap_or("native");
                if result.success {
                    config.success_println(&format!("{}: ok", label));
                } else {
                    config.warning_println(&format!("{}: failed", label));
                }
            }
            config.println(&format!(
                "{} platform folder(s) exported to dist/",
                produced.len()
            ));
            if failed > 0 {
                config.warning_println(&format!(
                    "{} target(s) failed; successful artifacts were still exported",
                    failed
                ));
            }

            mobile::try_android_build(&request.tauri_dir, dist_root, config).await;

            // Per-target failures alone never force a non-zero exit once the
            // export tree and index are written.
            Ok(0)
        }
    }
}
