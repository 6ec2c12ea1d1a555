//! Ephemeral Tauri configuration generation.
//!
//! Each run writes one uniquely-named temp file and passes it to every tauri
//! invocation via `--config`. Persisted project configuration is never
//! touched, so concurrent runs cannot interfere and nothing leaks into the
//! shell project's state.

use crate::error::{ManifestError, Result};
use crate::toolchain::ToolchainReport;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Launch mode for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Interactive desktop window pointed at the live dev server
    Dev,
    /// Release build producing native bundles
    Build,
}

/// Serde model of the `tauri.conf.json` subset this launcher controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TauriConf {
    /// Product name shown in window chrome and installers
    pub product_name: String,
    /// Bundle version
    pub version: String,
    /// Reverse-DNS package identifier
    pub identifier: String,
    /// Build section: dev URL and frontend assets
    pub build: BuildSection,
    /// App section: window geometry and security
    pub app: AppSection,
    /// Bundle section: packaging targets and metadata
    pub bundle: BundleSection,
}

/// `build` section of the Tauri config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSection {
    /// Command run before `tauri dev` (always empty here)
    pub before_dev_command: String,
    /// Command run before `tauri build` (always empty here)
    pub before_build_command: String,
    /// Live dev-server URL; present only in dev mode, explicitly null in
    /// build mode so a packaged artifact never embeds it
    pub dev_url: Option<String>,
    /// Frontend asset directory
    pub frontend_dist: String,
}

/// `app` section of the Tauri config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    /// Content security policy (unset: the wrapped service controls content)
    pub security: SecuritySection,
    /// Window list; exactly one window per run
    pub windows: Vec<WindowSpec>,
}

/// `app.security` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuritySection {
    /// CSP, deliberately null
    pub csp: Option<String>,
}

/// Window geometry defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpec {
    /// Window title
    pub title: String,
    /// Initial width
    pub width: u32,
    /// Initial height
    pub height: u32,
    /// Minimum width
    pub min_width: u32,
    /// Minimum height
    pub min_height: u32,
    /// Whether the window is resizable
    pub resizable: bool,
    /// Whether the window starts fullscreen
    pub fullscreen: bool,
}

/// `bundle` section of the Tauri config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleSection {
    /// Whether packaging is active; false when zero targets are feasible
    pub active: bool,
    /// Packaging targets supplied by the toolchain probe
    pub targets: Vec<String>,
    /// Icon resources (empty: the shell project's defaults apply)
    pub icon: Vec<String>,
    /// Extra bundled resources
    pub resources: Vec<String>,
    /// Bundle category
    pub category: String,
    /// One-line description
    pub short_description: String,
    /// Long description naming the wrapped image
    pub long_description: String,
}

/// The run-scoped manifest: the config value plus the temp path it was
/// written to. Owned by the generator, consumed by the build orchestrator,
/// deleted by the cleanup guard.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Unique temp file the config was written to
    pub path: PathBuf,
    /// The generated configuration
    pub conf: TauriConf,
}

impl Manifest {
    /// Generates and writes the manifest for one run.
    ///
    /// `frontend_dist` is the fixed `../app` default unless a local build
    /// context supplied its own asset subdirectory.
    pub fn generate(
        image: &str,
        host_port: u16,
        mode: LaunchMode,
        report: &ToolchainReport,
        frontend_dist: &str,
    ) -> Result<Self> {
        let conf = build_conf(image, host_port, mode, report, frontend_dist)?;

        let path = std::env::temp_dir().join(format!("dock2tauri-{}.conf.json", uuid::Uuid::new_v4()));
        let json = serde_json::to_string_pretty(&conf)?;
        std::fs::write(&path, json).map_err(|e| ManifestError::WriteFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        log::debug!("Wrote manifest to {}", path.display());
        Ok(Self { path, conf })
    }
}

/// Builds the config value without touching the filesystem.
pub fn build_conf(
    image: &str,
    host_port: u16,
    mode: LaunchMode,
    report: &ToolchainReport,
    frontend_dist: &str,
) -> Result<TauriConf> {
    let product = sanitize_product_name(image);
    let ident = sanitize_identifier(image);
    if ident.is_empty() {
        return Err(ManifestError::EmptyIdentity {
            image: image.to_string(),
        }
        .into());
    }

    let dev_url = match mode {
        LaunchMode::Dev => Some(format!("http://localhost:{}", host_port)),
        LaunchMode::Build => None,
    };

    Ok(TauriConf {
        product_name: format!("Dock2Tauri - {}", product),
        version: "1.0.0".to_string(),
        identifier: format!("com.dock2tauri.{}", ident),
        build: BuildSection {
            before_dev_command: String::new(),
            before_build_command: String::new(),
            dev_url,
            frontend_dist: frontend_dist.to_string(),
        },
        app: AppSection {
            security: SecuritySection { csp: None },
            windows: vec![WindowSpec {
                title: format!("Dock2Tauri - {}", image),
                width: 1200,
                height: 800,
                min_width: 600,
                min_height: 400,
                resizable: true,
                fullscreen: false,
            }],
        },
        bundle: BundleSection {
            active: report.bundle_active(),
            targets: report.packagers.iter().cloned().collect(),
            icon: Vec::new(),
            resources: Vec::new(),
            category: "DeveloperTool".to_string(),
            short_description: "Docker App in Tauri".to_string(),
            long_description: format!("Running {} as desktop application", image),
        },
    })
}

/// Resolves the frontend asset directory for a run.
///
/// When building from a local Dockerfile whose context contains an `app/`
/// subdirectory, that directory is used; otherwise the fixed `../app`
/// default of the shell project applies.
pub fn resolve_frontend_dist(image_or_path: &str) -> String {
    let path = Path::new(image_or_path);
    if path.is_file()
        && let Some(parent) = path.parent()
    {
        let app_dir = parent.join("app");
        if app_dir.is_dir() {
            return app_dir.to_string_lossy().into_owned();
        }
    }
    "../app".to_string()
}

/// Strips the image reference down to characters safe for product names and
/// filesystem paths. The tag part is dropped first.
pub fn sanitize_product_name(image: &str) -> String {
    let repo = image.split(':').next().unwrap_or(image);
    repo.chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}

/// Strips the image reference down to alphanumerics for the reverse-DNS
/// package identifier.
pub fn sanitize_identifier(image: &str) -> String {
    image
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}
