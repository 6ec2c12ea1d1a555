//! Docker engine integration.
//!
//! One container per run: image resolution (pull reference or local
//! Dockerfile build), lifecycle management with port-conflict eviction,
//! HTTP readiness polling, and an RAII cleanup guard covering every exit path.
//!
//! # Module Structure
//!
//! - `container` - container start, naming, and conflict eviction
//! - `guard` - RAII guard for container and manifest cleanup
//! - `image` - daemon availability check and image resolution
//! - `readiness` - bounded HTTP readiness polling

pub mod container;
pub mod guard;
pub mod image;
pub mod readiness;

pub use container::{ContainerHandle, derive_container_name, evict_conflicts, start_container};
pub use guard::CleanupGuard;
pub use image::{check_docker_available, derive_local_tag, resolve};
pub use readiness::{default_health_url, wait_for_service};
