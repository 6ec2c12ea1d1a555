//! HTTP readiness polling for the launched container.
//!
//! Bounded wait-then-continue: a ready service ends polling early, an
//! unready one produces a warning and the run proceeds anyway.

use crate::cli::RuntimeConfig;
use std::time::{Duration, Instant};

/// Interval between readiness probes
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls `url` against a fixed deadline `timeout_secs` from now.
///
/// A 2xx or 3xx response counts as ready. The deadline bounds the whole wait,
/// probe time included, so a hanging request cannot stretch it to a multiple
/// of the configured timeout. Returns whether the service became ready; a
/// timeout is deliberately non-fatal.
pub async fn wait_for_service(url: &str, timeout_secs: u64, config: &RuntimeConfig) -> bool {
    config.progress(&format!("Waiting for service at {}...", url));

    let client = match reqwest::Client::builder()
        .timeout(POLL_INTERVAL)
        .danger_accept_invalid_certs(true)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            config.warning_println(&format!("Could not build HTTP client: {}", e));
            return false;
        }
    };

    let deadline = Instant::now() + Duration::from_secs(timeout_secs);
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;
        match client.get(url).send().await {
            Ok(response) if response.status().is_success() || response.status().is_redirection() => {
                config.success_println("Service is ready");
                return true;
            }
            Ok(response) => {
                log::debug!(
                    "Readiness attempt {}: HTTP {} from {}",
                    attempt,
                    response.status(),
                    url
                );
            }
            Err(e) => {
                log::debug!("Readiness attempt {}: {}", attempt, e);
            }
        }

        let now = Instant::now();
        if now >= deadline {
            break;
        }
        // No trailing sleep past the deadline
        tokio::time::sleep(POLL_INTERVAL.min(deadline - now)).await;
    }

    config.warning_println(&format!(
        "Service not ready after {} seconds, continuing anyway",
        timeout_secs
    ));
    false
}

/// Default health URL for a mapped host port.
pub fn default_health_url(host_port: u16) -> String {
    format!("http://localhost:{}", host_port)
}
