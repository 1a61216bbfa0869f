//! Backend reachability check.

use tracing::{error, info};

/// Probe the public catalog endpoint and report status.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached or answers with a
/// non-success status.
pub async fn run(base_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let base_url = base_url.trim_end_matches('/');
    let url = format!("{base_url}/api/products/");

    info!("Probing {url}");
    let response = reqwest::get(&url).await?;
    let status = response.status();

    if status.is_success() {
        info!("Backend is reachable ({status})");
        Ok(())
    } else {
        error!("Backend answered with {status}");
        Err(format!("backend unhealthy: {status}").into())
    }
}
