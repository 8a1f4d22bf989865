use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;

/// Fetch the workout page HTML. Transport failures are fatal; there are no
/// retries anywhere in the pipeline.
pub async fn fetch_page(client: &reqwest::Client, cfg: &Config) -> Result<String> {
    info!("Fetching workout page: {}", cfg.site_url);
    let response = client
        .get(&cfg.site_url)
        .basic_auth(&cfg.site_user, Some(&cfg.site_password))
        .send()
        .await
        .context("Failed to reach workout page")?
        .error_for_status()
        .context("Workout page returned an error status")?;

    let html = response
        .text()
        .await
        .context("Failed to read workout page body")?;
    Ok(html)
}
