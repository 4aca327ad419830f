use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::config::FetchConfig;
use crate::error::{Result, ScrapeError};

pub fn client(config: &FetchConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(ScrapeError::Client)
}

/// Single GET with the configured timeout. Non-2xx is an error; nothing is retried.
pub fn fetch_html(url: &str, config: &FetchConfig) -> Result<String> {
    let client = client(config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("GET {url}"));
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = fetch_with(&client, url);
    pb.finish_and_clear();
    result
}

pub fn fetch_with(client: &Client, url: &str) -> Result<String> {
    info!("Fetching {}", url);
    let start = Instant::now();
    let transport = |source| ScrapeError::Transport {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        warn!("GET {} returned {}", url, status);
        return Err(ScrapeError::Fetch {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().map_err(transport)?;
    info!(
        "Fetched {} bytes ({}) in {}ms",
        body.len(),
        status,
        start.elapsed().as_millis()
    );
    Ok(body)
}
