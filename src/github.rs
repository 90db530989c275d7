//! Latest release lookup.

use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use tracing::{debug, info};

use crate::errors::BuildError;

/// When set, supplies the latest release tag directly and skips the network lookup.
pub const ENV_LATEST_TAG: &str = "MULTIDOC_LATEST_TAG";

/// Overrides the release host (mirrors, tests).
pub const ENV_GITHUB_URL: &str = "MULTIDOC_GITHUB_URL";

pub const DEFAULT_GITHUB_URL: &str = "https://github.com";

/// Latest release tag name of `owner/repo`, honoring [`ENV_LATEST_TAG`].
pub fn latest_release_tag(owner: &str, repo: &str) -> Result<String, BuildError> {
    if let Ok(tag) = env::var(ENV_LATEST_TAG) {
        let tag = tag.trim();
        if !tag.is_empty() {
            info!("latest tag taken from {ENV_LATEST_TAG}: {tag}");
            return Ok(tag.to_string());
        }
    }
    let host = env::var(ENV_GITHUB_URL)
        .ok()
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_GITHUB_URL.to_string());
    latest_release_tag_from(&host, owner, repo)
}

/// Ask `<host>/<owner>/<repo>/releases/latest` and read the tag from the redirect target.
pub fn latest_release_tag_from(host: &str, owner: &str, repo: &str) -> Result<String, BuildError> {
    let base_url = format!("{host}/{owner}/{repo}/releases");
    let url = format!("{base_url}/latest");
    debug!("github: GET {url}");

    let client = Client::builder()
        .redirect(Policy::none())
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| network_error(&url, None, e.to_string()))?;

    let resp = client
        .get(&url)
        .send()
        .map_err(|e| network_error(&url, None, e.to_string()))?;

    let status = resp.status();
    if status.is_client_error() || status.is_server_error() {
        let body = resp.text().unwrap_or_default();
        return Err(network_error(&url, Some(status.as_u16()), body));
    }

    let location = resp
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            network_error(
                &url,
                Some(status.as_u16()),
                "missing Location header".to_string(),
            )
        })?;

    let tag_prefix = format!("{base_url}/tag/");
    let tag = location
        .strip_prefix(&tag_prefix)
        .or_else(|| location.strip_prefix(&format!("/{owner}/{repo}/releases/tag/")))
        .unwrap_or(&location)
        .to_string();
    if tag.is_empty() {
        return Err(network_error(
            &url,
            Some(status.as_u16()),
            format!("no tag in Location header {location:?}"),
        ));
    }
    Ok(tag)
}

fn network_error(url: &str, status: Option<u16>, body: String) -> BuildError {
    BuildError::Network {
        url: url.to_string(),
        status,
        body,
    }
}
