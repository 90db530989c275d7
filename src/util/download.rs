//! Plain HTTP GET of template, fallback Dockerfile and requirements assets.

use std::path::Path;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::errors::BuildError;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Download `url` and return the response body. Non-2xx answers are errors carrying status and body.
pub fn download(url: &str) -> Result<Vec<u8>, BuildError> {
    debug!("download: GET {url}");
    let client = reqwest::blocking::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| network_error(url, None, e.to_string()))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| network_error(url, None, e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().unwrap_or_default();
        return Err(network_error(url, Some(status.as_u16()), body));
    }

    resp.bytes()
        .map(|b| b.to_vec())
        .map_err(|e| network_error(url, Some(status.as_u16()), e.to_string()))
}

/// Read `location` from disk when it names an existing file, otherwise download it.
pub fn read_local_or_remote(location: &str) -> Result<Vec<u8>, BuildError> {
    let path = Path::new(location);
    if path.is_file() {
        return crate::util::fs::read_file(path);
    }
    match Url::parse(location) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => download(location),
        Ok(u) if u.scheme() == "file" => {
            let p = u
                .to_file_path()
                .map_err(|_| BuildError::Config(format!("invalid file URL: {location}")))?;
            crate::util::fs::read_file(&p)
        }
        _ => Err(BuildError::Config(format!(
            "{location:?} is neither an existing file nor an http(s) URL"
        ))),
    }
}

fn network_error(url: &str, status: Option<u16>, body: String) -> BuildError {
    BuildError::Network {
        url: url.to_string(),
        status,
        body,
    }
}
