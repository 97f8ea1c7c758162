use reqwest::blocking::Client;
use reqwest::StatusCode;
use url::Url;

use crate::error::{FetchError, Result};

use super::BlobFetcher;

/// Fetches `meta` and `{group}.{nr}` over HTTP(S) via `GET {root}/meta` and
/// `GET {root}/{group}.{nr}` on a persistent connection; `reqwest`'s blocking
/// client pools and reuses connections per host, and retries once
/// transparently on a connection that was closed between requests.
pub struct HttpFetcher {
    client: Client,
    root: Url,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut root = Url::parse(base_url)
            .map_err(|e| FetchError::NotFound(format!("invalid URL `{base_url}`: {e}")))?;
        if !root.path().ends_with('/') {
            let mut path = root.path().to_string();
            path.push('/');
            root.set_path(&path);
        }
        let client = Client::builder()
            .build()
            .map_err(FetchError::from)?;
        Ok(Self { client, root })
    }

    fn get(&self, relative: &str) -> Result<Vec<u8>> {
        let url = self
            .root
            .join(relative)
            .map_err(|e| FetchError::NotFound(format!("{relative}: {e}")))?;
        let response = self.client.get(url.clone()).send().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else if e.is_connect() {
                FetchError::ConnectionLost(url.to_string())
            } else {
                FetchError::Http(e)
            }
        })?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()).into());
        }
        let response = response
            .error_for_status()
            .map_err(FetchError::from)?;
        response.bytes().map(|b| b.to_vec()).map_err(FetchError::from).map_err(Into::into)
    }
}

impl BlobFetcher for HttpFetcher {
    fn read_meta(&self) -> Result<Vec<u8>> {
        self.get("meta")
    }

    fn read(&self, group_name: &str, blob_nr: u64) -> Result<Vec<u8>> {
        self.get(&format!("{group_name}.{blob_nr}"))
    }
}
