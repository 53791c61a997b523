use crate::domain::ports::PageFetcher;
use crate::utils::error::{EtlError, Result};
use reqwest::Client;

/// Plain GET requests; no custom headers, no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
