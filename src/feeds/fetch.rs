use crate::{core::config::HttpConfig, MapError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Source of raw feed bodies
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// GET `url` and return the body of a successful response
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetches over HTTP with reqwest; non-2xx responses are errors
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Shared client, also used for tile downloads
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await?;
        log::debug!("{} returned {} bytes", url, body.len());
        Ok(body.to_vec())
    }
}
