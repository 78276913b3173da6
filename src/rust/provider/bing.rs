use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder};

use super::response::parse_thumbnails;
use super::SearchProvider;
use crate::config::ProviderConfig;
use crate::error::SearchError;
use crate::term::SearchTerm;
use crate::thumbnails::{Thumbnails, THUMBNAIL_COUNT};

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Image search against the Bing-style `images/search` endpoint.
#[derive(Debug, Clone)]
pub struct BingImageSearch {
    client: Client,
    config: ProviderConfig,
}

impl BingImageSearch {
    pub fn new(config: ProviderConfig) -> Result<Self, SearchError> {
        if config.api_key.is_empty() {
            warn!("No image search API key configured; requests will be rejected");
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn request(&self, term: &SearchTerm) -> RequestBuilder {
        let count = THUMBNAIL_COUNT.to_string();
        self.client
            .get(&self.config.endpoint)
            .query(&[
                ("q", term.as_str()),
                ("count", count.as_str()),
                ("offset", "0"),
                ("mkt", self.config.market.as_str()),
                ("safeSearch", "off"),
            ])
            .header(SUBSCRIPTION_KEY_HEADER, &self.config.api_key)
    }
}

#[async_trait]
impl SearchProvider for BingImageSearch {
    async fn search(&self, term: &SearchTerm) -> Result<Thumbnails, SearchError> {
        info!("Searching thumbnails for '{}'", term);
        let response = self.request(term).send().await?;
        debug!("Search response status for '{}': {}", term, response.status());
        let body = response.error_for_status()?.text().await?;
        debug!("Received {} bytes for '{}'", body.len(), term);
        parse_thumbnails(&body)
    }
}
