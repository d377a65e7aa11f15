use crate::config::ProviderConfig;
use crate::model::{Period, RawTable, ScraperError};
use crate::scraper::traits::TableSource;

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub struct HttpTableSource {
    client: Client,
}

impl HttpTableSource {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) autorank/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        Ok(Self { client })
    }

    pub fn build_url(provider: &ProviderConfig, period: Option<Period>) -> String {
        match period {
            Some(period) => {
                let separator = if provider.url.contains('?') { '&' } else { '?' };
                format!("{}{}date={}", provider.url, separator, period)
            }
            None => provider.url.clone(),
        }
    }
}

#[async_trait::async_trait]
impl TableSource for HttpTableSource {
    async fn fetch(
        &self,
        provider: &ProviderConfig,
        period: Option<Period>,
    ) -> Result<RawTable, ScraperError> {
        let url = Self::build_url(provider, period);
        debug!("GET {}", url);

        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ScraperError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ScraperError::InvalidResponse {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<RawTable>()
            .await
            .map_err(|e| ScraperError::Decode(e.to_string()))
    }
}
