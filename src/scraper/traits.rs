use crate::config::ProviderConfig;
use crate::model::{Period, RawTable, ScraperError};

/// Anything that can hand back a provider table. Wide providers are fetched
/// with `period = None`.
#[async_trait::async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch(
        &self,
        provider: &ProviderConfig,
        period: Option<Period>,
    ) -> Result<RawTable, ScraperError>;
}
