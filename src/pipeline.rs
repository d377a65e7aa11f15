use crate::config::{ManufacturerMapping, ProviderConfig};
use crate::model::{CanonicalDataset, ParserError, Period, SalesRecord};
use crate::parser::parser_for;
use crate::scraper::TableSource;
use futures::future::join_all;
use tracing::{info, warn};

/// Fetches and normalizes everything one provider feed has for `periods`.
///
/// A failed fetch loses only that (feed, period) unit, and an unpublished
/// (empty) table yields nothing. A table that has columns but lacks its name
/// column is a contract violation and is returned as an error.
pub async fn collect_provider(
    provider: &ProviderConfig,
    source: &dyn TableSource,
    mapping: &ManufacturerMapping,
    periods: &[Period],
) -> Result<Vec<SalesRecord>, ParserError> {
    let feed = provider.source();
    info!("Processing provider: {} ({})", feed, provider.kind);
    let parser = parser_for(provider, mapping);

    if provider.kind.is_wide() {
        return match source.fetch(provider, None).await {
            Ok(table) => parser.parse(&table, None),
            Err(e) => {
                warn!("{} unavailable: {}", feed, e);
                Ok(Vec::new())
            }
        };
    }

    // fetch concurrently, assemble in period order
    let fetches = periods.iter().map(|period| source.fetch(provider, Some(*period)));
    let tables = join_all(fetches).await;

    let mut records = Vec::new();
    for (period, fetched) in periods.iter().zip(tables) {
        match fetched {
            Ok(table) => records.extend(parser.parse(&table, Some(*period))?),
            Err(e) => warn!("{} {} unavailable: {}", feed, period, e),
        }
    }
    info!("{}: {} records", feed, records.len());
    Ok(records)
}

/// Runs every provider in configuration order into one dataset.
pub async fn collect_all<'a, I>(
    providers: I,
    source: &dyn TableSource,
    mapping: &ManufacturerMapping,
    periods: &[Period],
) -> Result<CanonicalDataset, ParserError>
where
    I: IntoIterator<Item = &'a ProviderConfig>,
{
    let mut dataset = CanonicalDataset::new();
    for provider in providers {
        dataset.extend(collect_provider(provider, source, mapping, periods).await?);
    }
    Ok(dataset)
}
