use crate::model::{CanonicalDataset, Period, SalesRecord, Source};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceVolume {
    pub source: Source,
    pub volume: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub entity: String,
    pub volumes: Vec<SourceVolume>,
    /// Max minus min over the sources that reported; `None` below two.
    pub spread: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub period: Period,
    pub sources: Vec<Source>,
    pub rows: Vec<ComparisonRow>,
}

/// Side-by-side volumes per source for one period. Sources are the
/// configured feed names, so two feeds of one provider stay apart.
///
/// With no `entities`, every entity seen in the period is reported under its
/// exact name. Requested names match any record whose entity contains them.
/// Volumes from several matching records are summed.
pub fn compare_sources(
    dataset: &CanonicalDataset,
    period: Period,
    entities: &[String],
) -> ComparisonReport {
    let in_period: Vec<&SalesRecord> = dataset.iter().filter(|r| r.period() == period).collect();

    let mut sources: Vec<Source> = Vec::new();
    for record in &in_period {
        if !sources.contains(record.source()) {
            sources.push(record.source().clone());
        }
    }

    let rows = if entities.is_empty() {
        let mut seen: Vec<&str> = Vec::new();
        for record in &in_period {
            if !seen.contains(&record.entity()) {
                seen.push(record.entity());
            }
        }
        seen.into_iter()
            .map(|entity| build_row(entity, &in_period, &sources, |r| r.entity() == entity))
            .collect()
    } else {
        entities
            .iter()
            .map(|entity| {
                build_row(entity, &in_period, &sources, |r| r.entity().contains(entity.as_str()))
            })
            .collect()
    };

    ComparisonReport { period, sources, rows }
}

fn build_row<F>(
    entity: &str,
    records: &[&SalesRecord],
    sources: &[Source],
    matches: F,
) -> ComparisonRow
where
    F: Fn(&SalesRecord) -> bool,
{
    let volumes: Vec<SourceVolume> = sources
        .iter()
        .map(|source| {
            let volume = records
                .iter()
                .filter(|r| r.source() == source && matches(r))
                .map(|r| r.volume())
                .reduce(|a, b| a.saturating_add(b));
            SourceVolume {
                source: source.clone(),
                volume,
            }
        })
        .collect();

    let present: Vec<u64> = volumes.iter().filter_map(|v| v.volume).collect();
    let spread = match (present.iter().max(), present.iter().min()) {
        (Some(max), Some(min)) if present.len() >= 2 => Some(max - min),
        _ => None,
    };

    ComparisonRow {
        entity: entity.to_string(),
        volumes,
        spread,
    }
}
