// Core types: Period, RawTable, SalesRecord, CanonicalDataset
use chrono::{Datelike, NaiveDate};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// A calendar year-month, rendered canonically as `YYYYMM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1000..=9999).contains(&year) {
            return Err(PeriodError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month immediately before this one, wrapping into the previous year.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn canonical(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 6 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PeriodError::InvalidFormat(trimmed.to_string()));
        }
        let year = trimmed[..4]
            .parse::<i32>()
            .map_err(|_| PeriodError::InvalidFormat(trimmed.to_string()))?;
        let month = trimmed[4..]
            .parse::<u32>()
            .map_err(|_| PeriodError::InvalidFormat(trimmed.to_string()))?;
        Period::new(year, month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Upstream data providers. Config files name them in snake_case, output
/// records carry the upstream source tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename(serialize = "GASGOO", deserialize = "gasgoo_manufacturers"))]
    GasgooManufacturers,
    #[serde(rename(serialize = "GASGOO_MODELS", deserialize = "gasgoo_models"))]
    GasgooModels,
    #[serde(rename(serialize = "CPCA", deserialize = "cpca_wide"))]
    CpcaWide,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::GasgooManufacturers => "GASGOO",
            Provider::GasgooModels => "GASGOO_MODELS",
            Provider::CpcaWide => "CPCA",
        }
    }

    /// CPCA reports in units of 10,000 vehicles.
    pub fn default_unit_scale(&self) -> u32 {
        match self {
            Provider::CpcaWide => 10_000,
            _ => 1,
        }
    }

    /// Wide providers return every historical period in a single table.
    pub fn is_wide(&self) -> bool {
        matches!(self, Provider::CpcaWide)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured feed: its provider kind plus the name it reports under.
/// Two feeds of one kind (CPCA wholesale and retail) stay distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    provider: Provider,
    name: Arc<str>,
}

impl Source {
    pub fn new(provider: Provider, name: impl Into<Arc<str>>) -> Self {
        Self {
            provider,
            name: name.into(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<Provider> for Source {
    fn from(provider: Provider) -> Self {
        Self::new(provider, provider.as_str())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// A single cell as delivered upstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Provider table in pandas "split" orientation: one header, positional rows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    #[serde(default, rename = "data")]
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { cells })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// No header and no rows: upstream has nothing for this period yet.
    pub fn is_unpublished(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Cell at `index`; short rows read as missing.
    pub fn cell(&self, index: usize) -> Option<&'a CellValue> {
        self.cells.get(index)
    }
}

/// Canonical output unit. Volume is strictly positive by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesRecord {
    #[serde(rename = "name")]
    entity: String,
    volume: NonZeroU64,
    #[serde(rename = "date")]
    period: Period,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_name: Option<String>,
    source: Source,
}

impl SalesRecord {
    pub fn manufacturer(
        entity: impl Into<String>,
        period: Period,
        volume: NonZeroU64,
        source: impl Into<Source>,
    ) -> Self {
        Self {
            entity: entity.into(),
            volume,
            period,
            model_name: None,
            source: source.into(),
        }
    }

    pub fn model(
        entity: impl Into<String>,
        model_name: impl Into<String>,
        period: Period,
        volume: NonZeroU64,
        source: impl Into<Source>,
    ) -> Self {
        Self {
            entity: entity.into(),
            volume,
            period,
            model_name: Some(model_name.into()),
            source: source.into(),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn volume(&self) -> u64 {
        self.volume.get()
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn provider(&self) -> Provider {
        self.source.provider()
    }
}

/// Append-only record sequence in discovery order. Duplicate
/// (entity, period) pairs from different providers are all kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CanonicalDataset {
    records: Vec<SalesRecord>,
}

impl CanonicalDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SalesRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<SalesRecord> {
        self.records
    }
}

impl Extend<SalesRecord> for CanonicalDataset {
    fn extend<T: IntoIterator<Item = SalesRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}

impl FromIterator<SalesRecord> for CanonicalDataset {
    fn from_iter<T: IntoIterator<Item = SalesRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CanonicalDataset {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("expected YYYYMM, got '{0}'")]
    InvalidFormat(String),
    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(u32),
    #[error("year {0} is not a four-digit year")]
    YearOutOfRange(i32),
    #[error("column label '{0}' does not decode to a period")]
    MalformedLabel(String),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("table has no '{column}' column")]
    MissingNameColumn { column: String },
    #[error("{provider} tables are fetched per period, but no period was given")]
    PeriodRequired { provider: Provider },
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("upstream answered with status {status}")]
    InvalidResponse { status: u16 },
    #[error("failed to decode table: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
