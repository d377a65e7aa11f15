// Period column resolution over provider-specific header labels
use crate::model::{Period, PeriodError};
use tracing::debug;

/// One upstream convention for writing a period into a column label.
pub trait LabelRecognizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// The label this convention uses for `period`.
    fn label(&self, period: Period) -> String;

    /// `None` when the label does not follow this convention at all,
    /// `Some(Err(..))` when it looks date-bearing but cannot be decoded.
    fn decode(&self, label: &str) -> Option<Result<Period, PeriodError>>;
}

/// `2025-1`
pub struct DashYearMonth;

/// `2025年1月`
pub struct ChineseYearMonth;

impl LabelRecognizer for DashYearMonth {
    fn name(&self) -> &'static str {
        "dash"
    }

    fn label(&self, period: Period) -> String {
        format!("{}-{}", period.year(), period.month())
    }

    fn decode(&self, label: &str) -> Option<Result<Period, PeriodError>> {
        let trimmed = label.trim();
        let (year, month) = trimmed.split_once('-')?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(decode_parts(trimmed, year, month))
    }
}

impl LabelRecognizer for ChineseYearMonth {
    fn name(&self) -> &'static str {
        "chinese"
    }

    fn label(&self, period: Period) -> String {
        format!("{}年{}月", period.year(), period.month())
    }

    fn decode(&self, label: &str) -> Option<Result<Period, PeriodError>> {
        let trimmed = label.trim();
        if !trimmed.contains('年') || !trimmed.contains('月') {
            return None;
        }
        let parsed = trimmed
            .strip_suffix('月')
            .and_then(|body| body.split_once('年'))
            .ok_or_else(|| PeriodError::MalformedLabel(trimmed.to_string()))
            .and_then(|(year, month)| decode_parts(trimmed, year, month));
        Some(parsed)
    }
}

fn decode_parts(label: &str, year: &str, month: &str) -> Result<Period, PeriodError> {
    let malformed = || PeriodError::MalformedLabel(label.to_string());
    let year = year.trim();
    let month = month.trim();
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return Err(malformed());
    }
    let year = year.parse::<i32>().map_err(|_| malformed())?;
    let month = month.parse::<u32>().map_err(|_| malformed())?;
    Period::new(year, month)
}

pub const DEFAULT_RECOGNIZERS: &[&dyn LabelRecognizer] = &[&DashYearMonth, &ChineseYearMonth];

/// Column for `period` under the default conventions; see
/// [`resolve_period_column_with`].
pub fn resolve_period_column(
    columns: &[String],
    period: Period,
    positional_fallback_index: usize,
) -> Option<&str> {
    resolve_period_column_with(columns, period, positional_fallback_index, DEFAULT_RECOGNIZERS)
}

/// Picks the column holding `period`.
///
/// An exact label under any recognizer wins; otherwise the first label that
/// contains both the four-digit year and the unpadded month; otherwise the
/// column at `positional_fallback_index`. `None` only when that index is
/// out of bounds.
pub fn resolve_period_column_with<'a>(
    columns: &'a [String],
    period: Period,
    positional_fallback_index: usize,
    recognizers: &[&dyn LabelRecognizer],
) -> Option<&'a str> {
    resolve_period_column_index(columns, period, positional_fallback_index, recognizers)
        .map(|index| columns[index].as_str())
}

pub(crate) fn resolve_period_column_index(
    columns: &[String],
    period: Period,
    positional_fallback_index: usize,
    recognizers: &[&dyn LabelRecognizer],
) -> Option<usize> {
    let labels: Vec<String> = recognizers.iter().map(|r| r.label(period)).collect();
    if let Some(index) = columns
        .iter()
        .position(|column| labels.iter().any(|label| column.trim() == label))
    {
        return Some(index);
    }

    let year = format!("{:04}", period.year());
    let month = period.month().to_string();
    if let Some(index) = columns
        .iter()
        .position(|column| column.contains(&year) && column.contains(&month))
    {
        debug!("Loose label match for {}: '{}'", period, columns[index]);
        return Some(index);
    }

    debug!(
        "No column labelled for {}, falling back to position {}",
        period, positional_fallback_index
    );
    (positional_fallback_index < columns.len()).then_some(positional_fallback_index)
}

/// A date-bearing column of a wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodColumn {
    pub index: usize,
    pub label: String,
    pub period: Result<Period, PeriodError>,
}

/// Every column that some recognizer claims, paired with its decoded period.
/// Labels that look date-bearing but fail to decode are returned with the
/// error so the caller can skip just that column.
pub fn enumerate_period_columns(
    columns: &[String],
    recognizers: &[&dyn LabelRecognizer],
) -> Vec<PeriodColumn> {
    columns
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            recognizers
                .iter()
                .find_map(|r| r.decode(label))
                .map(|period| PeriodColumn {
                    index,
                    label: label.clone(),
                    period,
                })
        })
        .collect()
}
