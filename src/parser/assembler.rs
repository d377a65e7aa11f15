// Record assembly: resolved columns + normalized volumes -> SalesRecord
use crate::config::ManufacturerMapping;
use crate::model::{CellValue, ParserError, Period, RawTable, SalesRecord, Source};
use crate::normalizer::match_manufacturer;
use crate::parser::columns::{
    enumerate_period_columns, resolve_period_column_index, DEFAULT_RECOGNIZERS,
};
use crate::parser::volume::normalize_volume;
use tracing::{debug, warn};

/// Position of the period column when no label matches; column 0 is the name.
pub const VOLUME_FALLBACK_INDEX: usize = 1;

fn require_column(table: &RawTable, column: &str) -> Result<usize, ParserError> {
    table
        .column_index(column)
        .ok_or_else(|| ParserError::MissingNameColumn {
            column: column.to_string(),
        })
}

fn volume_column(table: &RawTable, period: Period) -> Option<usize> {
    let index = resolve_period_column_index(
        &table.columns,
        period,
        VOLUME_FALLBACK_INDEX,
        DEFAULT_RECOGNIZERS,
    );
    if index.is_none() {
        warn!(
            "Table has {} columns, no volume column for {}",
            table.columns.len(),
            period
        );
    }
    index
}

/// Entity names are taken verbatim; blank names cannot identify anything.
fn name_cell(cell: Option<&CellValue>) -> Option<String> {
    match cell? {
        CellValue::Text(text) if !text.trim().is_empty() => Some(text.clone()),
        CellValue::Number(n) if n.is_finite() => Some(n.to_string()),
        _ => None,
    }
}

/// Manufacturer-level rows for a single period.
///
/// Fails only when `name_column` is absent; every other defect drops the row.
pub fn assemble<'a>(
    table: &'a RawTable,
    name_column: &str,
    period: Period,
    source: Source,
    unit_scale: u32,
) -> Result<impl Iterator<Item = SalesRecord> + 'a, ParserError> {
    let name_index = require_column(table, name_column)?;
    let volume_index = volume_column(table, period);

    Ok(table.rows().filter_map(move |row| {
        let volume = normalize_volume(row.cell(volume_index?)?, unit_scale)?;
        let entity = name_cell(row.cell(name_index))?;
        Some(SalesRecord::manufacturer(entity, period, volume, source.clone()))
    }))
}

/// Model-level rows for a single period. The volume is checked before the
/// (more expensive) manufacturer match; unresolved models are dropped.
pub fn assemble_models<'a>(
    table: &'a RawTable,
    model_column: &str,
    period: Period,
    mapping: &'a ManufacturerMapping,
    source: Source,
    unit_scale: u32,
) -> Result<impl Iterator<Item = SalesRecord> + 'a, ParserError> {
    let model_index = require_column(table, model_column)?;
    let volume_index = volume_column(table, period);

    Ok(table.rows().filter_map(move |row| {
        let volume = normalize_volume(row.cell(volume_index?)?, unit_scale)?;
        let model_name = name_cell(row.cell(model_index))?;
        let Some(manufacturer) = match_manufacturer(&model_name, mapping) else {
            debug!("Untracked model: {}", model_name);
            return None;
        };
        Some(SalesRecord::model(manufacturer, model_name, period, volume, source.clone()))
    }))
}

/// Wide historical table: one record per (date column, row) with a volume,
/// column by column. Columns whose label does not decode are skipped.
pub fn assemble_wide<'a>(
    table: &'a RawTable,
    name_column: &str,
    source: Source,
    unit_scale: u32,
) -> Result<impl Iterator<Item = SalesRecord> + 'a, ParserError> {
    let name_index = require_column(table, name_column)?;

    let period_columns: Vec<(usize, Period)> =
        enumerate_period_columns(&table.columns, DEFAULT_RECOGNIZERS)
            .into_iter()
            .filter(|column| column.index != name_index)
            .filter_map(|column| match column.period {
                Ok(period) => Some((column.index, period)),
                Err(e) => {
                    warn!("Skipping column '{}': {}", column.label, e);
                    None
                }
            })
            .collect();
    debug!("Wide table: {} period columns", period_columns.len());

    Ok(period_columns
        .into_iter()
        .flat_map(move |(volume_index, period)| {
            let source = source.clone();
            table.rows().filter_map(move |row| {
                let volume = normalize_volume(row.cell(volume_index)?, unit_scale)?;
                let entity = name_cell(row.cell(name_index))?;
                Some(SalesRecord::manufacturer(entity, period, volume, source.clone()))
            })
        }))
}
