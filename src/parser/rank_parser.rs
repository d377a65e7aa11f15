// Provider-specific ranking table parsers
use crate::config::{ManufacturerMapping, ProviderConfig};
use crate::model::{ParserError, Period, Provider, RawTable, SalesRecord, Source};
use crate::parser::assembler::{assemble, assemble_models, assemble_wide};
use tracing::debug;

pub const MANUFACTURER_COLUMN: &str = "厂商";
pub const MODEL_COLUMN: &str = "车型";

pub trait TableParser {
    fn provider(&self) -> Provider;

    /// Per-period providers require `period`. Wide providers return every
    /// period in the table, or only `period` when one is given.
    ///
    /// A table with neither columns nor rows has not been published yet and
    /// parses to no records.
    fn parse(
        &self,
        table: &RawTable,
        period: Option<Period>,
    ) -> Result<Vec<SalesRecord>, ParserError>;
}

pub struct GasgooRankParser {
    pub source: Source,
    pub unit_scale: u32,
}

impl GasgooRankParser {
    pub fn new(unit_scale: u32) -> Self {
        Self {
            source: Provider::GasgooManufacturers.into(),
            unit_scale,
        }
    }
}

pub struct GasgooModelParser<'m> {
    pub mapping: &'m ManufacturerMapping,
    pub source: Source,
    pub unit_scale: u32,
}

impl<'m> GasgooModelParser<'m> {
    pub fn new(mapping: &'m ManufacturerMapping, unit_scale: u32) -> Self {
        Self {
            mapping,
            source: Provider::GasgooModels.into(),
            unit_scale,
        }
    }
}

pub struct CpcaWideParser {
    pub source: Source,
    pub unit_scale: u32,
}

impl CpcaWideParser {
    pub fn new(unit_scale: u32) -> Self {
        Self {
            source: Provider::CpcaWide.into(),
            unit_scale,
        }
    }
}

fn require_period(provider: Provider, period: Option<Period>) -> Result<Period, ParserError> {
    period.ok_or(ParserError::PeriodRequired { provider })
}

fn unpublished(source: &Source, table: &RawTable) -> bool {
    let empty = table.is_unpublished();
    if empty {
        debug!("{}: empty table, nothing published", source);
    }
    empty
}

impl TableParser for GasgooRankParser {
    fn provider(&self) -> Provider {
        Provider::GasgooManufacturers
    }

    fn parse(
        &self,
        table: &RawTable,
        period: Option<Period>,
    ) -> Result<Vec<SalesRecord>, ParserError> {
        let period = require_period(self.provider(), period)?;
        if unpublished(&self.source, table) {
            return Ok(Vec::new());
        }
        let records: Vec<SalesRecord> =
            assemble(table, MANUFACTURER_COLUMN, period, self.source.clone(), self.unit_scale)?
                .collect();
        debug!(
            "{} {}: {} of {} rows kept",
            self.source,
            period,
            records.len(),
            table.rows.len()
        );
        Ok(records)
    }
}

impl TableParser for GasgooModelParser<'_> {
    fn provider(&self) -> Provider {
        Provider::GasgooModels
    }

    fn parse(
        &self,
        table: &RawTable,
        period: Option<Period>,
    ) -> Result<Vec<SalesRecord>, ParserError> {
        let period = require_period(self.provider(), period)?;
        if unpublished(&self.source, table) {
            return Ok(Vec::new());
        }
        let records: Vec<SalesRecord> = assemble_models(
            table,
            MODEL_COLUMN,
            period,
            self.mapping,
            self.source.clone(),
            self.unit_scale,
        )?
        .collect();
        debug!(
            "{} {}: {} of {} models kept",
            self.source,
            period,
            records.len(),
            table.rows.len()
        );
        Ok(records)
    }
}

impl TableParser for CpcaWideParser {
    fn provider(&self) -> Provider {
        Provider::CpcaWide
    }

    fn parse(
        &self,
        table: &RawTable,
        period: Option<Period>,
    ) -> Result<Vec<SalesRecord>, ParserError> {
        if unpublished(&self.source, table) {
            return Ok(Vec::new());
        }
        let records: Vec<SalesRecord> =
            assemble_wide(table, MANUFACTURER_COLUMN, self.source.clone(), self.unit_scale)?
                .filter(|record| period.is_none_or(|p| record.period() == p))
                .collect();
        debug!("{}: {} records from {} rows", self.source, records.len(), table.rows.len());
        Ok(records)
    }
}

/// Builds the parser for one configured feed. Records are tagged with the
/// feed's source name.
pub fn parser_for<'m>(
    config: &ProviderConfig,
    mapping: &'m ManufacturerMapping,
) -> Box<dyn TableParser + Send + Sync + 'm> {
    let source = config.source();
    let unit_scale = config.unit_scale();
    match config.kind {
        Provider::GasgooManufacturers => Box::new(GasgooRankParser { source, unit_scale }),
        Provider::GasgooModels => Box::new(GasgooModelParser {
            mapping,
            source,
            unit_scale,
        }),
        Provider::CpcaWide => Box::new(CpcaWideParser { source, unit_scale }),
    }
}
