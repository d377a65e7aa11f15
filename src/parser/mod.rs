// Table parsing: column resolution, volume normalization, record assembly.

pub mod assembler;
pub mod columns;
pub mod rank_parser;
pub mod volume;

pub use assembler::{assemble, assemble_models, assemble_wide};
pub use columns::{
    enumerate_period_columns, resolve_period_column, resolve_period_column_with,
    ChineseYearMonth, DashYearMonth, LabelRecognizer, PeriodColumn, DEFAULT_RECOGNIZERS,
};
pub use rank_parser::{parser_for, CpcaWideParser, GasgooModelParser, GasgooRankParser, TableParser};
pub use volume::{normalize_volume, DEFAULT_UNIT_SCALE};
