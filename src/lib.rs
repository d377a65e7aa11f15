pub mod analyzer;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod scraper;
pub mod utils;

pub use config::{load_config, load_mapping, AppConfig, ManufacturerMapping, ProviderConfig};
pub use model::{
    CanonicalDataset, CellValue, ParserError, Period, Provider, RawTable, SalesRecord, Source,
};
pub use normalizer::match_manufacturer;
pub use parser::{
    assemble, assemble_models, assemble_wide, normalize_volume, resolve_period_column,
};
