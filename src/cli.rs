use autorank::{Period, Provider};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "autorank",
    version,
    about = "Normalize automotive sales rankings into canonical records"
)]
pub struct Cli {
    #[arg(long, default_value = "config.json", help = "Path to the provider configuration")]
    pub config: PathBuf,
    #[arg(
        long,
        default_value_t = 12,
        help = "Number of months to fetch, ending at the current month"
    )]
    pub months: usize,
    #[arg(long, value_enum, default_value_t = SourceSelection::Gasgoo)]
    pub source: SourceSelection,
    #[arg(
        long,
        value_name = "YYYYMM",
        help = "Print a cross-source comparison for this month instead of records"
    )]
    pub compare: Option<Period>,
    #[arg(long = "entity", help = "Restrict the comparison to these manufacturers (repeatable)")]
    pub entities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelection {
    Gasgoo,
    GasgooModels,
    Cpca,
    All,
}

impl SourceSelection {
    pub fn includes(&self, provider: Provider) -> bool {
        match self {
            SourceSelection::Gasgoo => provider == Provider::GasgooManufacturers,
            SourceSelection::GasgooModels => provider == Provider::GasgooModels,
            SourceSelection::Cpca => provider == Provider::CpcaWide,
            SourceSelection::All => true,
        }
    }
}
