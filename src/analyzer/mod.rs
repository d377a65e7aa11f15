// Analyzer module: cross-provider views over a finished dataset.

pub mod comparison;

pub use comparison::{compare_sources, ComparisonReport, ComparisonRow, SourceVolume};
