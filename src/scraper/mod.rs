pub mod fetcher;
pub mod traits;

pub use fetcher::HttpTableSource;
pub use traits::TableSource;
