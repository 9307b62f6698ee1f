//! Domain types for marketplace catalogs and downloads.
//!
//! Pure data types with no I/O.

mod asset;
mod collection;
mod endpoint;
mod outcome;
mod query;

pub use asset::AssetRecord;
pub use collection::Collection;
pub use endpoint::EndpointConfig;
pub use outcome::{DownloadOutcome, StoredFile};
pub use query::Query;
