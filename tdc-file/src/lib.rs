//! # tdc-file
//!
//! File-backed record storage for OpenTDC services that run without a
//! database.
//!
//! Records are kept as one JSON array per store. Two files live under the
//! configured base path: the persistent data file and a seed template used to
//! bootstrap the data file on first run.
//!
//! ```rust,ignore
//! use tdc_file::{FileStoreConfig, JsonFileStore};
//!
//! let store: JsonFileStore<Company> =
//!     JsonFileStore::new(FileStoreConfig::persistent("/srv/tdc").with_prefix("companies-"));
//!
//! let mut companies = store.import_or_seed()?;
//! companies.push(new_company);
//! store.export_to(&companies)?;
//! ```

pub mod config;
pub mod error;
pub mod store;

pub use config::{DATA_FILE_NAME, FileStoreConfig, SEED_FILE_NAME};
pub use error::{FileResult, FileStoreError};
pub use store::JsonFileStore;
