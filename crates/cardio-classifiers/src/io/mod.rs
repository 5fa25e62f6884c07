//! Dataset acquisition.
//!
//! A `DatasetSource` produces a fresh `Table` or fails with
//! `PipelineError::Acquisition`. Sources never retry on their own.
pub mod credentials;
pub mod csv_reader;
#[cfg(feature = "remote")]
pub mod remote;

use crate::error::Result;
use crate::table::Table;

pub use credentials::{CredentialProvider, EnvCredentials, KaggleCredentials, KaggleJsonFile};
pub use csv_reader::{read_table, CsvBytesSource, CsvFileSource, MISSING_MARKERS};
#[cfg(feature = "remote")]
pub use remote::KaggleSource;

pub trait DatasetSource {
    /// Short description for logs, never containing credentials.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Table>;
}
