//! Shared error taxonomy, offset intervals and configuration.

pub mod config;
pub mod error;
pub mod interval;

pub use config::{DocumentPaths, OccupConfig, OutputFormat, TaggerConfig};
pub use error::{Error, ErrorCategory, Result};
pub use interval::Interval;
