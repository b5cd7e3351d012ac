//! Core types and traits for mogsql drivers.
//!
//! This crate is the contract between the host client and its drivers:
//!
//! - `Connection` / `TransactionOps` over the wire client a driver wraps
//! - `Driver`, `DriverInfo` and the `Registry` drivers are published in
//! - `DbUrl`, host `Vars` and `OutputSinks` handed to drivers
//! - the `metadata` records, filters, reader traits and writer
//! - `Outcome` and `Cx` re-exported from asupersync

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod array;
pub mod connection;
pub mod driver;
pub mod error;
pub mod metadata;
pub mod output;
pub mod row;
pub mod url;
pub mod value;
pub mod vars;

pub use connection::{Connection, PreparedStatement, TransactionOps};
pub use driver::{Driver, DriverInfo, Registry};
pub use error::{
    ConfigError, ConnectionError, ConnectionErrorKind, CopyError, CopyStage, Error, QueryError,
    QueryErrorKind, Result, TypeError,
};
pub use output::{CaptureBuffer, OutputSinks, SharedWriter};
pub use row::{FromValue, Row};
pub use url::{DbUrl, SslMode};
pub use value::Value;
pub use vars::Vars;
