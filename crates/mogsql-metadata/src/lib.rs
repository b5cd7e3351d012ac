//! MogDB / openGauss metadata reader.
//!
//! [`MogReader`] answers the host's catalog, schema, table, column, index,
//! trigger and statistics queries from `pg_catalog` and the information
//! schema.

pub mod format;
pub mod query;
pub mod reader;
pub mod sql;

pub use reader::{MogReader, scale_distinct};
