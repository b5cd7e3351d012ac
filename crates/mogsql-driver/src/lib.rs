//! MogDB / openGauss driver for mogsql.
//!
//! `MogDriver` wires a wire client (any [`Connector`]) into the host's driver
//! contract:
//!
//! - connection opening, with notice and notification printing and an
//!   optional retry without SSL
//! - server version detection for GaussDB, MogDB and openGauss banners
//! - error classification by SQLSTATE
//! - bulk copy through `COPY ... FROM STDIN` or a caller supplied `INSERT`
//! - the catalog metadata reader from `mogsql-metadata`
//!
//! ```ignore
//! let mut registry = Registry::new();
//! mogsql_driver::register(&mut registry)?;
//! let driver = MogDriver::new(connector);
//! let conn = driver.open(&cx, &mut url, &sinks, &vars).await;
//! ```

pub mod connector;
pub mod copy;
pub mod driver;
pub mod errors;
pub mod handlers;
pub mod types;
pub mod version;

pub use connector::{Connector, Handlers, Notice, Notification};
pub use driver::{INFO, MogDriver, SSLMODE_VAR, register};
pub use errors::{ErrorFields, code_name, error_from_fields};
pub use version::parse_version;
