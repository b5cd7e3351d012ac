//! The driver contract and the registry drivers are published in.

use asupersync::{Cx, Outcome};
use std::collections::HashMap;
use std::future::Future;
use std::io::Write;

use crate::connection::Connection;
use crate::error::{ConfigError, Error, Result};
use crate::metadata::{DefaultWriter, Reader, ReaderOptions};
use crate::output::OutputSinks;
use crate::row::Row;
use crate::url::DbUrl;
use crate::vars::Vars;

/// Static facts about a driver: how it is named and how its SQL is lexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    /// Canonical name, matched against URL schemes
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// `$$ ... $$` quoting is valid
    pub allow_dollar: bool,
    /// `/* ... */` comments may span lines
    pub allow_multiline_comments: bool,
    /// Syntax highlighting lexer
    pub lexer_name: &'static str,
}

/// A database driver.
///
/// Every hook the host calls for a connection URL whose scheme names this
/// driver. Hooks with a default are optional.
pub trait Driver: Send + Sync {
    type Conn: Connection + 'static;

    /// Metadata reader over a borrowed connection.
    type Reader<'c>: Reader
    where
        Self: 'c;

    fn info(&self) -> &DriverInfo;

    /// Adjust URL parameters before the DSN is used.
    fn force_params(&self, _url: &mut DbUrl) {}

    /// Open a connection for `url`.
    ///
    /// The driver may rewrite `url.dsn` when the connection it returns was
    /// opened with different settings than requested.
    fn open(
        &self,
        cx: &Cx,
        url: &mut DbUrl,
        sinks: &OutputSinks,
        vars: &Vars,
    ) -> impl Future<Output = Outcome<Self::Conn, Error>> + Send;

    /// Human readable server product and version.
    fn version(
        &self,
        cx: &Cx,
        conn: &Self::Conn,
    ) -> impl Future<Output = Outcome<String, Error>> + Send;

    /// Change `user`'s password.
    fn change_password(
        &self,
        cx: &Cx,
        conn: &Self::Conn,
        user: &str,
        new_password: &str,
        old_password: &str,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// Split an error into a `(code, message)` pair for display.
    fn err(&self, err: &Error) -> (String, String) {
        (String::new(), err.to_string())
    }

    /// Did authentication fail because of a bad password?
    fn is_password_err(&self, _err: &Error) -> bool {
        false
    }

    /// Copy `rows` into `table` and return the number of rows copied.
    ///
    /// `table` is either a table name, a `table(col, ...)` expression, or a
    /// complete `INSERT INTO` statement with one placeholder per column.
    fn copy(
        &self,
        cx: &Cx,
        conn: &Self::Conn,
        rows: &[Row],
        table: &str,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;

    fn new_metadata_reader<'c>(&self, conn: &'c Self::Conn, opts: ReaderOptions) -> Self::Reader<'c>
    where
        Self: 'c;

    fn new_metadata_writer<'c, W: Write + Send>(
        &self,
        conn: &'c Self::Conn,
        out: W,
        opts: ReaderOptions,
    ) -> DefaultWriter<Self::Reader<'c>, W>
    where
        Self: 'c,
    {
        DefaultWriter::new(self.new_metadata_reader(conn, opts), out)
    }
}

/// Registered drivers, looked up by name or alias.
#[derive(Debug, Default)]
pub struct Registry {
    drivers: Vec<DriverInfo>,
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a driver. Fails if its name or any alias is already taken.
    #[allow(clippy::result_large_err)]
    pub fn register(&mut self, info: DriverInfo) -> Result<()> {
        let names = std::iter::once(info.name).chain(info.aliases.iter().copied());
        for name in names.clone() {
            if self.by_name.contains_key(name) {
                return Err(Error::Config(ConfigError {
                    message: format!("driver {name:?} is already registered"),
                    source: None,
                }));
            }
        }
        let idx = self.drivers.len();
        for name in names {
            self.by_name.insert(name, idx);
        }
        tracing::debug!(driver = info.name, aliases = ?info.aliases, "registered driver");
        self.drivers.push(info);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DriverInfo> {
        self.by_name.get(name).map(|&i| &self.drivers[i])
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DriverInfo> {
        self.drivers.iter()
    }
}
