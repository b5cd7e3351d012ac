//! The `mogdb` driver.

use mogsql_core::metadata::ReaderOptions;
use mogsql_core::{
    Connection, Cx, DbUrl, Driver, DriverInfo, Error, Outcome, OutputSinks, Registry, Result,
    Row, Vars,
};
use mogsql_metadata::MogReader;

use crate::connector::Connector;
use crate::{copy, errors, handlers, types, version};

/// Registration facts for MogDB.
pub const INFO: DriverInfo = DriverInfo {
    name: "mogdb",
    aliases: &["mg"],
    allow_dollar: true,
    allow_multiline_comments: true,
    lexer_name: "mogdb",
};

/// Host variable selecting the SSL retry behaviour.
pub const SSLMODE_VAR: &str = "SSLMODE";

/// MogDB / openGauss driver over a wire client `K`.
#[derive(Debug)]
pub struct MogDriver<K> {
    connector: K,
    info: DriverInfo,
}

impl<K: Connector> MogDriver<K> {
    pub fn new(connector: K) -> Self {
        Self {
            connector,
            info: INFO,
        }
    }

    pub fn connector(&self) -> &K {
        &self.connector
    }

    async fn connect(&self, cx: &Cx, dsn: &str, sinks: &OutputSinks) -> Outcome<K::Conn, Error> {
        self.connector
            .connect(cx, dsn, handlers::printing(sinks))
            .await
    }

    /// Connect again with SSL disabled and record the DSN that worked.
    async fn reopen_without_ssl(
        &self,
        cx: &Cx,
        url: &mut DbUrl,
        dsn: &str,
        sinks: &OutputSinks,
    ) -> Outcome<K::Conn, Error> {
        let plain = format!("sslmode=disable {dsn}");
        tracing::info!(host = %url.host, "server does not support SSL, reconnecting without it");
        match self.connect(cx, &plain, sinks).await {
            Outcome::Ok(conn) => {
                url.dsn = plain;
                Outcome::Ok(conn)
            }
            other => other,
        }
    }
}

/// Add the MogDB driver to `registry`.
#[allow(clippy::result_large_err)]
pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register(INFO)
}

/// Retry without SSL when the host asked for it and the URL left `sslmode`
/// to the default.
fn wants_ssl_retry(url: &DbUrl, vars: &Vars) -> bool {
    vars.get(SSLMODE_VAR) == Some("retry") && !url.has_query("sslmode")
}

impl<K: Connector> Driver for MogDriver<K> {
    type Conn = K::Conn;
    type Reader<'c>
        = MogReader<'c, K::Conn>
    where
        Self: 'c;

    fn info(&self) -> &DriverInfo {
        &self.info
    }

    fn force_params(&self, url: &mut DbUrl) {
        if !url.has_query("sslmode") {
            url.force_query("sslmode", "disable");
        }
    }

    async fn open(
        &self,
        cx: &Cx,
        url: &mut DbUrl,
        sinks: &OutputSinks,
        vars: &Vars,
    ) -> Outcome<Self::Conn, Error> {
        if let Err(e) = url.ssl_mode() {
            return Outcome::Err(e);
        }
        let dsn = url.dsn.clone();
        let retry = wants_ssl_retry(url, vars);

        // A client may refuse SSL while connecting or only on first use.
        let first = self.connect(cx, &dsn, sinks).await;
        let conn = match first {
            Outcome::Ok(conn) => conn,
            Outcome::Err(e) if retry && e.is_ssl_not_supported() => {
                return self.reopen_without_ssl(cx, url, &dsn, sinks).await;
            }
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };
        if !retry {
            return Outcome::Ok(conn);
        }

        let pinged = conn.ping(cx).await;
        match pinged {
            Outcome::Ok(()) => Outcome::Ok(conn),
            Outcome::Err(e) if e.is_ssl_not_supported() => {
                if let Err(e) = conn.close(cx).await {
                    tracing::debug!(error = %e, "closing rejected connection");
                }
                self.reopen_without_ssl(cx, url, &dsn, sinks).await
            }
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    async fn version(&self, cx: &Cx, conn: &Self::Conn) -> Outcome<String, Error> {
        let row = match conn.query_one(cx, "select version()", &[]).await {
            Outcome::Ok(Some(row)) => row,
            Outcome::Ok(None) => {
                return Outcome::Err(Error::Custom("select version() returned no rows".to_string()));
            }
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };
        match row.get_as::<String>(0) {
            Ok(banner) => Outcome::Ok(version::display_version(&banner)),
            Err(e) => Outcome::Err(e),
        }
    }

    async fn change_password(
        &self,
        cx: &Cx,
        conn: &Self::Conn,
        user: &str,
        new_password: &str,
        _old_password: &str,
    ) -> Outcome<(), Error> {
        let sql = format!(
            "ALTER USER {} PASSWORD {}",
            user,
            types::quote_literal(new_password)
        );
        match conn.execute(cx, &sql, &[]).await {
            Outcome::Ok(_) => Outcome::Ok(()),
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    fn err(&self, err: &Error) -> (String, String) {
        errors::classify(err)
    }

    fn is_password_err(&self, err: &Error) -> bool {
        errors::is_password_error(err)
    }

    async fn copy(
        &self,
        cx: &Cx,
        conn: &Self::Conn,
        rows: &[Row],
        table: &str,
    ) -> Outcome<u64, Error> {
        copy::copy_rows(cx, conn, rows, table).await
    }

    fn new_metadata_reader<'c>(&self, conn: &'c Self::Conn, opts: ReaderOptions) -> Self::Reader<'c>
    where
        Self: 'c,
    {
        MogReader::new(conn, opts)
    }
}
