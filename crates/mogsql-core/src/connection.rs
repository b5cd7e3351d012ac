//! The wire-client contract a driver builds on.
//!
//! A driver never speaks the protocol itself: it borrows a [`Connection`]
//! for catalog queries and bulk loads, and opens a [`TransactionOps`] around
//! each load. Every call takes the caller's `Cx` so a cancelled command stops
//! at the next round trip.

use crate::error::Result;
use crate::row::Row;
use crate::value::Value;
use asupersync::{Cx, Outcome};
use std::future::Future;

/// A statement parsed by the server, with the result columns it described.
///
/// Bulk copy learns a table's columns by preparing `SELECT ... WHERE 1=0`
/// and reading them from here, before any row comes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedStatement {
    sql: String,
    columns: Option<Vec<String>>,
}

impl PreparedStatement {
    /// A statement whose result shape the server did not describe.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            columns: None,
        }
    }

    #[must_use]
    pub fn with_columns(sql: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            columns: Some(columns),
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Result column names, when the server described them.
    #[must_use]
    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }
}

/// An open session on the server.
pub trait Connection: Send + Sync {
    type Tx<'conn>: TransactionOps
    where
        Self: 'conn;

    /// Run `sql` with `$n` parameters and collect every row.
    fn query(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, crate::Error>> + Send;

    /// The first row of `query`, if there is one.
    fn query_one(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Option<Row>, crate::Error>> + Send {
        async move {
            match self.query(cx, sql, params).await {
                Outcome::Ok(rows) => Outcome::Ok(rows.into_iter().next()),
                Outcome::Err(e) => Outcome::Err(e),
                Outcome::Cancelled(r) => Outcome::Cancelled(r),
                Outcome::Panicked(p) => Outcome::Panicked(p),
            }
        }
    }

    /// Run a statement and report the rows it affected.
    fn execute(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, crate::Error>> + Send;

    fn begin(&self, cx: &Cx) -> impl Future<Output = Outcome<Self::Tx<'_>, crate::Error>> + Send;

    fn prepare(
        &self,
        cx: &Cx,
        sql: &str,
    ) -> impl Future<Output = Outcome<PreparedStatement, crate::Error>> + Send;

    fn query_prepared(
        &self,
        cx: &Cx,
        stmt: &PreparedStatement,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, crate::Error>> + Send;

    /// One round trip. A server that refuses SSL may only say so here.
    fn ping(&self, cx: &Cx) -> impl Future<Output = Outcome<(), crate::Error>> + Send;

    fn close(self, cx: &Cx) -> impl Future<Output = Result<()>> + Send;
}

/// A transaction a bulk load runs in.
///
/// A `COPY ... FROM STDIN` statement prepared here takes one row per
/// `execute_prepared` call and is flushed by a final call with no
/// parameters, which reports the rows the server stored. `Sync` because the
/// load holds `&self` across awaits.
pub trait TransactionOps: Send + Sync {
    fn prepare(
        &self,
        cx: &Cx,
        sql: &str,
    ) -> impl Future<Output = Outcome<PreparedStatement, crate::Error>> + Send;

    fn execute_prepared(
        &self,
        cx: &Cx,
        stmt: &PreparedStatement,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, crate::Error>> + Send;

    fn commit(self, cx: &Cx) -> impl Future<Output = Outcome<(), crate::Error>> + Send;

    fn rollback(self, cx: &Cx) -> impl Future<Output = Outcome<(), crate::Error>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn described_columns() {
        let stmt = PreparedStatement::new("COPY \"t\" (\"a\") FROM STDIN");
        assert!(stmt.columns().is_none());

        let stmt = PreparedStatement::with_columns(
            "SELECT * FROM t WHERE 1=0",
            vec!["id".to_string(), "name".to_string()],
        );
        assert_eq!(stmt.sql(), "SELECT * FROM t WHERE 1=0");
        assert_eq!(
            stmt.columns(),
            Some(&["id".to_string(), "name".to_string()][..])
        );
    }
}
