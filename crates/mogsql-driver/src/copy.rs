//! Bulk copy of rows into a table.
//!
//! The target is one of:
//!
//! - a table name: columns are looked up and rows are streamed with `COPY`
//! - `table(col, ...)`: as above, restricted to the listed columns
//! - a complete `INSERT INTO ...` statement, executed once per row
//!
//! Everything after the column lookup runs in a single transaction that is
//! rolled back if any step fails.

use mogsql_core::{
    Connection, CopyError, CopyStage, Cx, Error, Outcome, PreparedStatement, Row, TransactionOps,
    TypeError,
};

use crate::types;

/// What a copy target resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    Insert(String),
    /// Table name and the query that reports its columns
    Table { table: String, column_query: String },
}

impl Target {
    pub(crate) fn parse(target: &str) -> Self {
        if target.to_lowercase().starts_with("insert into") {
            return Target::Insert(target.to_string());
        }
        match target.find('(') {
            Some(open) => {
                let table = &target[..open];
                let cols = target[open + 1..].strip_suffix(')').unwrap_or(&target[open + 1..]);
                Target::Table {
                    table: table.to_string(),
                    column_query: format!("SELECT {cols} FROM {table} WHERE 1=0"),
                }
            }
            None => Target::Table {
                table: target.to_string(),
                column_query: format!("SELECT * FROM {target} WHERE 1=0"),
            },
        }
    }
}

fn failed(stage: CopyStage, copied: u64, source: Error) -> Error {
    Error::Copy(CopyError {
        stage,
        copied,
        source: Box::new(source),
    })
}

macro_rules! stage {
    ($stage:expr, $copied:expr, $e:expr) => {
        match $e {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(failed($stage, $copied, e)),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        }
    };
}

/// Build the statement rows are fed to.
async fn statement_for<C: Connection>(cx: &Cx, conn: &C, target: Target) -> Outcome<String, Error> {
    let (table, column_query) = match target {
        Target::Insert(sql) => return Outcome::Ok(sql),
        Target::Table {
            table,
            column_query,
        } => (table, column_query),
    };

    let stmt = stage!(
        CopyStage::PrepareColumns,
        0,
        conn.prepare(cx, &column_query).await
    );
    let rows = stage!(
        CopyStage::QueryColumns,
        0,
        conn.query_prepared(cx, &stmt, &[]).await
    );

    let columns: Vec<String> = match (stmt.columns(), rows.first()) {
        (Some(cols), _) if !cols.is_empty() => cols.to_vec(),
        (_, Some(row)) => row.column_names().map(str::to_string).collect(),
        _ => {
            return Outcome::Err(failed(
                CopyStage::FetchColumns,
                0,
                Error::Custom(format!("no columns reported for {column_query:?}")),
            ));
        }
    };

    Outcome::Ok(types::copy_in(&table, &columns))
}

/// Copy `rows` into `target` and return the number of rows copied.
///
/// On failure the error is an [`Error::Copy`] naming the failed step and the
/// number of rows copied before it.
pub async fn copy_rows<C: Connection>(
    cx: &Cx,
    conn: &C,
    rows: &[Row],
    target: &str,
) -> Outcome<u64, Error> {
    let target = Target::parse(target);
    let streaming = matches!(target, Target::Table { .. });
    let sql = match statement_for(cx, conn, target).await {
        Outcome::Ok(sql) => sql,
        Outcome::Err(e) => return Outcome::Err(e),
        Outcome::Cancelled(r) => return Outcome::Cancelled(r),
        Outcome::Panicked(p) => return Outcome::Panicked(p),
    };
    tracing::trace!(sql = %sql, rows = rows.len(), "starting bulk copy");

    let tx = stage!(CopyStage::Begin, 0, conn.begin(cx).await);
    match feed(cx, &tx, &sql, rows, streaming).await {
        Outcome::Ok(copied) => match tx.commit(cx).await {
            Outcome::Ok(()) => {
                tracing::trace!(copied, "bulk copy committed");
                Outcome::Ok(copied)
            }
            Outcome::Err(e) => Outcome::Err(failed(CopyStage::Commit, copied, e)),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        },
        failure => {
            if let Outcome::Err(e) = tx.rollback(cx).await {
                tracing::warn!(error = %e, "bulk copy rollback failed");
            }
            failure
        }
    }
}

async fn feed<T: TransactionOps>(
    cx: &Cx,
    tx: &T,
    sql: &str,
    rows: &[Row],
    streaming: bool,
) -> Outcome<u64, Error> {
    let stmt: PreparedStatement = stage!(CopyStage::Prepare, 0, tx.prepare(cx, sql).await);
    let width = rows.first().map_or(0, Row::len);

    let mut copied = 0u64;
    for row in rows {
        if row.len() != width {
            return Outcome::Err(failed(
                CopyStage::Scan,
                copied,
                Error::Type(TypeError {
                    expected: "row with the source column count",
                    actual: format!("{} values, expected {}", row.len(), width),
                    column: None,
                    rust_type: None,
                }),
            ));
        }
        stage!(
            CopyStage::Exec,
            copied,
            tx.execute_prepared(cx, &stmt, row.as_params()).await
        );
        copied += 1;
        if copied % 10_000 == 0 {
            tracing::trace!(copied, "bulk copy progress");
        }
    }

    if streaming {
        let flushed = stage!(
            CopyStage::FinalExec,
            copied,
            tx.execute_prepared(cx, &stmt, &[]).await
        );
        if flushed > 0 {
            copied = flushed;
        }
    }
    Outcome::Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_forms() {
        assert_eq!(
            Target::parse("INSERT INTO t VALUES ($1)"),
            Target::Insert("INSERT INTO t VALUES ($1)".to_string())
        );
        assert_eq!(
            Target::parse("public.users"),
            Target::Table {
                table: "public.users".to_string(),
                column_query: "SELECT * FROM public.users WHERE 1=0".to_string(),
            }
        );
        assert_eq!(
            Target::parse("users(id, name)"),
            Target::Table {
                table: "users".to_string(),
                column_query: "SELECT id, name FROM users WHERE 1=0".to_string(),
            }
        );
    }
}
