//! MogReader against a connection that records every statement.

#![allow(clippy::manual_async_fn)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use asupersync::runtime::RuntimeBuilder;
use mogsql_core::metadata::{
    CatalogReader, ColumnReader, ColumnStatReader, Filter, IndexReader, ReaderOptions,
    SchemaReader, TableReader, TriggerReader,
};
use mogsql_core::{
    Connection, Cx, Error, Outcome, PreparedStatement, QueryError, QueryErrorKind, Row,
    TransactionOps, Value,
};
use mogsql_metadata::MogReader;

#[derive(Default)]
struct RecordingConnection {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
    responses: Mutex<VecDeque<Result<Vec<Row>, String>>>,
}

impl RecordingConnection {
    fn respond(self, rows: Vec<Row>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(rows));
        self
    }

    fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

struct NoTransaction;

impl TransactionOps for NoTransaction {
    fn prepare(
        &self,
        _cx: &Cx,
        sql: &str,
    ) -> impl Future<Output = Outcome<PreparedStatement, Error>> + Send {
        let sql = sql.to_string();
        async move { Outcome::Ok(PreparedStatement::new(sql)) }
    }

    fn execute_prepared(
        &self,
        _cx: &Cx,
        _stmt: &PreparedStatement,
        _params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        async { Outcome::Ok(0) }
    }

    fn commit(self, _cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        async { Outcome::Ok(()) }
    }

    fn rollback(self, _cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        async { Outcome::Ok(()) }
    }
}

impl Connection for RecordingConnection {
    type Tx<'conn>
        = NoTransaction
    where
        Self: 'conn;

    fn query(
        &self,
        _cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send {
        self.calls
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));
        let next = self.responses.lock().unwrap().pop_front();
        async move {
            match next {
                None => Outcome::Ok(vec![]),
                Some(Ok(rows)) => Outcome::Ok(rows),
                Some(Err(message)) => Outcome::Err(Error::Query(QueryError {
                    kind: QueryErrorKind::Permission,
                    sql: None,
                    sqlstate: Some("42501".to_string()),
                    severity: Some("ERROR".to_string()),
                    message,
                    detail: None,
                    hint: None,
                    position: None,
                    source: None,
                })),
            }
        }
    }

    fn query_one(
        &self,
        cx: &Cx,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Option<Row>, Error>> + Send {
        let rows = self.query(cx, sql, params);
        async move {
            match rows.await {
                Outcome::Ok(rows) => Outcome::Ok(rows.into_iter().next()),
                Outcome::Err(e) => Outcome::Err(e),
                Outcome::Cancelled(r) => Outcome::Cancelled(r),
                Outcome::Panicked(p) => Outcome::Panicked(p),
            }
        }
    }

    fn execute(
        &self,
        _cx: &Cx,
        _sql: &str,
        _params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send {
        async { Outcome::Ok(0) }
    }

    fn begin(&self, _cx: &Cx) -> impl Future<Output = Outcome<Self::Tx<'_>, Error>> + Send {
        async { Outcome::Ok(NoTransaction) }
    }

    fn prepare(
        &self,
        _cx: &Cx,
        sql: &str,
    ) -> impl Future<Output = Outcome<PreparedStatement, Error>> + Send {
        let sql = sql.to_string();
        async move { Outcome::Ok(PreparedStatement::new(sql)) }
    }

    fn query_prepared(
        &self,
        _cx: &Cx,
        _stmt: &PreparedStatement,
        _params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send {
        async { Outcome::Ok(vec![]) }
    }

    fn ping(&self, _cx: &Cx) -> impl Future<Output = Outcome<(), Error>> + Send {
        async { Outcome::Ok(()) }
    }

    async fn close(self, _cx: &Cx) -> mogsql_core::Result<()> {
        Ok(())
    }
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn table_row(schema: &str, name: &str, rows: i64, comment: Option<&str>) -> Row {
    Row::new(
        ["Schema", "Name", "Type", "Rows", "Size", "Description", "Owner"]
            .map(String::from)
            .to_vec(),
        vec![
            text(schema),
            text(name),
            text("table"),
            Value::BigInt(rows),
            text("16 kB"),
            comment.map_or(Value::Null, text),
            text("omm"),
        ],
    )
}

fn run<F: Future>(f: F) -> F::Output {
    let rt = RuntimeBuilder::current_thread()
        .build()
        .expect("create asupersync runtime");
    rt.block_on(f)
}

fn unwrap<T>(outcome: Outcome<T, Error>) -> T {
    match outcome {
        Outcome::Ok(v) => v,
        Outcome::Err(e) => panic!("unexpected error: {e}"),
        Outcome::Cancelled(_) => panic!("cancelled"),
        Outcome::Panicked(_) => panic!("panicked"),
    }
}

#[test]
fn tables_filter_binds_each_pattern_once() {
    let conn = RecordingConnection::default().respond(vec![table_row("public", "users", 10, None)]);
    let reader = MogReader::new(&conn, ReaderOptions::new());
    let cx = Cx::for_testing();

    let filter = Filter::new().schema("public").name("users%");
    let set = unwrap(run(reader.tables(&cx, &filter)));

    let calls = conn.calls();
    assert_eq!(calls.len(), 1);
    let (sql, params) = &calls[0];
    assert!(sql.contains("\nWHERE n.nspname !~ '^pg_toast' AND c.relkind != 'c' AND "));
    assert!(sql.contains("n.nspname LIKE $1"));
    assert!(sql.contains("c.relname LIKE $2"));
    assert!(!sql.contains("$3"));
    assert!(!sql.contains("LIMIT"));
    assert_eq!(params, &vec![text("public"), text("users%")]);

    assert_eq!(set.len(), 1);
    let t = set.first().unwrap();
    assert_eq!(t.schema, "public");
    assert_eq!(t.rows, 10);
    assert_eq!(t.comment, "");
    assert_eq!(t.owner, "omm");
    assert_eq!(
        set.columns(),
        &["Catalog", "Schema", "Name", "Type", "Owner", "Rows", "Size", "Comment"]
    );
}

#[test]
fn empty_type_list_yields_no_tables() {
    let conn = RecordingConnection::default();
    let reader = MogReader::new(&conn, ReaderOptions::new());
    let cx = Cx::for_testing();

    let filter = Filter::new().types(Vec::<String>::new());
    let set = unwrap(run(reader.tables(&cx, &filter)));

    assert!(set.is_empty());
    let (sql, params) = &conn.calls()[0];
    assert!(sql.contains("c.relkind IN ('')"));
    assert!(params.is_empty());
}

#[test]
fn limit_is_appended_to_every_query() {
    let conn = RecordingConnection::default();
    let reader = MogReader::new(&conn, ReaderOptions::new().limit(5));
    let cx = Cx::for_testing();

    unwrap(run(reader.catalogs(&cx, &Filter::new())));
    unwrap(run(reader.triggers(&cx, &Filter::new().parent("users"))));

    let calls = conn.calls();
    assert!(calls[0].0.starts_with("SELECT d.datname as \"Name\""));
    assert!(calls[0].0.ends_with("FROM pg_catalog.pg_database d\nORDER BY 1\nLIMIT 5"));
    assert!(calls[1].0.contains("c.relname LIKE $1"));
    assert!(calls[1].0.ends_with("\nORDER BY t.tgname\nLIMIT 5"));
}

#[test]
fn column_stats_scale_negative_distinct_by_row_count() {
    let stats_row = Row::new(
        [
            "schemaname", "tablename", "attname", "avg_width", "null_frac", "n_distinct", "min",
            "max", "mcv", "mcf",
        ]
        .map(String::from)
        .to_vec(),
        vec![
            text("public"),
            text("users"),
            text("country"),
            Value::Int(4),
            Value::Float(0.0),
            Value::Double(-0.5),
            text("AR"),
            text("ZW"),
            text("{US,\"New Zealand\"}"),
            text("{0.5,0.25}"),
        ],
    );
    let conn = RecordingConnection::default()
        .respond(vec![table_row("public", "users", 1000, Some("people"))])
        .respond(vec![stats_row]);
    let reader = MogReader::new(&conn, ReaderOptions::new());
    let cx = Cx::for_testing();

    let filter = Filter::new().schema("public").parent("users");
    let set = unwrap(run(reader.column_stats(&cx, &filter)));

    let calls = conn.calls();
    assert_eq!(calls.len(), 2);
    // row count lookup includes system schemas
    assert!(!calls[0].0.contains("NOT IN ('pg_catalog', 'information_schema')"));
    assert_eq!(calls[0].1, vec![text("public"), text("users")]);

    let (sql, params) = &calls[1];
    assert!(sql.contains("ELSE (-n_distinct * $1) END::bigint AS n_distinct"));
    assert!(sql.contains("s.schemaname LIKE $2 AND s.tablename LIKE $3"));
    assert!(sql.ends_with("\nORDER BY a.attnum"));
    assert_eq!(params[0], Value::BigInt(1000));

    let stat = set.first().unwrap();
    assert_eq!(stat.num_distinct, 500);
    assert_eq!(stat.avg_width, 4);
    assert_eq!(stat.top_n, vec!["US".to_string(), "New Zealand".to_string()]);
    assert_eq!(stat.top_n_freqs, vec![0.5, 0.25]);
    assert_eq!(set.columns()[5], "Distinct values");
}

#[test]
fn columns_format_declared_types() {
    let row = |name: &str, ty: &str, size: i64| {
        Row::new(
            (0..12).map(|i| format!("c{i}")).collect(),
            vec![
                text("postgres"),
                text("public"),
                text("users"),
                text(name),
                Value::Int(1),
                text(ty),
                text(""),
                text("YES"),
                Value::Int(i32::try_from(size).unwrap()),
                Value::Int(0),
                Value::Int(10),
                Value::Int(0),
            ],
        )
    };
    let conn = RecordingConnection::default().respond(vec![
        row("nick", "character varying", 0),
        row("email", "character varying", 50),
        row("id", "integer", 32),
    ]);
    let reader = MogReader::new(&conn, ReaderOptions::new());
    let cx = Cx::for_testing();

    let set = unwrap(run(reader.columns(&cx, &Filter::new().parent("users"))));
    let types: Vec<_> = set.iter().map(|c| c.data_type.as_str()).collect();
    assert_eq!(types, ["character varying", "character varying(50)", "integer"]);
    assert!(set.first().unwrap().nullable);

    let (sql, _) = &conn.calls()[0];
    assert!(sql.contains(
        "COALESCE(character_maximum_length, numeric_precision, datetime_precision, interval_precision, 0) AS column_size"
    ));
    assert!(sql.contains("table_name LIKE $1"));
    assert!(sql.contains("table_schema NOT IN ('pg_catalog', 'pg_toast', 'information_schema')"));
}

#[test]
fn index_flags_keep_primary_and_unique_apart() {
    let conn = RecordingConnection::default().respond(vec![Row::new(
        (0..7).map(|i| format!("c{i}")).collect(),
        vec![
            text("postgres"),
            text("public"),
            text("users"),
            text("users_email_key"),
            text("NO"),
            text("YES"),
            text("index"),
        ],
    )]);
    let reader = MogReader::new(&conn, ReaderOptions::new());
    let cx = Cx::for_testing();

    let set = unwrap(run(reader.indexes(&cx, &Filter::new().only_visible(true))));
    let idx = set.first().unwrap();
    assert!(!idx.is_primary);
    assert!(idx.is_unique);
    assert!(conn.calls()[0].0.contains("pg_catalog.pg_table_is_visible(c.oid)"));
}

#[test]
fn schemas_hide_system_schemas_by_default() {
    let conn = RecordingConnection::default();
    let reader = MogReader::new(&conn, ReaderOptions::new());
    let cx = Cx::for_testing();

    unwrap(run(reader.schemas(&cx, &Filter::new())));
    unwrap(run(reader.schemas(&cx, &Filter::new().with_system(true).name("app%"))));

    let calls = conn.calls();
    assert!(calls[0].0.contains(
        "\nWHERE schema_name NOT IN ('pg_catalog', 'pg_toast', 'information_schema')\nORDER BY catalog_name, schema_name"
    ));
    assert!(calls[1].0.contains("\nWHERE schema_name LIKE $1\nORDER BY"));
}

#[test]
fn query_errors_propagate_unchanged() {
    let conn = RecordingConnection::default().fail("permission denied for relation pg_stats");
    let reader = MogReader::new(&conn, ReaderOptions::new());
    let cx = Cx::for_testing();

    match run(reader.tables(&cx, &Filter::new())) {
        Outcome::Err(e) => {
            assert_eq!(e.sqlstate(), Some("42501"));
            assert_eq!(e.server_message(), Some("permission denied for relation pg_stats"));
        }
        _ => panic!("expected error"),
    }
}
