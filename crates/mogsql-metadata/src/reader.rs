//! Metadata reader for MogDB / openGauss system catalogs.

use mogsql_core::metadata::{
    CatalogInfo, CatalogReader, ColumnInfo, ColumnReader, ColumnStatInfo, ColumnStatReader,
    Filter, IndexColumnInfo, IndexColumnReader, IndexInfo, IndexReader, ReaderOptions, Record,
    ResultSet, SchemaInfo, SchemaReader, TableInfo, TableReader, TriggerInfo, TriggerReader,
};
use mogsql_core::{Connection, Cx, Error, Outcome, Result, Row, TypeError};

use crate::format;
use crate::query::Query;
use crate::sql;

/// Reads catalog metadata over a borrowed connection.
///
/// Every query is built from the filter it is given, logged at debug level
/// and run once; nothing is cached between calls.
#[derive(Debug)]
pub struct MogReader<'c, C> {
    conn: &'c C,
    limit: u64,
}

impl<'c, C: Connection> MogReader<'c, C> {
    pub fn new(conn: &'c C, opts: ReaderOptions) -> Self {
        Self {
            conn,
            limit: opts.limit,
        }
    }

    /// Row limit applied to every query; 0 means unlimited.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn connection(&self) -> &'c C {
        self.conn
    }

    async fn fetch<T: Record>(
        &self,
        cx: &Cx,
        query: Query,
        scan: impl Fn(&Row) -> Result<T> + Send,
    ) -> Outcome<ResultSet<T>, Error> {
        let sql = query.sql(self.limit);
        let params = query.into_params();
        tracing::debug!(sql = %sql, params = params.len(), "metadata query");

        let rows = match self.conn.query(cx, &sql, &params).await {
            Outcome::Ok(rows) => rows,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match scan(row) {
                Ok(rec) => records.push(rec),
                Err(e) => return Outcome::Err(e),
            }
        }
        tracing::trace!(rows = records.len(), "metadata query complete");
        Outcome::Ok(ResultSet::new(records))
    }
}

fn scan_catalog(row: &Row) -> Result<CatalogInfo> {
    Ok(CatalogInfo {
        name: row.get_text(0)?,
        owner: row.get_text(1)?,
        encoding: row.get_text(2)?,
        collate: row.get_text(3)?,
        ctype: row.get_text(4)?,
        access_privileges: row.get_text(5)?,
        compatibility: row.get_text(6)?,
    })
}

fn scan_schema(row: &Row) -> Result<SchemaInfo> {
    Ok(SchemaInfo {
        name: row.get_text(0)?,
        catalog: row.get_text(1)?,
        owner: row.get_text(2)?,
    })
}

fn scan_table(row: &Row) -> Result<TableInfo> {
    Ok(TableInfo {
        catalog: String::new(),
        schema: row.get_text(0)?,
        name: row.get_text(1)?,
        kind: row.get_text(2)?,
        rows: row.get_as::<Option<i64>>(3)?.unwrap_or_default(),
        size: row.get_text(4)?,
        comment: row.get_text(5)?,
        owner: row.get_text(6)?,
    })
}

fn scan_column(row: &Row) -> Result<ColumnInfo> {
    let raw_type = row.get_text(5)?;
    let column_size = row.get_as::<Option<i64>>(8)?.unwrap_or_default();
    let decimal_digits = row.get_as::<Option<i64>>(9)?.unwrap_or_default();
    Ok(ColumnInfo {
        catalog: row.get_text(0)?,
        schema: row.get_text(1)?,
        table: row.get_text(2)?,
        name: row.get_text(3)?,
        ordinal_position: row.get_as(4)?,
        data_type: format::data_type(&raw_type, column_size, decimal_digits),
        default: row.get_text(6)?,
        nullable: row.get_text(7)? == "YES",
        column_size,
        decimal_digits,
        radix: row.get_as::<Option<i64>>(10)?.unwrap_or(10),
        octet_length: row.get_as::<Option<i64>>(11)?.unwrap_or_default(),
    })
}

/// Turn a distinct-value statistic into an absolute count.
///
/// The server stores `-f` for "a fraction `f` of all rows"; the stats query
/// already scales it, so this only matters for raw values.
#[allow(clippy::cast_possible_truncation)]
pub fn scale_distinct(raw: f64, total_rows: i64) -> i64 {
    if raw >= 0.0 {
        raw.round() as i64
    } else {
        (-raw * total_rows as f64).round() as i64
    }
}

fn parse_freqs(items: Vec<String>) -> Result<Vec<f64>> {
    items
        .into_iter()
        .map(|s| {
            s.trim().parse::<f64>().map_err(|_| {
                Error::Type(TypeError {
                    expected: "f64",
                    actual: s.clone(),
                    column: Some("most_common_freqs".to_string()),
                    rust_type: Some("f64"),
                })
            })
        })
        .collect()
}

fn scan_column_stat(row: &Row, total_rows: i64) -> Result<ColumnStatInfo> {
    let raw_distinct = row.get_as::<Option<f64>>(5)?.unwrap_or_default();
    Ok(ColumnStatInfo {
        schema: row.get_text(0)?,
        table: row.get_text(1)?,
        name: row.get_text(2)?,
        avg_width: row.get_as::<Option<i64>>(3)?.unwrap_or_default(),
        null_frac: row.get_as::<Option<f64>>(4)?.unwrap_or_default(),
        num_distinct: scale_distinct(raw_distinct, total_rows),
        min: row.get_text(6)?,
        max: row.get_text(7)?,
        top_n: row.get_as::<Option<Vec<String>>>(8)?.unwrap_or_default(),
        top_n_freqs: parse_freqs(row.get_as::<Option<Vec<String>>>(9)?.unwrap_or_default())?,
    })
}

fn yes(row: &Row, index: usize) -> Result<bool> {
    Ok(row.get_text(index)? == "YES")
}

fn scan_index(row: &Row) -> Result<IndexInfo> {
    Ok(IndexInfo {
        catalog: row.get_text(0)?,
        schema: row.get_text(1)?,
        table: row.get_text(2)?,
        name: row.get_text(3)?,
        is_primary: yes(row, 4)?,
        is_unique: yes(row, 5)?,
        kind: row.get_text(6)?,
    })
}

fn scan_index_column(row: &Row) -> Result<IndexColumnInfo> {
    Ok(IndexColumnInfo {
        catalog: row.get_text(0)?,
        schema: row.get_text(1)?,
        table: row.get_text(2)?,
        index_name: row.get_text(3)?,
        name: row.get_text(4)?,
        data_type: row.get_text(5)?,
        ordinal_position: row.get_as(6)?,
    })
}

fn scan_trigger(row: &Row) -> Result<TriggerInfo> {
    Ok(TriggerInfo {
        schema: row.get_text(0)?,
        table: row.get_text(1)?,
        name: row.get_text(2)?,
        definition: row.get_text(3)?,
    })
}

fn tables_query(filter: &Filter) -> Query {
    let mut q = Query::new(sql::TABLES);
    q.cond(sql::NOT_COMPOSITE)
        .cond_if(filter.only_visible, sql::TABLE_IS_VISIBLE)
        .cond_if(!filter.with_system, sql::NOT_SYSTEM_NAMESPACE)
        .like("n.nspname", &filter.schema)
        .like("c.relname", &filter.name);
    if let Some(types) = &filter.types {
        let kinds = types.iter().flat_map(|t| sql::relkinds(t).iter().copied());
        q.in_list("c.relkind", kinds);
    }
    q.order_by("1, 3, 2");
    q
}

impl<C: Connection> CatalogReader for MogReader<'_, C> {
    async fn catalogs(&self, cx: &Cx, filter: &Filter) -> Outcome<ResultSet<CatalogInfo>, Error> {
        let mut q = Query::new(sql::CATALOGS);
        q.like("d.datname", &filter.name).order_by("1");
        self.fetch(cx, q, scan_catalog).await
    }
}

impl<C: Connection> SchemaReader for MogReader<'_, C> {
    async fn schemas(&self, cx: &Cx, filter: &Filter) -> Outcome<ResultSet<SchemaInfo>, Error> {
        let mut q = Query::new(sql::SCHEMAS);
        q.like("catalog_name", &filter.catalog)
            .like("schema_name", &filter.name);
        if !filter.with_system {
            q.not_in_literals("schema_name", sql::SYSTEM_SCHEMAS);
        }
        q.order_by("catalog_name, schema_name");
        self.fetch(cx, q, scan_schema).await
    }
}

impl<C: Connection> TableReader for MogReader<'_, C> {
    async fn tables(&self, cx: &Cx, filter: &Filter) -> Outcome<ResultSet<TableInfo>, Error> {
        self.fetch(cx, tables_query(filter), scan_table).await
    }
}

impl<C: Connection> ColumnReader for MogReader<'_, C> {
    async fn columns(&self, cx: &Cx, filter: &Filter) -> Outcome<ResultSet<ColumnInfo>, Error> {
        let mut q = Query::new(sql::COLUMNS);
        q.like("table_catalog", &filter.catalog)
            .like("table_schema", &filter.schema)
            .like("table_name", &filter.parent)
            .like("column_name", &filter.name)
            .cond_if(
                filter.only_visible,
                &format!("table_schema = {}", sql::CURRENT_SCHEMA),
            );
        if !filter.with_system {
            q.not_in_literals("table_schema", sql::SYSTEM_SCHEMAS);
        }
        q.order_by("table_catalog, table_schema, table_name, ordinal_position");
        self.fetch(cx, q, scan_column).await
    }
}

impl<C: Connection> ColumnStatReader for MogReader<'_, C> {
    async fn column_stats(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> Outcome<ResultSet<ColumnStatInfo>, Error> {
        let owner = Filter::new()
            .schema(filter.schema.clone())
            .name(filter.parent.clone())
            .with_system(true);
        let tables = match self.tables(cx, &owner).await {
            Outcome::Ok(set) => set,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        };
        let total_rows = tables.first().map_or(0, |t| t.rows);

        let mut q = Query::new(sql::COLUMN_STATS);
        q.bind(total_rows);
        q.like("s.schemaname", &filter.schema)
            .like("s.tablename", &filter.parent)
            .like("s.attname", &filter.name)
            .order_by("a.attnum");

        tracing::debug!(total_rows, "scaling distinct values by table rows");
        self.fetch(cx, q, move |row| scan_column_stat(row, total_rows))
            .await
    }
}

impl<C: Connection> IndexReader for MogReader<'_, C> {
    async fn indexes(&self, cx: &Cx, filter: &Filter) -> Outcome<ResultSet<IndexInfo>, Error> {
        let mut q = Query::new(sql::INDEXES);
        q.cond(sql::INDEX_KINDS)
            .cond(sql::NOT_TOAST)
            .cond_if(filter.only_visible, sql::TABLE_IS_VISIBLE)
            .cond_if(!filter.with_system, sql::NOT_SYSTEM_NAMESPACE)
            .like("n.nspname", &filter.schema)
            .like("c2.relname", &filter.parent)
            .like("c.relname", &filter.name)
            .order_by("1, 2, 4");
        self.fetch(cx, q, scan_index).await
    }
}

impl<C: Connection> IndexColumnReader for MogReader<'_, C> {
    async fn index_columns(
        &self,
        cx: &Cx,
        filter: &Filter,
    ) -> Outcome<ResultSet<IndexColumnInfo>, Error> {
        let mut q = Query::new(sql::INDEX_COLUMNS);
        q.cond(sql::INDEX_KINDS)
            .cond("n.nspname <> 'pg_catalog'")
            .cond("n.nspname <> 'information_schema'")
            .cond(sql::NOT_TOAST)
            .cond("a.attnum > 0")
            .cond("NOT a.attisdropped")
            .cond_if(filter.only_visible, sql::TABLE_IS_VISIBLE);
        if !filter.with_system {
            q.not_in_literals("n.nspname", sql::SYSTEM_SCHEMAS);
        }
        q.like("n.nspname", &filter.schema)
            .like("c2.relname", &filter.parent)
            .like("c.relname", &filter.name)
            .order_by("1, 2, 3, 4, 7");
        self.fetch(cx, q, scan_index_column).await
    }
}

impl<C: Connection> TriggerReader for MogReader<'_, C> {
    async fn triggers(&self, cx: &Cx, filter: &Filter) -> Outcome<ResultSet<TriggerInfo>, Error> {
        let mut q = Query::new(sql::TRIGGERS);
        q.cond(sql::TRIGGERS_VISIBLE)
            .like("n.nspname", &filter.schema)
            .like("c.relname", &filter.parent)
            .like("t.tgname", &filter.name)
            .order_by("t.tgname");
        self.fetch(cx, q, scan_trigger).await
    }
}
