//! Metadata records, one per catalog row.

use serde::Serialize;

use crate::value::Value;

/// A metadata record with a fixed display ordering.
pub trait Record {
    /// Column names used when the result set does not supply its own.
    const COLUMNS: &'static [&'static str];

    /// Values in display order, matching `COLUMNS`.
    fn values(&self) -> Vec<Value>;
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn yes_no(b: bool) -> Value {
    text(if b { "YES" } else { "NO" })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogInfo {
    pub name: String,
    pub owner: String,
    pub encoding: String,
    pub collate: String,
    pub ctype: String,
    pub access_privileges: String,
    pub compatibility: String,
}

impl Record for CatalogInfo {
    const COLUMNS: &'static [&'static str] = &[
        "Catalog",
        "Owner",
        "Encoding",
        "Collate",
        "Ctype",
        "Access privileges",
        "DatCompatibility",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.name),
            text(&self.owner),
            text(&self.encoding),
            text(&self.collate),
            text(&self.ctype),
            text(&self.access_privileges),
            text(&self.compatibility),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaInfo {
    pub name: String,
    pub catalog: String,
    pub owner: String,
}

impl Record for SchemaInfo {
    const COLUMNS: &'static [&'static str] = &["Schema", "Catalog", "Owner"];

    fn values(&self) -> Vec<Value> {
        vec![text(&self.name), text(&self.catalog), text(&self.owner)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub catalog: String,
    pub schema: String,
    pub name: String,
    /// `table`, `view`, `materialized view`, ... as reported by the server
    pub kind: String,
    pub owner: String,
    /// Estimated row count
    pub rows: i64,
    /// Human readable size, e.g. `16 kB`
    pub size: String,
    pub comment: String,
}

impl Record for TableInfo {
    const COLUMNS: &'static [&'static str] = &[
        "Catalog", "Schema", "Name", "Type", "Owner", "Rows", "Size", "Comment",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.catalog),
            text(&self.schema),
            text(&self.name),
            text(&self.kind),
            text(&self.owner),
            Value::BigInt(self.rows),
            text(&self.size),
            text(&self.comment),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub name: String,
    pub ordinal_position: i64,
    /// Display type, e.g. `character varying(50)`
    pub data_type: String,
    pub default: String,
    pub nullable: bool,
    pub column_size: i64,
    pub decimal_digits: i64,
    pub radix: i64,
    pub octet_length: i64,
}

impl Record for ColumnInfo {
    const COLUMNS: &'static [&'static str] = &[
        "Catalog",
        "Schema",
        "Table",
        "Name",
        "Type",
        "Nullable",
        "Default",
        "Size",
        "Decimal Digits",
        "Radix",
        "Octet Length",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.catalog),
            text(&self.schema),
            text(&self.table),
            text(&self.name),
            text(&self.data_type),
            yes_no(self.nullable),
            text(&self.default),
            Value::BigInt(self.column_size),
            Value::BigInt(self.decimal_digits),
            Value::BigInt(self.radix),
            Value::BigInt(self.octet_length),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnStatInfo {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub avg_width: i64,
    pub null_frac: f64,
    /// Absolute distinct-value estimate
    pub num_distinct: i64,
    pub min: String,
    pub max: String,
    pub top_n: Vec<String>,
    pub top_n_freqs: Vec<f64>,
}

impl Record for ColumnStatInfo {
    const COLUMNS: &'static [&'static str] = &[
        "Schema",
        "Table",
        "Name",
        "Average width",
        "Nulls fraction",
        "Distinct values",
        "Min value",
        "Max value",
        "Most common values",
        "Most common frequencies",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.schema),
            text(&self.table),
            text(&self.name),
            Value::BigInt(self.avg_width),
            Value::Double(self.null_frac),
            Value::BigInt(self.num_distinct),
            text(&self.min),
            text(&self.max),
            Value::from(self.top_n.clone()),
            Value::Array(self.top_n_freqs.iter().copied().map(Value::Double).collect()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub name: String,
    pub is_primary: bool,
    pub is_unique: bool,
    pub kind: String,
}

impl Record for IndexInfo {
    const COLUMNS: &'static [&'static str] = &[
        "Catalog",
        "Schema",
        "Table",
        "Name",
        "Is primary",
        "Is unique",
        "Type",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.catalog),
            text(&self.schema),
            text(&self.table),
            text(&self.name),
            yes_no(self.is_primary),
            yes_no(self.is_unique),
            text(&self.kind),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexColumnInfo {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub index_name: String,
    pub name: String,
    pub data_type: String,
    pub ordinal_position: i64,
}

impl Record for IndexColumnInfo {
    const COLUMNS: &'static [&'static str] = &[
        "Catalog",
        "Schema",
        "Table",
        "Index name",
        "Name",
        "Data type",
        "Ordinal position",
    ];

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.catalog),
            text(&self.schema),
            text(&self.table),
            text(&self.index_name),
            text(&self.name),
            text(&self.data_type),
            Value::BigInt(self.ordinal_position),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriggerInfo {
    pub schema: String,
    pub table: String,
    pub name: String,
    pub definition: String,
}

impl Record for TriggerInfo {
    const COLUMNS: &'static [&'static str] = &["Schema", "Table", "Name", "Definition"];

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.schema),
            text(&self.table),
            text(&self.name),
            text(&self.definition),
        ]
    }
}
