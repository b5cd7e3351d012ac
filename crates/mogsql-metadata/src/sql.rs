//! Catalog queries. The text is sent to the server as is; filters, ordering
//! and limits are appended by [`crate::query::Query`].

/// Databases with owner, encoding, locale and compatibility mode.
pub const CATALOGS: &str = r#"SELECT d.datname as "Name",
       pg_catalog.pg_get_userbyid(d.datdba) as "Owner",
       pg_catalog.pg_encoding_to_char(d.encoding) as "Encoding",
       d.datcollate as "Collate",
       d.datctype as "Ctype",
       COALESCE(pg_catalog.array_to_string(d.datacl, E'\n'),'') AS "Access privileges",
       datcompatibility
FROM pg_catalog.pg_database d"#;

/// Schemas as reported by the information schema.
pub const SCHEMAS: &str = r#"SELECT
  schema_name,
  catalog_name,
  schema_owner 
FROM information_schema.schemata
"#;

/// Relations with kind, estimated row count, size and comment.
pub const TABLES: &str = r#"SELECT n.nspname as "Schema",
  c.relname as "Name",
  CASE c.relkind WHEN 'r' THEN 'table' WHEN 'v' THEN 'view' WHEN 'm' THEN 'materialized view' WHEN 'i' THEN 'index' WHEN 'S' THEN 'sequence' WHEN 'L' THEN 'Large Sequence' WHEN 's' THEN 'special' WHEN 'f' THEN 'foreign table' WHEN 'p' THEN 'partitioned table' WHEN 'I' THEN 'partitioned index' ELSE 'unknown' END as "Type",
  COALESCE((c.reltuples / NULLIF(c.relpages, 0)) * (pg_catalog.pg_relation_size(c.oid) / current_setting('block_size')::int), 0)::bigint as "Rows",
  pg_catalog.pg_size_pretty(pg_catalog.pg_table_size(c.oid)) as "Size",
  COALESCE(pg_catalog.obj_description(c.oid, 'pg_class'), '') as "Description",
  pg_catalog.pg_get_userbyid(c.relowner) as "Owner"
FROM pg_catalog.pg_class c
     LEFT JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
"#;

/// Columns of tables and views, sized the way the server reports them.
pub const COLUMNS: &str = r#"SELECT
  table_catalog,
  table_schema,
  table_name,
  column_name,
  ordinal_position,
  data_type,
  COALESCE(column_default, ''),
  COALESCE(is_nullable, '') AS is_nullable,
  COALESCE(character_maximum_length, numeric_precision, datetime_precision, interval_precision, 0) AS column_size,
  COALESCE(numeric_scale, 0),
  COALESCE(numeric_precision_radix, 10),
  COALESCE(character_octet_length, 0)
FROM information_schema.columns
"#;

/// Planner statistics per column. `$1` is the table's estimated row count,
/// used to turn a negative (fractional) `n_distinct` into an absolute count.
pub const COLUMN_STATS: &str = r#"
SELECT
  s.schemaname,
  s.tablename,
  s.attname,
  s.avg_width,
  s.null_frac,
  CASE WHEN n_distinct >= 0 THEN n_distinct ELSE (-n_distinct * $1) END::bigint AS n_distinct,
  COALESCE((histogram_bounds::text::text[])[1], ''),
  COALESCE((histogram_bounds::text::text[])[array_length(histogram_bounds::text::text[], 1)], ''),
  most_common_vals::text::text[],
  most_common_freqs::text::text[]
FROM pg_catalog.pg_stats s
JOIN pg_catalog.pg_namespace n ON n.nspname = s.schemaname
JOIN pg_catalog.pg_class c ON c.relnamespace = n.oid AND c.relname = s.tablename
JOIN pg_catalog.pg_attribute a ON a.attrelid = c.oid AND a.attname = s.attname"#;

/// Indexes with their owning table.
pub const INDEXES: &str = r#"
SELECT
  'postgres' as "Catalog",
  n.nspname as "Schema",
  c2.relname as "Table",
  c.relname as "Name",
  CASE i.indisprimary WHEN TRUE THEN 'YES' ELSE 'NO' END,
  CASE i.indisunique WHEN TRUE THEN 'YES' ELSE 'NO' END,
  CASE c.relkind WHEN 'r' THEN 'table' WHEN 'v' THEN 'view' WHEN 'm' THEN 'materialized view' WHEN 'i' THEN 'index' WHEN 'S' THEN 'sequence' WHEN 's' THEN 'special' WHEN 'f' THEN 'foreign table' WHEN 'p' THEN 'partitioned table' WHEN 'I' THEN 'partitioned index' END as "Type"
FROM pg_catalog.pg_class c
     LEFT JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
     LEFT JOIN pg_catalog.pg_index i ON i.indexrelid = c.oid
     LEFT JOIN pg_catalog.pg_class c2 ON i.indrelid = c2.oid"#;

/// Columns of each index.
pub const INDEX_COLUMNS: &str = r#"
SELECT
  'postgres' as "Catalog",
  n.nspname as "Schema",
  c2.relname as "Table",
  c.relname as "IndexName",
  a.attname AS "Name",
  pg_catalog.format_type(a.atttypid, a.atttypmod) AS "DataType",
  a.attnum AS "OrdinalPosition"
FROM pg_catalog.pg_class c
     JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
     JOIN pg_catalog.pg_index i ON i.indexrelid = c.oid
     JOIN pg_catalog.pg_class c2 ON i.indrelid = c2.oid
     JOIN pg_catalog.pg_attribute a ON c.oid = a.attrelid
"#;

/// Triggers with their definition.
pub const TRIGGERS: &str = r#"SELECT
	n.nspname,
	c.relname,
    t.tgname, 
    pg_catalog.pg_get_triggerdef(t.oid, true)
FROM 
    pg_catalog.pg_trigger t 
    JOIN pg_catalog.pg_class c ON c.oid = t.tgrelid
	LEFT JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace"#;

/// User triggers, plus disabled internal ones and those backing constraints.
pub const TRIGGERS_VISIBLE: &str = r#"(
	NOT t.tgisinternal OR (t.tgisinternal AND t.tgenabled = 'D') 
			OR 
				EXISTS (SELECT 1 FROM pg_catalog.pg_depend WHERE objid = t.oid 
			AND 
				refclassid = 'pg_catalog.pg_trigger'::pg_catalog.regclass)
	)"#;

/// Structural predicates shared by the table and index queries.
pub const NOT_TOAST: &str = "n.nspname !~ '^pg_toast'";
pub const NOT_COMPOSITE: &str = "n.nspname !~ '^pg_toast' AND c.relkind != 'c'";
pub const TABLE_IS_VISIBLE: &str = "pg_catalog.pg_table_is_visible(c.oid)";
pub const NOT_SYSTEM_NAMESPACE: &str = "n.nspname NOT IN ('pg_catalog', 'information_schema')";
pub const INDEX_KINDS: &str = "c.relkind IN ('i','I','')";

/// Schemas hidden unless system objects are requested.
pub const SYSTEM_SCHEMAS: &[&str] = &["pg_catalog", "pg_toast", "information_schema"];

/// Schema the information schema queries treat as visible.
pub const CURRENT_SCHEMA: &str = "CURRENT_SCHEMA";

/// Catalog `relkind` codes for each logical relation type.
pub fn relkinds(table_type: &str) -> &'static [&'static str] {
    match table_type {
        "TABLE" => &["r", "p", "s", "f"],
        "VIEW" => &["v"],
        "MATERIALIZED VIEW" => &["m"],
        "SEQUENCE" => &["S", "L"],
        _ => &[],
    }
}
