//! Rendering metadata result sets for the `\d` family of commands.

use asupersync::{Cx, Outcome};
use serde::Serialize;
use std::future::Future;
use std::io::Write;

use super::filter::{Filter, parse_pattern};
use super::reader::Reader;
use super::records::Record;
use super::set::ResultSet;
use crate::error::Error;

/// Output format for a [`DefaultWriter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Aligned text table with a title and row count footer
    #[default]
    Text,
    /// Pretty-printed JSON array of records
    Json,
}

/// Metadata listing commands.
pub trait Writer: Send {
    /// `\l`: list databases.
    fn list_all_dbs(
        &mut self,
        cx: &Cx,
        pattern: &str,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// `\dn`: list schemas.
    fn list_schemas(
        &mut self,
        cx: &Cx,
        pattern: &str,
        show_system: bool,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// `\dt`, `\dv`, `\dm`, `\ds` and combinations: list relations.
    ///
    /// `kinds` holds one letter per relation kind (`t`, `v`, `m`, `s`);
    /// empty means all of them.
    fn list_tables(
        &mut self,
        cx: &Cx,
        kinds: &str,
        pattern: &str,
        show_system: bool,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// `\di`: list indexes.
    fn list_indexes(
        &mut self,
        cx: &Cx,
        pattern: &str,
        show_system: bool,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// `\d <table>`: columns, indexes and triggers of matching tables.
    fn describe_table_details(
        &mut self,
        cx: &Cx,
        pattern: &str,
        show_system: bool,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;

    /// `\ss <table>`: column statistics.
    fn show_stats(
        &mut self,
        cx: &Cx,
        pattern: &str,
    ) -> impl Future<Output = Outcome<(), Error>> + Send;
}

/// A [`Writer`] that queries a [`Reader`] and prints each result set.
pub struct DefaultWriter<R, W> {
    reader: R,
    out: W,
    format: Format,
}

impl<R: Reader, W: Write + Send> DefaultWriter<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self {
            reader,
            out,
            format: Format::Text,
        }
    }

    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Record + Serialize>(&mut self, title: &str, set: &ResultSet<T>) -> Outcome<(), Error> {
        let written = match self.format {
            Format::Text => write_table(&mut self.out, title, set),
            Format::Json => match set.to_json() {
                Ok(json) => writeln!(self.out, "{json}").map_err(Error::Io),
                Err(e) => Err(Error::Custom(format!("failed to encode {title}: {e}"))),
            },
        };
        match written {
            Ok(()) => Outcome::Ok(()),
            Err(e) => Outcome::Err(e),
        }
    }
}

fn kinds_to_types(kinds: &str) -> Vec<String> {
    let kinds = if kinds.is_empty() { "tvms" } else { kinds };
    let mut types = Vec::new();
    for k in kinds.chars() {
        let t = match k {
            't' => "TABLE",
            'v' => "VIEW",
            'm' => "MATERIALIZED VIEW",
            's' => "SEQUENCE",
            _ => continue,
        };
        if !types.iter().any(|existing| existing == t) {
            types.push(t.to_string());
        }
    }
    types
}

fn write_table<T: Record>(
    out: &mut impl Write,
    title: &str,
    set: &ResultSet<T>,
) -> Result<(), Error> {
    let rows: Vec<Vec<String>> = set
        .iter()
        .map(|r| r.values().iter().map(ToString::to_string).collect())
        .collect();
    let mut widths: Vec<usize> = set.columns().iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    writeln!(out, "{title}")?;
    let header: Vec<String> = set
        .columns()
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!(" {c:<w$} "))
        .collect();
    writeln!(out, "{}", header.join("|").trim_end())?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    writeln!(out, "{}", rule.join("+"))?;
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!(" {c:<w$} "))
            .collect();
        writeln!(out, "{}", cells.join("|").trim_end())?;
    }
    let n = rows.len();
    writeln!(out, "({n} {})", if n == 1 { "row" } else { "rows" })?;
    writeln!(out)?;
    Ok(())
}

macro_rules! try_outcome {
    ($e:expr) => {
        match $e {
            Outcome::Ok(v) => v,
            Outcome::Err(e) => return Outcome::Err(e),
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        }
    };
}

impl<R: Reader, W: Write + Send> Writer for DefaultWriter<R, W> {
    async fn list_all_dbs(&mut self, cx: &Cx, pattern: &str) -> Outcome<(), Error> {
        let (_, name) = parse_pattern(pattern);
        let set = try_outcome!(self.reader.catalogs(cx, &Filter::new().name(name)).await);
        self.emit("List of databases", &set)
    }

    async fn list_schemas(&mut self, cx: &Cx, pattern: &str, show_system: bool) -> Outcome<(), Error> {
        let (_, name) = parse_pattern(pattern);
        let filter = Filter::new().name(name).with_system(show_system);
        let set = try_outcome!(self.reader.schemas(cx, &filter).await);
        self.emit("List of schemas", &set)
    }

    async fn list_tables(
        &mut self,
        cx: &Cx,
        kinds: &str,
        pattern: &str,
        show_system: bool,
    ) -> Outcome<(), Error> {
        let (schema, name) = parse_pattern(pattern);
        let filter = Filter::new()
            .schema(schema)
            .name(name)
            .types(kinds_to_types(kinds))
            .with_system(show_system)
            .only_visible(pattern.is_empty());
        let set = try_outcome!(self.reader.tables(cx, &filter).await);
        if set.is_empty() && !pattern.is_empty() {
            return match writeln!(self.out, "Did not find any relation named \"{pattern}\".") {
                Ok(()) => Outcome::Ok(()),
                Err(e) => Outcome::Err(Error::Io(e)),
            };
        }
        self.emit("List of relations", &set)
    }

    async fn list_indexes(&mut self, cx: &Cx, pattern: &str, show_system: bool) -> Outcome<(), Error> {
        let (schema, name) = parse_pattern(pattern);
        let filter = Filter::new()
            .schema(schema)
            .name(name)
            .with_system(show_system)
            .only_visible(pattern.is_empty());
        let set = try_outcome!(self.reader.indexes(cx, &filter).await);
        self.emit("List of indexes", &set)
    }

    async fn describe_table_details(
        &mut self,
        cx: &Cx,
        pattern: &str,
        show_system: bool,
    ) -> Outcome<(), Error> {
        let (schema, name) = parse_pattern(pattern);
        let filter = Filter::new()
            .schema(schema)
            .name(name)
            .with_system(show_system)
            .only_visible(pattern.is_empty());
        let tables = try_outcome!(self.reader.tables(cx, &filter).await);
        if tables.is_empty() {
            return match writeln!(self.out, "Did not find any relation named \"{pattern}\".") {
                Ok(()) => Outcome::Ok(()),
                Err(e) => Outcome::Err(Error::Io(e)),
            };
        }

        for table in tables.iter() {
            let scoped = Filter::new()
                .schema(table.schema.clone())
                .parent(table.name.clone())
                .with_system(true);
            let title = format!("{} \"{}.{}\"", capitalize(&table.kind), table.schema, table.name);

            let columns = try_outcome!(self.reader.columns(cx, &scoped).await);
            try_outcome!(self.emit(&title, &columns));

            let indexes = try_outcome!(self.reader.indexes(cx, &scoped).await);
            if !indexes.is_empty() {
                try_outcome!(self.emit("Indexes:", &indexes));
            }

            let triggers = try_outcome!(self.reader.triggers(cx, &scoped).await);
            if !triggers.is_empty() {
                try_outcome!(self.emit("Triggers:", &triggers));
            }
        }
        Outcome::Ok(())
    }

    async fn show_stats(&mut self, cx: &Cx, pattern: &str) -> Outcome<(), Error> {
        let (schema, table) = parse_pattern(pattern);
        let filter = Filter::new().schema(schema).parent(table);
        let set = try_outcome!(self.reader.column_stats(cx, &filter).await);
        self.emit(&format!("Column stats \"{pattern}\""), &set)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::records::SchemaInfo;

    #[test]
    fn text_table_layout() {
        let set = ResultSet::new(vec![SchemaInfo {
            name: "public".into(),
            catalog: "postgres".into(),
            owner: "omm".into(),
        }]);
        let mut out = Vec::new();
        write_table(&mut out, "List of schemas", &set).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "List of schemas");
        assert_eq!(lines[1], " Schema | Catalog  | Owner");
        assert_eq!(lines[2], "--------+----------+-------");
        assert_eq!(lines[3], " public | postgres | omm");
        assert_eq!(lines[4], "(1 row)");
    }

    #[test]
    fn relation_kinds() {
        assert_eq!(
            kinds_to_types(""),
            ["TABLE", "VIEW", "MATERIALIZED VIEW", "SEQUENCE"]
        );
        assert_eq!(kinds_to_types("vt"), ["VIEW", "TABLE"]);
        assert_eq!(kinds_to_types("tt"), ["TABLE"]);
        assert!(kinds_to_types("x").is_empty());
    }

    #[test]
    fn capitalizes_kind() {
        assert_eq!(capitalize("table"), "Table");
        assert_eq!(capitalize(""), "");
    }
}
