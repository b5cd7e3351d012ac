//! Ordered metadata result sets.

use serde::Serialize;

use super::records::Record;

/// Records in query order, with the column names to display them under.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet<T> {
    records: Vec<T>,
    columns: &'static [&'static str],
}

impl<T: Record> ResultSet<T> {
    /// A set displayed under the record type's default columns.
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            columns: T::COLUMNS,
        }
    }

    /// An empty set.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> ResultSet<T> {
    pub fn with_columns(records: Vec<T>, columns: &'static [&'static str]) -> Self {
        Self { records, columns }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T: Serialize> ResultSet<T> {
    /// Serialize the records as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }
}

impl<'a, T> IntoIterator for &'a ResultSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<T> IntoIterator for ResultSet<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::records::SchemaInfo;

    #[test]
    fn keeps_order_and_columns() {
        let set = ResultSet::new(vec![
            SchemaInfo {
                name: "a".into(),
                ..SchemaInfo::default()
            },
            SchemaInfo {
                name: "b".into(),
                ..SchemaInfo::default()
            },
        ]);
        assert_eq!(set.columns(), &["Schema", "Catalog", "Owner"]);
        let names: Vec<_> = set.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn json_output() {
        let set = ResultSet::new(vec![SchemaInfo {
            name: "public".into(),
            catalog: "postgres".into(),
            owner: "omm".into(),
        }]);
        let json: serde_json::Value = serde_json::from_str(&set.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["name"], "public");
        assert_eq!(json[0]["owner"], "omm");
        assert!(ResultSet::<SchemaInfo>::empty().is_empty());
    }
}
