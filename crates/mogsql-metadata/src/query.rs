//! Assembly of catalog queries from a base SELECT plus filter predicates.

use mogsql_core::Value;

/// A catalog query under construction.
///
/// Conditions are joined with `AND`; bound values are numbered `$1`, `$2`,
/// ... in the order they are pushed, whether or not they appear in a
/// condition yet.
#[derive(Debug, Clone)]
pub struct Query {
    base: &'static str,
    conds: Vec<String>,
    params: Vec<Value>,
    order: &'static str,
}

impl Query {
    pub fn new(base: &'static str) -> Self {
        Self {
            base,
            conds: Vec::new(),
            params: Vec::new(),
            order: "",
        }
    }

    /// Add a literal condition.
    pub fn cond(&mut self, cond: impl Into<String>) -> &mut Self {
        self.conds.push(cond.into());
        self
    }

    /// Add a literal condition when `yes` holds.
    pub fn cond_if(&mut self, yes: bool, cond: &str) -> &mut Self {
        if yes {
            self.conds.push(cond.to_string());
        }
        self
    }

    /// Push a parameter and return its placeholder.
    pub fn bind(&mut self, value: impl Into<Value>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }

    /// Add `<column> LIKE $n` unless `pattern` is empty.
    pub fn like(&mut self, column: &str, pattern: &str) -> &mut Self {
        if !pattern.is_empty() {
            let p = self.bind(pattern);
            self.conds.push(format!("{column} LIKE {p}"));
        }
        self
    }

    /// Add `<column> IN ('', $n, ...)`, one placeholder per value.
    ///
    /// The leading `''` keeps the list well formed when `values` is empty,
    /// in which case nothing matches.
    pub fn in_list<'a>(&mut self, column: &str, values: impl IntoIterator<Item = &'a str>) -> &mut Self {
        let mut holders = vec!["''".to_string()];
        for v in values {
            holders.push(self.bind(v));
        }
        self.conds.push(format!("{column} IN ({})", holders.join(", ")));
        self
    }

    /// Add `<column> NOT IN ('a', 'b', ...)` with the names inlined as literals.
    pub fn not_in_literals(&mut self, column: &str, names: &[&str]) -> &mut Self {
        let quoted: Vec<String> = names.iter().map(|n| format!("'{}'", n.replace('\'', "''"))).collect();
        self.conds.push(format!("{column} NOT IN ({})", quoted.join(", ")));
        self
    }

    pub fn order_by(&mut self, order: &'static str) -> &mut Self {
        self.order = order;
        self
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }

    /// Render the SQL text, appending `LIMIT` when `limit` is non-zero.
    pub fn sql(&self, limit: u64) -> String {
        let mut sql = self.base.to_string();
        if !self.conds.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&self.conds.join(" AND "));
        }
        if !self.order.is_empty() {
            sql.push_str("\nORDER BY ");
            sql.push_str(self.order);
        }
        if limit != 0 {
            sql.push_str(&format!("\nLIMIT {limit}"));
        }
        sql
    }
}
