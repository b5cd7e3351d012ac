//! Metadata query filters and reader options.

/// Restricts which catalog objects a metadata query returns.
///
/// Text fields are `LIKE` patterns; an empty string means "unset" and adds
/// no predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub catalog: String,
    pub schema: String,
    /// Owning object, e.g. the table of an index or trigger
    pub parent: String,
    pub name: String,
    /// Logical object types (`TABLE`, `VIEW`, ...). `None` applies no type
    /// restriction; `Some(vec![])` matches nothing.
    pub types: Option<Vec<String>>,
    /// Include system schemas
    pub with_system: bool,
    /// Only objects visible in the search path
    pub only_visible: bool,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn catalog(mut self, pattern: impl Into<String>) -> Self {
        self.catalog = pattern.into();
        self
    }

    #[must_use]
    pub fn schema(mut self, pattern: impl Into<String>) -> Self {
        self.schema = pattern.into();
        self
    }

    #[must_use]
    pub fn parent(mut self, pattern: impl Into<String>) -> Self {
        self.parent = pattern.into();
        self
    }

    #[must_use]
    pub fn name(mut self, pattern: impl Into<String>) -> Self {
        self.name = pattern.into();
        self
    }

    #[must_use]
    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_system(mut self, yes: bool) -> Self {
        self.with_system = yes;
        self
    }

    #[must_use]
    pub fn only_visible(mut self, yes: bool) -> Self {
        self.only_visible = yes;
        self
    }
}

/// Options shared by every query a reader issues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Maximum rows per query; 0 means unlimited.
    pub limit: u64,
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }
}

/// Split a `schema.name` pattern and translate shell wildcards to `LIKE`
/// syntax (`*` to `%`, `?` to `_`).
///
/// A pattern without a dot is a name pattern only.
pub fn parse_pattern(pattern: &str) -> (String, String) {
    let translate = |s: &str| s.replace('*', "%").replace('?', "_");
    match pattern.rsplit_once('.') {
        Some((schema, name)) => (translate(schema), translate(name)),
        None => (String::new(), translate(pattern)),
    }
}
