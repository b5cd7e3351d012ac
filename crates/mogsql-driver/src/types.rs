//! Statement text helpers.

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified name: `public.users` -> `"public"."users"`.
pub fn quote_qualified(name: &str) -> String {
    match name.split_once('.') {
        Some((schema, table)) => format!("{}.{}", quote_ident(schema), quote_ident(table)),
        None => quote_ident(name),
    }
}

/// `COPY <table> (<columns>) FROM STDIN` for streaming rows into `table`.
pub fn copy_in<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    let cols: Vec<String> = columns.iter().map(|c| quote_ident(c.as_ref())).collect();
    format!(
        "COPY {} ({}) FROM STDIN",
        quote_qualified(table.trim()),
        cols.join(", ")
    )
}

/// Single-quote a string literal, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
