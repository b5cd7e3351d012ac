//! Display formatting for column data types.

/// Render a declared type with its size or precision the way `\d` shows it.
///
/// `size` is the column size reported by the information schema (character
/// length, numeric precision or fractional seconds precision) and
/// `decimal_digits` the numeric scale. Types without a rule pass through.
pub fn data_type(name: &str, size: i64, decimal_digits: i64) -> String {
    match name {
        "bit" | "character" => format!("{name}({size})"),
        "bit varying" | "character varying" if size != 0 => format!("{name}({size})"),
        "numeric" if size != 0 => format!("numeric({size},{decimal_digits})"),
        "time without time zone" => format!("time({size}) without time zone"),
        "time with time zone" => format!("time({size}) with time zone"),
        "timestamp without time zone" => format!("timestamp({size}) without time zone"),
        "timestamp with time zone" => format!("timestamp({size}) with time zone"),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::data_type;

    #[test]
    fn varying_types_omit_zero_size() {
        assert_eq!(data_type("character varying", 0, 0), "character varying");
        assert_eq!(data_type("character varying", 50, 0), "character varying(50)");
        assert_eq!(data_type("bit varying", 0, 0), "bit varying");
    }

    #[test]
    fn fixed_types_always_sized() {
        assert_eq!(data_type("character", 1, 0), "character(1)");
        assert_eq!(data_type("bit", 8, 0), "bit(8)");
    }

    #[test]
    fn numeric_and_time() {
        assert_eq!(data_type("numeric", 10, 2), "numeric(10,2)");
        assert_eq!(data_type("numeric", 0, 0), "numeric");
        assert_eq!(data_type("time with time zone", 6, 0), "time(6) with time zone");
        assert_eq!(
            data_type("timestamp without time zone", 3, 0),
            "timestamp(3) without time zone"
        );
    }

    #[test]
    fn others_pass_through() {
        assert_eq!(data_type("integer", 32, 0), "integer");
        assert_eq!(data_type("text", 0, 0), "text");
    }
}
