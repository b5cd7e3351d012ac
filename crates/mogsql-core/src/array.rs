//! Text-array literal decoding.

use crate::Result;
use crate::error::{Error, TypeError};

fn malformed(literal: &str, why: &str) -> Error {
    Error::Type(TypeError {
        expected: "one-dimensional text array",
        actual: format!("{why} in {literal:?}"),
        column: None,
        rust_type: Some("Vec<String>"),
    })
}

/// Decode a one-dimensional array literal in the server's text output format.
///
/// Quoted elements may contain commas, braces and backslash escapes. An
/// unquoted `NULL` decodes to the empty string.
#[allow(clippy::result_large_err)]
pub fn decode_text_array(literal: &str) -> Result<Vec<String>> {
    let trimmed = literal.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| malformed(literal, "missing braces"))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let mut item = String::new();
        let mut quoted = false;
        match chars.peek() {
            Some('"') => {
                quoted = true;
                chars.next();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some(c) => item.push(c),
                            None => return Err(malformed(literal, "dangling escape")),
                        },
                        Some('"') => break,
                        Some(c) => item.push(c),
                        None => return Err(malformed(literal, "unterminated quote")),
                    }
                }
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            Some('{') => return Err(malformed(literal, "nested array")),
            _ => {
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    item.push(c);
                    chars.next();
                }
                let t = item.trim_end().len();
                item.truncate(t);
            }
        }

        if !quoted && item.eq_ignore_ascii_case("NULL") {
            item.clear();
        }
        out.push(item);

        match chars.next() {
            Some(',') => continue,
            None => break,
            Some(c) => return Err(malformed(literal, &format!("unexpected {c:?}"))),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_and_quoted() {
        assert_eq!(
            decode_text_array(r#"{a,"b c",NULL,"NULL"}"#).unwrap(),
            vec!["a", "b c", "", "NULL"]
        );
    }

    #[test]
    fn decodes_escapes_and_delimiters() {
        assert_eq!(
            decode_text_array(r#"{"x,y","say \"hi\"","a\\b"}"#).unwrap(),
            vec!["x,y", "say \"hi\"", "a\\b"]
        );
    }

    #[test]
    fn empty_array() {
        assert!(decode_text_array("{}").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed() {
        assert!(decode_text_array("a,b").is_err());
        assert!(decode_text_array(r#"{"open}"#).is_err());
        assert!(decode_text_array("{{1,2},{3,4}}").is_err());
    }
}
