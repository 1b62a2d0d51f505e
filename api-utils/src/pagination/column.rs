//! SQL identifier quoting

/// Identifier quote character (PostgreSQL / ANSI)
const QUOTE: char = '"';

/// Quote a possibly qualified column reference.
///
/// `table.column` becomes `"table"."column"`. Existing quotes are stripped
/// first, so quoting is idempotent. Empty segments are kept as `""` so a
/// malformed name like `a..b` fails when the query runs instead of silently
/// collapsing into a different identifier.
pub fn parse_column(column: &str) -> String {
    let trimmed = column.trim();
    if trimmed.is_empty() {
        return quote_segment("");
    }

    trimmed
        .replace(QUOTE, "")
        .split('.')
        .map(|segment| quote_segment(segment.trim()))
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_segment(segment: &str) -> String {
    format!("{QUOTE}{segment}{QUOTE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_column_cases() {
        let cases = [
            ("column", "\"column\"", "simple column"),
            ("table.column", "\"table\".\"column\"", "table column"),
            (
                "schema.table.column",
                "\"schema\".\"table\".\"column\"",
                "schema table column",
            ),
            ("  table .  column  ", "\"table\".\"column\"", "spaces around"),
            ("\"table\".\"column\"", "\"table\".\"column\"", "already quoted"),
            ("", "\"\"", "empty string"),
            ("   ", "\"\"", "whitespace only"),
            (".column", "\"\".\"column\"", "leading dot"),
            ("table.", "\"table\".\"\"", "trailing dot"),
            ("table..column", "\"table\".\"\".\"column\"", "double dot"),
        ];

        for (input, expected, desc) in cases {
            assert_eq!(parse_column(input), expected, "{}: {:?}", desc, input);
        }
    }

    #[test]
    fn test_parse_column_idempotent() {
        for input in ["name", "created_at", "Weird Name", "a.b"] {
            let once = parse_column(input);
            assert_eq!(parse_column(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_parse_column_trimmed_equals_plain() {
        assert_eq!(parse_column("  a . b  "), parse_column("a.b"));
    }
}
