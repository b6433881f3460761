//! String escaping rules for the text exposition formats.
//!
//! Label values escape the same way in both formats; HELP text differs only in whether a literal
//! `"` is escaped (OpenMetrics does, Prometheus leaves it raw).

/// Escapes a label value: `\` becomes `\\`, `"` becomes `\"`, and a literal newline becomes `\n`.
pub(super) fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes HELP text: `\` and a literal newline are always escaped; `"` is escaped only when
/// `escape_quote` is set (OpenMetrics), and left raw otherwise (Prometheus).
pub(super) fn escape_help(value: &str, escape_quote: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '"' if escape_quote => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_label_value() {
        assert_eq!(escape_label_value("a\\b\"c\nd"), "a\\\\b\\\"c\\nd");
    }

    #[test]
    fn test_escape_help_quote_policy() {
        let help = "Some text and \n some \" escaping";
        assert_eq!(escape_help(help, true), "Some text and \\n some \\\" escaping");
        assert_eq!(escape_help(help, false), "Some text and \\n some \" escaping");
    }
}
