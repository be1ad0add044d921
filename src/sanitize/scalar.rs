//! Scalar normalizers for untrusted input.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Escape `& < > " ' /` for HTML output. One pass, so nothing is double-encoded.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove anything shaped like `<...>`, keeping enclosed text.
pub fn strip_tags(input: &str) -> String {
    TAG.replace_all(input, "").into_owned()
}

/// Keep digits and hyphens; nine digits are reformatted as `XXX-XX-XXXX`.
pub fn normalize_ssn(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 9 {
        format!("{}-{}-{}", &digits[..3], &digits[3..5], &digits[5..])
    } else {
        cleaned
    }
}

/// Digits only.
pub fn normalize_phone(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Trimmed, lowercased address, or empty string when not `local@domain.tld`.
pub fn normalize_email(input: &str) -> String {
    let email = input.trim().to_lowercase();
    if EMAIL.is_match(&email) {
        email
    } else {
        String::new()
    }
}

/// Numeric value of a JSON scalar. Non-finite, unparsable or non-scalar gives 0.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_number(s),
        _ => 0.0,
    }
}

/// Parse a loosely formatted number such as `"$1,250.50"`.
///
/// Everything except digits, `.` and `-` is dropped, then the longest
/// leading `-?digits[.digits]` prefix is read. No digits gives 0.
pub fn parse_number(input: &str) -> f64 {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let bytes = cleaned.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end = frac_start;
        }
    }

    if !has_digits {
        return 0.0;
    }
    cleaned[..end]
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// True iff the input has exactly nine digits.
pub fn is_valid_ssn(input: &str) -> bool {
    input.chars().filter(char::is_ascii_digit).count() == 9
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_html() {
        let escaped = escape_html(r#"<script>alert("XSS")</script>"#);
        assert!(escaped.contains("&lt;script&gt;"));
        assert!(!escaped.contains("<script>"));
        assert_eq!(
            escaped,
            "&lt;script&gt;alert(&quot;XSS&quot;)&lt;&#x2F;script&gt;"
        );
    }

    #[test]
    fn test_escape_html_ampersand_once() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("it's"), "it&#x27;s");
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_strip_tags_nested() {
        assert_eq!(strip_tags("<div><span>Text</span></div>"), "Text");
        assert_eq!(strip_tags("plain"), "plain");
        assert_eq!(strip_tags("a < b"), "a < b");
    }

    #[test]
    fn test_strip_tags_idempotent() {
        for input in ["<<a>b>c", "<div><b>x</b></div>", "<a<b>>text", "x<y"] {
            let once = strip_tags(input);
            assert_eq!(strip_tags(&once), once, "{input}");
        }
    }

    #[test]
    fn test_normalize_ssn() {
        assert_eq!(normalize_ssn("123456789"), "123-45-6789");
        assert_eq!(normalize_ssn(" 123.45.6789 "), "123-45-6789");
        assert_eq!(normalize_ssn("12-34a"), "12-34");
        assert_eq!(normalize_ssn(""), "");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("(555) 123-4567"), "5551234567");
        assert_eq!(normalize_phone("none"), "");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("Test@Example.COM"), "test@example.com");
        assert_eq!(normalize_email("  a.b@c.io  "), "a.b@c.io");
        assert_eq!(normalize_email("invalid-email"), "");
        assert_eq!(normalize_email("a@b"), "");
        assert_eq!(normalize_email("a@@b.com"), "");
        assert_eq!(normalize_email("a b@c.com"), "");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("$1,250.50"), 1250.5);
        assert_eq!(parse_number("-42"), -42.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("7."), 7.0);
        assert_eq!(parse_number("1.2.3"), 1.2);
        assert_eq!(parse_number("12-34"), 12.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number(""), 0.0);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(3.25)), 3.25);
        assert_eq!(coerce_number(&json!("300,000")), 300000.0);
        assert_eq!(coerce_number(&json!(null)), 0.0);
        assert_eq!(coerce_number(&json!(true)), 0.0);
    }

    #[test]
    fn test_is_valid_ssn() {
        assert!(is_valid_ssn("123-45-6789"));
        assert!(is_valid_ssn("123456789"));
        assert!(!is_valid_ssn("12345678"));
        assert!(!is_valid_ssn(""));
    }
}
