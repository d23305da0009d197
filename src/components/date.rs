//! Publish date

use crate::helpers::{format_date, html_escape, parse_date};

/// `<time>` element showing e.g. "January 5, 2024"; empty without a date
pub fn date(date_string: Option<&str>) -> String {
    let Some(raw) = date_string.filter(|s| !s.trim().is_empty()) else {
        return String::new();
    };

    let display = match parse_date(raw) {
        Some(parsed) => format_date(&parsed, "MMMM D, YYYY"),
        None => raw.to_string(),
    };

    format!(
        r#"<time datetime="{}">{}</time>"#,
        html_escape(raw),
        html_escape(&display)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date() {
        assert_eq!(
            date(Some("2024-01-05T10:00:00Z")),
            r#"<time datetime="2024-01-05T10:00:00Z">January 5, 2024</time>"#
        );
        assert_eq!(
            date(Some("2023-11-30")),
            r#"<time datetime="2023-11-30">November 30, 2023</time>"#
        );
    }

    #[test]
    fn test_missing_or_invalid_date() {
        assert_eq!(date(None), "");
        assert_eq!(date(Some("  ")), "");
        assert_eq!(
            date(Some("soon")),
            r#"<time datetime="soon">soon</time>"#
        );
    }
}
