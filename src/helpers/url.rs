//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Route of a single post
///
/// # Examples
/// ```ignore
/// post_path("hello world") // -> "/posts/hello%20world"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("/posts/{}", encode_segment(slug))
}

/// Percent-encode one path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Parse the configured metadata base URL
///
/// A malformed value is treated the same as a missing one.
pub fn parse_metadata_base(value: Option<&str>) -> Option<Url> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    match Url::parse(value) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!("Ignoring metadata base {:?}: {}", value, e);
            None
        }
    }
}

/// Absolute URL of a route against an optional base
pub fn full_url_for(base: Option<&Url>, path: &str) -> Option<String> {
    base?.join(path).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_path() {
        assert_eq!(post_path("hello"), "/posts/hello");
        assert_eq!(post_path("a b/c?"), "/posts/a%20b%2Fc%3F");
        assert_eq!(post_path("مرحبا"), "/posts/%D9%85%D8%B1%D8%AD%D8%A8%D8%A7");
    }

    #[test]
    fn test_parse_metadata_base() {
        assert_eq!(
            parse_metadata_base(Some("https://blog.example.com")).map(|u| u.to_string()),
            Some("https://blog.example.com/".to_string())
        );
        assert!(parse_metadata_base(Some("not a url")).is_none());
        assert!(parse_metadata_base(Some("")).is_none());
        assert!(parse_metadata_base(None).is_none());
    }

    #[test]
    fn test_full_url_for() {
        let base = parse_metadata_base(Some("https://blog.example.com/")).unwrap();
        assert_eq!(
            full_url_for(Some(&base), "/posts/hello").as_deref(),
            Some("https://blog.example.com/posts/hello")
        );
        assert!(full_url_for(None, "/").is_none());
    }
}
