//! Stega: edit-source metadata hidden inside rendered text
//!
//! Each eligible string in a query result gets an invisible suffix that
//! encodes a small JSON payload pointing back at the studio document and
//! field it came from. Every payload byte becomes two characters from a
//! 16-symbol zero-width alphabet, one per nibble.

use chrono::{DateTime, NaiveDate};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::{json, Value};

const ALPHABET: [char; 16] = [
    '\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{2061}', '\u{2062}', '\u{2063}', '\u{2064}',
    '\u{FEFF}', '\u{206A}', '\u{206B}', '\u{206C}', '\u{206D}', '\u{206E}', '\u{206F}', '\u{180E}',
];

/// Fields whose values are machine-readable and must stay untouched
const DENIED_KEYS: &[&str] = &[
    "slug",
    "current",
    "date",
    "style",
    "listItem",
    "marks",
    "url",
    "href",
    "metadataBase",
    "status",
];

fn symbol_value(c: char) -> Option<u8> {
    ALPHABET.iter().position(|&s| s == c).map(|p| p as u8)
}

/// Encode a payload as invisible characters
pub fn encode(payload: &str) -> String {
    let mut encoded = String::with_capacity(payload.len() * 6);
    for byte in payload.bytes() {
        encoded.push(ALPHABET[(byte >> 4) as usize]);
        encoded.push(ALPHABET[(byte & 0x0f) as usize]);
    }
    encoded
}

/// Recover the payload hidden at the end of a string
pub fn decode(text: &str) -> Option<String> {
    let nibbles: Vec<u8> = text
        .chars()
        .rev()
        .map_while(symbol_value)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    if nibbles.is_empty() || nibbles.len() % 2 != 0 {
        return None;
    }

    let bytes: Vec<u8> = nibbles
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect();
    String::from_utf8(bytes).ok()
}

/// Strip every stega character from a string
pub fn clean(text: &str) -> String {
    text.chars().filter(|c| symbol_value(*c).is_none()).collect()
}

/// Whether a string carries stega characters
pub fn has_markers(text: &str) -> bool {
    text.chars().any(|c| symbol_value(c).is_some())
}

/// One step of a field path inside a document
#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
    Keyed(String),
}

fn format_path(path: &[Segment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            Segment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Segment::Index(index) => out.push_str(&format!("[{}]", index)),
            Segment::Keyed(key) => out.push_str(&format!("[_key==\"{}\"]", key)),
        }
    }
    out
}

/// Owning document of the subtree being walked
struct Origin {
    id: String,
    kind: Option<String>,
}

/// Writes stega payloads into a query result in place
pub struct Encoder<'a> {
    studio_url: &'a str,
}

impl<'a> Encoder<'a> {
    pub fn new(studio_url: &'a str) -> Self {
        Self {
            studio_url: studio_url.trim_end_matches('/'),
        }
    }

    /// Encode every eligible string in `value`
    pub fn encode_result(&self, value: &mut Value) {
        let mut path = Vec::new();
        self.walk(value, None, &mut path);
    }

    fn walk(&self, value: &mut Value, origin: Option<&Origin>, path: &mut Vec<Segment>) {
        match value {
            Value::Object(map) => {
                let own = map.get("_id").and_then(Value::as_str).map(|id| Origin {
                    id: id.to_string(),
                    kind: map.get("_type").and_then(Value::as_str).map(str::to_string),
                });

                // Paths are relative to the nearest document
                let mut local_path = Vec::new();
                let (origin, path) = match own.as_ref() {
                    Some(own) => (Some(own), &mut local_path),
                    None => (origin, path),
                };

                for (key, child) in map.iter_mut() {
                    if key.starts_with('_') || DENIED_KEYS.contains(&key.as_str()) {
                        continue;
                    }
                    path.push(Segment::Key(key.clone()));
                    self.walk(child, origin, path);
                    path.pop();
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    let segment = match item.get("_key").and_then(Value::as_str) {
                        Some(key) => Segment::Keyed(key.to_string()),
                        None => Segment::Index(index),
                    };
                    path.push(segment);
                    self.walk(item, origin, path);
                    path.pop();
                }
            }
            Value::String(text) => {
                let Some(origin) = origin else { return };
                if path.is_empty() || !is_eligible(text) {
                    return;
                }
                let payload = self.payload(origin, &format_path(path));
                text.push_str(&encode(&payload));
            }
            _ => {}
        }
    }

    fn payload(&self, origin: &Origin, path: &str) -> String {
        let mut href = format!(
            "{}/intent/edit/id={}",
            self.studio_url,
            utf8_percent_encode(&origin.id, NON_ALPHANUMERIC)
        );
        if let Some(kind) = &origin.kind {
            href.push_str(&format!(";type={}", utf8_percent_encode(kind, NON_ALPHANUMERIC)));
        }
        href.push_str(&format!(";path={}", utf8_percent_encode(path, NON_ALPHANUMERIC)));

        json!({ "origin": "sanity.io", "href": href }).to_string()
    }
}

/// Human-readable text only: no blanks, URLs or timestamps
fn is_eligible(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || has_markers(trimmed) {
        return false;
    }
    if trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || trimmed.starts_with('/')
        || trimmed.starts_with('#')
    {
        return false;
    }
    if DateTime::parse_from_rfc3339(trimmed).is_ok()
        || NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
    {
        return false;
    }
    true
}
