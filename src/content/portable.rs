//! Portable Text: the block-structured rich-text format stored by the content store

use serde::Deserialize;

use super::post::SanityImage;

/// One top-level block of rich text
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "_type")]
pub enum PortableBlock {
    #[serde(rename = "block")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Image(SanityImage),
    /// Custom block types this site has no renderer for
    #[serde(other)]
    Unknown,
}

/// A paragraph, heading, quote or list item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextBlock {
    #[serde(rename = "_key", default)]
    pub key: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(rename = "listItem", default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<MarkDef>,
}

impl TextBlock {
    /// Concatenated text of all spans
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|span| span.text.as_str()).collect()
    }

    /// Nesting level of a list item, starting at 1
    pub fn list_level(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }
}

/// A run of text with decorators and annotation keys
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// Annotation referenced from span marks by key
#[derive(Debug, Clone, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Plain-text rendition of blocks, paragraphs separated by a blank line
pub fn to_plain_text(blocks: &[PortableBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            PortableBlock::Text(text) => Some(text.plain_text()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
