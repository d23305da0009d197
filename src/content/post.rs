//! Post, author and settings records as projected by the content queries

use serde::{Deserialize, Deserializer};

use super::portable::PortableBlock;

/// Deserialize `null` the same way as a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn anonymous() -> String {
    "Anonymous".to_string()
}

fn untitled() -> String {
    "Untitled".to_string()
}

/// Whether the projected document came from a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
}

/// A blog post
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    /// Document id; the page is treated as missing without one
    #[serde(rename = "_id", default)]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub status: PostStatus,

    #[serde(default = "untitled")]
    pub title: String,

    /// `slug.current`
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(rename = "coverImage", default)]
    pub cover_image: Option<SanityImage>,

    /// Publish date, falling back to the last update
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub author: Option<Author>,

    /// Rich-text body; empty for listing projections
    #[serde(default, deserialize_with = "nullable")]
    pub content: Vec<PortableBlock>,
}

impl Post {
    /// The document id when it is present and non-empty
    pub fn document_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Route of this post, if it has a slug
    pub fn path(&self) -> Option<String> {
        self.slug.as_deref().map(crate::helpers::post_path)
    }
}

/// Post author
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    #[serde(default = "anonymous")]
    pub name: String,
    #[serde(default)]
    pub picture: Option<SanityImage>,
}

/// An image field: an opaque asset pointer plus editorial hints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SanityImage {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub hotspot: Option<Hotspot>,
    #[serde(default)]
    pub crop: Option<Crop>,
}

impl SanityImage {
    /// The `_ref` of the referenced asset, if any
    pub fn asset_ref(&self) -> Option<&str> {
        self.asset
            .as_ref()
            .and_then(|asset| asset.reference.as_deref())
            .filter(|r| !r.is_empty())
    }

    /// Alt text, empty when missing
    pub fn alt_text(&self) -> &str {
        self.alt.as_deref().unwrap_or("")
    }
}

/// Reference to an image asset document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
}

/// Crop insets, each a fraction of the source dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Crop {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
}

/// Focal area, centre and size as fractions of the source image
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub width: f64,
}

/// Open Graph image with an optional base URL for relative metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OgImage {
    #[serde(flatten)]
    pub image: SanityImage,
    #[serde(rename = "metadataBase", default)]
    pub metadata_base: Option<String>,
}

/// Site-wide settings singleton
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Vec<PortableBlock>,
    #[serde(rename = "ogImage", default)]
    pub og_image: Option<OgImage>,
    #[serde(default, deserialize_with = "nullable")]
    pub footer: Vec<PortableBlock>,
}

/// One row of the slug enumeration query
#[derive(Debug, Clone, Deserialize)]
pub struct SlugEntry {
    #[serde(default)]
    pub slug: Option<Slug>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slug {
    #[serde(default)]
    pub current: Option<String>,
}

impl SlugEntry {
    /// The current slug value, skipping empty ones
    pub fn current(&self) -> Option<&str> {
        self.slug
            .as_ref()
            .and_then(|slug| slug.current.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_projection() {
        let post: Post = serde_json::from_value(json!({
            "_id": "post-1",
            "status": "draft",
            "title": "Hello",
            "slug": "hello",
            "excerpt": null,
            "coverImage": { "asset": { "_ref": "image-abc-800x600-jpg" }, "alt": "Cover" },
            "date": "2024-01-05T10:00:00Z",
            "author": { "name": "Ada", "picture": null },
            "content": null
        }))
        .unwrap();

        assert_eq!(post.document_id(), Some("post-1"));
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.path().as_deref(), Some("/posts/hello"));
        assert!(post.content.is_empty());
        assert_eq!(
            post.cover_image.as_ref().and_then(|i| i.asset_ref()),
            Some("image-abc-800x600-jpg")
        );
        assert!(post.author.unwrap().picture.is_none());
    }

    #[test]
    fn test_post_without_id() {
        let post: Post = serde_json::from_value(json!({ "_id": "", "title": "x" })).unwrap();
        assert_eq!(post.document_id(), None);
        assert_eq!(post.status, PostStatus::Published);
    }

    #[test]
    fn test_settings_with_nulls() {
        let settings: Settings = serde_json::from_value(json!({
            "_id": "settings",
            "_type": "settings",
            "title": "Edumonde",
            "description": null,
            "ogImage": { "asset": { "_ref": "image-og-1200x630-png" }, "metadataBase": "https://blog.example.com" }
        }))
        .unwrap();

        assert_eq!(settings.title.as_deref(), Some("Edumonde"));
        assert!(settings.description.is_empty());
        assert!(settings.footer.is_empty());
        let og = settings.og_image.unwrap();
        assert_eq!(og.metadata_base.as_deref(), Some("https://blog.example.com"));
        assert_eq!(og.image.asset_ref(), Some("image-og-1200x630-png"));
    }

    #[test]
    fn test_slug_entry() {
        let entries: Vec<SlugEntry> = serde_json::from_value(json!([
            { "slug": { "_type": "slug", "current": "first" } },
            { "slug": null },
            { "slug": { "current": "" } }
        ]))
        .unwrap();
        let slugs: Vec<_> = entries.iter().filter_map(SlugEntry::current).collect();
        assert_eq!(slugs, vec!["first"]);
    }
}
