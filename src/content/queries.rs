//! Named queries against the content store

use serde_json::Value;
use std::collections::BTreeMap;

const POST_FIELDS: &str = r#"
  _id,
  "status": select(_originalId in path("drafts.**") => "draft", "published"),
  "title": coalesce(title, "Untitled"),
  "slug": slug.current,
  excerpt,
  coverImage,
  "date": coalesce(date, _updatedAt),
  "author": author->{"name": coalesce(name, "Anonymous"), picture},
"#;

const SETTINGS: &str = r#"*[_type == "settings"][0]"#;

const HERO: &str = r#"*[_type == "post" && defined(slug.current)] | order(date desc, _updatedAt desc) [0] {
  content,
  POST_FIELDS
}"#;

const MORE_STORIES: &str = r#"*[_type == "post" && _id != $skip && defined(slug.current)] | order(date desc, _updatedAt desc) [0...$limit] {
  POST_FIELDS
}"#;

const POST: &str = r#"*[_type == "post" && slug.current == $slug] [0] {
  content,
  POST_FIELDS
}"#;

const POST_SLUGS: &str = r#"*[_type == "post"]{slug}"#;

/// A query together with its parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// The site settings singleton
    Settings,
    /// The newest post that has a slug
    Hero,
    /// Newest posts excluding one id
    MoreStories { skip: String, limit: usize },
    /// One post by slug
    Post { slug: String },
    /// Every post's slug
    PostSlugs,
}

impl Query {
    /// Stable name used in logs and cache keys
    pub fn name(&self) -> &'static str {
        match self {
            Query::Settings => "settings",
            Query::Hero => "hero",
            Query::MoreStories { .. } => "more_stories",
            Query::Post { .. } => "post",
            Query::PostSlugs => "post_slugs",
        }
    }

    /// GROQ text sent to a remote content store
    pub fn groq(&self) -> String {
        let template = match self {
            Query::Settings => SETTINGS,
            Query::Hero => HERO,
            Query::MoreStories { .. } => MORE_STORIES,
            Query::Post { .. } => POST,
            Query::PostSlugs => POST_SLUGS,
        };
        template.replace("POST_FIELDS", POST_FIELDS.trim())
    }

    /// Flat parameter map; values are always scalars
    pub fn params(&self) -> BTreeMap<&'static str, Value> {
        let mut params = BTreeMap::new();
        match self {
            Query::MoreStories { skip, limit } => {
                params.insert("skip", Value::from(skip.as_str()));
                params.insert("limit", Value::from(*limit));
            }
            Query::Post { slug } => {
                params.insert("slug", Value::from(slug.as_str()));
            }
            Query::Settings | Query::Hero | Query::PostSlugs => {}
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groq_expands_post_fields() {
        let groq = Query::Hero.groq();
        assert!(groq.contains("order(date desc, _updatedAt desc) [0]"));
        assert!(groq.contains(r#""author": author->"#));
        assert!(!groq.contains("POST_FIELDS"));
    }

    #[test]
    fn test_params() {
        let query = Query::MoreStories {
            skip: "post-1".to_string(),
            limit: 2,
        };
        let params = query.params();
        assert_eq!(params["skip"], Value::from("post-1"));
        assert_eq!(params["limit"], Value::from(2));
        assert!(query.groq().contains("_id != $skip"));

        assert!(Query::Settings.params().is_empty());
        assert_eq!(
            Query::Post {
                slug: "hello".to_string()
            }
            .params()["slug"],
            Value::from("hello")
        );
    }
}
