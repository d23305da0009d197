//! In-process content source backed by an NDJSON dataset export
//!
//! Answers the named queries directly instead of interpreting GROQ, which
//! keeps offline builds and tests independent of the hosted API.

use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::source::{ContentSource, Perspective, QueryFuture, QueryRequest};
use super::{ContentError, Query};

const DRAFTS_PREFIX: &str = "drafts.";

/// A dataset held in memory
#[derive(Debug, Clone, Default)]
pub struct DatasetSource {
    documents: Vec<Value>,
}

impl DatasetSource {
    /// Create a source from already parsed documents
    pub fn new(documents: Vec<Value>) -> Self {
        Self { documents }
    }

    /// Parse an NDJSON export: one document per line, blank lines ignored
    pub fn from_ndjson(text: &str) -> Result<Self, ContentError> {
        let mut documents = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let document = serde_json::from_str(line).map_err(|source| ContentError::Document {
                line: index + 1,
                source,
            })?;
            documents.push(document);
        }
        Ok(Self::new(documents))
    }

    /// Load an NDJSON export from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| ContentError::Io(path.to_path_buf(), e))?;
        let source = Self::from_ndjson(&text)?;
        tracing::info!("Loaded {} documents from {:?}", source.len(), path);
        Ok(source)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Answer a query synchronously
    pub fn run(&self, request: &QueryRequest) -> Value {
        let view = self.view(request.perspective);

        match &request.query {
            Query::Settings => view
                .iter()
                .find(|doc| doc_type(doc) == Some("settings"))
                .map(|doc| (*doc).clone())
                .unwrap_or(Value::Null),

            Query::Hero => sorted_posts(&view)
                .into_iter()
                .find(|doc| has_slug(doc))
                .map(|doc| project_post(doc, &view, true))
                .unwrap_or(Value::Null),

            Query::MoreStories { skip, limit } => Value::Array(
                sorted_posts(&view)
                    .into_iter()
                    .filter(|doc| has_slug(doc) && doc_id(doc) != Some(skip.as_str()))
                    .take(*limit)
                    .map(|doc| project_post(doc, &view, false))
                    .collect(),
            ),

            Query::Post { slug } => view
                .iter()
                .find(|doc| is_post(doc) && slug_current(doc) == Some(slug.as_str()))
                .map(|doc| project_post(doc, &view, true))
                .unwrap_or(Value::Null),

            Query::PostSlugs => Value::Array(
                view.iter()
                    .filter(|doc| is_post(doc))
                    .map(|doc| json!({ "slug": doc.get("slug").cloned().unwrap_or(Value::Null) }))
                    .collect(),
            ),
        }
    }

    /// Resolve the documents visible under a perspective
    ///
    /// Every returned document carries `_originalId`; under `PreviewDrafts`
    /// a draft replaces its published counterpart and takes its bare id.
    fn view(&self, perspective: Perspective) -> Vec<Value> {
        let mut order: Vec<String> = Vec::new();
        let mut resolved: HashMap<String, Value> = HashMap::new();

        for doc in &self.documents {
            let Some(id) = doc_id(doc) else { continue };
            let is_draft = id.starts_with(DRAFTS_PREFIX);

            if is_draft && perspective == Perspective::Published {
                continue;
            }

            let base_id = id.trim_start_matches(DRAFTS_PREFIX).to_string();
            let mut resolved_doc = doc.clone();
            if let Value::Object(map) = &mut resolved_doc {
                map.insert("_originalId".to_string(), Value::from(id));
                map.insert("_id".to_string(), Value::from(base_id.as_str()));
            }

            match resolved.get(&base_id) {
                None => {
                    order.push(base_id.clone());
                    resolved.insert(base_id, resolved_doc);
                }
                // Drafts win over published regardless of export order
                Some(_) if is_draft => {
                    resolved.insert(base_id, resolved_doc);
                }
                Some(_) => {}
            }
        }

        order
            .into_iter()
            .filter_map(|id| resolved.remove(&id))
            .collect()
    }
}

impl ContentSource for DatasetSource {
    fn execute<'a>(&'a self, request: &'a QueryRequest) -> QueryFuture<'a> {
        Box::pin(async move { Ok::<_, ContentError>(self.run(request)) })
    }
}

fn doc_id(doc: &Value) -> Option<&str> {
    doc.get("_id").and_then(Value::as_str)
}

fn doc_type(doc: &Value) -> Option<&str> {
    doc.get("_type").and_then(Value::as_str)
}

fn is_post(doc: &Value) -> bool {
    doc_type(doc) == Some("post")
}

fn slug_current(doc: &Value) -> Option<&str> {
    doc.pointer("/slug/current").and_then(Value::as_str)
}

fn has_slug(doc: &Value) -> bool {
    slug_current(doc).is_some()
}

fn string_field<'a>(doc: &'a Value, key: &str) -> Option<&'a str> {
    doc.get(key).and_then(Value::as_str)
}

/// Posts ordered by `date desc, _updatedAt desc`; missing values sort last
fn sorted_posts(view: &[Value]) -> Vec<&Value> {
    let mut posts: Vec<&Value> = view.iter().filter(|doc| is_post(doc)).collect();
    posts.sort_by(|a, b| {
        descending(string_field(a, "date"), string_field(b, "date")).then_with(|| {
            descending(string_field(a, "_updatedAt"), string_field(b, "_updatedAt"))
        })
    });
    posts
}

fn descending(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Shape a post document the way the post queries project it
fn project_post(doc: &Value, view: &[Value], with_content: bool) -> Value {
    let field = |key: &str| doc.get(key).cloned().unwrap_or(Value::Null);
    let status = match string_field(doc, "_originalId") {
        Some(id) if id.starts_with(DRAFTS_PREFIX) => "draft",
        _ => "published",
    };

    let mut projected = Map::new();
    if with_content {
        projected.insert("content".to_string(), field("content"));
    }
    projected.insert("_id".to_string(), field("_id"));
    projected.insert("status".to_string(), Value::from(status));
    projected.insert(
        "title".to_string(),
        Value::from(string_field(doc, "title").unwrap_or("Untitled")),
    );
    projected.insert(
        "slug".to_string(),
        slug_current(doc).map(Value::from).unwrap_or(Value::Null),
    );
    projected.insert("excerpt".to_string(), field("excerpt"));
    projected.insert("coverImage".to_string(), field("coverImage"));
    projected.insert(
        "date".to_string(),
        string_field(doc, "date")
            .or_else(|| string_field(doc, "_updatedAt"))
            .map(Value::from)
            .unwrap_or(Value::Null),
    );
    projected.insert("author".to_string(), project_author(doc, view));

    Value::Object(projected)
}

/// Follow the `author` reference and project name and picture
fn project_author(doc: &Value, view: &[Value]) -> Value {
    let Some(reference) = doc.pointer("/author/_ref").and_then(Value::as_str) else {
        return Value::Null;
    };

    match view.iter().find(|candidate| doc_id(candidate) == Some(reference)) {
        Some(author) => json!({
            "name": string_field(author, "name").unwrap_or("Anonymous"),
            "picture": author.get("picture").cloned().unwrap_or(Value::Null),
        }),
        None => Value::Null,
    }
}
