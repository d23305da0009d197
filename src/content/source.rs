//! The seam between the site and whatever answers its queries

use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

use super::{ContentError, Query};

/// Which view of the dataset a query reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perspective {
    /// Only published documents
    Published,
    /// Drafts layered over their published versions
    PreviewDrafts,
}

impl Perspective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Published => "published",
            Perspective::PreviewDrafts => "previewDrafts",
        }
    }
}

/// Everything a content source needs to run one query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryRequest {
    pub query: Query,
    pub perspective: Perspective,
    /// Allow an edge-cached answer
    pub use_cdn: bool,
}

pub type QueryFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, ContentError>> + Send + 'a>>;

/// Executes named queries and returns the raw JSON result
pub trait ContentSource: Send + Sync {
    fn execute<'a>(&'a self, request: &'a QueryRequest) -> QueryFuture<'a>;
}
