//! Data-fetch wrapper shared by every page
//!
//! The draft-mode flag is passed explicitly with each call; it decides the
//! perspective, whether the response cache may be used and whether stega
//! markers are written into the result.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::source::{ContentSource, Perspective, QueryRequest};
use super::stega::Encoder;
use super::{ContentError, Query};
use crate::cache::{cache_key, ResponseCache};
use crate::config::SanityConfig;

/// Whether the current request previews unpublished content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftMode {
    Enabled,
    #[default]
    Disabled,
}

impl DraftMode {
    pub fn is_enabled(&self) -> bool {
        matches!(self, DraftMode::Enabled)
    }
}

impl From<bool> for DraftMode {
    fn from(enabled: bool) -> Self {
        if enabled {
            DraftMode::Enabled
        } else {
            DraftMode::Disabled
        }
    }
}

/// Per-call overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchOptions {
    /// Force stega on or off; `None` follows draft mode
    pub stega: Option<bool>,
    /// Force a perspective outside draft mode
    pub perspective: Option<Perspective>,
}

impl FetchOptions {
    /// Options for metadata reads, which must never carry stega
    pub fn without_stega() -> Self {
        Self {
            stega: Some(false),
            perspective: None,
        }
    }

    pub fn with_perspective(mut self, perspective: Perspective) -> Self {
        self.perspective = Some(perspective);
        self
    }
}

/// How a single fetch will be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    pub request: QueryRequest,
    pub stega: bool,
    pub cached: bool,
}

/// Executes named queries against a content source
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn ContentSource>,
    cache: Arc<ResponseCache>,
    use_cdn: bool,
    studio_url: Option<Arc<str>>,
}

impl Fetcher {
    /// Create a fetcher over a source with the store's caching settings
    pub fn new(source: Arc<dyn ContentSource>, config: &SanityConfig) -> Self {
        Self {
            source,
            cache: Arc::new(ResponseCache::new(Duration::from_secs(
                config.revalidate_secs,
            ))),
            use_cdn: config.use_cdn,
            studio_url: config
                .studio_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .map(Arc::from),
        }
    }

    /// Decide perspective, caching and stega for a call
    pub fn plan(&self, query: Query, options: FetchOptions, draft: DraftMode) -> FetchPlan {
        if draft.is_enabled() {
            FetchPlan {
                request: QueryRequest {
                    query,
                    perspective: Perspective::PreviewDrafts,
                    use_cdn: false,
                },
                stega: options.stega.unwrap_or(true),
                cached: false,
            }
        } else {
            FetchPlan {
                request: QueryRequest {
                    query,
                    perspective: options.perspective.unwrap_or(Perspective::Published),
                    use_cdn: self.use_cdn,
                },
                stega: options.stega.unwrap_or(false),
                cached: true,
            }
        }
    }

    /// Run a query and decode its result
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        query: Query,
        options: FetchOptions,
        draft: DraftMode,
    ) -> Result<T, ContentError> {
        let name = query.name();
        let plan = self.plan(query, options, draft);
        let value = self.fetch_value(&plan).await?;
        serde_json::from_value(value).map_err(|source| ContentError::Decode {
            query: name,
            source,
        })
    }

    /// Run a planned query, returning the raw JSON result
    pub async fn fetch_value(&self, plan: &FetchPlan) -> Result<Value, ContentError> {
        let key = cache_key(&plan.request, plan.stega);
        if plan.cached {
            if let Some(value) = self.cache.get(key) {
                tracing::trace!(query = plan.request.query.name(), "Cache hit");
                return Ok(value);
            }
        }

        let mut value = self.source.execute(&plan.request).await?;

        if plan.stega {
            match self.studio_url.as_deref() {
                Some(studio_url) => Encoder::new(studio_url).encode_result(&mut value),
                None => tracing::debug!("Stega requested but no studio_url is configured"),
            }
        }

        if plan.cached {
            self.cache.insert(key, value.clone());
        }

        Ok(value)
    }

    /// Forget every cached published read
    pub fn purge(&self) {
        self.cache.clear();
    }

    /// Number of published reads currently held in the cache
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}
