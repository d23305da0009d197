//! Route compositions
//!
//! Each page fetches what it needs (independent reads run as spawned tasks
//! joined before rendering), hands the records to the display components and
//! renders the result inside the layout shell.

mod home;
mod layout;
mod not_found;
mod post;

pub use home::render as render_home;
pub use layout::{Metadata, Shell};
pub use not_found::render as render_not_found;
pub use post::{render as render_post, static_params};

use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentSource, DraftMode, FetchOptions, Fetcher, Query};
use crate::helpers::ImageUrlBuilder;
use crate::i18n::I18n;
use crate::templates::TemplateRenderer;

/// Result of rendering a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Found(String),
    NotFound,
}

/// Error raised while building a page
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("failed to render template: {0}")]
    Render(#[from] tera::Error),
}

/// Everything a page needs, cheap to clone into spawned tasks
#[derive(Clone)]
pub struct Site {
    pub fetcher: Fetcher,
    pub templates: Arc<TemplateRenderer>,
    pub images: Arc<ImageUrlBuilder>,
    pub config: Arc<SiteConfig>,
    pub i18n: Arc<I18n>,
}

impl Site {
    pub fn new(
        config: SiteConfig,
        source: Arc<dyn ContentSource>,
        i18n: I18n,
    ) -> Result<Self, PageError> {
        Ok(Self {
            fetcher: Fetcher::new(source, &config.sanity),
            templates: Arc::new(TemplateRenderer::new()?),
            images: Arc::new(ImageUrlBuilder::new(&config.sanity)),
            config: Arc::new(config),
            i18n: Arc::new(i18n),
        })
    }

    /// Studio base URL, if one is configured
    pub fn studio_url(&self) -> Option<&str> {
        self.config
            .sanity
            .studio_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }

    /// Start a fetch on its own task
    pub(crate) fn spawn_fetch<T>(
        &self,
        query: Query,
        options: FetchOptions,
        draft: DraftMode,
    ) -> JoinHandle<Result<T, ContentError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let fetcher = self.fetcher.clone();
        tokio::spawn(async move { fetcher.fetch(query, options, draft).await })
    }

    /// Start loading the layout shell on its own task
    pub(crate) fn spawn_shell(&self, draft: DraftMode) -> JoinHandle<Result<Shell, ContentError>> {
        let site = self.clone();
        tokio::spawn(async move { layout::load(&site, draft).await })
    }
}

/// Wait for a spawned fetch, folding a failed task into the fetch error
pub(crate) async fn joined<T>(handle: JoinHandle<Result<T, ContentError>>) -> Result<T, ContentError> {
    handle.await?
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for page tests

    use super::*;
    use crate::config::SanityConfig;
    use crate::content::{DatasetSource, QueryFuture, QueryRequest};
    use std::sync::Mutex;

    /// Dataset-backed source that records every request
    pub struct Recording {
        inner: DatasetSource,
        pub seen: Mutex<Vec<QueryRequest>>,
    }

    impl Recording {
        pub fn names(&self) -> Vec<&'static str> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|request| request.query.name())
                .collect()
        }
    }

    impl ContentSource for Recording {
        fn execute<'a>(&'a self, request: &'a QueryRequest) -> QueryFuture<'a> {
            self.seen.lock().unwrap().push(request.clone());
            self.inner.execute(request)
        }
    }

    pub const DATASET: &str = r#"{"_id":"settings","_type":"settings","title":"Test Blog","description":[{"_type":"block","children":[{"text":"About this blog"}]}],"footer":[{"_type":"block","children":[{"text":"Footer text"}]}],"ogImage":{"asset":{"_ref":"image-og-2400x1260-png"},"alt":"Site card","metadataBase":"https://blog.example.com"}}
{"_id":"author-1","_type":"author","name":"Ada"}
{"_id":"post-1","_type":"post","title":"Newest","slug":{"current":"newest"},"date":"2024-03-01","excerpt":"Fresh","author":{"_ref":"author-1"},"coverImage":{"asset":{"_ref":"image-cover-2000x1000-jpg"},"alt":"Cover"},"content":[{"_type":"block","children":[{"text":"Body text"}]}]}
{"_id":"post-2","_type":"post","title":"Middle","slug":{"current":"middle"},"date":"2024-02-01"}
{"_id":"post-3","_type":"post","title":"Oldest","slug":{"current":"oldest"},"date":"2024-01-01"}
{"_id":"drafts.post-2","_type":"post","title":"Middle (edited)","slug":{"current":"middle"},"date":"2024-02-01"}"#;

    pub fn config() -> SiteConfig {
        SiteConfig {
            language: "en".to_string(),
            direction: "ltr".to_string(),
            sanity: SanityConfig {
                project_id: "test".to_string(),
                studio_url: Some("https://studio.example.com".to_string()),
                ..SanityConfig::default()
            },
            ..SiteConfig::default()
        }
    }

    pub fn site_with(dataset: &str) -> (Site, Arc<Recording>) {
        let source = Arc::new(Recording {
            inner: DatasetSource::from_ndjson(dataset).unwrap(),
            seen: Mutex::new(Vec::new()),
        });
        let site = Site::new(config(), source.clone(), I18n::builtin("en")).unwrap();
        (site, source)
    }

    pub fn site() -> (Site, Arc<Recording>) {
        site_with(DATASET)
    }

    pub fn found(outcome: PageOutcome) -> String {
        match outcome {
            PageOutcome::Found(html) => html,
            PageOutcome::NotFound => panic!("expected a rendered page"),
        }
    }
}
