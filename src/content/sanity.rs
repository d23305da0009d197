//! HTTP client for the Sanity query API

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::source::{ContentSource, Perspective, QueryFuture, QueryRequest};
use super::ContentError;
use crate::config::SanityConfig;

/// Body of a successful query response
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// Talks to `https://<project>.api.sanity.io`
#[derive(Debug, Clone)]
pub struct SanityClient {
    http: reqwest::Client,
    project_id: String,
    dataset: String,
    api_version: String,
    token: Option<String>,
}

impl SanityClient {
    /// Create a client from the site configuration
    pub fn new(config: &SanityConfig) -> Result<Self, ContentError> {
        if config.project_id.is_empty() {
            return Err(ContentError::Config(
                "sanity.project_id is required when no dataset_file is set".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("sanity-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            project_id: config.project_id.clone(),
            dataset: config.dataset.clone(),
            api_version: config.api_version.trim_start_matches('v').to_string(),
            token: config.token.clone(),
        })
    }

    /// Build the GET URL for a query request
    pub fn query_url(&self, request: &QueryRequest) -> Result<Url, ContentError> {
        // Drafts are never served from the CDN
        let host = if request.use_cdn && request.perspective == Perspective::Published {
            "apicdn"
        } else {
            "api"
        };
        let mut url = Url::parse(&format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            self.project_id, host, self.api_version, self.dataset
        ))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &request.query.groq());
            for (name, value) in request.query.params() {
                pairs.append_pair(&format!("${}", name), &value.to_string());
            }
            pairs.append_pair("perspective", request.perspective.as_str());
        }

        Ok(url)
    }

    async fn run(&self, request: &QueryRequest) -> Result<Value, ContentError> {
        let url = self.query_url(request)?;
        let mut builder = self.http.get(url);

        if request.perspective == Perspective::PreviewDrafts {
            let token = self.token.as_deref().ok_or_else(|| {
                ContentError::Config(format!(
                    "draft reads require {}",
                    crate::config::TOKEN_ENV
                ))
            })?;
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(
            query = request.query.name(),
            perspective = request.perspective.as_str(),
            "Querying content store"
        );

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let body: QueryResponse = response.json().await?;
        Ok(body.result)
    }
}

impl ContentSource for SanityClient {
    fn execute<'a>(&'a self, request: &'a QueryRequest) -> QueryFuture<'a> {
        Box::pin(self.run(request))
    }
}

/// Pull a readable message out of an error body
fn upstream_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        value
            .pointer("/error/description")
            .or_else(|| value.pointer("/error/message"))
            .or_else(|| value.get("message"))
            .and_then(Value::as_str)
    });

    match message {
        Some(message) => message.to_string(),
        None => body.chars().take(200).collect(),
    }
}
