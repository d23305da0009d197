//! HTTP server rendering pages on request
//!
//! Draft mode is carried by a cookie whose value is derived from the preview
//! secret; requests without it see published content only.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    handler::Handler,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::content::DraftMode;
use crate::helpers::post_path;
use crate::pages::{self, PageError, PageOutcome, Site};
use crate::Blog;

/// Server state
#[derive(Clone)]
struct AppState {
    site: Site,
    cookie_name: Arc<str>,
    /// Cookie value that unlocks draft mode
    draft_token: Option<Arc<str>>,
}

impl AppState {
    fn new(site: Site) -> Self {
        let preview = &site.config.preview;
        let cookie_name: Arc<str> = Arc::from(preview.cookie_name.as_str());
        let token: Option<Arc<str>> = preview
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(draft_token)
            .map(Arc::from);

        Self {
            cookie_name,
            draft_token: token,
            site,
        }
    }

    /// Draft mode for a request, read from its cookies
    fn draft_mode(&self, headers: &HeaderMap) -> DraftMode {
        let Some(token) = self.draft_token.as_deref() else {
            return DraftMode::Disabled;
        };

        let enabled = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .any(|(name, value)| {
                name == &*self.cookie_name && constant_time_eq(value.as_bytes(), token.as_bytes())
            });

        DraftMode::from(enabled)
    }
}

/// Domain tag mixed into the draft cookie digest
const DRAFT_TOKEN_DOMAIN: &[u8] = b"sanity-blog:draft-mode:v1";

/// Cookie value derived from the preview secret: hex SHA-256 over the domain tag and secret
fn draft_token(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(DRAFT_TOKEN_DOMAIN);
    hasher.update((secret.len() as u64).to_be_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare two byte strings without short-circuiting on the first mismatch
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Build the application router
pub fn router(site: Site, static_dir: PathBuf) -> Router {
    let state = AppState::new(site);
    let not_found = not_found_handler.with_state(state.clone());

    Router::new()
        .route("/", get(home_handler))
        .route("/posts/:slug", get(post_handler))
        .route("/api/draft", get(enable_draft_handler))
        .route("/api/disable-draft", get(disable_draft_handler))
        .fallback_service(ServeDir::new(static_dir).not_found_service(not_found))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let site = blog.site()?;
    if site.config.preview.secret.is_none() {
        tracing::info!("No preview secret configured; draft mode is unavailable");
    }

    let app = router(site, blog.static_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let draft = state.draft_mode(&headers);
    let outcome = pages::render_home(&state.site, draft).await;
    respond(&state, draft, outcome).await
}

async fn post_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let draft = state.draft_mode(&headers);
    let outcome = pages::render_post(&state.site, &slug, draft).await;
    respond(&state, draft, outcome).await
}

async fn not_found_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let draft = state.draft_mode(&headers);
    not_found_page(&state, draft).await
}

/// Turn a page outcome into a response
async fn respond(
    state: &AppState,
    draft: DraftMode,
    outcome: Result<PageOutcome, PageError>,
) -> Response {
    match outcome {
        Ok(PageOutcome::Found(html)) => Html(html).into_response(),
        Ok(PageOutcome::NotFound) => not_found_page(state, draft).await,
        Err(e) => internal_error(e),
    }
}

async fn not_found_page(state: &AppState, draft: DraftMode) -> Response {
    match pages::render_not_found(&state.site, draft).await {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => internal_error(e),
    }
}

fn internal_error(e: PageError) -> Response {
    tracing::error!("Failed to render page: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

#[derive(Debug, Deserialize)]
struct DraftParams {
    secret: Option<String>,
    slug: Option<String>,
}

/// Enable draft mode when the secret matches, then redirect to the preview target
async fn enable_draft_handler(
    State(state): State<AppState>,
    Query(params): Query<DraftParams>,
) -> Response {
    let Some(token) = state.draft_token.as_deref() else {
        return (StatusCode::UNAUTHORIZED, "Draft mode is not configured").into_response();
    };

    // Digests have a fixed length, so the comparison does not leak the secret's length
    let provided = params.secret.as_deref().map(draft_token).unwrap_or_default();
    if !constant_time_eq(provided.as_bytes(), token.as_bytes()) {
        tracing::warn!("Rejected draft mode request with an invalid secret");
        return (StatusCode::UNAUTHORIZED, "Invalid secret").into_response();
    }

    let location = match params.slug.as_deref().filter(|s| !s.is_empty()) {
        Some(slug) => post_path(slug),
        None => "/".to_string(),
    };
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        state.cookie_name, token
    );

    tracing::info!("Draft mode enabled, redirecting to {}", location);
    (
        [(header::SET_COOKIE, cookie)],
        Redirect::temporary(&location),
    )
        .into_response()
}

/// Clear the draft cookie and go home
///
/// Cached published reads are dropped so freshly published edits show up,
/// but only for a client that was actually in draft mode.
async fn disable_draft_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.draft_mode(&headers).is_enabled() {
        state.site.fetcher.purge();
    }
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        state.cookie_name
    );
    (
        [(header::SET_COOKIE, cookie)],
        Redirect::temporary("/"),
    )
        .into_response()
}
