//! Home page: intro, hero post and the remaining stories

use super::layout::render_document;
use super::{joined, PageError, PageOutcome, Site};
use crate::components::{hero_post, more_stories, onboarding};
use crate::content::{DraftMode, FetchOptions, Post, Query, Settings};
use crate::templates::HomeData;

/// Stories listed under the hero
const MORE_STORIES_LIMIT: usize = 100;

/// Render `/`
pub async fn render(site: &Site, draft: DraftMode) -> Result<PageOutcome, PageError> {
    let shell = site.spawn_shell(draft);
    let settings = site.spawn_fetch::<Option<Settings>>(Query::Settings, FetchOptions::default(), draft);
    let hero = site.spawn_fetch::<Option<Post>>(Query::Hero, FetchOptions::default(), draft);

    let (shell, settings, hero) = tokio::try_join!(joined(shell), joined(settings), joined(hero))?;

    let i18n = &site.i18n;
    let mut page = HomeData {
        site_title: settings
            .and_then(|s| s.title)
            .unwrap_or_else(|| shell.metadata.site_title.clone()),
        subtitle: i18n.get("intro.subtitle"),
        more_heading: i18n.get("home.more_stories"),
        ..HomeData::default()
    };

    match &hero {
        Some(hero) => {
            page.hero = hero_post(&site.images, hero);

            if let Some(id) = hero.document_id() {
                let query = Query::MoreStories {
                    skip: id.to_string(),
                    limit: MORE_STORIES_LIMIT,
                };
                let posts: Vec<Post> = site.fetcher.fetch(query, FetchOptions::default(), draft).await?;
                page.more_stories = more_stories(&site.images, &posts);
            }
        }
        None => {
            tracing::debug!("No hero post, rendering onboarding");
            page.onboarding = onboarding(i18n, site.studio_url());
        }
    }

    let html = render_document(site, draft, &shell, "/", "home.html", &page)?;
    Ok(PageOutcome::Found(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{stega, Perspective};
    use crate::pages::testing::{found, site, site_with};

    #[tokio::test]
    async fn test_home_with_posts() {
        let (site, source) = site();
        let html = found(render(&site, DraftMode::Disabled).await.unwrap());

        assert!(html.contains("<title>Test Blog</title>"));
        assert!(html.contains("Newest"));
        assert!(html.contains(r#"href="/posts/middle""#));
        assert!(html.contains(r#"href="/posts/oldest""#));
        assert!(html.contains("More Stories"));
        assert!(!html.contains("Middle (edited)"));
        assert!(!html.contains("Previewing drafts."));

        let seen = source.seen.lock().unwrap();
        let more = seen
            .iter()
            .find(|request| request.query.name() == "more_stories")
            .unwrap();
        assert_eq!(
            more.query,
            Query::MoreStories {
                skip: "post-1".to_string(),
                limit: 100
            }
        );
        assert!(seen.iter().all(|r| r.perspective == Perspective::Published));
    }

    #[tokio::test]
    async fn test_more_stories_skip_the_hero() {
        let (site, _) = site();
        let html = found(render(&site, DraftMode::Disabled).await.unwrap());
        let aside = &html[html.find("<aside>").unwrap()..];
        assert!(!aside.contains(r#"href="/posts/newest""#));
    }

    #[tokio::test]
    async fn test_home_without_posts_shows_onboarding() {
        let (site, source) = site_with(r#"{"_id":"settings","_type":"settings","title":"Empty"}"#);
        let html = found(render(&site, DraftMode::Disabled).await.unwrap());

        assert!(html.contains("https://studio.example.com/intent/create/template=post;type=post/"));
        assert!(!html.contains("<aside>"));
        assert!(!source.names().contains(&"more_stories"));
    }

    #[tokio::test]
    async fn test_home_in_draft_mode() {
        let (site, source) = site();
        let html = found(render(&site, DraftMode::Enabled).await.unwrap());

        assert!(html.contains("Previewing drafts."));
        assert!(html.contains("/api/disable-draft"));
        assert!(html.contains("https://core.sanity-cdn.com/bridge.js"));
        assert!(html.contains("Middle (edited)"));

        let seen = source.seen.lock().unwrap();
        assert!(seen
            .iter()
            .all(|r| r.perspective == Perspective::PreviewDrafts && !r.use_cdn));

        // Title tag comes from the unmarked metadata read
        let title = &html[html.find("<title>").unwrap()..html.find("</title>").unwrap()];
        assert!(!stega::has_markers(title));
    }
}
