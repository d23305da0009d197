//! Single post page

use super::layout::{render_document, Metadata};
use super::{joined, PageError, PageOutcome, Site};
use crate::components::{avatar, cover_image, date, more_stories, portable_text};
use crate::content::{
    ContentError, DraftMode, FetchOptions, Perspective, Post, Query, Settings, SlugEntry,
};
use crate::helpers::{post_path, resolve_open_graph_image};
use crate::templates::PostData;

/// Stories listed under a post
const MORE_STORIES_LIMIT: usize = 2;

/// Fold a post into the layout metadata
///
/// The post's cover goes in front of the images inherited from the layout.
pub fn post_metadata(site: &Site, parent: Metadata, post: Option<&Post>) -> Metadata {
    let Some(post) = post else {
        return parent;
    };

    let mut images: Vec<_> = resolve_open_graph_image(&site.images, post.cover_image.as_ref())
        .into_iter()
        .collect();
    images.extend(parent.images);

    Metadata {
        title: Some(post.title.clone()),
        description: post.excerpt.clone().unwrap_or_default(),
        authors: post
            .author
            .as_ref()
            .map(|author| vec![author.name.clone()])
            .unwrap_or_default(),
        images,
        ..parent
    }
}

/// Render `/posts/{slug}`
pub async fn render(site: &Site, slug: &str, draft: DraftMode) -> Result<PageOutcome, PageError> {
    let query = Query::Post {
        slug: slug.to_string(),
    };

    let shell = site.spawn_shell(draft);
    let meta_post = site.spawn_fetch::<Option<Post>>(query.clone(), FetchOptions::without_stega(), draft);
    let post = site.spawn_fetch::<Option<Post>>(query, FetchOptions::default(), draft);
    let settings = site.spawn_fetch::<Option<Settings>>(Query::Settings, FetchOptions::default(), draft);

    let (mut shell, meta_post, post, settings) = tokio::try_join!(
        joined(shell),
        joined(meta_post),
        joined(post),
        joined(settings)
    )?;

    let Some(post) = post else {
        tracing::debug!("No post for slug {:?}", slug);
        return Ok(PageOutcome::NotFound);
    };
    let Some(id) = post.document_id().map(str::to_string) else {
        tracing::debug!("Post for slug {:?} has no id", slug);
        return Ok(PageOutcome::NotFound);
    };

    shell.metadata = post_metadata(site, shell.metadata, meta_post.as_ref());

    let query = Query::MoreStories {
        skip: id,
        limit: MORE_STORIES_LIMIT,
    };
    let more: Vec<Post> = site.fetcher.fetch(query, FetchOptions::default(), draft).await?;

    let i18n = &site.i18n;
    let images = &site.images;
    let page = PostData {
        site_title: settings
            .and_then(|s| s.title)
            .unwrap_or_else(|| shell.metadata.site_title.clone()),
        nav_title: i18n.get("post.nav_title"),
        title: post.title.clone(),
        avatar: post
            .author
            .as_ref()
            .map(|author| avatar(images, &author.name, author.picture.as_ref()))
            .unwrap_or_default(),
        cover: cover_image(images, post.cover_image.as_ref(), true),
        date: date(post.date.as_deref()),
        body: if post.content.is_empty() {
            String::new()
        } else {
            portable_text(images, &post.content, "mx-auto max-w-2xl")
        },
        more_heading: i18n.get("post.more_stories"),
        more_stories: more_stories(images, &more),
    };

    let html = render_document(site, draft, &shell, &post_path(slug), "post.html", &page)?;
    Ok(PageOutcome::Found(html))
}

/// Slugs to pre-render, read from published content without stega
pub async fn static_params(site: &Site) -> Result<Vec<String>, ContentError> {
    let entries: Vec<SlugEntry> = site
        .fetcher
        .fetch(
            Query::PostSlugs,
            FetchOptions::without_stega().with_perspective(Perspective::Published),
            DraftMode::Disabled,
        )
        .await?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.current().map(str::to_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::stega;
    use crate::pages::testing::{found, site, site_with};

    #[tokio::test]
    async fn test_post_page() {
        let (site, source) = site();
        let html = found(render(&site, "newest", DraftMode::Disabled).await.unwrap());

        assert!(html.contains("<title>Newest | Test Blog</title>"));
        assert!(html.contains(r#"<meta name="description" content="Fresh">"#));
        assert!(html.contains(r#"<meta name="author" content="Ada">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://blog.example.com/posts/newest">"#));
        assert!(html.contains("Body text"));
        assert!(html.contains("March 1, 2024"));
        assert!(html.contains("Recent Stories"));

        // Cover image first, then the site card
        let cover = html.find("cover-2000x1000.jpg?w=1200&amp;h=627").unwrap();
        let card = html.find("og-2400x1260.png?w=1200&amp;h=627").unwrap();
        assert!(cover < card);

        let seen = source.seen.lock().unwrap();
        let more = seen
            .iter()
            .find(|request| request.query.name() == "more_stories")
            .unwrap();
        assert_eq!(
            more.query,
            Query::MoreStories {
                skip: "post-1".to_string(),
                limit: 2
            }
        );
    }

    #[tokio::test]
    async fn test_more_stories_exclude_current_post() {
        let (site, _) = site();
        let html = found(render(&site, "middle", DraftMode::Disabled).await.unwrap());
        let aside = &html[html.find(r#"<aside class="container">"#).unwrap()..];

        assert!(!aside.contains(r#"href="/posts/middle""#));
        assert!(aside.contains(r#"href="/posts/newest""#));
        assert!(aside.contains(r#"href="/posts/oldest""#));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_not_found() {
        let (site, source) = site();
        let outcome = render(&site, "missing", DraftMode::Disabled).await.unwrap();

        assert_eq!(outcome, PageOutcome::NotFound);
        assert!(!source.names().contains(&"more_stories"));
    }

    #[tokio::test]
    async fn test_post_without_id_is_not_found() {
        let (site, _) = site_with(r#"{"_id":"","_type":"post","title":"Ghost","slug":{"current":"ghost"}}"#);
        let outcome = render(&site, "ghost", DraftMode::Disabled).await.unwrap();
        assert_eq!(outcome, PageOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_draft_post_has_markers_outside_metadata() {
        let (site, _) = site();
        let html = found(render(&site, "middle", DraftMode::Enabled).await.unwrap());

        let heading_start = html.find(r#"lg:text-6xl">"#).unwrap();
        let heading = &html[heading_start..heading_start + html[heading_start..].find("</h1>").unwrap()];
        assert!(heading.contains("Middle (edited)"));
        assert!(stega::has_markers(heading));

        let title = &html[html.find("<title>").unwrap()..html.find("</title>").unwrap()];
        assert_eq!(title, "<title>Middle (edited) | Test Blog");
    }

    #[tokio::test]
    async fn test_static_params() {
        let (site, source) = site();
        let mut slugs = static_params(&site).await.unwrap();
        slugs.sort();
        assert_eq!(slugs, vec!["middle", "newest", "oldest"]);

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen[0].perspective, Perspective::Published);
    }

    #[tokio::test]
    async fn test_static_params_skip_missing_slugs() {
        let (site, _) = site_with(
            r#"{"_id":"a","_type":"post","slug":{"current":"a"}}
{"_id":"b","_type":"post"}
{"_id":"c","_type":"post","slug":{"current":""}}"#,
        );
        assert_eq!(static_params(&site).await.unwrap(), vec!["a"]);
    }
}
