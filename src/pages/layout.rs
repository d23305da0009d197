//! Document shell shared by every page

use serde::Serialize;
use url::Url;

use super::{joined, PageError, Site};
use crate::components::{alert_banner, portable_text};
use crate::content::{to_plain_text, ContentError, DraftMode, FetchOptions, Query, Settings};
use crate::helpers::{
    full_url_for, html_escape, meta_generator, open_graph, parse_metadata_base,
    resolve_open_graph_image, OpenGraphImage,
};
use crate::templates::LayoutData;

/// Head metadata for a document
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    /// Site title, used as the default title and in the title template
    pub site_title: String,
    /// Page title filled into `%s | {site_title}`
    pub title: Option<String>,
    pub description: String,
    pub authors: Vec<String>,
    /// Open Graph images, most specific first
    pub images: Vec<OpenGraphImage>,
    pub metadata_base: Option<Url>,
}

impl Metadata {
    /// The `<title>` text
    pub fn document_title(&self) -> String {
        match self.title.as_deref().filter(|t| !t.is_empty()) {
            Some(title) => format!("{} | {}", title, self.site_title),
            None => self.site_title.clone(),
        }
    }

    /// Metadata derived from the settings document
    pub fn from_settings(site: &Site, settings: Option<&Settings>) -> Self {
        let demo = &site.config.demo;

        let site_title = settings
            .and_then(|s| s.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| demo.title.clone());

        let description = match settings.map(|s| &s.description) {
            Some(blocks) if !blocks.is_empty() => to_plain_text(blocks),
            _ => demo.description.clone(),
        };

        let og_image = settings.and_then(|s| s.og_image.as_ref());
        let images = resolve_open_graph_image(&site.images, og_image.map(|og| &og.image))
            .into_iter()
            .collect();
        let metadata_base = parse_metadata_base(og_image.and_then(|og| og.metadata_base.as_deref()));

        Self {
            site_title,
            title: None,
            description,
            authors: Vec::new(),
            images,
            metadata_base,
        }
    }
}

/// Layout data resolved before a page renders
#[derive(Debug, Clone)]
pub struct Shell {
    pub metadata: Metadata,
    /// Rendered footer contents
    pub footer: String,
}

/// Fetch the settings the shell needs
///
/// Metadata reads never carry stega; the footer read follows draft mode.
pub async fn load(site: &Site, draft: DraftMode) -> Result<Shell, ContentError> {
    let meta = site.spawn_fetch::<Option<Settings>>(
        Query::Settings,
        FetchOptions::without_stega(),
        draft,
    );
    let footer = site.spawn_fetch::<Option<Settings>>(Query::Settings, FetchOptions::default(), draft);

    let (meta, footer) = tokio::try_join!(joined(meta), joined(footer))?;

    Ok(Shell {
        metadata: Metadata::from_settings(site, meta.as_ref()),
        footer: render_footer(site, footer.as_ref()),
    })
}

fn render_footer(site: &Site, settings: Option<&Settings>) -> String {
    match settings.map(|s| &s.footer) {
        Some(blocks) if !blocks.is_empty() => portable_text(&site.images, blocks, "footer"),
        _ => html_escape(&site.i18n.get("footer.copyright")),
    }
}

/// Render a page template inside the document shell
pub fn render_document<P: Serialize>(
    site: &Site,
    draft: DraftMode,
    shell: &Shell,
    path: &str,
    template: &str,
    page: &P,
) -> Result<String, PageError> {
    let config = &site.config;
    let metadata = &shell.metadata;
    let title = metadata.document_title();
    let canonical = full_url_for(metadata.metadata_base.as_ref(), path);

    let layout = LayoutData {
        lang: config.language.clone(),
        dir: config.direction.clone(),
        logo: config.logo.clone(),
        open_graph: open_graph(
            &title,
            &metadata.description,
            canonical.as_deref(),
            &metadata.images,
        ),
        title,
        description: metadata.description.clone(),
        authors: metadata.authors.clone(),
        canonical: canonical.unwrap_or_default(),
        generator: meta_generator(),
        draft: draft.is_enabled(),
        banner: if draft.is_enabled() {
            alert_banner(&site.i18n)
        } else {
            String::new()
        },
        footer: shell.footer.clone(),
        overlay_script: if draft.is_enabled() {
            config.preview.overlay_script.clone()
        } else {
            String::new()
        },
    };

    Ok(site.templates.render(template, &layout, page)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::{site, site_with};

    #[tokio::test]
    async fn test_metadata_from_settings() {
        let (site, source) = site();
        let shell = load(&site, DraftMode::Disabled).await.unwrap();
        let metadata = &shell.metadata;

        assert_eq!(metadata.site_title, "Test Blog");
        assert_eq!(metadata.document_title(), "Test Blog");
        assert_eq!(metadata.description, "About this blog");
        assert_eq!(metadata.images.len(), 1);
        assert_eq!(metadata.images[0].alt, "Site card");
        assert_eq!(
            metadata.metadata_base.as_ref().map(Url::as_str),
            Some("https://blog.example.com/")
        );
        assert!(shell.footer.contains("Footer text"));

        assert!(source.names().iter().all(|name| *name == "settings"));
    }

    #[tokio::test]
    async fn test_demo_fallbacks() {
        let (site, _) = site_with(r#"{"_id":"post-1","_type":"post","title":"Only"}"#);
        let shell = load(&site, DraftMode::Disabled).await.unwrap();

        assert_eq!(shell.metadata.site_title, "Blog.");
        assert_eq!(
            shell.metadata.description,
            "A statically generated blog example using Sanity."
        );
        assert!(shell.metadata.images.is_empty());
        assert!(shell.metadata.metadata_base.is_none());
        assert_eq!(shell.footer, "All rights reserved.");
    }

    #[tokio::test]
    async fn test_invalid_metadata_base_is_ignored() {
        let (site, _) = site_with(
            r#"{"_id":"settings","_type":"settings","title":"T","ogImage":{"metadataBase":"not a url"}}"#,
        );
        let shell = load(&site, DraftMode::Disabled).await.unwrap();
        assert!(shell.metadata.metadata_base.is_none());
    }

    #[tokio::test]
    async fn test_footer_keeps_rich_text() {
        let (site, _) = site_with(
            r#"{"_id":"settings","_type":"settings","footer":[{"_type":"block","children":[{"text":"Source","marks":["l1"]}],"markDefs":[{"_key":"l1","_type":"link","href":"https://github.com/example"}]}]}"#,
        );
        let shell = load(&site, DraftMode::Disabled).await.unwrap();
        assert!(shell.footer.contains(r#"<a href="https://github.com/example""#));
        assert!(shell.footer.contains("<p>"));
    }

    #[tokio::test]
    async fn test_draft_metadata_has_no_markers() {
        let (site, _) = site();
        let shell = load(&site, DraftMode::Enabled).await.unwrap();

        assert!(!crate::content::stega::has_markers(&shell.metadata.site_title));
        assert!(crate::content::stega::has_markers(&shell.footer));
    }

    #[test]
    fn test_document_title() {
        let metadata = Metadata {
            site_title: "Blog.".to_string(),
            title: Some("Hello".to_string()),
            ..Metadata::default()
        };
        assert_eq!(metadata.document_title(), "Hello | Blog.");
    }
}
