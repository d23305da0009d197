//! Page templates using the Tera template engine
//!
//! All templates are embedded directly in the binary. Components render
//! their own HTML fragments; templates only arrange them, so autoescaping is
//! off and plain text fields are passed through `| escape`.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::content::stega;

/// Template renderer with the embedded blog templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();

        // Fragments are already escaped by the components
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("home.html", include_str!("blog/home.html")),
            ("post.html", include_str!("blog/post.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            // Partials
            ("partials/head.html", include_str!("blog/partials/head.html")),
            (
                "partials/footer.html",
                include_str!("blog/partials/footer.html"),
            ),
            ("partials/nav.html", include_str!("blog/partials/nav.html")),
        ])?;

        tera.register_filter("clean_markers", clean_markers_filter);

        Ok(Self { tera })
    }

    /// Render a page template inside the layout
    pub fn render<P: Serialize>(
        &self,
        template_name: &str,
        layout: &LayoutData,
        page: &P,
    ) -> tera::Result<String> {
        let mut context = Context::new();
        context.insert("layout", layout);
        context.insert("page", page);
        self.tera.render(template_name, &context)
    }
}

/// Tera filter: drop invisible editing markers from a string
fn clean_markers_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("clean_markers", "value", String, value);
    Ok(tera::Value::String(stega::clean(&s)))
}

// Data structures for template context

/// Everything the document shell needs
#[derive(Debug, Clone, Default, Serialize)]
pub struct LayoutData {
    pub lang: String,
    pub dir: String,
    pub logo: String,
    pub title: String,
    pub description: String,
    pub authors: Vec<String>,
    pub canonical: String,
    /// Pre-rendered Open Graph tags
    pub open_graph: String,
    pub generator: String,
    pub draft: bool,
    pub banner: String,
    pub footer: String,
    /// Visual-editing overlay, only set in draft mode
    pub overlay_script: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeData {
    pub site_title: String,
    pub subtitle: String,
    pub hero: String,
    pub onboarding: String,
    pub more_heading: String,
    pub more_stories: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PostData {
    pub site_title: String,
    pub nav_title: String,
    pub title: String,
    pub avatar: String,
    pub cover: String,
    pub date: String,
    pub body: String,
    pub more_heading: String,
    pub more_stories: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NotFoundData {
    pub title: String,
    pub back: String,
}
