//! HTML helper functions

use super::image::OpenGraphImage;

/// Generate Open Graph meta tags
pub fn open_graph(
    title: &str,
    description: &str,
    url: Option<&str>,
    images: &[OpenGraphImage],
) -> String {
    let mut tags = vec![
        r#"<meta property="og:type" content="website">"#.to_string(),
        format!(
            r#"<meta property="og:title" content="{}">"#,
            html_escape(title)
        ),
    ];

    if let Some(url) = url {
        tags.push(format!(
            r#"<meta property="og:url" content="{}">"#,
            html_escape(url)
        ));
    }

    if !description.is_empty() {
        tags.push(format!(
            r#"<meta property="og:description" content="{}">"#,
            html_escape(description)
        ));
    }

    for image in images {
        tags.push(format!(
            r#"<meta property="og:image" content="{}">"#,
            html_escape(&image.url)
        ));
        tags.push(format!(
            r#"<meta property="og:image:width" content="{}">"#,
            image.width
        ));
        tags.push(format!(
            r#"<meta property="og:image:height" content="{}">"#,
            image.height
        ));
        if !image.alt.is_empty() {
            tags.push(format!(
                r#"<meta property="og:image:alt" content="{}">"#,
                html_escape(&image.alt)
            ));
        }
    }

    tags.join("\n")
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="sanity-blog {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
