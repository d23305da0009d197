//! Rich-text renderer

use crate::content::{MarkDef, PortableBlock, Span, TextBlock};
use crate::helpers::{html_escape, ImageUrlBuilder};

/// Render Portable Text blocks inside a prose wrapper
pub fn portable_text(images: &ImageUrlBuilder, blocks: &[PortableBlock], class: &str) -> String {
    let mut out = String::new();
    // Open lists, innermost last: (tag, level)
    let mut lists: Vec<(&'static str, u32)> = Vec::new();

    for block in blocks {
        match block {
            PortableBlock::Text(text) if text.list_item.is_some() => {
                let tag = list_tag(text.list_item.as_deref());
                let level = text.list_level();

                while let Some(&(open_tag, open_level)) = lists.last() {
                    if open_level > level || (open_level == level && open_tag != tag) {
                        close_list(&mut out, open_tag);
                        lists.pop();
                    } else {
                        break;
                    }
                }

                match lists.last() {
                    Some(&(_, open_level)) if open_level == level => out.push_str("</li>"),
                    _ => {
                        out.push_str(&format!("<{}>", tag));
                        lists.push((tag, level));
                    }
                }

                out.push_str("<li>");
                out.push_str(&render_spans(text));
            }
            other => {
                while let Some((open_tag, _)) = lists.pop() {
                    close_list(&mut out, open_tag);
                }
                render_block(images, other, &mut out);
            }
        }
    }

    while let Some((open_tag, _)) = lists.pop() {
        close_list(&mut out, open_tag);
    }

    format!(
        r#"<div class="{} prose prose-lg">{}</div>"#,
        html_escape(class),
        out
    )
}

fn list_tag(list_item: Option<&str>) -> &'static str {
    match list_item {
        Some("number") => "ol",
        _ => "ul",
    }
}

fn close_list(out: &mut String, tag: &str) {
    out.push_str("</li>");
    out.push_str(&format!("</{}>", tag));
}

fn render_block(images: &ImageUrlBuilder, block: &PortableBlock, out: &mut String) {
    match block {
        PortableBlock::Text(text) => {
            let tag = match text.style.as_deref().unwrap_or("normal") {
                style @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => style,
                "blockquote" => "blockquote",
                _ => "p",
            };
            out.push_str(&format!("<{}>{}</{}>", tag, render_spans(text), tag));
        }
        PortableBlock::Image(image) => {
            if let Some(url) = images.image(image) {
                out.push_str(&format!(
                    r#"<figure><img class="h-auto w-full" src="{}" alt="{}" loading="lazy"></figure>"#,
                    html_escape(&url.width(1200).url()),
                    html_escape(image.alt_text())
                ));
            }
        }
        PortableBlock::Unknown => {}
    }
}

fn render_spans(block: &TextBlock) -> String {
    block
        .children
        .iter()
        .map(|span| render_span(span, &block.mark_defs))
        .collect()
}

fn render_span(span: &Span, mark_defs: &[MarkDef]) -> String {
    let mut html = html_escape(&span.text).replace('\n', "<br>");

    for mark in &span.marks {
        html = match mark.as_str() {
            "strong" => format!("<strong>{}</strong>", html),
            "em" => format!("<em>{}</em>", html),
            "code" => format!("<code>{}</code>", html),
            "underline" => format!(r#"<span style="text-decoration: underline">{}</span>"#, html),
            "strike-through" => format!("<del>{}</del>", html),
            key => match mark_defs.iter().find(|def| def.key == key) {
                Some(def) if def.kind == "link" => wrap_link(def, html),
                _ => html,
            },
        };
    }

    html
}

fn wrap_link(def: &MarkDef, inner: String) -> String {
    let Some(href) = def.href.as_deref().filter(|h| !h.is_empty()) else {
        return inner;
    };

    let external = href.starts_with("http://") || href.starts_with("https://");
    if external {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            html_escape(href),
            inner
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, html_escape(href), inner)
    }
}
