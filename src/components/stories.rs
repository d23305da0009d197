//! Post teasers: the hero article and the "more stories" grid

use super::{avatar, cover_image, date};
use crate::content::Post;
use crate::helpers::{html_escape, ImageUrlBuilder};

fn byline(images: &ImageUrlBuilder, post: &Post) -> String {
    let excerpt = post
        .excerpt
        .as_deref()
        .filter(|e| !e.is_empty())
        .map(|e| {
            format!(
                r#"<p class="text-pretty mb-4 text-lg leading-relaxed">{}</p>"#,
                html_escape(e)
            )
        })
        .unwrap_or_default();

    let author = post
        .author
        .as_ref()
        .map(|author| avatar(images, &author.name, author.picture.as_ref()))
        .unwrap_or_default();

    format!("{}{}", excerpt, author)
}

/// The newest post, rendered large
pub fn hero_post(images: &ImageUrlBuilder, post: &Post) -> String {
    let href = html_escape(&post.path().unwrap_or_default());

    format!(
        concat!(
            r#"<article>"#,
            r#"<a class="group mb-8 block md:mb-16" href="{href}">{cover}</a>"#,
            r#"<div class="flex flex-col lg:flex-row items-start lg:items-center justify-start lg:justify-between mb-20">"#,
            r#"<div><h3 class="text-pretty mb-4 text-4xl lg:text-6xl"><a href="{href}" class="hover:underline">{title}</a></h3>"#,
            r#"<div class="mb-4 text-lg md:mb-0">{date}</div></div>"#,
            r#"<div>{byline}</div>"#,
            r#"</div></article>"#
        ),
        href = href,
        cover = cover_image(images, post.cover_image.as_ref(), true),
        title = html_escape(&post.title),
        date = date(post.date.as_deref()),
        byline = byline(images, post),
    )
}

/// Grid of post cards
pub fn more_stories(images: &ImageUrlBuilder, posts: &[Post]) -> String {
    let cards: String = posts
        .iter()
        .map(|post| {
            let href = html_escape(&post.path().unwrap_or_default());
            format!(
                concat!(
                    r#"<article class="border rounded-xl p-2">"#,
                    r#"<a href="{href}" class="group mb-5 block relative">{cover}"#,
                    r#"<div class="absolute bg-gradient-to-t from-white to-white/0 w-full h-full left-0 top-0 rounded-xl"></div></a>"#,
                    r#"<div class="px-2"><h3 class="text-balance mb-3 text-2xl font-bold leading-snug"><a href="{href}" class="hover:underline">{title}</a></h3>"#,
                    r#"<div class="flex justify-between items-center"><div class="text-sm font-bold">{date}</div>"#,
                    r#"<div class="flex">{byline}</div></div></div>"#,
                    r#"</article>"#
                ),
                href = href,
                cover = cover_image(images, post.cover_image.as_ref(), false),
                title = html_escape(&post.title),
                date = date(post.date.as_deref()),
                byline = byline(images, post),
            )
        })
        .collect();

    format!(
        r#"<div class="mb-32 grid grid-cols-1 gap-y-20 md:grid-cols-2 md:gap-x-16 md:gap-y-32 lg:gap-x-32">{}</div>"#,
        cards
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SanityConfig;
    use serde_json::json;

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new(&SanityConfig::default())
    }

    fn post(id: &str, slug: &str) -> Post {
        serde_json::from_value(json!({
            "_id": id,
            "title": format!("Title {}", id),
            "slug": slug,
            "excerpt": "An excerpt",
            "date": "2024-01-05T00:00:00Z",
            "author": { "name": "Ada" }
        }))
        .unwrap()
    }

    #[test]
    fn test_hero_post() {
        let html = hero_post(&images(), &post("p1", "first"));
        assert_eq!(html.matches(r#"href="/posts/first""#).count(), 2);
        assert!(html.contains("Title p1"));
        assert!(html.contains("January 5, 2024"));
        assert!(html.contains("An excerpt"));
        assert!(html.contains(">By </div>"));
    }

    #[test]
    fn test_more_stories() {
        let posts = vec![post("p2", "second"), post("p3", "third")];
        let html = more_stories(&images(), &posts);
        assert_eq!(html.matches("<article").count(), 2);
        assert!(html.contains(r#"href="/posts/third""#));

        let empty = more_stories(&images(), &[]);
        assert!(!empty.contains("<article"));
    }
}
