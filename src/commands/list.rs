//! List site content

use anyhow::Result;

use crate::content::{DraftMode, FetchOptions, Post, Query};
use crate::pages::{self, Site};
use crate::Blog;

/// Upper bound on posts printed by `list post`
const LIST_LIMIT: usize = 1000;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str) -> Result<()> {
    let site = blog.site()?;

    for line in lines(&site, content_type).await? {
        println!("{}", line);
    }

    Ok(())
}

async fn lines(site: &Site, content_type: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();

    match content_type {
        "post" | "posts" => {
            let query = Query::MoreStories {
                skip: String::new(),
                limit: LIST_LIMIT,
            };
            let options = FetchOptions::without_stega();
            let posts: Vec<Post> = site.fetcher.fetch(query, options, DraftMode::Disabled).await?;
            out.push(format!("Posts ({}):", posts.len()));
            for post in posts {
                out.push(format!(
                    "  {} - {} [{}]",
                    post.date.as_deref().unwrap_or("----------"),
                    post.title,
                    post.slug.as_deref().unwrap_or("")
                ));
            }
        }
        "slug" | "slugs" => {
            let slugs = pages::static_params(site).await?;
            out.push(format!("Slugs ({}):", slugs.len()));
            for slug in slugs {
                out.push(format!("  {}", slug));
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, slug", content_type);
        }
    }

    Ok(out)
}
