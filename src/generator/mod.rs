//! Static site generator
//!
//! Renders every route in published mode and writes the documents under the
//! public directory, next to a copy of the static assets.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::DraftMode;
use crate::pages::{self, PageOutcome, Site};
use crate::Blog;

/// Writes the rendered site to disk
pub struct Generator {
    public_dir: PathBuf,
    static_dir: PathBuf,
    site: Site,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            public_dir: blog.public_dir.clone(),
            static_dir: blog.static_dir.clone(),
            site: blog.site()?,
        })
    }

    /// Create a generator over an existing site
    pub fn with_site(site: Site, public_dir: PathBuf, static_dir: PathBuf) -> Self {
        Self {
            public_dir,
            static_dir,
            site,
        }
    }

    /// Generate the entire site, returning the number of pages written
    pub async fn generate(&self) -> Result<usize> {
        let draft = DraftMode::Disabled;
        fs::create_dir_all(&self.public_dir)?;

        self.copy_static_assets()?;

        let mut written = 0;

        if let PageOutcome::Found(html) = pages::render_home(&self.site, draft).await? {
            self.write_page(&self.public_dir.join("index.html"), &html)?;
            written += 1;
        }

        let slugs = pages::static_params(&self.site).await?;
        tracing::info!("Rendering {} posts", slugs.len());

        for slug in &slugs {
            if !is_safe_slug(slug) {
                tracing::warn!("Skipping post with unsafe slug {:?}", slug);
                continue;
            }

            match pages::render_post(&self.site, slug, draft).await? {
                PageOutcome::Found(html) => {
                    let path = self.public_dir.join("posts").join(slug).join("index.html");
                    self.write_page(&path, &html)?;
                    written += 1;
                }
                PageOutcome::NotFound => {
                    tracing::warn!("Post {:?} disappeared while generating", slug);
                }
            }
        }

        let html = pages::render_not_found(&self.site, draft).await?;
        self.write_page(&self.public_dir.join("404.html"), &html)?;
        written += 1;

        Ok(written)
    }

    fn write_page(&self, path: &Path, html: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Generated: {:?}", path);
        Ok(())
    }

    /// Copy static assets (logo, images, etc.)
    fn copy_static_assets(&self) -> Result<()> {
        if !self.static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(&self.static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let relative = path.strip_prefix(&self.static_dir)?;
                let dest = self.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// A slug usable as a single directory name
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
}
