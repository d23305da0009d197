//! sanity-blog: a blog front end for a Sanity content store
//!
//! Pages are rendered on request by an axum server or ahead of time into a
//! static directory. Content comes from the Sanity HTTP query API, or from a
//! local NDJSON dataset export when one is configured.

pub mod cache;
pub mod commands;
pub mod components;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod pages;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentSource, DatasetSource, SanityClient};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static asset directory
    pub static_dir: PathBuf,
}

impl Blog {
    /// Create a new blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            let mut config = config::SiteConfig::default();
            config.apply_env();
            config
        };

        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            static_dir,
        })
    }

    /// The configured content source
    pub fn source(&self) -> Result<Arc<dyn ContentSource>> {
        match &self.config.sanity.dataset_file {
            Some(file) => Ok(Arc::new(DatasetSource::load(self.base_dir.join(file))?)),
            None => Ok(Arc::new(SanityClient::new(&self.config.sanity)?)),
        }
    }

    /// UI strings for the configured language, with local overrides
    pub fn i18n(&self) -> Result<i18n::I18n> {
        let mut i18n = i18n::I18n::builtin(&self.config.language);
        let languages_dir = self.base_dir.join("languages");
        if languages_dir.exists() {
            i18n.load_languages(&languages_dir)?;
        }
        if !i18n.has("footer.copyright") {
            tracing::warn!(
                "No UI strings for language {:?}, falling back to English",
                i18n.language()
            );
        }
        Ok(i18n)
    }

    /// Everything needed to render pages
    pub fn site(&self) -> Result<pages::Site> {
        Ok(pages::Site::new(
            self.config.clone(),
            self.source()?,
            self.i18n()?,
        )?)
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_without_config() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();
        assert_eq!(blog.public_dir, tmp.path().join("public"));
        assert_eq!(blog.static_dir, tmp.path().join("static"));
        assert_eq!(blog.config.language, "ar");
    }

    #[test]
    fn test_missing_project_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let blog = Blog::new(tmp.path()).unwrap();
        assert!(blog.source().is_err());
    }

    #[tokio::test]
    async fn test_generate_from_dataset_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("_config.yml"),
            "language: en\ndirection: ltr\nsanity:\n  project_id: demo\n  dataset_file: data.ndjson\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("data.ndjson"),
            r#"{"_id":"p1","_type":"post","title":"Hello","slug":{"current":"hello"},"date":"2024-01-01"}"#,
        )
        .unwrap();
        fs::create_dir_all(tmp.path().join("languages")).unwrap();
        fs::write(
            tmp.path().join("languages/en.yml"),
            "home:\n  more_stories: Other posts\n",
        )
        .unwrap();

        let blog = Blog::new(tmp.path()).unwrap();
        blog.generate().await.unwrap();

        let index = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(index.contains(r#"<html lang="en" dir="ltr""#));
        assert!(index.contains("Hello"));
        assert!(index.contains("Other posts"));
        assert!(blog.public_dir.join("posts/hello/index.html").exists());

        blog.clean().unwrap();
        assert!(!blog.public_dir.exists());
    }
}
