//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable holding the read token used for draft reads
pub const TOKEN_ENV: &str = "SANITY_API_READ_TOKEN";

/// Environment variable holding the secret that unlocks draft mode
pub const PREVIEW_SECRET_ENV: &str = "SANITY_PREVIEW_SECRET";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Document
    pub language: String,
    pub direction: String,
    pub logo: String,

    // Output
    pub public_dir: String,
    /// Files copied verbatim into the output and served by the dev server
    pub static_dir: String,

    // Content store
    #[serde(default)]
    pub sanity: SanityConfig,

    // Draft mode and visual editing
    #[serde(default)]
    pub preview: PreviewConfig,

    // Fallbacks used when the settings document is missing fields
    #[serde(default)]
    pub demo: DemoConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            language: "ar".to_string(),
            direction: "rtl".to_string(),
            logo: "/logo.svg".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            sanity: SanityConfig::default(),
            preview: PreviewConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Secrets never live in the config file; pick them up from the environment
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                self.sanity.token = Some(token);
            }
        }
        if let Ok(secret) = std::env::var(PREVIEW_SECRET_ENV) {
            if !secret.is_empty() {
                self.preview.secret = Some(secret);
            }
        }
    }
}

/// Where and how to reach the content store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub studio_url: Option<String>,
    /// Path to an NDJSON dataset export; when set, queries are answered locally
    pub dataset_file: Option<String>,
    /// Seconds a published read may be served from the in-process cache
    pub revalidate_secs: u64,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for SanityConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-02-28".to_string(),
            use_cdn: true,
            studio_url: Some("/studio".to_string()),
            dataset_file: None,
            revalidate_secs: 60,
            token: None,
        }
    }
}

/// Draft mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub cookie_name: String,
    pub overlay_script: String,
    #[serde(skip_serializing)]
    pub secret: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            cookie_name: "__sanity_blog_draft".to_string(),
            overlay_script: "https://core.sanity-cdn.com/bridge.js".to_string(),
            secret: None,
        }
    }
}

/// Fallback site copy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub title: String,
    pub description: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "Blog.".to_string(),
            description: "A statically generated blog example using Sanity.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.language, "ar");
        assert_eq!(config.direction, "rtl");
        assert_eq!(config.sanity.dataset, "production");
        assert_eq!(config.sanity.revalidate_secs, 60);
        assert_eq!(config.demo.title, "Blog.");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
language: en
direction: ltr
sanity:
  project_id: abc123
  dataset: staging
  use_cdn: false
preview:
  cookie_name: drafts
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.direction, "ltr");
        assert_eq!(config.sanity.project_id, "abc123");
        assert_eq!(config.sanity.dataset, "staging");
        assert!(!config.sanity.use_cdn);
        assert_eq!(config.sanity.api_version, "2024-02-28");
        assert_eq!(config.preview.cookie_name, "drafts");
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let mut config = SiteConfig::default();
        config.sanity.token = Some("sk-secret".to_string());
        config.preview.secret = Some("letmein".to_string());
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("sk-secret"));
        assert!(!yaml.contains("letmein"));
    }
}
