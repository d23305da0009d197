//! Internationalization (i18n) support for UI copy

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

type Table = HashMap<String, serde_yaml::Value>;

/// Built-in language tables shipped with the binary
const BUILTIN: &[(&str, &str)] = &[("ar", include_str!("ar.yml")), ("en", include_str!("en.yml"))];

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, Table>,
}

impl I18n {
    /// Create a new i18n handler with no translations loaded
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            translations: HashMap::new(),
        }
    }

    /// Create a handler preloaded with the built-in tables
    pub fn builtin(language: &str) -> Self {
        let mut i18n = Self::new(language);
        for (lang, source) in BUILTIN {
            match serde_yaml::from_str::<Table>(source) {
                Ok(data) => {
                    i18n.translations.insert(lang.to_string(), data);
                }
                Err(e) => tracing::warn!("Failed to parse built-in language {}: {}", lang, e),
            }
        }
        i18n
    }

    /// Load language overrides from a directory of `<lang>.yml` files
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let lang = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("en")
                .to_string();
            let content = fs::read_to_string(&path)?;

            match serde_yaml::from_str::<Table>(&content) {
                Ok(data) => {
                    let table = self.translations.entry(lang).or_default();
                    for (key, value) in data {
                        match table.get_mut(&key) {
                            Some(existing) => merge_value(existing, value),
                            None => {
                                table.insert(key, value);
                            }
                        }
                    }
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => tracing::warn!("Failed to parse language file {:?}: {}", path, e),
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key; keys can be nested like "home.more_stories"
    pub fn get(&self, key: &str) -> String {
        self.get_for_lang(&self.language, key)
    }

    /// Get a translation for a specific language
    fn get_for_lang(&self, lang: &str, key: &str) -> String {
        if let Some(value) = self
            .translations
            .get(lang)
            .and_then(|data| get_nested_value(data, key))
        {
            return yaml_value_to_string(value);
        }

        // Fallback to English
        if lang != "en" {
            if let Some(value) = self
                .translations
                .get("en")
                .and_then(|data| get_nested_value(data, key))
            {
                return yaml_value_to_string(value);
            }
        }

        key.to_string()
    }

    /// Check if a translation exists for the current language
    pub fn has(&self, key: &str) -> bool {
        self.translations
            .get(&self.language)
            .and_then(|data| get_nested_value(data, key))
            .is_some()
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(data: &'a Table, key: &str) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?);

    for part in parts {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(serde_yaml::Value::String(part.to_string()));
            }
            _ => return None,
        }
    }

    current
}

/// Merge an override into a value, descending into nested mappings
fn merge_value(base: &mut serde_yaml::Value, over: serde_yaml::Value) {
    match (base, over) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(over)) => {
            for (key, value) in over {
                match base.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, over) => *base = over,
    }
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::builtin("en")
    }
}
