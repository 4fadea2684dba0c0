//! Site configuration (_config.yml)
//!
//! Configuration is an explicit object constructed once per build and passed
//! down into the loader and generator. Nothing here is process-global, so
//! repeated builds in one process (watch mode) start from a clean slate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub root: String,
    pub permalink: String,

    // Directories (relative to the site base dir)
    pub source_dir: String,
    pub output_dir: String,
    pub layouts_dir: String,
    pub category_dir: String,

    // Writing
    pub render_drafts: bool,
    pub new_document_name: String,

    // Markdown
    pub highlight_theme: String,

    // Feed
    pub feed_limit: usize,

    // Date format used when printing dates into pages
    pub date_format: String,

    /// Additional fields passed through to templates untouched
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Inkpress".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            permalink: ":year/:month/:day/:title/".to_string(),

            source_dir: "source".to_string(),
            output_dir: "public".to_string(),
            layouts_dir: "_layouts".to_string(),
            category_dir: "categories".to_string(),

            render_drafts: false,
            new_document_name: ":year-:month-:day-:title.md".to_string(),

            highlight_theme: "base16-ocean.dark".to_string(),

            feed_limit: 20,

            date_format: "%Y-%m-%d".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::parse(path.to_string_lossy(), e.to_string()))?;
        Ok(config)
    }

    /// Site base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}
