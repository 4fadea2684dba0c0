//! inkpress: a small static blog generator
//!
//! Dated, categorized markdown documents with YAML front-matter go in, a
//! deterministic HTML site comes out: one page per document, an index page
//! ordered newest-first, category listings, an atom feed, and a search index.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod layouts;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// One site build's view of the world: configuration plus resolved
/// directories. Constructed fresh for every build, never shared mutable
/// state across builds.
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory (holds _config.yml)
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Layout override directory
    pub layouts_dir: PathBuf,
}

impl Site {
    /// Create a site from a base directory, reading `_config.yml` when
    /// present and falling back to defaults otherwise.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an explicit configuration object
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let output_dir = base_dir.join(&config.output_dir);
        let layouts_dir = base_dir.join(&config.layouts_dir);

        Self {
            config,
            base_dir,
            source_dir,
            output_dir,
            layouts_dir,
        }
    }

    /// Build the static site
    pub fn build(&self) -> anyhow::Result<()> {
        commands::build::run(self)
    }

    /// Clean the output directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }

    /// Scaffold a new document
    pub fn new_document(&self, title: &str) -> anyhow::Result<()> {
        commands::new::run(self, title)
    }
}
