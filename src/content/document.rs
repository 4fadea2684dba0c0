//! Document model
//!
//! One record type with optional fields covers every source document; there
//! is no post/page hierarchy. A Document is constructed once at load time and
//! never mutated afterwards, so rendering can borrow it freely.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// A loaded content document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier, derived from the source filename stem
    pub id: String,

    /// Document title
    pub title: String,

    /// Publication date
    pub date: NaiveDateTime,

    /// Last updated date
    pub updated: Option<NaiveDateTime>,

    /// Categories, in front-matter order
    pub categories: Vec<String>,

    /// Layout template name
    pub layout: String,

    /// Raw markdown body
    pub raw: String,

    /// Rendered HTML body
    pub content: String,

    /// Rendered excerpt (before <!-- more -->), if any
    pub excerpt: Option<String>,

    /// Source file path relative to the source dir
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (site-root relative)
    pub path: String,

    /// Full permalink URL
    pub permalink: String,

    /// URL-friendly name derived from the filename
    pub slug: String,

    /// Whether the document is published
    pub published: bool,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Document {
    /// Create a document with the minimal required fields
    pub fn new(id: String, title: String, date: NaiveDateTime, source: String) -> Self {
        let slug = slug::slugify(&id);
        Self {
            id,
            title,
            date,
            updated: None,
            categories: Vec::new(),
            layout: "post".to_string(),
            raw: String::new(),
            content: String::new(),
            excerpt: None,
            source: source.clone(),
            full_source: PathBuf::from(source),
            path: String::new(),
            permalink: String::new(),
            slug,
            published: true,
            extra: HashMap::new(),
        }
    }
}
