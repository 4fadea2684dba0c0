//! Layout templates
//!
//! A small set of default layouts is embedded in the binary so a site works
//! out of the box; any file in the site's `_layouts` directory overrides the
//! embedded template with the same name (or adds a new one). Layouts are Tera
//! templates and receive `config`, `page`, and listing data in their context.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::content::Document;
use crate::error::{Error, Result};

/// Template engine with embedded defaults and per-site overrides
pub struct LayoutEngine {
    tera: Tera,
}

impl LayoutEngine {
    /// Build the engine: embedded defaults first, then disk overrides.
    pub fn load(layouts_dir: &Path) -> Result<Self> {
        let mut tera = Tera::default();

        // The engine emits HTML into HTML layouts; escaping is the content
        // pipeline's job, not the template's.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("default.html", include_str!("defaults/default.html")),
            ("post.html", include_str!("defaults/post.html")),
            ("index.html", include_str!("defaults/index.html")),
            ("category.html", include_str!("defaults/category.html")),
            ("categories.html", include_str!("defaults/categories.html")),
        ])
        .map_err(|e| Error::Render {
            file: "<embedded>".to_string(),
            layout: "defaults".to_string(),
            source: e,
        })?;

        if layouts_dir.is_dir() {
            for entry in WalkDir::new(layouts_dir)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
                    continue;
                }
                let name = match path.file_name().and_then(|n| n.to_str()) {
                    Some(n) => n.to_string(),
                    None => continue,
                };
                let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
                tera.add_raw_template(&name, &content)
                    .map_err(|e| Error::Render {
                        file: path.to_string_lossy().to_string(),
                        layout: name.clone(),
                        source: e,
                    })?;
                tracing::debug!("Loaded layout override: {}", name);
            }
        }

        Ok(Self { tera })
    }

    /// Whether a layout by this name exists
    pub fn has_layout(&self, layout: &str) -> bool {
        let name = template_name(layout);
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a document through its layout.
    /// Pure with respect to the document: the same document and context
    /// always produce the same HTML.
    pub fn render_document(&self, doc: &Document, context: &Context) -> Result<String> {
        let name = template_name(&doc.layout);
        if !self.has_layout(&doc.layout) {
            return Err(Error::Render {
                file: doc.source.clone(),
                layout: doc.layout.clone(),
                source: tera::Error::msg(format!("layout template '{}' not found", name)),
            });
        }
        self.tera.render(&name, context).map_err(|e| Error::Render {
            file: doc.source.clone(),
            layout: doc.layout.clone(),
            source: e,
        })
    }

    /// Render a listing template (index, category pages)
    pub fn render_listing(&self, template: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template, context)
            .map_err(|e| Error::Render {
                file: template.to_string(),
                layout: template.trim_end_matches(".html").to_string(),
                source: e,
            })
    }
}

fn template_name(layout: &str) -> String {
    format!("{}.html", layout)
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct DocumentData {
    pub id: String,
    pub title: String,
    /// Date formatted with the configured date format
    pub date: String,
    /// Machine-readable timestamp for <time datetime="...">
    pub datetime: String,
    pub url: String,
    pub permalink: String,
    pub categories: Vec<String>,
    pub content: String,
    pub excerpt: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub slug: String,
    pub documents: Vec<DocumentData>,
}
