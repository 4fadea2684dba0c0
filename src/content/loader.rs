//! Document loader
//!
//! Walks the source directory and turns each markdown file into a Document.
//! A file that fails to parse is reported as an error and skipped; the rest
//! of the set still loads, so one bad document never hides the others. The
//! caller decides what a non-empty error list means for the build as a whole.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{Document, FrontMatter, MarkdownRenderer};
use crate::error::Error;
use crate::Site;

/// Loads documents from the source directory
pub struct DocumentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> DocumentLoader<'a> {
    /// Create a new loader for one build
    pub fn new(site: &'a Site) -> Self {
        let renderer = MarkdownRenderer::new(&site.config.highlight_theme);
        Self { site, renderer }
    }

    /// Load every markdown document under the source directory.
    ///
    /// Returns the documents that parsed cleanly together with one error per
    /// file that did not. Identifiers are checked for uniqueness across the
    /// whole set.
    pub fn load_all(&self) -> (Vec<Document>, Vec<Error>) {
        let mut documents = Vec::new();
        let mut errors = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();

        if !self.site.source_dir.exists() {
            return (documents, errors);
        }

        let mut paths: Vec<_> = WalkDir::new(&self.site.source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_markdown_file(e.path()))
            .map(|e| e.into_path())
            .collect();
        // Deterministic load order regardless of directory iteration order
        paths.sort();

        for path in paths {
            if self.should_skip(&path) {
                continue;
            }

            match self.load_document(&path) {
                Ok(doc) => {
                    if !doc.published && !self.site.config.render_drafts {
                        tracing::debug!("Skipping unpublished document {:?}", path);
                        continue;
                    }
                    if !seen_ids.insert(doc.id.clone()) {
                        errors.push(Error::parse(
                            doc.source.clone(),
                            format!("duplicate document identifier '{}'", doc.id),
                        ));
                        continue;
                    }
                    documents.push(doc);
                }
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", path, e);
                    errors.push(e);
                }
            }
        }

        (documents, errors)
    }

    /// Whether a markdown file sits somewhere we do not load from
    fn should_skip(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.site.source_dir).unwrap_or(path);

        relative.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            if name == "_drafts" {
                return !self.site.config.render_drafts;
            }
            // Layout and include directories are not content
            name.starts_with('.') || (name.starts_with('_') && name != "_posts" && name != "_drafts")
        })
    }

    /// Load a single document from a file
    fn load_document(&self, path: &Path) -> Result<Document, Error> {
        let source = path
            .strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| Error::parse(&source, e.to_string()))?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");
        let (filename_date, filename_slug) = split_filename(stem);

        let title = fm
            .title
            .clone()
            .ok_or_else(|| Error::parse(&source, "missing required field 'title'"))?;

        // Explicit front-matter date wins over the filename date
        let date = match fm
            .parse_date()
            .map_err(|e| Error::parse(&source, e.to_string()))?
        {
            Some(d) => d,
            None => filename_date
                .ok_or_else(|| Error::parse(&source, "missing required field 'date'"))?,
        };

        let updated = fm
            .parse_updated()
            .map_err(|e| Error::parse(&source, e.to_string()))?;

        let slug = slug::slugify(filename_slug);
        let id = stem.to_string();

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let content_html = self.renderer.render(&full_md);
        let excerpt_html = excerpt_md.as_deref().map(|e| self.renderer.render(e));

        let permalink_path = self.expand_permalink(&date, &slug, &fm.categories);
        let permalink = format!("{}{}", self.site.config.base_url(), permalink_path);

        let mut doc = Document::new(id, title, date, source);
        doc.updated = updated;
        doc.categories = fm.categories;
        doc.layout = fm.layout.unwrap_or_else(|| "post".to_string());
        doc.raw = body.to_string();
        doc.content = content_html;
        doc.excerpt = excerpt_html;
        doc.full_source = path.to_path_buf();
        doc.path = permalink_path;
        doc.permalink = permalink;
        doc.slug = slug;
        doc.published = fm.published;
        doc.extra = fm.extra;

        Ok(doc)
    }

    /// Expand the configured permalink pattern
    fn expand_permalink(&self, date: &NaiveDateTime, slug: &str, categories: &[String]) -> String {
        let pattern = &self.site.config.permalink;

        let category = categories
            .first()
            .map(|c| slug::slugify(c))
            .unwrap_or_default();

        let result = pattern
            .replace(":year", &date.format("%Y").to_string())
            .replace(":month", &date.format("%m").to_string())
            .replace(":day", &date.format("%d").to_string())
            .replace(":title", slug)
            .replace(":category", &category);

        format!(
            "{}{}",
            self.site.config.root,
            result.trim_start_matches('/')
        )
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

/// Split a filename stem into its optional date prefix and slug part.
/// `2020-09-20-welcome-post` yields (2020-09-20 00:00, "welcome-post").
fn split_filename(stem: &str) -> (Option<NaiveDateTime>, &str) {
    if stem.len() > 11 && stem.as_bytes()[..11].is_ascii() && stem.as_bytes()[10] == b'-' {
        if let Ok(date) = NaiveDate::parse_from_str(&stem[..10], "%Y-%m-%d") {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return (Some(dt), &stem[11..]);
            }
        }
    }
    (None, stem)
}
