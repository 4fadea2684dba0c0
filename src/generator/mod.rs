//! Site generator
//!
//! Single-pass batch emit: every document page, the index page, the category
//! listings, the atom feed, and the search index are written from one
//! immutable `DocumentIndex`. Output locations depend only on the documents
//! and the configuration, so re-running on the same input reproduces the
//! same tree byte for byte.

use std::fs;
use std::path::{Path, PathBuf};
use tera::Context;
use walkdir::WalkDir;

use crate::content::{Document, DocumentIndex};
use crate::error::{Error, Result};
use crate::layouts::{CategoryData, DocumentData, LayoutEngine};
use crate::Site;

/// Static site generator
pub struct Generator {
    site: Site,
    engine: LayoutEngine,
}

impl Generator {
    /// Create a generator, loading layouts for this build
    pub fn new(site: &Site) -> Result<Self> {
        let engine = LayoutEngine::load(&site.layouts_dir)?;
        Ok(Self {
            site: site.clone(),
            engine,
        })
    }

    /// Generate the entire site from an index
    pub fn generate(&self, index: &DocumentIndex) -> Result<()> {
        fs::create_dir_all(&self.site.output_dir)
            .map_err(|e| Error::io(&self.site.output_dir, e))?;

        self.copy_assets()?;

        let documents: Vec<DocumentData> = index
            .documents()
            .iter()
            .map(|d| self.document_data(d))
            .collect();

        self.generate_document_pages(index, &documents)?;
        self.generate_index_page(&documents)?;
        self.generate_category_pages(index)?;
        self.generate_atom_feed(index)?;
        self.generate_search_index(index)?;

        Ok(())
    }

    /// Template-facing view of a document
    fn document_data(&self, doc: &Document) -> DocumentData {
        DocumentData {
            id: doc.id.clone(),
            title: doc.title.clone(),
            date: doc.date.format(&self.site.config.date_format).to_string(),
            datetime: doc.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            url: format!("/{}", doc.path.trim_start_matches('/')),
            permalink: doc.permalink.clone(),
            categories: doc.categories.clone(),
            content: doc.content.clone(),
            excerpt: doc.excerpt.clone(),
        }
    }

    fn base_context(&self, documents: &[DocumentData]) -> Context {
        let mut context = Context::new();
        context.insert("config", &self.site.config);
        context.insert("documents", documents);
        context
    }

    /// Render each document through its layout
    fn generate_document_pages(
        &self,
        index: &DocumentIndex,
        documents: &[DocumentData],
    ) -> Result<()> {
        let docs = index.documents();
        for (i, doc) in docs.iter().enumerate() {
            let mut context = self.base_context(documents);
            context.insert("page", &documents[i]);
            // Neighbours in index order, for layouts that link them
            if i + 1 < docs.len() {
                context.insert("older", &documents[i + 1]);
            }
            if i > 0 {
                context.insert("newer", &documents[i - 1]);
            }

            let html = self.engine.render_document(doc, &context)?;
            let output_path = self.output_path_for(&doc.path);
            self.write_page(&output_path, &html)?;
            tracing::debug!("Generated document: {:?}", output_path);
        }

        tracing::info!("Generated {} document pages", docs.len());
        Ok(())
    }

    /// Generate the site index page
    fn generate_index_page(&self, documents: &[DocumentData]) -> Result<()> {
        let context = self.base_context(documents);
        let html = self.engine.render_listing("index.html", &context)?;
        self.write_page(&self.site.output_dir.join("index.html"), &html)?;
        tracing::info!("Generated index page");
        Ok(())
    }

    /// Generate one listing page per category plus the category overview
    fn generate_category_pages(&self, index: &DocumentIndex) -> Result<()> {
        let grouped = index.by_category();

        let categories: Vec<CategoryData> = grouped
            .iter()
            .map(|(name, docs)| CategoryData {
                name: name.to_string(),
                slug: slug::slugify(name),
                documents: docs.iter().map(|d| self.document_data(d)).collect(),
            })
            .collect();

        let category_root = self.site.output_dir.join(&self.site.config.category_dir);

        for category in &categories {
            if category.slug.is_empty() {
                continue;
            }
            let mut context = Context::new();
            context.insert("config", &self.site.config);
            context.insert("category", category);

            let html = self.engine.render_listing("category.html", &context)?;
            let output_path = category_root.join(&category.slug).join("index.html");
            self.write_page(&output_path, &html)?;
        }

        let mut context = Context::new();
        context.insert("config", &self.site.config);
        context.insert("categories", &categories);
        let html = self.engine.render_listing("categories.html", &context)?;
        self.write_page(&category_root.join("index.html"), &html)?;

        tracing::info!("Generated {} category pages", categories.len());
        Ok(())
    }

    /// Generate the atom feed over the newest documents
    fn generate_atom_feed(&self, index: &DocumentIndex) -> Result<()> {
        let config = &self.site.config;
        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
        feed.push_str(&format!(
            "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
            config.base_url()
        ));
        feed.push_str(&format!("  <link href=\"{}/\"/>\n", config.base_url()));
        feed.push_str(&format!("  <id>{}/</id>\n", config.base_url()));
        if let Some(newest) = index.documents().first() {
            feed.push_str(&format!(
                "  <updated>{}</updated>\n",
                atom_timestamp(newest)
            ));
        }
        if !config.author.is_empty() {
            feed.push_str(&format!(
                "  <author><name>{}</name></author>\n",
                escape_xml(&config.author)
            ));
        }

        for doc in index.documents().iter().take(config.feed_limit) {
            feed.push_str("  <entry>\n");
            feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&doc.title)));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", doc.permalink));
            feed.push_str(&format!("    <id>{}</id>\n", doc.permalink));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                doc.date.format("%Y-%m-%dT%H:%M:%SZ")
            ));
            feed.push_str(&format!("    <updated>{}</updated>\n", atom_timestamp(doc)));
            let content = doc.excerpt.as_ref().unwrap_or(&doc.content);
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                cdata(content)
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        let output_path = self.site.output_dir.join("atom.xml");
        fs::write(&output_path, feed).map_err(|e| Error::io(&output_path, e))?;
        tracing::info!("Generated atom.xml");
        Ok(())
    }

    /// Generate the search index (JSON)
    fn generate_search_index(&self, index: &DocumentIndex) -> Result<()> {
        let search_data: Vec<serde_json::Value> = index
            .documents()
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id,
                    "title": d.title,
                    "url": format!("/{}", d.path.trim_start_matches('/')),
                    "date": d.date.format(&self.site.config.date_format).to_string(),
                    "categories": d.categories,
                    "content": strip_html(&d.content),
                })
            })
            .collect();

        let output_path = self.site.output_dir.join("search.json");
        let json = serde_json::to_string_pretty(&search_data)
            .map_err(|e| Error::io(&output_path, std::io::Error::other(e)))?;
        fs::write(&output_path, json).map_err(|e| Error::io(&output_path, e))?;
        tracing::info!("Generated search.json");
        Ok(())
    }

    /// Copy non-markdown source files verbatim to the output directory
    fn copy_assets(&self) -> Result<()> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if matches!(ext, Some("md") | Some("markdown")) {
                continue;
            }

            let relative = path
                .strip_prefix(source_dir)
                .map_err(|_| Error::io(path, std::io::Error::other("path outside source dir")))?;

            // Underscore directories hold content machinery, not assets
            let in_special_dir = relative.components().any(|c| {
                c.as_os_str()
                    .to_str()
                    .map(|s| s.starts_with('_') || s.starts_with('.'))
                    .unwrap_or(false)
            });
            if in_special_dir {
                continue;
            }

            let dest = self.site.output_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            fs::copy(path, &dest).map_err(|e| Error::io(path, e))?;
            tracing::debug!("Copied asset: {:?} -> {:?}", path, dest);
        }

        Ok(())
    }

    /// Map a document URL path to a file under the output directory
    fn output_path_for(&self, url_path: &str) -> PathBuf {
        let clean = url_path.trim_start_matches('/');
        if clean.ends_with(".html") {
            self.site.output_dir.join(clean)
        } else {
            self.site.output_dir.join(clean).join("index.html")
        }
    }

    fn write_page(&self, path: &Path, html: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(path, html).map_err(|e| Error::io(path, e))
    }
}

fn atom_timestamp(doc: &Document) -> String {
    doc.updated
        .unwrap_or(doc.date)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

/// Strip HTML tags from content
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Prepare document HTML for a CDATA section: a literal `]]>` in the body
/// (common in code samples) would terminate the section early, so the
/// sequence is split across two sections.
fn cdata(s: &str) -> String {
    strip_invalid_xml_chars(s).replace("]]>", "]]]]><![CDATA[>")
}

/// Strip control characters XML 1.0 does not allow
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & <b>"), "a &amp; &lt;b&gt;");
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("ok\u{0008}text"), "oktext");
        assert_eq!(strip_invalid_xml_chars("tab\tkept"), "tab\tkept");
    }

    #[test]
    fn test_cdata_splits_terminator_sequence() {
        assert_eq!(cdata("a]]>b"), "a]]]]><![CDATA[>b");
        assert_eq!(cdata("no terminator"), "no terminator");
    }
}
