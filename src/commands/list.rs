//! List site content

use anyhow::Result;

use crate::content::{DocumentIndex, DocumentLoader};
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = DocumentLoader::new(site);
    let (documents, errors) = loader.load_all();
    for e in &errors {
        tracing::warn!("{}", e);
    }
    let index = DocumentIndex::build(documents);

    match content_type {
        "document" | "documents" => {
            println!("Documents ({}):", index.len());
            for doc in index.documents() {
                println!(
                    "  {} - {} [{}]",
                    doc.date.format("%Y-%m-%d"),
                    doc.title,
                    doc.source
                );
            }
        }
        "category" | "categories" => {
            let grouped = index.by_category();
            println!("Categories ({}):", grouped.len());
            for (name, docs) in grouped {
                println!("  {} ({})", name, docs.len());
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: documents, categories",
                content_type
            );
        }
    }

    Ok(())
}
