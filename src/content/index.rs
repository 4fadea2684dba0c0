//! Document index
//!
//! The index is a derived view over the loaded document set: newest first,
//! ties broken by identifier so that two documents sharing a date always
//! come out in the same order. It is rebuilt from scratch on every build and
//! never persisted.

use std::collections::BTreeMap;

use super::Document;

/// Ordered view over a document set
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    documents: Vec<Document>,
}

impl DocumentIndex {
    /// Build the index: date descending, then id ascending.
    pub fn build(mut documents: Vec<Document>) -> Self {
        documents.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Self { documents }
    }

    /// Documents in index order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Group documents by category, categories sorted by name, documents in
    /// index order within each group.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&Document>> {
        let mut map: BTreeMap<&str, Vec<&Document>> = BTreeMap::new();
        for doc in &self.documents {
            for cat in &doc.categories {
                let cat = cat.trim();
                if cat.is_empty() {
                    continue;
                }
                map.entry(cat).or_default().push(doc);
            }
        }
        map
    }
}
