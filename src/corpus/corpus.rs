//! Document collection for one source.
use std::collections::{HashMap, HashSet};

use crate::corpus::Document;

/// Minimum joined-content length for a document to survive
/// [Corpus::copy_no_duplicates].
const MIN_CONTENT_LEN: usize = 50;

/// Ordered documents of one source, with id lookup.
///
/// The index maps every document id to its position; ids are unique and
/// the last inserted document wins.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    source: String,
    id: String,
    documents: Vec<Document>,
    index: HashMap<String, usize>,
}

impl Corpus {
    /// `source` is the web domain, `id` usually the corpus file name.
    pub fn new(source: &str, id: &str) -> Self {
        Corpus {
            source: source.to_string(),
            id: id.to_string(),
            documents: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_documents(source: &str, id: &str, documents: Vec<Document>) -> Self {
        let mut corpus = Corpus::new(source, id);
        for doc in documents {
            corpus.add_document(doc);
        }
        corpus
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn add_document(&mut self, document: Document) {
        self.index
            .insert(document.id().to_string(), self.documents.len());
        self.documents.push(document);
    }

    pub fn get_document(&self, id: &str) -> Option<&Document> {
        self.index.get(id).map(|&i| &self.documents[i])
    }

    /// Non-blank line count over all documents.
    pub fn total_line_count(&self) -> usize {
        self.documents
            .iter()
            .flat_map(|d| d.lines())
            .filter(|l| !l.is_empty())
            .count()
    }

    /// Distinct document count by content hash.
    pub fn unique_document_count(&self) -> usize {
        self.documents
            .iter()
            .map(Document::content_hash)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Copy without exact content duplicates, dropping documents with less
    /// than [MIN_CONTENT_LEN] characters of content.
    pub fn copy_no_duplicates(&self) -> Corpus {
        let mut seen = HashSet::new();
        let mut out = Corpus::new(&self.source, &self.id);
        for doc in &self.documents {
            if doc.content_len() < MIN_CONTENT_LEN {
                continue;
            }
            if seen.insert(doc.content_hash()) {
                out.add_document(doc.clone());
            }
        }
        out
    }
}
