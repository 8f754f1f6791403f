//! Tag index over a collection of documents

use super::cloud::{bucketize, CloudEntry, CloudOptions};
use super::related::rank_related;
use super::Document;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Position of a document inside its `DocumentTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(usize);

/// A collection of documents plus the tag → documents mapping.
///
/// Documents live in one arena; the tag index and each document's `related`
/// list refer to them by `DocumentId`.
#[derive(Debug, Default)]
pub struct DocumentTree {
    documents: Vec<Document>,
    tags: BTreeMap<String, Vec<DocumentId>>,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, indexing it under each of its tags
    pub fn add(&mut self, document: Document) -> DocumentId {
        let id = DocumentId(self.documents.len());

        for tag in &document.tags {
            self.tags.entry(tag.clone()).or_default().push(id);
        }

        self.documents.push(document);
        id
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents in insertion order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn ids(&self) -> impl Iterator<Item = DocumentId> {
        (0..self.documents.len()).map(DocumentId)
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id.0)
    }

    /// Tag names in sorted order
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// `(tag, number of documents)` in tag name order
    pub fn tag_counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.tags.iter().map(|(tag, ids)| (tag.as_str(), ids.len()))
    }

    /// Ids carrying `tag`, in insertion order
    pub fn tagged_ids(&self, tag: &str) -> &[DocumentId] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Documents carrying `tag`, in insertion order
    pub fn tagged(&self, tag: &str) -> Vec<&Document> {
        self.resolve(self.tagged_ids(tag))
    }

    /// Documents carrying `tag`, newest first
    pub fn tagged_newest_first(&self, tag: &str) -> Vec<&Document> {
        let mut documents = self.tagged(tag);
        documents.sort_by(|a, b| b.date.cmp(&a.date));
        documents
    }

    /// Find the document loaded from `path`
    pub fn find_by_source(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .position(|doc| doc.source.as_deref() == Some(path))
            .map(DocumentId)
    }

    /// Weighted tag cloud entries, in tag name order
    pub fn cloudify(&self, options: &CloudOptions) -> Vec<CloudEntry> {
        bucketize(self.tag_counts(), options)
    }

    /// Rank and store the related documents of every document.
    ///
    /// Needs the complete index, so run it after the last `add`.
    pub fn update_related(&mut self, limit: usize, ignore_tags: &BTreeSet<String>) {
        let rankings: Vec<Vec<DocumentId>> = self
            .ids()
            .map(|id| rank_related(self, id, limit, ignore_tags))
            .collect();

        for (document, related) in self.documents.iter_mut().zip(rankings) {
            document.related = related;
        }
    }

    /// Related documents of `id`, in ranked order
    pub fn related(&self, id: DocumentId) -> Vec<&Document> {
        self.get(id)
            .map(|doc| self.resolve(&doc.related))
            .unwrap_or_default()
    }

    fn resolve(&self, ids: &[DocumentId]) -> Vec<&Document> {
        ids.iter().filter_map(|id| self.get(*id)).collect()
    }
}
