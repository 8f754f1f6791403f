//! Related documents use case

use crate::error::{Result, TagtreeError};
use crate::infrastructure::SiteRepository;
use chrono::NaiveDateTime;
use std::path::Path;

/// One entry of a document's related list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedEntry {
    pub title: String,
    pub url: String,
    pub date: NaiveDateTime,
    pub shared_tags: Vec<String>,
}

/// Service for showing the related documents of a single source file
pub struct RelatedService {
    repository: SiteRepository,
}

impl RelatedService {
    pub fn new(repository: SiteRepository) -> Self {
        RelatedService { repository }
    }

    /// Rank the documents related to `file` (absolute, or relative to the root)
    pub fn execute(&self, file: &Path) -> Result<Vec<RelatedEntry>> {
        let config = self.repository.load_config()?;
        let mut tree = self.repository.load_tree(&config)?;
        tree.update_related(config.related.limit, &config.ignore_tags());

        let id = self
            .repository
            .relative_to_root(file)
            .and_then(|relative| tree.find_by_source(&self.repository.root().join(relative)))
            .ok_or_else(|| TagtreeError::DocumentNotFound(file.to_path_buf()))?;
        let Some(document) = tree.get(id) else {
            return Err(TagtreeError::DocumentNotFound(file.to_path_buf()));
        };

        Ok(tree
            .related(id)
            .into_iter()
            .map(|other| RelatedEntry {
                title: other.title.clone(),
                url: other.url.clone(),
                date: other.date,
                shared_tags: document.tags.intersection(&other.tags).cloned().collect(),
            })
            .collect())
    }
}
