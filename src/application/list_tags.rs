//! List tags use case

use super::build_site::sorted_cloud;
use crate::error::Result;
use crate::infrastructure::SiteRepository;
use std::collections::BTreeMap;

/// A tag with its document count and cloud bucket, if it made the cloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSummary {
    pub tag: String,
    pub count: usize,
    pub bucket: Option<u32>,
}

/// Service for listing all tags of a site.
pub struct ListTagsService {
    repository: SiteRepository,
}

impl ListTagsService {
    /// Create a new list tags service.
    pub fn new(repository: SiteRepository) -> Self {
        Self { repository }
    }

    /// All tags in name order.
    pub fn execute(&self) -> Result<Vec<TagSummary>> {
        let config = self.repository.load_config()?;
        let tree = self.repository.load_tree(&config)?;

        let buckets: BTreeMap<String, u32> = sorted_cloud(&tree, &config)
            .into_iter()
            .map(|entry| (entry.tag, entry.bucket))
            .collect();

        Ok(tree
            .tag_counts()
            .map(|(tag, count)| TagSummary {
                tag: tag.to_string(),
                count,
                bucket: buckets.get(tag).copied(),
            })
            .collect())
    }
}
