//! Tag cloud bucketing

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a tag's document count maps to a cloud bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BucketAlgorithm {
    /// floor(ln(count)); a tag used once lands in bucket 0 and is dropped
    Log,
    /// Linear spread over `num_buckets` equal-width buckets up to the max count
    #[default]
    Count,
}

impl BucketAlgorithm {
    /// Raw bucket for `count`, before the `< 1` cutoff
    pub fn bucket(&self, count: usize, max_count: usize, num_buckets: usize) -> f64 {
        match self {
            BucketAlgorithm::Log => (count as f64).ln().floor(),
            BucketAlgorithm::Count => {
                let bucket_size = max_count as f64 / num_buckets as f64;
                (count as f64 / bucket_size).floor()
            }
        }
    }
}

/// Filtering and URL settings for `DocumentTree::cloudify`
#[derive(Debug, Clone, PartialEq)]
pub struct CloudOptions {
    pub min_count: usize,
    pub num_buckets: usize,
    pub blacklist: BTreeSet<String>,
    pub algorithm: BucketAlgorithm,
    pub base_url: String,
    pub suffix: String,
}

impl Default for CloudOptions {
    fn default() -> Self {
        CloudOptions {
            min_count: 2,
            num_buckets: 6,
            blacklist: BTreeSet::new(),
            algorithm: BucketAlgorithm::default(),
            base_url: "/blog/tags/".to_string(),
            suffix: ".html".to_string(),
        }
    }
}

impl CloudOptions {
    pub fn tag_url(&self, tag: &str) -> String {
        format!("{}{}{}", self.base_url, tag, self.suffix)
    }
}

/// One weighted tag of the cloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudEntry {
    pub tag: String,
    pub bucket: u32,
    pub url: String,
}

impl CloudEntry {
    pub fn new(tag: impl Into<String>, bucket: u32, url: impl Into<String>) -> Self {
        CloudEntry {
            tag: tag.into(),
            bucket,
            url: url.into(),
        }
    }
}

/// Turn `(tag, document count)` pairs into cloud entries.
///
/// A tag is dropped when its count is below `min_count`, its bucket is below
/// 1, or it is blacklisted. Output follows input order.
pub fn bucketize<'a, I>(counts: I, options: &CloudOptions) -> Vec<CloudEntry>
where
    I: IntoIterator<Item = (&'a str, usize)>,
{
    let counts: Vec<(&str, usize)> = counts.into_iter().collect();
    let max_count = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);

    counts
        .into_iter()
        .filter_map(|(tag, count)| {
            let bucket = options
                .algorithm
                .bucket(count, max_count, options.num_buckets);

            if count < options.min_count || bucket < 1.0 || options.blacklist.contains(tag) {
                return None;
            }

            Some(CloudEntry::new(tag, bucket as u32, options.tag_url(tag)))
        })
        .collect()
}
