//! Configuration management

use crate::domain::render::{HtmlRenderer, Templates, DOCUMENT_DATE_FORMAT, PAGE_DATE_FORMAT};
use crate::domain::{BucketAlgorithm, CloudOptions, HeaderCase, ParseOptions};
use crate::error::{Result, TagtreeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the config file at the site root
pub const CONFIG_FILE: &str = "tagtree.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub cloud: CloudConfig,
    pub pages: PagesConfig,
    pub related: RelatedConfig,
    pub templates: Templates,
}

/// Source discovery and parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Prefix for document URLs
    pub base_url: String,
    /// Only files ending with this are documents
    pub source_suffix: String,
    /// Replaces `source_suffix` in document URLs
    pub output_suffix: String,
    /// Subtrees (relative to the root) that are never scanned
    pub dir_blacklist: Vec<PathBuf>,
    pub path_tags: bool,
    pub tags_header: HeaderCase,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            base_url: "/".to_string(),
            source_suffix: ".txt".to_string(),
            output_suffix: ".html".to_string(),
            dir_blacklist: vec![PathBuf::from("tags")],
            path_tags: true,
            tags_header: HeaderCase::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    pub min_count: usize,
    pub num_buckets: usize,
    pub algorithm: BucketAlgorithm,
    pub blacklist: Vec<String>,
    /// Prefix for tag page URLs
    pub base_url: String,
    /// Suffix for tag page URLs
    pub suffix: String,
    /// Cloud fragment file, relative to the root
    pub output: PathBuf,
}

impl Default for CloudConfig {
    fn default() -> Self {
        CloudConfig {
            min_count: 2,
            num_buckets: 6,
            algorithm: BucketAlgorithm::default(),
            blacklist: Vec::new(),
            base_url: "/tags/".to_string(),
            suffix: ".html".to_string(),
            output: PathBuf::from("tagcloud.html"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagesConfig {
    /// Directory for per-tag pages, relative to the root
    pub dir: PathBuf,
    /// File suffix of per-tag pages
    pub suffix: String,
    /// Format of the page's `meta-creation_date:` line
    pub date_format: String,
    /// Format of each document's date on a page
    pub document_date_format: String,
    /// Write a page for every tag, not only the ones in the cloud
    pub all_tags: bool,
}

impl Default for PagesConfig {
    fn default() -> Self {
        PagesConfig {
            dir: PathBuf::from("tags"),
            suffix: ".txt".to_string(),
            date_format: PAGE_DATE_FORMAT.to_string(),
            document_date_format: DOCUMENT_DATE_FORMAT.to_string(),
            all_tags: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedConfig {
    pub enabled: bool,
    pub limit: usize,
    /// Tags too broad to make two documents related
    pub ignore_tags: Vec<String>,
    /// Rewrite sources with cached tag and related HTML in the header
    pub rewrite_sources: bool,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        RelatedConfig {
            enabled: true,
            limit: crate::domain::related::DEFAULT_RELATED_LIMIT,
            ignore_tags: Vec::new(),
            rewrite_sources: false,
        }
    }
}

impl Config {
    /// Path of the config file for a site root
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load `tagtree.toml` from `root`, falling back to defaults when absent
    pub fn load_from_dir(root: &Path) -> Result<Self> {
        let config_path = Self::path_in(root);

        let contents = match fs::read_to_string(&config_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, root.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(TagtreeError::Io(e)),
        };

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to `tagtree.toml` in `root`
    pub fn save_to_dir(&self, root: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(Self::path_in(root), contents)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.cloud.num_buckets == 0 {
            return Err(TagtreeError::Config(
                "cloud.num_buckets must be at least 1".to_string(),
            ));
        }
        if self.site.source_suffix.is_empty() {
            return Err(TagtreeError::Config(
                "site.source_suffix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            tags_header: self.site.tags_header,
            path_tags: self.site.path_tags,
        }
    }

    pub fn cloud_options(&self) -> CloudOptions {
        CloudOptions {
            min_count: self.cloud.min_count,
            num_buckets: self.cloud.num_buckets,
            blacklist: self.cloud.blacklist.iter().cloned().collect(),
            algorithm: self.cloud.algorithm,
            base_url: self.cloud.base_url.clone(),
            suffix: self.cloud.suffix.clone(),
        }
    }

    pub fn ignore_tags(&self) -> BTreeSet<String> {
        self.related.ignore_tags.iter().cloned().collect()
    }

    /// Renderer whose tag links match the cloud's URLs
    pub fn renderer(&self) -> HtmlRenderer {
        let cloud = self.cloud_options();
        HtmlRenderer::new(self.templates.clone())
            .with_tag_url(move |tag| cloud.tag_url(tag))
            .with_date_formats(&self.pages.document_date_format, &self.pages.date_format)
    }
}
