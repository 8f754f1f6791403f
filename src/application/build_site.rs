//! Site build use case
//!
//! Scans the sources, writes the tag cloud fragment and one page per tag,
//! ranks related documents and optionally rewrites the sources with cached
//! tag and related HTML.

use crate::domain::{CloudEntry, DocumentTree};
use crate::error::Result;
use crate::infrastructure::{Config, SiteRepository};
use chrono::Local;
use std::path::{Component, Path, PathBuf};

/// Options for a build
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Write a page for every tag, not only the ones in the cloud
    pub all_tags: bool,

    /// Rewrite source files with cached tag and related HTML
    pub rewrite: bool,

    /// Skip related document ranking
    pub skip_related: bool,
}

/// What a build produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub documents: usize,
    pub tags: usize,
    pub cloud: Vec<CloudEntry>,
    pub cloud_file: PathBuf,
    pub pages: Vec<PathBuf>,
    pub rewritten: usize,
}

/// Service for building the tag artifacts of a site
pub struct BuildService {
    repository: SiteRepository,
}

impl BuildService {
    pub fn new(repository: SiteRepository) -> Self {
        BuildService { repository }
    }

    /// Execute the build
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, a source cannot be read or
    /// an output cannot be written.
    pub fn execute(&self, options: BuildOptions) -> Result<BuildReport> {
        // 1. Load config and index every document
        let config = self.repository.load_config()?;
        let mut tree = self.repository.load_tree(&config)?;
        tracing::info!(
            "Indexed {} documents under {} tags",
            tree.len(),
            tree.tag_names().count()
        );

        // 2. Cloud fragment, alphabetical
        let cloud = sorted_cloud(&tree, &config);
        let renderer = config.renderer();
        let cloud_file = self
            .repository
            .write_file(&config.cloud.output, &renderer.cloud_html(&cloud))?;
        tracing::info!("Wrote tag cloud with {} tags to {}", cloud.len(), cloud_file.display());

        // 3. One page per tag
        let page_tags: Vec<String> = if options.all_tags || config.pages.all_tags {
            tree.tag_names().map(str::to_string).collect()
        } else {
            cloud.iter().map(|entry| entry.tag.clone()).collect()
        };
        let pages = self.write_tag_pages(&tree, &config, &page_tags)?;

        // 4. Related documents
        if config.related.enabled && !options.skip_related {
            tree.update_related(config.related.limit, &config.ignore_tags());
        }

        // 5. Write back sources
        let rewritten = if options.rewrite || config.related.rewrite_sources {
            self.rewrite_sources(&tree, &config)?
        } else {
            0
        };

        Ok(BuildReport {
            documents: tree.len(),
            tags: tree.tag_names().count(),
            cloud,
            cloud_file,
            pages,
            rewritten,
        })
    }

    fn write_tag_pages(
        &self,
        tree: &DocumentTree,
        config: &Config,
        tags: &[String],
    ) -> Result<Vec<PathBuf>> {
        let renderer = config.renderer();
        let generated = Local::now().naive_local();
        self.repository.ensure_dir(&config.pages.dir)?;

        let mut written = Vec::new();
        for tag in tags {
            if !is_file_name_safe(tag) {
                tracing::warn!("Skipping page for tag '{}': not usable as a file name", tag);
                continue;
            }

            let documents = tree.tagged_newest_first(tag);
            let page = renderer.tag_page(tag, &documents, generated);
            let relative = config
                .pages
                .dir
                .join(format!("{}{}", tag, config.pages.suffix));

            written.push(self.repository.write_file(&relative, &page)?);
            tracing::debug!("Wrote page for '{}' ({} documents)", tag, documents.len());
        }

        tracing::info!("Wrote {} tag pages", written.len());
        Ok(written)
    }

    fn rewrite_sources(&self, tree: &DocumentTree, config: &Config) -> Result<usize> {
        let renderer = config.renderer();
        let mut rewritten = 0usize;

        for id in tree.ids() {
            let Some(document) = tree.get(id) else {
                continue;
            };
            let Some(source) = &document.source else {
                continue;
            };

            let tags_html = renderer.tags_html(document.tags.iter().map(String::as_str));
            let related_html = renderer.related_html(&tree.related(id));
            let content = document.serialize_with_cache(&tags_html, &related_html);

            self.repository.write_atomic(source, &content)?;
            rewritten += 1;
        }

        tracing::info!("Rewrote {} source documents", rewritten);
        Ok(rewritten)
    }
}

/// Cloud entries sorted by tag name
pub fn sorted_cloud(tree: &DocumentTree, config: &Config) -> Vec<CloudEntry> {
    let mut cloud = tree.cloudify(&config.cloud_options());
    cloud.sort_by(|a, b| a.tag.cmp(&b.tag));
    cloud
}

/// A tag names a page file only if it is a single plain path component
fn is_file_name_safe(tag: &str) -> bool {
    let mut components = Path::new(tag).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !tag.contains(['/', '\\'])
}
