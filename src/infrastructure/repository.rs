//! File system repository

use crate::domain::{Document, DocumentParser, DocumentTree};
use crate::error::{Result, TagtreeError};
use crate::infrastructure::config::{Config, SiteConfig};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Environment variable naming the site root
pub const ROOT_ENV: &str = "TAGTREE_ROOT";

/// A source document discovered under the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub relative: PathBuf,
    pub url: String,
}

/// Site root on disk: reads sources, writes generated artifacts
#[derive(Debug, Clone)]
pub struct SiteRepository {
    pub root: PathBuf,
}

impl SiteRepository {
    pub fn new(root: PathBuf) -> Self {
        SiteRepository { root }
    }

    /// Use the explicit root if given, then TAGTREE_ROOT, then the current directory
    pub fn discover(root: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = root {
            return Self::existing(root);
        }

        if let Ok(root_path) = std::env::var(ROOT_ENV) {
            return Self::existing(PathBuf::from(root_path));
        }

        Ok(SiteRepository::new(std::env::current_dir()?))
    }

    fn existing(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(TagtreeError::Config(format!(
                "Site root is not a directory: {}",
                root.display()
            )));
        }
        Ok(SiteRepository::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    pub fn is_initialized(&self) -> bool {
        Config::path_in(&self.root).is_file()
    }

    /// Path of an existing file relative to the root.
    ///
    /// `file` may be absolute or relative to the root; both sides are
    /// canonicalized, so a relative root still matches an absolute file.
    /// `None` when the file does not exist or lies outside the root.
    pub fn relative_to_root(&self, file: &Path) -> Option<PathBuf> {
        let root = fs::canonicalize(&self.root).ok()?;
        let file = fs::canonicalize(self.root.join(file)).ok()?;
        file.strip_prefix(&root).ok().map(Path::to_path_buf)
    }

    fn is_blacklisted(relative: &Path, site: &SiteConfig) -> bool {
        site.dir_blacklist
            .iter()
            .any(|blocked| relative.starts_with(blocked))
    }

    /// Walk the root for source documents, sorted by relative path.
    ///
    /// Hidden directories and blacklisted subtrees are skipped.
    pub fn list_sources(&self, site: &SiteConfig) -> Result<Vec<SourceEntry>> {
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                if entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.starts_with('.'))
                {
                    return false;
                }
                match entry.path().strip_prefix(&self.root) {
                    Ok(rel) if Self::is_blacklisted(rel, site) => {
                        tracing::debug!("Skipping blacklisted directory {}", rel.display());
                        false
                    }
                    _ => true,
                }
            });

        let mut sources = Vec::new();

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if !name.ends_with(&site.source_suffix) {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let Some(url) = document_url(
                relative,
                &site.base_url,
                &site.source_suffix,
                &site.output_suffix,
            ) else {
                tracing::warn!("Skipping non UTF-8 path {}", relative.display());
                continue;
            };

            sources.push(SourceEntry {
                relative: relative.to_path_buf(),
                url,
            });
        }

        tracing::debug!("Found {} source documents", sources.len());
        Ok(sources)
    }

    /// Parse every source document
    pub fn load_documents(&self, config: &Config) -> Result<Vec<Document>> {
        let parser = DocumentParser::new(config.parse_options());

        self.list_sources(&config.site)?
            .into_iter()
            .map(|source| {
                let mut document = parser.load(&self.root, &source.relative)?;
                document.url = source.url;
                tracing::debug!(
                    "Parsed {} ({} tags)",
                    source.relative.display(),
                    document.tags.len()
                );
                Ok(document)
            })
            .collect()
    }

    /// Scan, parse and index every source document
    pub fn load_tree(&self, config: &Config) -> Result<DocumentTree> {
        let mut tree = DocumentTree::new();
        for document in self.load_documents(config)? {
            tree.add(document);
        }
        Ok(tree)
    }

    /// Create a directory relative to the root; an existing one is fine
    pub fn ensure_dir(&self, dir: &Path) -> Result<PathBuf> {
        let path = self.root.join(dir);
        match fs::create_dir_all(&path) {
            Ok(()) => Ok(path),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(path),
            Err(e) => Err(TagtreeError::Io(e)),
        }
    }

    /// Write a file relative to the root, creating parent directories
    pub fn write_file(&self, relative: &Path, content: &str) -> Result<PathBuf> {
        let path = self.root.join(relative);

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&path, content)?;
        Ok(path)
    }

    /// Replace a file's content: write a temp file alongside, then rename
    /// into place.
    ///
    /// On Windows, `rename` does not overwrite existing files, so the
    /// destination is removed first. The temp file is removed again if the
    /// replace fails.
    pub fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let tmp_name = format!(
            "{}.tagtree-tmp-{}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("document"),
            std::process::id()
        );
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;

        if let Err(e) = Self::replace(&tmp_path, path) {
            if let Err(cleanup) = fs::remove_file(&tmp_path) {
                tracing::warn!("Could not remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(TagtreeError::Io(e));
        }
        Ok(())
    }

    fn replace(from: &Path, to: &Path) -> std::io::Result<()> {
        if cfg!(windows) && to.exists() {
            fs::remove_file(to)?;
        }
        fs::rename(from, to)
    }
}

/// URL of a source document: base URL joined to the relative path, with the
/// source suffix swapped for the output suffix.
///
/// `None` when the path is not valid UTF-8.
pub fn document_url(
    relative: &Path,
    base_url: &str,
    source_suffix: &str,
    output_suffix: &str,
) -> Option<String> {
    let parts: Vec<&str> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let joined = parts.join("/");
    let stem = joined.strip_suffix(source_suffix).unwrap_or(&joined);

    Some(format!(
        "{}/{}{}",
        base_url.trim_end_matches('/'),
        stem,
        output_suffix
    ))
}
