//! Application layer - Use cases and orchestration

pub mod build_site;
pub mod init;
pub mod list_tags;
pub mod related;

pub use build_site::{BuildOptions, BuildReport, BuildService};
pub use list_tags::{ListTagsService, TagSummary};
pub use related::{RelatedEntry, RelatedService};
