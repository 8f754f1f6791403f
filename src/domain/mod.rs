//! Domain layer - Document parsing, tag index and rendering

pub mod cloud;
pub mod document;
pub mod related;
pub mod render;
pub mod tree;

pub use cloud::{BucketAlgorithm, CloudEntry, CloudOptions};
pub use document::{Document, DocumentParser, HeaderCase, ParseOptions};
pub use render::{HtmlRenderer, Templates};
pub use tree::{DocumentId, DocumentTree};
