//! tagtree - Tag index and tag cloud generator for plain-text documents
//!
//! Parses documents with a small header grammar, indexes them by tag, and
//! derives a weighted tag cloud, one page per tag and a ranked list of
//! related documents for every document.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::TagtreeError;
