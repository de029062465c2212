//! Report writer trait and error types
//!
//! This module defines the interface the crawl result is handed to once
//! every category has been walked.

use crate::crawler::Category;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Serializes a category tree into a document
///
/// Writers render one section per category and one entry per item, keeping
/// the order of both slices.
pub trait ReportWriter {
    /// Renders the tree as a string
    fn render(&self, categories: &[Category]) -> String;

    /// Renders the tree and writes it to `path`
    fn write_to(&self, categories: &[Category], path: &Path) -> OutputResult<()> {
        let document = self.render(categories);
        std::fs::write(path, document).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
