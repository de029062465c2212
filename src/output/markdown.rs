//! Markdown report generation
//!
//! This module renders the category tree as a markdown document: a title,
//! one `##` heading per category, and one link per series.

use crate::crawler::Category;
use crate::output::traits::ReportWriter;

/// Markdown renderer of a category tree
#[derive(Debug, Clone)]
pub struct MarkdownReport {
    title: String,
}

impl MarkdownReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl ReportWriter for MarkdownReport {
    fn render(&self, categories: &[Category]) -> String {
        format_markdown_report(&self.title, categories)
    }
}

/// Formats the category tree as markdown
///
/// # Example
///
/// ```
/// use catalog_walker::crawler::{Category, Item};
/// use catalog_walker::output::format_markdown_report;
///
/// let mut category = Category::new("AI", "https://example.com/ai");
/// category.merge(vec![Item::new("Rust", "https://example.com/s/1")]);
///
/// let md = format_markdown_report("Catalog", &[category]);
/// assert_eq!(md, "# Catalog\n\n## AI\n\n- [Rust](https://example.com/s/1)\n\n");
/// ```
pub fn format_markdown_report(title: &str, categories: &[Category]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", title));

    for category in categories {
        md.push_str(&format!("## {}\n\n", category.name));
        for item in category.records.iter() {
            md.push_str(&format!(
                "- [{}]({})\n",
                escape_link_text(&item.title),
                escape_link_target(&item.url)
            ));
        }
        md.push('\n');
    }

    md
}

/// Collapses whitespace runs and escapes brackets
///
/// The link text must stay on one list line and cannot close early.
fn escape_link_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('[', "\\[")
        .replace(']', "\\]")
}

/// Percent-encodes characters that would end the link target
fn escape_link_target(url: &str) -> String {
    url.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}
