//! Output formatting utilities

use crate::application::{BuildReport, RelatedEntry, TagSummary};

/// Format a list of tags for display.
pub fn format_tag_list(tags: &[TagSummary]) -> String {
    if tags.is_empty() {
        return "No tags found".to_string();
    }

    let width = tags.iter().map(|t| t.tag.chars().count()).max().unwrap_or(0);

    let mut output = String::new();
    for summary in tags {
        let bucket = summary
            .bucket
            .map(|b| format!("  (bucket {})", b))
            .unwrap_or_default();
        output.push_str(&format!(
            "{:<width$}  {}{}\n",
            summary.tag,
            summary.count,
            bucket,
            width = width
        ));
    }
    output
}

/// Format related documents for display
pub fn format_related_list(related: &[RelatedEntry]) -> String {
    if related.is_empty() {
        return "No related documents".to_string();
    }

    let mut output = String::new();
    for entry in related {
        output.push_str(&format!(
            "{}  {}  [{}]  {}\n",
            entry.date.format("%d-%m-%Y"),
            entry.title,
            entry.shared_tags.join(", "),
            entry.url
        ));
    }
    output
}

/// Summarize a build
pub fn format_build_report(report: &BuildReport) -> String {
    let mut output = format!(
        "Indexed {} documents, {} tags\n\
        Tag cloud: {} tags -> {}\n\
        Tag pages: {}\n",
        report.documents,
        report.tags,
        report.cloud.len(),
        report.cloud_file.display(),
        report.pages.len()
    );
    if report.rewritten > 0 {
        output.push_str(&format!("Rewrote {} sources\n", report.rewritten));
    }
    output
}
