//! HTML rendering of documents, tag pages, clouds and related lists
//!
//! Two ways to customize output: override any of the `Templates`, or swap
//! the function mapping a tag name to its page URL.

use super::cloud::CloudEntry;
use super::Document;
use chrono::NaiveDateTime;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

// Built-in template constants
pub const TAG_TEMPLATE: &str = r#"<li class="tag"><a href="{url}">{name}</a></li>"#;
pub const TAG_LIST_TEMPLATE: &str = r#"<ul class="tags">{tags}</ul>"#;
pub const DOCUMENT_TEMPLATE: &str = r#"<div class="tag-doc"><h2><a href="{url}">{title}</a></h2><div class="date">{date}</div><div class="body"><p>{excerpt}</p><a class="seemore" href="{url}">Read more...</a>{tags}</div></div>"#;
pub const PAGE_TEMPLATE: &str = "Articles tagged with '{tag}'\nmeta-creation_date: {date}\n\n<div class=\"tag-docs\" data-count=\"{count}\">{docs}</div>";
pub const CLOUD_TEMPLATE: &str = r#"<div class="tag-cloud">{tags}</div>"#;
pub const CLOUD_TAG_TEMPLATE: &str = r#"<a class="tag-{bucket}" href="{url}">{tag}</a>"#;
pub const RELATED_TEMPLATE: &str = r#"<ul class="related">{items}</ul>"#;
pub const RELATED_ITEM_TEMPLATE: &str = r#"<li><a href="{url}">{title}</a></li>"#;

pub const DOCUMENT_DATE_FORMAT: &str = "%d %b %Y";
pub const PAGE_DATE_FORMAT: &str = "%m/%d/%Y %H:%M:00";

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\{([A-Za-z_]+)\}").unwrap())
}

/// Replace `{name}` placeholders in one pass.
///
/// Unknown placeholders are left untouched, and substituted values are never
/// re-scanned.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            vars.iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Overridable markup templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    /// One tag link: `{name}`, `{url}`
    pub tag: String,
    /// Wrapper around tag links: `{tags}`
    pub tag_list: String,
    /// One document on a tag page: `{title}`, `{url}`, `{date}`, `{excerpt}`, `{tags}`
    pub document: String,
    /// Whole tag page: `{tag}`, `{date}`, `{count}`, `{docs}`
    pub page: String,
    /// Cloud wrapper: `{tags}`
    pub cloud: String,
    /// One cloud link: `{tag}`, `{bucket}`, `{url}`
    pub cloud_tag: String,
    /// Related wrapper: `{items}`
    pub related: String,
    /// One related link: `{title}`, `{url}`
    pub related_item: String,
}

impl Default for Templates {
    fn default() -> Self {
        Templates {
            tag: TAG_TEMPLATE.to_string(),
            tag_list: TAG_LIST_TEMPLATE.to_string(),
            document: DOCUMENT_TEMPLATE.to_string(),
            page: PAGE_TEMPLATE.to_string(),
            cloud: CLOUD_TEMPLATE.to_string(),
            cloud_tag: CLOUD_TAG_TEMPLATE.to_string(),
            related: RELATED_TEMPLATE.to_string(),
            related_item: RELATED_ITEM_TEMPLATE.to_string(),
        }
    }
}

type TagUrlFn = Box<dyn Fn(&str) -> String>;

/// Renders structured data through a set of templates
pub struct HtmlRenderer {
    templates: Templates,
    tag_url: TagUrlFn,
    document_date_format: String,
    page_date_format: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(Templates::default())
    }
}

impl HtmlRenderer {
    pub fn new(templates: Templates) -> Self {
        HtmlRenderer {
            templates,
            tag_url: Box::new(|tag: &str| format!("/{}.html", tag)),
            document_date_format: DOCUMENT_DATE_FORMAT.to_string(),
            page_date_format: PAGE_DATE_FORMAT.to_string(),
        }
    }

    /// Use `tag_url` to link tag names to their pages
    pub fn with_tag_url<F>(mut self, tag_url: F) -> Self
    where
        F: Fn(&str) -> String + 'static,
    {
        self.tag_url = Box::new(tag_url);
        self
    }

    pub fn with_date_formats(mut self, document: &str, page: &str) -> Self {
        self.document_date_format = document.to_string();
        self.page_date_format = page.to_string();
        self
    }

    pub fn tag_url(&self, tag: &str) -> String {
        (self.tag_url)(tag)
    }

    /// List of tag names, each linked to its page
    pub fn tags_html<'a, I>(&self, tags: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let items: String = tags
            .into_iter()
            .map(|name| {
                let url = self.tag_url(name);
                substitute(&self.templates.tag, &[("name", name), ("url", url.as_str())])
            })
            .collect();

        substitute(&self.templates.tag_list, &[("tags", items.as_str())])
    }

    /// One document block for a tag page
    pub fn document_html(&self, document: &Document) -> String {
        let date = document.date.format(&self.document_date_format).to_string();
        let tags = self.tags_html(document.tags.iter().map(String::as_str));

        substitute(
            &self.templates.document,
            &[
                ("title", document.title.as_str()),
                ("url", document.url.as_str()),
                ("date", date.as_str()),
                ("excerpt", document.excerpt.as_str()),
                ("tags", tags.as_str()),
            ],
        )
    }

    /// Page listing `documents` for `tag`, in the order given
    pub fn tag_page(&self, tag: &str, documents: &[&Document], generated: NaiveDateTime) -> String {
        let docs: String = documents
            .iter()
            .map(|document| self.document_html(document))
            .collect();
        let date = generated.format(&self.page_date_format).to_string();
        let count = documents.len().to_string();

        substitute(
            &self.templates.page,
            &[
                ("tag", tag),
                ("date", date.as_str()),
                ("count", count.as_str()),
                ("docs", docs.as_str()),
            ],
        )
    }

    /// Cloud fragment; sort `entries` beforehand as needed
    pub fn cloud_html(&self, entries: &[CloudEntry]) -> String {
        let tags: String = entries
            .iter()
            .map(|entry| {
                let bucket = entry.bucket.to_string();
                substitute(
                    &self.templates.cloud_tag,
                    &[
                        ("tag", entry.tag.as_str()),
                        ("bucket", bucket.as_str()),
                        ("url", entry.url.as_str()),
                    ],
                )
            })
            .collect();

        substitute(&self.templates.cloud, &[("tags", tags.as_str())])
    }

    /// Related links, or an empty string when there are none
    pub fn related_html(&self, documents: &[&Document]) -> String {
        if documents.is_empty() {
            return String::new();
        }

        let items: String = documents
            .iter()
            .map(|document| {
                substitute(
                    &self.templates.related_item,
                    &[
                        ("title", document.title.as_str()),
                        ("url", document.url.as_str()),
                    ],
                )
            })
            .collect();

        substitute(&self.templates.related, &[("items", items.as_str())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn jan_31() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2012, 1, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_substitute() {
        assert_eq!(substitute("{a}-{b}", &[("a", "1"), ("b", "2")]), "1-2");
        assert_eq!(substitute("{a} {missing}", &[("a", "1")]), "1 {missing}");
        assert_eq!(substitute("{a}", &[("a", "{a}")]), "{a}");
    }

    #[test]
    fn test_tags_html() {
        let html = HtmlRenderer::default().tags_html(["atag", "btag"]);
        assert_eq!(
            html,
            r#"<ul class="tags"><li class="tag"><a href="/atag.html">atag</a></li><li class="tag"><a href="/btag.html">btag</a></li></ul>"#
        );
    }

    #[test]
    fn test_cloud_html() {
        let entries = vec![
            CloudEntry::new("atag", 6, "/blog/tags/atag.htm"),
            CloudEntry::new("btag", 5, "/blog/tags/btag.htm"),
        ];

        assert_eq!(
            HtmlRenderer::default().cloud_html(&entries),
            r#"<div class="tag-cloud"><a class="tag-6" href="/blog/tags/atag.htm">atag</a><a class="tag-5" href="/blog/tags/btag.htm">btag</a></div>"#
        );
    }

    #[test]
    fn test_tag_page() {
        let doc1 = Document::new("Doc 1", jan_31())
            .with_excerpt("Document one.")
            .with_tags(["atag"]);
        let doc2 = Document::new("Doc 2", jan_31())
            .with_excerpt("Document two.")
            .with_tags(["atag", "btag"])
            .with_url("/doc2.html");

        let html = HtmlRenderer::default().tag_page("atag", &[&doc1, &doc2], jan_31());

        assert_eq!(
            html,
            concat!(
                "Articles tagged with 'atag'\nmeta-creation_date: 01/31/2012 00:00:00\n\n",
                r#"<div class="tag-docs" data-count="2">"#,
                r#"<div class="tag-doc"><h2><a href="">Doc 1</a></h2><div class="date">31 Jan 2012</div><div class="body"><p>Document one.</p><a class="seemore" href="">Read more...</a><ul class="tags"><li class="tag"><a href="/atag.html">atag</a></li></ul></div></div>"#,
                r#"<div class="tag-doc"><h2><a href="/doc2.html">Doc 2</a></h2><div class="date">31 Jan 2012</div><div class="body"><p>Document two.</p><a class="seemore" href="/doc2.html">Read more...</a><ul class="tags"><li class="tag"><a href="/atag.html">atag</a></li><li class="tag"><a href="/btag.html">btag</a></li></ul></div></div>"#,
                "</div>"
            )
        );
    }

    #[test]
    fn test_related_html() {
        let renderer = HtmlRenderer::default();
        assert_eq!(renderer.related_html(&[]), "");

        let doc = Document::new("Other", jan_31()).with_url("/other.html");
        assert_eq!(
            renderer.related_html(&[&doc]),
            r#"<ul class="related"><li><a href="/other.html">Other</a></li></ul>"#
        );
    }

    #[test]
    fn test_custom_tag_url_and_templates() {
        let templates = Templates {
            tag: "[{name}]({url})".to_string(),
            tag_list: "{tags}".to_string(),
            ..Templates::default()
        };
        let renderer =
            HtmlRenderer::new(templates).with_tag_url(|tag| format!("/blog/tags/{}.htm", tag));

        assert_eq!(renderer.tags_html(["x"]), "[x](/blog/tags/x.htm)");
    }

    #[test]
    fn test_custom_date_formats() {
        let renderer = HtmlRenderer::default().with_date_formats("%Y-%m-%d", "%Y");
        let doc = Document::new("D", jan_31());

        assert!(renderer.document_html(&doc).contains("2012-01-31"));
        assert!(renderer.tag_page("t", &[], jan_31()).contains("meta-creation_date: 2012\n"));
    }
}
