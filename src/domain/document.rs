//! Document parsing and write-back
//!
//! A document is a plain-text file with a narrow header grammar:
//!
//! ```text
//! Title line
//! meta-creation_date: 8/13/2012 10:20
//! Tags: rust, parsing
//!
//! <p>Body text with [[inline-tag link words]] markers.</p>
//! ```

use super::tree::DocumentId;
use crate::error::{Result, TagtreeError};
use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// Creation date formats carrying a time of day, tried in order
const DATE_TIME_FORMATS: [&str; 2] = ["%m/%d/%Y %H:%M", "%m/%d/%Y %H:%M:%S"];

/// Last resort creation date format (midnight is assumed)
const DATE_ONLY_FORMAT: &str = "%m/%d/%Y";

/// Format used when writing the creation date back out
pub const WRITE_DATE_FORMAT: &str = "%m/%d/%Y %H:%M";

const TAGS_HTML_KEY: &str = "meta-tags_html:";
const RELATED_HTML_KEY: &str = "meta-related_html:";

fn date_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^meta-creation_date:\s*(.*?)\s*$").unwrap())
}

fn tags_line_regex(case: HeaderCase) -> &'static Regex {
    static SENSITIVE: OnceLock<Regex> = OnceLock::new();
    static INSENSITIVE: OnceLock<Regex> = OnceLock::new();
    match case {
        HeaderCase::Sensitive => SENSITIVE.get_or_init(|| Regex::new(r"^Tags:").unwrap()),
        HeaderCase::Insensitive => INSENSITIVE.get_or_init(|| Regex::new(r"(?i)^Tags:").unwrap()),
    }
}

/// Regex for body markers: [[tag-name words shown in the link]]
fn body_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\[\[([\w-]+)[^\[]*?\]\]").unwrap())
}

fn excerpt_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?is)<p>(.*?)</p>").unwrap())
}

/// How the `Tags:` header key is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeaderCase {
    /// Only `Tags:` exactly
    Sensitive,
    /// `Tags:`, `TAGS:`, `tags:` ...
    #[default]
    Insensitive,
}

/// Knobs for the document parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub tags_header: HeaderCase,

    /// Add each directory between the root and the file as a tag
    pub path_tags: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            tags_header: HeaderCase::default(),
            path_tags: true,
        }
    }
}

/// Metadata extracted from a single source document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,

    /// Creation date; "now" unless the header supplied one
    pub date: NaiveDateTime,

    pub tags: BTreeSet<String>,

    /// Inner text of the first `<p>` block of the body
    pub excerpt: String,

    /// Everything after the header block, verbatim
    pub body: String,

    pub url: String,

    /// File this document was loaded from, if any
    pub source: Option<PathBuf>,

    /// Ranked related documents, filled in by `DocumentTree::update_related`
    pub related: Vec<DocumentId>,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            title: String::new(),
            date: Local::now().naive_local(),
            tags: BTreeSet::new(),
            excerpt: String::new(),
            body: String::new(),
            url: String::new(),
            source: None,
            related: Vec::new(),
        }
    }
}

impl Document {
    pub fn new(title: impl Into<String>, date: NaiveDateTime) -> Self {
        Document {
            title: title.into(),
            date,
            ..Document::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Serialize back to the header/body shape the parser reads
    pub fn serialize(&self) -> String {
        self.serialize_with_cache("", "")
    }

    /// Serialize with pre-rendered tag and related HTML cached in the header.
    ///
    /// Empty fragments are left out. The parser skips the cache lines, so the
    /// body survives any number of rewrites unchanged.
    pub fn serialize_with_cache(&self, tags_html: &str, related_html: &str) -> String {
        let mut output = String::new();

        output.push_str(&self.title);
        output.push('\n');
        output.push_str(&format!(
            "meta-creation_date: {}\n",
            self.date.format(WRITE_DATE_FORMAT)
        ));

        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        output.push_str(&format!("Tags: {}\n", tags.join(", ")));

        if !tags_html.is_empty() {
            output.push_str(&format!("{} {}\n", TAGS_HTML_KEY, single_line(tags_html)));
        }
        if !related_html.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                RELATED_HTML_KEY,
                single_line(related_html)
            ));
        }

        output.push('\n');
        output.push_str(&self.body);
        output
    }
}

fn single_line(html: &str) -> String {
    html.replace(['\r', '\n'], " ")
}

/// Try each creation date format in order; first success wins
pub fn parse_creation_date(value: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_ONLY_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Value of a `meta-creation_date:` line, if the line is one and it parses
fn extract_date(line: &str) -> Option<NaiveDateTime> {
    let captures = date_line_regex().captures(line)?;
    parse_creation_date(&captures[1])
}

/// Explicit tags of a `Tags:` line, `None` if the line is not a tags line
fn extract_explicit_tags(line: &str, case: HeaderCase) -> Option<BTreeSet<String>> {
    let found = tags_line_regex(case).find(line)?;
    Some(
        line[found.end()..]
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn extract_body_tags(body: &str) -> impl Iterator<Item = String> + '_ {
    body_tag_regex()
        .captures_iter(body)
        .map(|cap| cap[1].to_string())
}

fn extract_excerpt(body: &str) -> Option<&str> {
    excerpt_regex()
        .captures(body)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|excerpt| !excerpt.is_empty())
}

fn is_cache_line(line: &str) -> bool {
    line.starts_with(TAGS_HTML_KEY) || line.starts_with(RELATED_HTML_KEY)
}

/// Length of the date lines right after the title, plus one blank separator
fn leading_header_len(text: &str) -> usize {
    let mut len = 0;
    let mut lines = text.split_inclusive('\n').peekable();

    while let Some(line) =
        lines.next_if(|line| date_line_regex().is_match(line.trim_end_matches(['\r', '\n'])))
    {
        len += line.len();
    }
    if let Some(line) = lines.next_if(|line| line.trim().is_empty()) {
        len += line.len();
    }
    len
}

/// Directory segments between the root and the file name
fn path_tags(relative: &Path) -> Vec<String> {
    relative
        .parent()
        .map(|parent| {
            parent
                .components()
                .filter_map(|component| match component {
                    Component::Normal(part) => part.to_str().map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Line-oriented parser for the document grammar
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    options: ParseOptions,
}

impl DocumentParser {
    pub fn new(options: ParseOptions) -> Self {
        DocumentParser { options }
    }

    /// Parse text using fresh defaults (date = now, no tags, empty excerpt)
    pub fn parse(&self, text: &str) -> Document {
        self.parse_with(text, Document::default())
    }

    /// Parse text on top of `seed`.
    ///
    /// The seed's date, excerpt and tags survive wherever the text does not
    /// provide its own. An explicit `Tags:` line replaces the seed tags; body
    /// markers are always added on top. Never fails: malformed input just
    /// leaves fields at their seeded values.
    pub fn parse_with(&self, text: &str, mut seed: Document) -> Document {
        let mut lines = text.split_inclusive('\n').peekable();

        let title_line = lines.next().unwrap_or_default();
        seed.title = title_line.trim().to_string();

        let header_start = title_line.len();
        let mut offset = header_start;
        let mut explicit_tags = None;

        for line in lines.by_ref() {
            offset += line.len();
            let line = line.trim_end_matches(['\r', '\n']);

            if let Some(date) = extract_date(line) {
                seed.date = date;
            } else if let Some(tags) = extract_explicit_tags(line, self.options.tags_header) {
                explicit_tags = Some(tags);
                break;
            }
        }

        let body_start = match explicit_tags {
            Some(tags) => {
                seed.tags = tags;

                while let Some(line) = lines.next_if(|line| is_cache_line(line)) {
                    offset += line.len();
                }
                if let Some(line) = lines.next_if(|line| line.trim().is_empty()) {
                    offset += line.len();
                }
                offset
            }
            None => header_start + leading_header_len(&text[header_start..]),
        };

        seed.body = text[body_start..].to_string();
        seed.tags.extend(extract_body_tags(&seed.body));

        if let Some(excerpt) = extract_excerpt(&seed.body) {
            seed.excerpt = excerpt.to_string();
        }

        seed
    }

    /// Read and parse a file below `root`.
    ///
    /// `path` may be absolute or relative to `root`. With path tags enabled
    /// each directory between the two becomes a tag.
    pub fn load(&self, root: &Path, path: &Path) -> Result<Document> {
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };

        let text = fs::read_to_string(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TagtreeError::DocumentNotFound(path.to_path_buf())
            } else {
                TagtreeError::Io(e)
            }
        })?;

        let mut document = self.parse(&text);

        if self.options.path_tags {
            let relative = full_path.strip_prefix(root).unwrap_or(path);
            document.tags.extend(path_tags(relative));
        }

        document.source = Some(full_path);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_parse_without_tags_line() {
        let text = "A Title\nmeta-creation_date: 8/13/2012 10:20\n\n<p>some text goes here\n<div>div text</div>\n</p><p>ignore [[ATAG a tag]] [[BTAG b tag]]\nthis text</p>";

        let doc = DocumentParser::default().parse(text);

        assert_eq!(doc.title, "A Title");
        assert_eq!(doc.date, datetime(2012, 8, 13, 10, 20));
        assert_eq!(doc.tags, tags(&["ATAG", "BTAG"]));
        assert_eq!(doc.excerpt, "some text goes here\n<div>div text</div>\n");
    }

    #[test]
    fn test_parse_simple_excerpt() {
        let doc = DocumentParser::default()
            .parse("A Title\nmeta-creation_date: 8/13/2012 10:20\n\n<p>some text</p>");

        assert_eq!(doc.title, "A Title");
        assert_eq!(doc.date, datetime(2012, 8, 13, 10, 20));
        assert_eq!(doc.excerpt, "some text");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_parse_explicit_and_body_tags() {
        let text = "A Title\nmeta-creation_date: 8/13/2012 10:20\nTAGS: atag, btag\n<p>some text goes here</p><div>div text</div></p><p>ignore this [[ATAG a tag]] text</p>\n";

        let doc = DocumentParser::default().parse(text);

        assert_eq!(doc.title, "A Title");
        assert_eq!(doc.date, datetime(2012, 8, 13, 10, 20));
        assert_eq!(doc.tags, tags(&["ATAG", "atag", "btag"]));
        assert_eq!(doc.excerpt, "some text goes here");
    }

    #[test]
    fn test_case_sensitive_tags_header() {
        let parser = DocumentParser::new(ParseOptions {
            tags_header: HeaderCase::Sensitive,
            path_tags: false,
        });

        let doc = parser.parse("Title\nTAGS: atag, btag\n<p>[[ATAG x]]</p>");
        assert_eq!(doc.tags, tags(&["ATAG"]));

        let doc = parser.parse("Title\nTags: atag, btag\n<p>[[ATAG x]]</p>");
        assert_eq!(doc.tags, tags(&["ATAG", "atag", "btag"]));
    }

    #[test]
    fn test_tags_line_stops_header_scanning() {
        let seed = Document::new("", datetime(2020, 1, 1, 0, 0));
        let doc = DocumentParser::default().parse_with(
            "Title\nTags: one\nmeta-creation_date: 8/13/2012 10:20\n",
            seed,
        );

        assert_eq!(doc.date, datetime(2020, 1, 1, 0, 0));
        assert_eq!(doc.body, "meta-creation_date: 8/13/2012 10:20\n");
    }

    #[test]
    fn test_unparsable_date_keeps_seed() {
        let seed = Document::new("", datetime(2021, 5, 4, 3, 2));
        let doc = DocumentParser::default()
            .parse_with("Title\nmeta-creation_date: yesterday-ish\n", seed);

        assert_eq!(doc.date, datetime(2021, 5, 4, 3, 2));
    }

    #[test]
    fn test_date_format_fallbacks() {
        assert_eq!(
            parse_creation_date("8/13/2012 10:20:45"),
            NaiveDate::from_ymd_opt(2012, 8, 13).unwrap().and_hms_opt(10, 20, 45)
        );
        assert_eq!(
            parse_creation_date("12/01/2011"),
            Some(datetime(2011, 12, 1, 0, 0))
        );
        assert_eq!(parse_creation_date("2011-12-01"), None);
        assert_eq!(parse_creation_date(""), None);
    }

    #[test]
    fn test_empty_tags_line() {
        assert_eq!(extract_explicit_tags("", HeaderCase::Insensitive), None);
        assert_eq!(
            extract_explicit_tags("Tags:", HeaderCase::Insensitive),
            Some(BTreeSet::new())
        );
        assert_eq!(
            extract_explicit_tags("TAGS: atag, btag", HeaderCase::Insensitive),
            Some(tags(&["atag", "btag"]))
        );
        assert_eq!(
            extract_explicit_tags("Tags: a, , b,", HeaderCase::Sensitive),
            Some(tags(&["a", "b"]))
        );
    }

    #[test]
    fn test_body_marker_names() {
        let found: Vec<String> =
            extract_body_tags("[[my-tag some words]][[Other]] [[ no name]] [[x.y z]]").collect();
        assert_eq!(found, vec!["my-tag", "Other", "x"]);
    }

    #[test]
    fn test_tags_are_a_set() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("rust");
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join("post.txt"),
            "Post\nTags: rust, rust\n<p>[[rust twice]] [[rust again]]</p>",
        )
        .unwrap();

        let doc = DocumentParser::default()
            .load(temp.path(), Path::new("rust/post.txt"))
            .unwrap();

        assert_eq!(doc.tags, tags(&["rust"]));
    }

    #[test]
    fn test_load_adds_path_tags() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("tech").join("rust");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("post.txt");
        fs::write(&file, "Post\nTags: parsing\n\n<p>Hello</p>").unwrap();

        let doc = DocumentParser::default().load(temp.path(), &file).unwrap();

        assert_eq!(doc.tags, tags(&["parsing", "rust", "tech"]));
        assert_eq!(doc.source.as_deref(), Some(file.as_path()));
        assert_eq!(doc.excerpt, "Hello");
    }

    #[test]
    fn test_load_without_path_tags() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("tech")).unwrap();
        fs::write(temp.path().join("tech/post.txt"), "Post\n").unwrap();

        let parser = DocumentParser::new(ParseOptions {
            path_tags: false,
            ..ParseOptions::default()
        });
        let doc = parser.load(temp.path(), Path::new("tech/post.txt")).unwrap();

        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = DocumentParser::default().load(temp.path(), Path::new("nope.txt"));

        match result.unwrap_err() {
            TagtreeError::DocumentNotFound(path) => assert_eq!(path, Path::new("nope.txt")),
            other => panic!("Expected DocumentNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_is_total() {
        let parser = DocumentParser::default();
        for text in ["", "\n", "only a title", "T\nmeta-creation_date:\nTags", "T\n[[", "<p>"] {
            let doc = parser.parse(text);
            assert!(doc.excerpt.is_empty());
        }
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut original = Document::new("Round Trip", datetime(2012, 1, 31, 9, 5))
            .with_tags(["btag", "atag"]);
        original.body = "<p>First [[ctag see c]]</p>\nmore\n".to_string();

        let text = original.serialize();
        assert!(text.starts_with(
            "Round Trip\nmeta-creation_date: 01/31/2012 09:05\nTags: atag, btag\n\n"
        ));

        let parsed = DocumentParser::default().parse(&text);
        assert_eq!(parsed.title, original.title);
        assert_eq!(parsed.date, original.date);
        assert_eq!(parsed.tags, tags(&["atag", "btag", "ctag"]));
        assert_eq!(parsed.body, original.body);
    }

    #[test]
    fn test_body_without_tags_line_skips_date_header() {
        let doc = DocumentParser::default()
            .parse("A Title\nmeta-creation_date: 8/13/2012 10:20\n\n<p>some text</p>");
        assert_eq!(doc.body, "<p>some text</p>");

        let reparsed = DocumentParser::default().parse(&doc.serialize());
        assert_eq!(reparsed.body, "<p>some text</p>");
        assert!(!reparsed.body.contains("meta-creation_date"));
        assert_eq!(reparsed.date, datetime(2012, 8, 13, 10, 20));
        assert_eq!(reparsed.excerpt, "some text");
    }

    #[test]
    fn test_body_without_header_lines() {
        let doc = DocumentParser::default().parse("Two\n\n<p>[[rust again]]</p>");
        assert_eq!(doc.body, "<p>[[rust again]]</p>");

        let doc = DocumentParser::default().parse("Two\n<p>x</p>\nmeta-creation_date: 1/1/2012\n");
        assert_eq!(doc.body, "<p>x</p>\nmeta-creation_date: 1/1/2012\n");
        assert_eq!(doc.date, datetime(2012, 1, 1, 0, 0));
    }

    #[test]
    fn test_serialize_with_cache_keeps_body() {
        let mut doc = Document::new("Cached", datetime(2013, 2, 3, 4, 5)).with_tags(["x"]);
        doc.body = "<p>Body</p>\n".to_string();

        let text = doc.serialize_with_cache("<ul class=\"tags\">\n</ul>", "<ul class=\"related\"></ul>");
        assert!(text.contains("meta-tags_html: <ul class=\"tags\"> </ul>\n"));
        assert!(text.contains("meta-related_html: <ul class=\"related\"></ul>\n"));

        let parsed = DocumentParser::default().parse(&text);
        assert_eq!(parsed.body, doc.body);

        let again = parsed.serialize_with_cache("<ul class=\"tags\">\n</ul>", "<ul class=\"related\"></ul>");
        assert_eq!(again, text);
    }
}
