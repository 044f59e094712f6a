//! Single crawled page.
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use twox_hash::xxh3;

use crate::error::Error;
use crate::processing::normalize;

lazy_static! {
    /// `attr="value"` pairs inside a `<doc …>` header.
    static ref DOC_ATTR: Regex = Regex::new(r#"([a-zA-Z][a-zA-Z-]*)="([^"]*)""#).unwrap();
    /// Leading crawl-export marker and URL scheme.
    static ref ID_PREFIX: Regex = Regex::new(r"^#####|https?://").unwrap();
}

/// Optional page metadata carried on the `<doc>` header.
///
/// Filled by the extraction stage when the source's rules carry
/// title/category/label patterns; empty otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub category: Option<String>,
    pub crawl_date: Option<String>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.labels.is_empty()
            && self.category.is_none()
            && self.crawl_date.is_none()
    }
}

/// One page: identity plus ordered content lines.
///
/// `id` is derived from the page URL (percent-decoded, scheme and `www.`
/// stripped) and always contains a path separator; `source` is the part
/// before the first `/`. Equality and the content hash are derived from
/// the joined line text, order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
    id: String,
    url: String,
    lines: Vec<String>,
    meta: PageMetadata,
}

impl Document {
    pub fn new(
        source: String,
        id: String,
        url: String,
        lines: Vec<String>,
        meta: PageMetadata,
    ) -> Self {
        Document {
            source,
            id,
            url,
            lines,
            meta,
        }
    }

    /// Builds a document from a block header and its content lines.
    ///
    /// The header is either a full `<doc id="…" …>` tag or a bare URL line.
    /// An id without a path separator does not identify a page; the caller
    /// is expected to skip the document, not abort the corpus.
    pub fn from_header(header: &str, lines: Vec<String>) -> Result<Self, Error> {
        let mut meta = PageMetadata::default();
        let mut raw_id = None;

        if header.trim_start().starts_with("<doc") {
            for caps in DOC_ATTR.captures_iter(header) {
                let value = unescape_attr(&caps[2]);
                match &caps[1] {
                    "id" => raw_id = Some(value),
                    "title" => meta.title = none_if_empty(value),
                    "category" => meta.category = none_if_empty(value),
                    "crawl-date" => meta.crawl_date = none_if_empty(value),
                    "labels" => {
                        meta.labels = value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    }
                    // `source` is re-derived from the id below
                    _ => (),
                }
            }
        } else {
            raw_id = Some(header.trim().to_string());
        }

        let url = match raw_id {
            Some(url) if !url.is_empty() => url,
            _ => return Err(Error::MalformedHeader(header.to_string())),
        };

        let decoded = normalize::decode_percent_escapes(&url);
        let id = ID_PREFIX.replace_all(&decoded, "").replace("www.", "");
        if !id.contains('/') {
            warn!("cannot derive a document id from header: {}", header);
            return Err(Error::MalformedHeader(header.to_string()));
        }
        let source = id[..id.find('/').unwrap_or(0)].to_string();

        Ok(Document {
            source,
            id,
            url,
            lines,
            meta,
        })
    }

    /// New document with the same identity and different content.
    pub fn copy_with_lines(&self, lines: Vec<String>) -> Self {
        Document {
            source: self.source.clone(),
            id: self.id.clone(),
            url: self.url.clone(),
            lines,
            meta: self.meta.clone(),
        }
    }

    /// Same identity, zero lines.
    pub fn empty_content(&self) -> Self {
        self.copy_with_lines(Vec::new())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn meta(&self) -> &PageMetadata {
        &self.meta
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Joined line text, `\n`-separated.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    pub fn content_len(&self) -> usize {
        self.content().chars().count()
    }

    /// Order-sensitive 128-bit hash of the joined content, used for exact
    /// duplicate detection at corpus level.
    pub fn content_hash(&self) -> u128 {
        xxh3::hash128(self.content().as_bytes())
    }
}

fn none_if_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Reverses the attribute escaping done by the corpus writer.
pub(crate) fn unescape_attr(s: &str) -> String {
    s.replace("&quot;", "\"").replace("&apos;", "'")
}
