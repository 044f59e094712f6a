//! Compiled per-source rule sets and the rule-file loader.
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use log::warn;
use regex::{Regex, RegexBuilder};

use crate::error::Error;
use crate::rules::RuleTag;

lazy_static! {
    /// `www.example.com` and `http(s)://example.com` both alias `example.com`.
    static ref SOURCE_PREFIX: Regex = Regex::new(r"www\.|https?://").unwrap();
}

/// Cleaning/replacement rules for a single source.
///
/// Pattern collections keep the order they had in the rule file. The
/// replacement lists are ordered pairs rather than maps: substitution order
/// is part of the contract.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    source: String,
    extractor_kind: Option<String>,
    url_accept: Vec<Regex>,
    url_reject: Vec<Regex>,
    page_reject: Vec<Regex>,
    line_reject: Vec<Regex>,
    word_strip: Vec<Regex>,
    replace_patterns: Vec<(Regex, String)>,
    replace_words: Vec<(Regex, String)>,
    title_pattern: Option<Regex>,
    category_pattern: Option<Regex>,
    label_pattern: Option<Regex>,
}

impl RuleSet {
    /// An empty rule set: nothing rejected, nothing replaced.
    pub fn empty(source: &str) -> Self {
        RuleSet {
            source: source.to_string(),
            ..Default::default()
        }
    }

    /// Builds a rule set from the rule lines of one block.
    ///
    /// A pattern that does not compile fails the whole load: rules are
    /// operator-authored configuration, so a silently dropped rule would
    /// corrupt every corpus built with it.
    pub fn from_rules(source: &str, rule_lines: &[String]) -> Result<Self, Error> {
        let mut rs = RuleSet::empty(source);
        for line in rule_lines {
            if line.trim().is_empty() {
                continue;
            }
            let tag = match RuleTag::parse(line) {
                Some(tag) => tag,
                None => {
                    warn!("[{}] ignoring unrecognized rule line: {}", source, line);
                    continue;
                }
            };
            match tag {
                RuleTag::Extractor(kind) => rs.extractor_kind = Some(kind),
                RuleTag::UrlReject(p) => rs.url_reject.push(Regex::new(&p)?),
                RuleTag::UrlAccept(p) => rs.url_accept.push(Regex::new(&p)?),
                RuleTag::PageReject(p) => rs.page_reject.push(
                    RegexBuilder::new(&p).dot_matches_new_line(true).build()?,
                ),
                RuleTag::LineReject(p) => rs.line_reject.push(Regex::new(&p)?),
                RuleTag::WordStrip(p) => rs.word_strip.push(Regex::new(&p)?),
                RuleTag::ReplacePattern {
                    pattern,
                    replacement,
                } => rs.replace_patterns.push((Regex::new(&pattern)?, replacement)),
                RuleTag::ReplaceWord { word, replacement } => {
                    rs.replace_words.push((Regex::new(&word)?, replacement))
                }
                RuleTag::Title(p) => rs.title_pattern = Some(Regex::new(&p)?),
                RuleTag::Category(p) => rs.category_pattern = Some(Regex::new(&p)?),
                RuleTag::Label(p) => {
                    rs.label_pattern =
                        Some(RegexBuilder::new(&p).dot_matches_new_line(true).build()?)
                }
            }
        }
        Ok(rs)
    }

    /// Merges `other` (usually the `global` block) into `self`.
    ///
    /// Pattern sets are unioned, keyed by pattern text so that merging a
    /// set into itself is a no-op. Single-valued fields keep their own
    /// value and only inherit when unset.
    pub fn merge(&mut self, other: &RuleSet) {
        merge_patterns(&mut self.url_accept, &other.url_accept);
        merge_patterns(&mut self.url_reject, &other.url_reject);
        merge_patterns(&mut self.page_reject, &other.page_reject);
        merge_patterns(&mut self.line_reject, &other.line_reject);
        merge_patterns(&mut self.word_strip, &other.word_strip);
        merge_replacements(&mut self.replace_patterns, &other.replace_patterns);
        merge_replacements(&mut self.replace_words, &other.replace_words);

        if self.extractor_kind.is_none() {
            self.extractor_kind = other.extractor_kind.clone();
        }
        if self.title_pattern.is_none() {
            self.title_pattern = other.title_pattern.clone();
        }
        if self.category_pattern.is_none() {
            self.category_pattern = other.category_pattern.clone();
        }
        if self.label_pattern.is_none() {
            self.label_pattern = other.label_pattern.clone();
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Extraction mode requested from the external extractor, if any.
    /// Carried through, never interpreted here.
    pub fn extractor_kind(&self) -> Option<&str> {
        self.extractor_kind.as_deref()
    }

    pub fn url_accept(&self) -> &[Regex] {
        &self.url_accept
    }

    pub fn url_reject(&self) -> &[Regex] {
        &self.url_reject
    }

    pub fn page_reject(&self) -> &[Regex] {
        &self.page_reject
    }

    pub fn line_reject(&self) -> &[Regex] {
        &self.line_reject
    }

    pub fn word_strip(&self) -> &[Regex] {
        &self.word_strip
    }

    pub fn replace_patterns(&self) -> &[(Regex, String)] {
        &self.replace_patterns
    }

    pub fn replace_words(&self) -> &[(Regex, String)] {
        &self.replace_words
    }

    pub fn title_pattern(&self) -> Option<&Regex> {
        self.title_pattern.as_ref()
    }

    pub fn category_pattern(&self) -> Option<&Regex> {
        self.category_pattern.as_ref()
    }

    pub fn label_pattern(&self) -> Option<&Regex> {
        self.label_pattern.as_ref()
    }

    /// Pulls the page title out of raw HTML, when a `TITLE` rule exists.
    pub fn extract_title(&self, html: &str) -> Option<String> {
        extract_first(self.title_pattern.as_ref()?, html)
    }

    /// Pulls the page category out of raw HTML, when a `CATEGORY` rule exists.
    pub fn extract_category(&self, html: &str) -> Option<String> {
        extract_first(self.category_pattern.as_ref()?, html)
    }

    /// Pulls every label match out of raw HTML, when a `LABEL` rule exists.
    pub fn extract_labels(&self, html: &str) -> Vec<String> {
        match &self.label_pattern {
            Some(pattern) => pattern
                .captures_iter(html)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn has_replacements(&self) -> bool {
        !self.replace_words.is_empty() || !self.replace_patterns.is_empty()
    }

    /// True if the document id passes the accept list: either the list is
    /// empty or at least one accept pattern matches.
    pub fn accepts_url(&self, id: &str) -> bool {
        self.url_accept.is_empty() || self.url_accept.iter().any(|p| p.is_match(id))
    }
}

fn extract_first(pattern: &Regex, html: &str) -> Option<String> {
    pattern
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn merge_patterns(dst: &mut Vec<Regex>, src: &[Regex]) {
    for p in src {
        if !dst.iter().any(|q| q.as_str() == p.as_str()) {
            dst.push(p.clone());
        }
    }
}

fn merge_replacements(dst: &mut Vec<(Regex, String)>, src: &[(Regex, String)]) {
    for (p, r) in src {
        if !dst.iter().any(|(q, _)| q.as_str() == p.as_str()) {
            dst.push((p.clone(), r.clone()));
        }
    }
}

/// Source-keyed rule sets loaded from a rule file.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    sets: HashMap<String, RuleSet>,
}

impl Rules {
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Self::from_str_content(&content)
    }

    fn from_str_content(content: &str) -> Result<Self, Error> {
        let mut sets = HashMap::new();

        let mut header: Option<String> = None;
        let mut block: Vec<String> = Vec::new();
        for line in content.lines().filter(|l| !l.starts_with('#')) {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !trimmed.contains(':') {
                if let Some(name) = header.take() {
                    register(&mut sets, &name, RuleSet::from_rules(&name, &block)?);
                }
                header = Some(trimmed.to_string());
                block.clear();
            } else if header.is_some() {
                block.push(line.to_string());
            }
            // rule lines before the first header have no source; dropped
        }
        if let Some(name) = header.take() {
            register(&mut sets, &name, RuleSet::from_rules(&name, &block)?);
        }

        // fold the global baseline into every set, itself included.
        if let Some(global) = sets.get("global").cloned() {
            for set in sets.values_mut() {
                set.merge(&global);
            }
        }

        Ok(Rules { sets })
    }

    /// Looks a source up, with or without `www.`/scheme prefix.
    pub fn get(&self, source: &str) -> Option<&RuleSet> {
        self.sets.get(source)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

/// Registers a block under its verbatim name and its prefix-stripped name,
/// so lookups succeed whether or not the key carries `www.` or a scheme.
fn register(sets: &mut HashMap<String, RuleSet>, name: &str, rs: RuleSet) {
    let stripped = SOURCE_PREFIX.replace_all(name, "").to_string();
    if stripped != name {
        sets.insert(stripped, rs.clone());
    }
    sets.insert(name.to_string(), rs);
}
