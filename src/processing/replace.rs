//! Per-source replacement pipeline.
//!
//! Applied once per document, usually before duplicate statistics are
//! gathered: literal word substitutions first, then the regex replace
//! patterns. A replacement template may contain the `%n` escape, which
//! expands to a newline and re-splits the line.
use crate::corpus::Document;
use crate::processing::normalize;
use crate::rules::RuleSet;

/// Runs the rule set's replacements over every line of a document.
///
/// The no-op fast path is part of the contract: a document with no lines,
/// or a rule set with no replacement rules, comes back byte-identical.
pub fn apply_replace_patterns(rules: &RuleSet, doc: &Document) -> Document {
    if doc.is_empty() || !rules.has_replacements() {
        return doc.clone();
    }

    let mut lines = Vec::with_capacity(doc.lines().len());
    for line in doc.lines() {
        let mut content = normalize::spaces_only(line);
        for (word, replacement) in rules.replace_words() {
            content = word
                .replace_all(&content, replacement.as_str())
                .trim()
                .to_string();
        }
        for (pattern, replacement) in rules.replace_patterns() {
            content = pattern
                .replace_all(&content, replacement.as_str())
                .replace("%n", "\n");
        }
        if content.contains('\n') {
            lines.extend(
                content
                    .split('\n')
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .map(String::from),
            );
        } else {
            lines.push(content);
        }
    }
    doc.copy_with_lines(lines)
}
