//! Rule-driven content reducer.
//!
//! Applies a source's [RuleSet] to one document: URL accept/reject, page
//! reject, per-line filtering, normalization and quality heuristics.
//! Order-preserving; every step that rejects the document returns it with
//! empty content rather than dropping it, so callers decide what an empty
//! document means for them.
use itertools::Itertools;
use unic_ucd::GeneralCategory;

use crate::corpus::Document;
use crate::processing::normalize;
use crate::processing::script::ScriptProfile;
use crate::rules::RuleSet;

/// Lines with more than this fraction of decimal digits are dropped.
const MAX_DIGIT_RATIO: f64 = 0.2;
/// Lines with more than this fraction of uppercase letters are dropped.
const MAX_CAPITAL_RATIO: f64 = 0.3;
/// Script heuristic only applies to lines longer than this.
const SCRIPT_CHECK_MIN_LEN: usize = 20;
/// Token-uniqueness check only applies to lines longer than this.
const REPETITION_CHECK_MIN_LEN: usize = 50;
/// Minimum `unique tokens / total tokens` for long lines.
const MIN_UNIQUE_TOKEN_RATIO: f64 = 0.7;

/// Applies one source's rules to documents of that source.
pub struct Reducer<'a> {
    rules: &'a RuleSet,
    script: ScriptProfile,
}

impl<'a> Reducer<'a> {
    pub fn new(rules: &'a RuleSet, script: ScriptProfile) -> Self {
        Reducer { rules, script }
    }

    /// The ingestion contract: trims lines, collapses inner whitespace
    /// runs, drops blank and single-word lines and, in dedup mode,
    /// removes exact repeats within the document.
    pub fn prepare_document(&self, doc: &Document, dedup_mode: bool) -> Document {
        let cleaned = doc
            .lines()
            .iter()
            .map(|l| normalize::collapse_whitespace(l))
            .filter(|l| !l.is_empty())
            .filter(|l| l.contains(' ')); // eliminate single words

        let lines: Vec<String> = if dedup_mode {
            cleaned.unique().collect()
        } else {
            cleaned.collect()
        };
        doc.copy_with_lines(lines)
    }

    /// Reduces a prepared document.
    ///
    /// `dedup_mode` selects the unique variant (within-document dedup plus
    /// quality heuristics) over the keep-all variant (repeats preserved,
    /// no quality filtering).
    pub fn reduce(&self, doc: &Document, dedup_mode: bool) -> Document {
        if !self.rules.accepts_url(doc.id()) {
            return doc.empty_content();
        }

        if self.rules.url_reject().iter().any(|p| p.is_match(doc.id())) {
            return doc.empty_content();
        }

        let content = doc.content();
        if self.rules.page_reject().iter().any(|p| p.is_match(&content)) {
            return doc.empty_content();
        }

        let lines = if dedup_mode {
            self.reduce_lines_unique(doc)
        } else {
            self.reduce_lines_keep_all(doc)
        };
        doc.copy_with_lines(lines)
    }

    /// Keep-all variant: reject-filter, normalize, strip. Repeats survive.
    fn reduce_lines_keep_all(&self, doc: &Document) -> Vec<String> {
        doc.lines()
            .iter()
            .filter(|line| !self.line_rejected(line))
            .map(|line| self.normalize_line(line, false))
            .collect()
    }

    /// Unique variant: within-document dedup, reject-filter, normalize
    /// (with replacement words), then the quality heuristics.
    fn reduce_lines_unique(&self, doc: &Document) -> Vec<String> {
        doc.lines()
            .iter()
            .unique()
            .filter(|line| !self.line_rejected(line))
            .map(|line| self.normalize_line(line, true))
            .filter(|line| self.line_quality_ok(line))
            .collect()
    }

    fn line_rejected(&self, line: &str) -> bool {
        self.rules.line_reject().iter().any(|p| p.is_match(line))
    }

    fn normalize_line(&self, line: &str, with_replace_words: bool) -> String {
        let mut line = normalize::clean_and_normalize(line);
        if with_replace_words {
            for (word, replacement) in self.rules.replace_words() {
                line = word.replace_all(&line, replacement.as_str()).into_owned();
            }
        }
        for pattern in self.rules.word_strip() {
            line = pattern.replace_all(&line, " ").into_owned();
        }
        normalize::separate_joined_words(&line)
    }

    fn line_quality_ok(&self, line: &str) -> bool {
        if digit_ratio(line) > MAX_DIGIT_RATIO {
            return false;
        }
        if capital_ratio(line) > MAX_CAPITAL_RATIO {
            return false;
        }
        let len = line.chars().count();
        if len > SCRIPT_CHECK_MIN_LEN && self.script.is_badly_typed(line) {
            return false;
        }
        if len > REPETITION_CHECK_MIN_LEN && unique_token_ratio(line) < MIN_UNIQUE_TOKEN_RATIO {
            return false;
        }
        true
    }
}

/// Fraction of Unicode decimal digits over total characters.
/// Defined as 0 for blank lines.
pub fn digit_ratio(line: &str) -> f64 {
    char_ratio(line, |c| GeneralCategory::of(c) == GeneralCategory::DecimalNumber)
}

/// Fraction of uppercase letters over total characters.
/// Defined as 0 for blank lines.
pub fn capital_ratio(line: &str) -> f64 {
    char_ratio(line, |c| {
        GeneralCategory::of(c) == GeneralCategory::UppercaseLetter
    })
}

fn char_ratio(line: &str, pred: impl Fn(char) -> bool) -> f64 {
    if line.trim().is_empty() {
        return 0.0;
    }
    let matching = line.chars().filter(|&c| pred(c)).count();
    matching as f64 / line.chars().count() as f64
}

/// `unique tokens / total tokens`, whitespace-delimited.
/// Low values mean stuttering/repeated-phrase spam.
fn unique_token_ratio(line: &str) -> f64 {
    let tokens: Vec<&str> = line.split(' ').collect();
    if tokens.is_empty() {
        return 1.0;
    }
    let unique = tokens.iter().unique().count();
    unique as f64 / tokens.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::script::TURKISH;
    use crate::rules::Rules;

    fn rules(content: &str) -> Rules {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.txt");
        std::fs::write(&path, content).unwrap();
        Rules::from_file(&path).unwrap()
    }

    fn doc(id: &str, lines: &[&str]) -> Document {
        Document::from_header(id, lines.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_line_reject_dedup_mode() {
        let rules = rules("example.com\nL:^Advertisement$\n");
        let rs = rules.get("example.com").unwrap();
        let reducer = Reducer::new(rs, TURKISH);
        let d = doc(
            "example.com/n/1",
            &["Advertisement", "Gerçek bir cümle şöyle görünür.", "Advertisement"],
        );
        let reduced = reducer.reduce(&d, true);
        assert_eq!(reduced.lines(), ["Gerçek bir cümle şöyle görünür."]);
    }

    #[test]
    fn test_url_accept_short_circuits() {
        let rules = rules("example.com\nI+:.*/news/.*\n");
        let rs = rules.get("example.com").unwrap();
        let reducer = Reducer::new(rs, TURKISH);
        let d = doc("example.com/sports/1", &["Gözde içerik burada değil."]);
        assert!(reducer.reduce(&d, true).is_empty());
        let d = doc("example.com/news/1", &["Gözde içerik burada ama şimdi."]);
        assert!(!reducer.reduce(&d, true).is_empty());
    }

    #[test]
    fn test_url_reject() {
        let rules = rules("example.com\nI-:.*/login.*\n");
        let rs = rules.get("example.com").unwrap();
        let reducer = Reducer::new(rs, TURKISH);
        let d = doc("example.com/login?next=x", &["Kullanıcı girişi şöyle."]);
        assert!(reducer.reduce(&d, true).is_empty());
    }

    #[test]
    fn test_page_reject_spans_lines() {
        let rules = rules("example.com\nP:Sayfa.*bulunamadı\n");
        let rs = rules.get("example.com").unwrap();
        let reducer = Reducer::new(rs, TURKISH);
        // pattern matches across the line join thanks to dot-all
        let d = doc("example.com/n/1", &["Sayfa maalesef", "bulunamadı"]);
        assert!(reducer.reduce(&d, true).is_empty());
    }

    #[test]
    fn test_keep_all_preserves_repeats() {
        let rules = rules("example.com\nL:^reklam$\n");
        let rs = rules.get("example.com").unwrap();
        let reducer = Reducer::new(rs, TURKISH);
        let d = doc(
            "example.com/n/1",
            &["Aynı çümle.", "reklam", "Aynı çümle."],
        );
        let reduced = reducer.reduce(&d, false);
        assert_eq!(reduced.lines(), ["Aynı çümle.", "Aynı çümle."]);
    }

    #[test]
    fn test_quality_filters() {
        let rules = rules("example.com\n");
        let rs = rules.get("example.com").unwrap();
        let reducer = Reducer::new(rs, TURKISH);
        let d = doc(
            "example.com/n/1",
            &[
                "Düzgün yazılmış bir cümle oldukça güzeldir.",
                "12345 6789 01234 5678 sayı",
                "BÜYÜK HARFLERLE BAĞIRAN BİR SATIR",
                "tekrar eden söz tekrar eden söz tekrar eden söz tekrar eden",
            ],
        );
        let reduced = reducer.reduce(&d, true);
        assert_eq!(
            reduced.lines(),
            ["Düzgün yazılmış bir cümle oldukça güzeldir."]
        );
    }

    #[test]
    fn test_badly_typed_long_line_dropped() {
        let rules = rules("example.com\n");
        let rs = rules.get("example.com").unwrap();
        let reducer = Reducer::new(rs, TURKISH);
        let d = doc(
            "example.com/n/1",
            &["selam bugun hava cok guzel yarin gorusuruz insallah"],
        );
        assert!(reducer.reduce(&d, true).is_empty());
    }

    #[test]
    fn test_prepare_document() {
        let rules = rules("example.com\n");
        let rs = rules.get("example.com").unwrap();
        let reducer = Reducer::new(rs, TURKISH);
        let d = doc(
            "example.com/n/1",
            &["  iki   kelime ", "teksöz", "", "iki kelime"],
        );
        let prepared = reducer.prepare_document(&d, true);
        assert_eq!(prepared.lines(), ["iki kelime"]);
        let kept = reducer.prepare_document(&d, false);
        assert_eq!(kept.lines(), ["iki kelime", "iki kelime"]);
    }

    #[test]
    fn test_digit_ratio_bounds() {
        assert_eq!(digit_ratio(""), 0.0);
        assert_eq!(digit_ratio("   "), 0.0);
        assert_eq!(digit_ratio("1234"), 1.0);
        let r = digit_ratio("a1b2");
        assert!(r > 0.0 && r < 1.0);
    }

    #[test]
    fn test_capital_ratio() {
        assert_eq!(capital_ratio("ABC"), 1.0);
        assert_eq!(capital_ratio("abc"), 0.0);
        assert_eq!(capital_ratio(""), 0.0);
    }
}
