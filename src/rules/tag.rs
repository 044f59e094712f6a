//! Rule tags.
//!
//! Each line of a rule block is `TAG:body`. Tags form a closed set so that
//! rule dispatch is an exhaustive match instead of a string comparison
//! scattered around the parser.

/// A single parsed rule line.
///
/// Bodies are kept as raw pattern text here; compilation happens when a
/// [super::RuleSet] is built, so a bad pattern can fail the whole load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleTag {
    /// `E` - which extraction mode to request from the external extractor.
    Extractor(String),
    /// `I-`/`I` - reject documents whose id matches.
    UrlReject(String),
    /// `I+` - only accept documents whose id matches.
    UrlAccept(String),
    /// `P` - reject whole pages whose joined content matches.
    PageReject(String),
    /// `L` - reject single lines matching.
    LineReject(String),
    /// `W` - replace every match inside a line with a space.
    WordStrip(String),
    /// `R`/`RP` - `pattern -> replacement` regex substitution.
    ReplacePattern { pattern: String, replacement: String },
    /// `RW` - `[word] -> [replacement]` literal substitution.
    ReplaceWord { word: String, replacement: String },
    /// `TITLE` - single-capture pattern pulling the page title out of raw HTML.
    Title(String),
    /// `CATEGORY` - like `TITLE`, for the category.
    Category(String),
    /// `LABEL` - like `TITLE`, for labels.
    Label(String),
}

impl RuleTag {
    /// Parses one rule line. Returns `None` when the line has no colon or
    /// carries an unrecognized tag; the caller decides whether to warn.
    pub fn parse(line: &str) -> Option<RuleTag> {
        let (tag, body) = line.split_once(':')?;
        let tag = tag.trim();
        match tag {
            "E" => Some(RuleTag::Extractor(body.to_string())),
            "I" | "I-" => Some(RuleTag::UrlReject(body.to_string())),
            "I+" => Some(RuleTag::UrlAccept(body.to_string())),
            "P" => Some(RuleTag::PageReject(body.to_string())),
            "L" => Some(RuleTag::LineReject(body.to_string())),
            "W" => Some(RuleTag::WordStrip(body.to_string())),
            "R" | "RP" => {
                let (pattern, replacement) = split_arrow(body);
                Some(RuleTag::ReplacePattern {
                    pattern,
                    replacement,
                })
            }
            "RW" => {
                let (word, replacement) = split_arrow(body);
                Some(RuleTag::ReplaceWord {
                    word: strip_brackets(&word),
                    replacement: strip_brackets(&replacement),
                })
            }
            "RW-E" => {
                let (word, replacement) = split_arrow(body);
                Some(RuleTag::ReplaceWord {
                    word: strip_brackets(&word),
                    replacement: decode_shifted_ascii(&strip_brackets(&replacement)),
                })
            }
            "TITLE" => Some(RuleTag::Title(body.to_string())),
            "CATEGORY" => Some(RuleTag::Category(body.to_string())),
            "LABEL" => Some(RuleTag::Label(body.to_string())),
            _ => None,
        }
    }
}

/// Splits a rule body on the first `->`, trimming both sides.
/// A body without `->` yields an empty replacement.
fn split_arrow(body: &str) -> (String, String) {
    match body.split_once("->") {
        Some((l, r)) => (l.trim().to_string(), r.trim().to_string()),
        None => (body.trim().to_string(), String::new()),
    }
}

/// Strips one pair of surrounding square brackets, if present.
fn strip_brackets(s: &str) -> String {
    let s = s.strip_prefix('[').unwrap_or(s);
    let s = s.strip_suffix(']').unwrap_or(s);
    s.to_string()
}

/// Decodes the `RW-E` obfuscation: every ASCII code point between `A` and
/// `z` is shifted down by one. Values written this way cannot collide with
/// the `->` delimiter or look like an active rule themselves.
fn decode_shifted_ascii(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if ('A'..='z').contains(&c) {
                char::from(c as u8 - 1)
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_tags() {
        assert_eq!(
            RuleTag::parse("I-:.*forum.*"),
            Some(RuleTag::UrlReject(".*forum.*".to_string()))
        );
        assert_eq!(
            RuleTag::parse("I:.*forum.*"),
            Some(RuleTag::UrlReject(".*forum.*".to_string()))
        );
        assert_eq!(
            RuleTag::parse("I+:.*/news/.*"),
            Some(RuleTag::UrlAccept(".*/news/.*".to_string()))
        );
    }

    #[test]
    fn test_body_keeps_colons() {
        assert_eq!(
            RuleTag::parse("L:^http://.*$"),
            Some(RuleTag::LineReject("^http://.*$".to_string()))
        );
    }

    #[test]
    fn test_replace_pattern() {
        assert_eq!(
            RuleTag::parse("RP: foo(.+)bar -> baz$1 "),
            Some(RuleTag::ReplacePattern {
                pattern: "foo(.+)bar".to_string(),
                replacement: "baz$1".to_string()
            })
        );
        // R is an alias of RP
        assert_eq!(RuleTag::parse("R:a -> b"), RuleTag::parse("RP:a -> b"));
    }

    #[test]
    fn test_replace_word_brackets() {
        assert_eq!(
            RuleTag::parse("RW:[ himg ] -> [ h ]"),
            Some(RuleTag::ReplaceWord {
                word: " himg ".to_string(),
                replacement: " h ".to_string()
            })
        );
    }

    #[test]
    fn test_replace_word_encoded() {
        // "cbs" shifted down by one gives "bar"
        assert_eq!(
            RuleTag::parse("RW-E:[foo] -> [cbs]"),
            Some(RuleTag::ReplaceWord {
                word: "foo".to_string(),
                replacement: "bar".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_tag_ignored() {
        assert_eq!(RuleTag::parse("ZZZ:whatever"), None);
        assert_eq!(RuleTag::parse("no colon here"), None);
    }

    #[test]
    fn test_decode_shifted_ascii() {
        assert_eq!(decode_shifted_ascii("ifmmp"), "hello");
        // characters outside A..z pass through
        assert_eq!(decode_shifted_ascii("1 - 2"), "1 - 2");
    }
}
