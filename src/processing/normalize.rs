//! Fixed text normalization.
//!
//! Applied to every surviving line before rule-specific word filters, in a
//! fixed order: illegal characters, ampersand escapes, quote/dash variants,
//! leftover HTML fragments. Boilerplate-stripped crawl text also tends to
//! contain words glued through punctuation ("sonraki.Haber"); those are
//! split when both sides look like real words.
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref ENTITY: Regex = Regex::new(r"&(#x?[0-9A-Fa-f]+|[A-Za-z]+);").unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"<[^<>]*>").unwrap();
    static ref PERCENT_ESCAPE: Regex = Regex::new(r"%[A-Fa-f0-9]{2}").unwrap();
    static ref JOINED_WORDS: Regex =
        Regex::new(r"(\p{L}{3,})([.!?:;,])(\p{L}{3,})").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref WHITESPACE_OR_NBSP: Regex = Regex::new("[\\s\u{00A0}]").unwrap();
}

/// Minimum token length on both sides of the punctuation for
/// [separate_joined_words] to split.
const JOINED_WORD_MIN_LEN: usize = 3;

/// The full normalization chain of the cleaning pipeline.
pub fn clean_and_normalize(input: &str) -> String {
    strip_html_fragments(&normalize_quotes_dashes(&convert_entities(
        &clean_illegal_chars(input),
    )))
}

/// Replaces characters that are illegal in the source encoding (control
/// characters, non-characters) with a space.
pub fn clean_illegal_chars(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let illegal = (c.is_control() && c != '\t') || c == '\u{FFFE}' || c == '\u{FFFF}';
            if illegal {
                ' '
            } else {
                c
            }
        })
        .collect()
}

/// Decodes ampersand-escaped sequences to their literal characters.
/// Unrecognized entities are left untouched.
pub fn convert_entities(input: &str) -> String {
    ENTITY
        .replace_all(input, |caps: &Captures| {
            let body = &caps[1];
            match body {
                "amp" => "&".to_string(),
                "lt" => "<".to_string(),
                "gt" => ">".to_string(),
                "quot" => "\"".to_string(),
                "apos" | "rsquo" | "lsquo" => "'".to_string(),
                "nbsp" => " ".to_string(),
                "ldquo" | "rdquo" => "\"".to_string(),
                "ndash" | "mdash" => "-".to_string(),
                _ => {
                    let code = if let Some(hex) = body.strip_prefix("#x") {
                        u32::from_str_radix(hex, 16).ok()
                    } else if let Some(dec) = body.strip_prefix('#') {
                        dec.parse::<u32>().ok()
                    } else {
                        None
                    };
                    match code.and_then(char::from_u32) {
                        Some(c) => c.to_string(),
                        None => caps[0].to_string(),
                    }
                }
            }
        })
        .into_owned()
}

/// Canonicalizes curly quotes and the dash zoo to plain ASCII.
pub fn normalize_quotes_dashes(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{00B4}' | '`' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{00AB}' | '\u{00BB}' => '"',
            '\u{2010}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' | '\u{2212}' => '-',
            _ => c,
        })
        .collect()
}

/// Strips raw HTML-looking fragments that survived extraction.
pub fn strip_html_fragments(input: &str) -> String {
    HTML_TAG.replace_all(input, "").into_owned()
}

/// Inserts a space between tokens joined through punctuation when each
/// side is at least [JOINED_WORD_MIN_LEN] letters long. Runs to a fixed
/// point so chains like `bir.iki.üçdört` come fully apart.
pub fn separate_joined_words(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = JOINED_WORDS.replace_all(&current, "$1$2 $3").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Decodes `%XX` escapes in URL-derived identifiers.
/// Escapes that do not form a valid character are kept literal.
pub fn decode_percent_escapes(input: &str) -> String {
    PERCENT_ESCAPE
        .replace_all(input, |caps: &Captures| {
            let code = u32::from_str_radix(&caps[0][1..], 16).unwrap_or(0);
            match char::from_u32(code) {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Collapses whitespace runs to single spaces and trims.
pub fn collapse_whitespace(input: &str) -> String {
    WHITESPACE_RUN.replace_all(input.trim(), " ").into_owned()
}

/// Turns every whitespace or no-break-space character into one ASCII space.
pub fn spaces_only(input: &str) -> String {
    WHITESPACE_OR_NBSP.replace_all(input, " ").into_owned()
}
