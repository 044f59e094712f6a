//! Script-well-formedness heuristic.
//!
//! Text typed without proper keyboard/locale support shows up a lot in
//! crawled forums: diacritics dropped wholesale, or a confusable base
//! letter substituted systematically (Turkish `ı` for `i`). A
//! [ScriptProfile] captures the target script's diacritic alphabet and
//! its confusable pair, and flags lines that look typed that way.

/// Ratio of confusable (dotted/plain) occurrences under which substitution
/// is considered systematic.
const CONFUSABLE_RATIO: f64 = 0.2;
/// Minimum fraction of diacritic characters for a line to count as
/// properly typed.
const DIACRITIC_RATIO: f64 = 0.05;

/// Diacritic alphabet and confusable pair of one target script.
#[derive(Debug, Clone, Copy)]
pub struct ScriptProfile {
    /// Characters carrying the script's diacritics, both cases.
    diacritics: &'static [char],
    /// `(plain, dotted)` variants of the same base letter; heavy use of
    /// the plain one without the dotted one signals bad typing.
    confusable: (char, char),
    /// Lowercase letters of the script, kept by the dedup-key normalizer.
    letters: &'static [char],
}

/// Stock profile for Turkish.
pub const TURKISH: ScriptProfile = ScriptProfile {
    diacritics: &['ç', 'ğ', 'ı', 'ö', 'ş', 'ü', 'Ç', 'Ş', 'Ğ', 'Ü', 'Ö', 'İ'],
    confusable: ('ı', 'i'),
    letters: &[
        'a', 'b', 'c', 'ç', 'd', 'e', 'f', 'g', 'ğ', 'h', 'ı', 'i', 'j', 'k', 'l', 'm', 'n',
        'o', 'ö', 'p', 'q', 'r', 's', 'ş', 't', 'u', 'ü', 'v', 'w', 'x', 'y', 'z',
    ],
};

impl ScriptProfile {
    /// True when a line looks typed without support for the target script.
    ///
    /// Checks, in order and short-circuiting:
    /// 1. the plain confusable occurs and the dotted/plain ratio is under
    ///    [CONFUSABLE_RATIO];
    /// 2. no diacritic character occurs at all;
    /// 3. the diacritic fraction of the line is under [DIACRITIC_RATIO].
    pub fn is_badly_typed(&self, line: &str) -> bool {
        let (plain, dotted) = self.confusable;
        let plain_count = line.chars().filter(|&c| c == plain).count();
        if plain_count > 0 {
            let dotted_count = line.chars().filter(|&c| c == dotted).count();
            if dotted_count == 0 || (dotted_count as f64) / (plain_count as f64) < CONFUSABLE_RATIO
            {
                return true;
            }
        }

        let diacritic_count = line
            .chars()
            .filter(|c| self.diacritics.contains(c))
            .count();
        if diacritic_count == 0 {
            return true;
        }

        (diacritic_count as f64) / (line.chars().count() as f64) < DIACRITIC_RATIO
    }

    /// Normalizes a line into a near-duplicate key: locale-aware lowercase,
    /// then everything outside the script's letter set stripped.
    pub fn duplicate_key(&self, line: &str) -> String {
        self.lowercase(line)
            .chars()
            .filter(|c| self.letters.contains(c))
            .collect()
    }

    /// Lowercasing with the Turkish dotted/dotless i rule.
    fn lowercase(&self, line: &str) -> String {
        line.chars()
            .flat_map(|c| {
                let mapped = match c {
                    'I' => 'ı',
                    'İ' => 'i',
                    other => other,
                };
                mapped.to_lowercase()
            })
            .collect()
    }
}
