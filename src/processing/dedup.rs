//! Corpus-wide near-duplicate line elimination.
//!
//! Two-pass statistical filter for templated boilerplate: pass 1 counts
//! every normalized line across the whole corpus, pass 2 re-walks the same
//! documents and drops lines that recur too often for their length. Short
//! lines (nav labels) need many repetitions before they are judged
//! template; long lines are boilerplate almost on sight.
//!
//! Pass 1 must fully complete before pass 2 starts: the judgement depends
//! on final global counts.
use std::collections::HashMap;

use log::info;
use twox_hash::xxh3;

use crate::corpus::{Corpus, Document};
use crate::processing::replace::apply_replace_patterns;
use crate::processing::script::ScriptProfile;
use crate::rules::{RuleSet, Rules};

/// Fixed seeds of the two independent hash functions. Requiring both
/// counts to clear the threshold makes a collision with a
/// genuinely-frequent line's hash in both tables at once very unlikely.
const SEED_1: u64 = 0;
const SEED_2: u64 = 0xdead_beef;

/// Two-pass near-duplicate line eliminator.
///
/// Holds the frequency tables between passes; construct, feed every corpus
/// through [LineEliminator::add_for_duplicates], then consume the corpora
/// again through [LineEliminator::reduce_duplicates] and discard.
pub struct LineEliminator {
    counts_1: HashMap<u128, u32>,
    counts_2: HashMap<u128, u32>,
    rules: Rules,
    script: ScriptProfile,
    ignored_documents: usize,
}

impl LineEliminator {
    pub fn new(rules: Rules, script: ScriptProfile) -> Self {
        LineEliminator {
            counts_1: HashMap::new(),
            counts_2: HashMap::new(),
            rules,
            script,
            ignored_documents: 0,
        }
    }

    /// Pass 1: count every non-blank line of the corpus in both tables.
    pub fn add_for_duplicates(&mut self, corpus: &Corpus) {
        let rules = self.lookup_rules(corpus);
        for document in corpus.documents() {
            let document = match self.prepared(&rules, document) {
                Some(d) => d,
                None => continue,
            };
            for line in document.lines() {
                if let Some(key) = self.duplicate_key(line) {
                    *self.counts_1.entry(hash_1(&key)).or_insert(0) += 1;
                    *self.counts_2.entry(hash_2(&key)).or_insert(0) += 1;
                }
            }
        }
    }

    /// Pass 2: re-walk a corpus identically and drop boilerplate lines.
    ///
    /// A line is dropped when both counts exceed the length-dependent
    /// threshold; each drop consumes one occurrence from both tables, so a
    /// line seen `k` times corpus-wide keeps its last `t` occurrences.
    /// Documents left without lines are dropped from the output.
    pub fn reduce_duplicates(&mut self, corpus: &Corpus) -> Corpus {
        let rules = self.lookup_rules(corpus);
        let mut out = Corpus::new(corpus.source(), corpus.id());
        for document in corpus.documents() {
            let document = match self.prepared(&rules, document) {
                Some(d) => d,
                None => continue,
            };

            let mut surviving = Vec::with_capacity(document.lines().len());
            for line in document.lines() {
                let key = match self.duplicate_key(line) {
                    Some(key) => key,
                    None => continue, // blank or letterless, never content
                };
                let h1 = hash_1(&key);
                let h2 = hash_2(&key);
                let count_1 = self.counts_1.get(&h1).copied().unwrap_or(0);
                let count_2 = self.counts_2.get(&h2).copied().unwrap_or(0);

                let threshold = min_count(&key);
                if count_1 > threshold && count_2 > threshold {
                    // consume one occurrence from both tables
                    decrement(&mut self.counts_1, h1);
                    decrement(&mut self.counts_2, h2);
                } else {
                    surviving.push(line.clone());
                }
            }
            if !surviving.is_empty() {
                out.add_document(document.copy_with_lines(surviving));
            }
        }
        out
    }

    /// Distinct keys counted so far (first table).
    pub fn key_count(&self) -> usize {
        self.counts_1.len()
    }

    /// Keys seen more than once (first table).
    pub fn repeated_key_count(&self) -> usize {
        self.counts_1.values().filter(|&&v| v > 1).count()
    }

    /// Documents skipped by the URL-accept check, over both passes.
    pub fn ignored_documents(&self) -> usize {
        self.ignored_documents
    }

    fn lookup_rules(&self, corpus: &Corpus) -> Option<RuleSet> {
        let rules = self.rules.get(corpus.source()).cloned();
        if rules.is_none() {
            info!("no rules for [{}]", corpus.source());
        }
        rules
    }

    /// The identical per-document step of both passes: URL-accept check,
    /// then the source's replacement patterns.
    fn prepared(
        &mut self,
        rules: &Option<RuleSet>,
        document: &Document,
    ) -> Option<Document> {
        match rules {
            Some(rules) => {
                if !rules.accepts_url(document.id()) {
                    self.ignored_documents += 1;
                    return None;
                }
                Some(apply_replace_patterns(rules, document))
            }
            None => Some(document.clone()),
        }
    }

    /// Normalized counting key, `None` for lines that cannot be keyed.
    fn duplicate_key(&self, line: &str) -> Option<String> {
        if line.trim().is_empty() {
            return None;
        }
        let key = self.script.duplicate_key(line);
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

fn hash_1(key: &str) -> u128 {
    xxh3::hash128_with_seed(key.as_bytes(), SEED_1)
}

fn hash_2(key: &str) -> u128 {
    xxh3::hash128_with_seed(key.as_bytes(), SEED_2)
}

fn decrement(counts: &mut HashMap<u128, u32>, hash: u128) {
    if let Some(count) = counts.get_mut(&hash) {
        *count = count.saturating_sub(1);
    }
}

/// Length-dependent minimum count: the longer the line, the fewer
/// repetitions it takes to call it boilerplate.
fn min_count(key: &str) -> u32 {
    let len = key.chars().count();
    if len > 200 {
        1
    } else if len > 100 {
        2
    } else if len > 50 {
        3
    } else {
        4
    }
}
