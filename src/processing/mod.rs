/*! Corpus processing stages.

Leaves first: [normalize] holds the fixed text-cleanup pass, [script] the
script-well-formedness heuristic and dedup-key normalizer, [replace] the
per-source replacement pipeline, [reduce] the rule-driven content reducer
and [dedup] the corpus-wide near-duplicate line eliminator.
!*/
pub mod dedup;
pub mod normalize;
pub mod reduce;
pub mod replace;
pub mod script;
