/*! Per-source cleaning rules.

A rule file is a sequence of blocks. A block starts with a source name
(any non-blank line without a colon, usually a domain) and holds one rule
per line, `TAG:body`. [tag::RuleTag] is the closed set of recognized tags,
[RuleSet] the compiled per-source bundle and [Rules] the source-keyed
mapping loaded from a file.

A block named `global` acts as a baseline that is merged into every other
block (and itself, which is a no-op).
!*/
mod ruleset;
mod tag;

pub use ruleset::RuleSet;
pub use ruleset::Rules;
pub use tag::RuleTag;
