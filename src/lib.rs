/*! # Derlem

Builds clean, deduplicated text corpora from raw crawled web pages.

Per source (a web domain), already-extracted page content is filtered by
operator-authored rules, normalized, and checked against corpus-wide
near-duplicate statistics so that boilerplate (navigation bars, templates,
repeated disclaimers) is removed while genuine content is kept.

The crate can be used as a tool (see the `reduce` and `dedup` subcommands)
or as a library; the interesting parts are [rules], [processing::reduce]
and [processing::dedup].
!*/
pub mod corpus;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod processing;
pub mod rules;
