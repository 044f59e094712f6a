/*! In-memory corpus model.

A [Document] is one crawled page: an ordered list of already-extracted
plain-text lines plus its source and URL-derived identity. A [Corpus] is a
collection of documents from one source with O(1) id lookup.

Documents are never mutated in place: every transform builds a new
document through [Document::copy_with_lines].
!*/
mod corpus;
mod document;

pub use corpus::Corpus;
pub use document::Document;
pub use document::PageMetadata;
