/*! Line-oriented corpus file I/O.

A corpus file is a flat sequence of blocks:

```text
<doc id="example.com/news/1">
line
line
</doc>
```

The opening tag may also carry `source`, `title`, `labels`, `category` and
`crawl-date` attributes; readers accept both variants, writers escape
embedded quotes. A content-only output mode omits the tags entirely.
!*/
pub mod reader;
pub mod writer;

pub use reader::CorpusReader;
pub use writer::CorpusWriter;
