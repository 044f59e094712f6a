//! Corpus file writer.
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::corpus::{Corpus, Document};
use crate::error::Error;

/// Writes corpora in the line-oriented block format.
///
/// Content-only mode omits the `<doc>` tags: one document's lines directly
/// followed by the next.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorpusWriter {
    only_content: bool,
}

impl CorpusWriter {
    pub fn new(only_content: bool) -> Self {
        CorpusWriter { only_content }
    }

    pub fn write<W: Write>(&self, corpus: &Corpus, w: &mut W) -> Result<(), Error> {
        for document in corpus.documents() {
            if !self.only_content {
                writeln!(w, "{}", document_header(document))?;
            }
            if !document.is_empty() {
                writeln!(w, "{}", document.content())?;
            }
            if !self.only_content {
                writeln!(w, "</doc>")?;
            }
        }
        Ok(())
    }

    pub fn save(&self, corpus: &Corpus, path: &Path) -> Result<(), Error> {
        let mut w = BufWriter::new(File::create(path)?);
        self.write(corpus, &mut w)?;
        w.flush()?;
        Ok(())
    }

    /// Saves under `out_root/<source>/<corpus id>`, creating directories.
    pub fn save_to_dir(&self, corpus: &Corpus, out_root: &Path) -> Result<(), Error> {
        let dir = out_root.join(corpus.source());
        fs::create_dir_all(&dir)?;
        self.save(corpus, &dir.join(corpus.id()))
    }
}

/// Opening tag for a document; optional attributes only when present.
fn document_header(document: &Document) -> String {
    let mut header = format!("<doc id=\"{}\"", escape_attr(document.id()));
    if !document.source().is_empty() {
        header.push_str(&format!(" source=\"{}\"", escape_attr(document.source())));
    }
    let meta = document.meta();
    if let Some(title) = &meta.title {
        header.push_str(&format!(" title=\"{}\"", escape_attr(title)));
    }
    if !meta.labels.is_empty() {
        header.push_str(&format!(" labels=\"{}\"", escape_attr(&meta.labels.join(","))));
    }
    if let Some(category) = &meta.category {
        header.push_str(&format!(" category=\"{}\"", escape_attr(category)));
    }
    if let Some(date) = &meta.crawl_date {
        header.push_str(&format!(" crawl-date=\"{}\"", escape_attr(date)));
    }
    header.push('>');
    header
}

/// Escapes embedded quotes/apostrophes in attribute values.
fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;").replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Cursor};

    use super::*;
    use crate::corpus::Document;
    use crate::io::reader::Reader;

    fn corpus() -> Corpus {
        Corpus::with_documents(
            "a.com",
            "2015-01-01",
            vec![
                Document::from_header("a.com/1", vec!["satır bir".into(), "satır iki".into()])
                    .unwrap(),
                Document::from_header("a.com/2", vec!["tek satır".into()]).unwrap(),
            ],
        )
    }

    #[test]
    fn test_roundtrip() {
        let corpus = corpus();
        let mut buf = Vec::new();
        CorpusWriter::default().write(&corpus, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let reader = Reader::new(BufReader::new(Cursor::new(text)).lines());
        let docs: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(docs.len(), 2);
        for (orig, read) in corpus.documents().iter().zip(&docs) {
            assert_eq!(orig.id(), read.id());
            assert_eq!(orig.source(), read.source());
            assert_eq!(orig.lines(), read.lines());
        }
    }

    #[test]
    fn test_content_only() {
        let corpus = corpus();
        let mut buf = Vec::new();
        CorpusWriter::new(true).write(&corpus, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("<doc"));
        assert!(!text.contains("</doc>"));
        assert_eq!(text, "satır bir\nsatır iki\ntek satır\n");
    }

    #[test]
    fn test_empty_document_roundtrip() {
        // a zero-line document writes no content line inside its block
        let empty = Document::from_header("a.com/1", vec![]).unwrap();
        let full = Document::from_header("a.com/2", vec!["dolu satır".into()]).unwrap();
        let corpus = Corpus::with_documents("a.com", "f", vec![empty, full]);
        let mut buf = Vec::new();
        CorpusWriter::default().write(&corpus, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("<doc id=\"a.com/1\" source=\"a.com\">\n</doc>\n"));
        let reader = Reader::new(BufReader::new(Cursor::new(text)).lines());
        let docs: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].is_empty());
        assert_eq!(docs[1].lines(), ["dolu satır"]);
    }

    #[test]
    fn test_quote_escaping() {
        let doc = Document::from_header(
            "<doc id=\"a.com/1\" title=\"a &quot;b&apos; c\">",
            vec!["x y".into()],
        )
        .unwrap();
        let corpus = Corpus::with_documents("a.com", "f", vec![doc]);
        let mut buf = Vec::new();
        CorpusWriter::default().write(&corpus, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("title=\"a &quot;b&apos; c\""));
    }
}
