//! Corpus file reader.
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use log::warn;

use crate::corpus::{Corpus, Document};
use crate::error::Error;

const DOC_OPEN: &str = "<doc id=";
const DOC_CLOSE: &str = "</doc>";

/// Streaming reader over the blocks of a corpus file.
///
/// Iterates [Document]s; documents whose id cannot be derived are skipped
/// with a warning rather than failing the whole file.
#[derive(Debug)]
pub struct Reader<T>
where
    T: Read,
{
    lines: Lines<BufReader<T>>,
    /// Header of the next block, when the current block was terminated by
    /// a new opening tag instead of `</doc>`.
    pending_header: Option<String>,
}

pub type CorpusReader = Reader<File>;

impl CorpusReader {
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        let file = File::open(src)?;
        Ok(Self::new(BufReader::new(file).lines()))
    }
}

impl<T> Reader<T>
where
    T: Read,
{
    pub fn new(lines: Lines<BufReader<T>>) -> Self {
        Self {
            lines,
            pending_header: None,
        }
    }

    /// Advances to the next block header, if any.
    fn next_header(&mut self) -> Option<Result<String, Error>> {
        if let Some(header) = self.pending_header.take() {
            return Some(Ok(header));
        }
        loop {
            match self.lines.next() {
                None => return None,
                Some(Err(e)) => return Some(Err(Error::Io(e))),
                Some(Ok(line)) if line.starts_with(DOC_OPEN) => return Some(Ok(line)),
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Collects block content up to `</doc>`, end of file, or an
    /// unterminated follow-up block.
    fn block_content(&mut self) -> Result<Vec<String>, Error> {
        let mut content = Vec::new();
        loop {
            match self.lines.next() {
                None => return Ok(content),
                Some(Err(e)) => return Err(Error::Io(e)),
                Some(Ok(line)) if line.starts_with(DOC_CLOSE) => return Ok(content),
                Some(Ok(line)) if line.starts_with(DOC_OPEN) => {
                    self.pending_header = Some(line);
                    return Ok(content);
                }
                Some(Ok(line)) => content.push(line),
            }
        }
    }
}

impl<T> Iterator for Reader<T>
where
    T: Read,
{
    type Item = Result<Document, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let header = match self.next_header()? {
                Ok(h) => h,
                Err(e) => return Some(Err(e)),
            };
            let content = match self.block_content() {
                Ok(c) => c,
                Err(e) => return Some(Err(e)),
            };
            match Document::from_header(&header, content) {
                Ok(doc) => return Some(Ok(doc)),
                // a single bad id does not abort the corpus
                Err(Error::MalformedHeader(h)) => {
                    warn!("skipping document with malformed header: {}", h);
                    continue;
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Loads a whole corpus file. `source` and `id` usually come from the
/// directory and file names.
pub fn read_corpus(path: &Path, source: &str, id: &str) -> Result<Corpus, Error> {
    let mut corpus = Corpus::new(source, id);
    for document in CorpusReader::from_path(path)? {
        corpus.add_document(document?);
    }
    Ok(corpus)
}
