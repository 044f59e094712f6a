/*! Pipeline stages behind the CLI.

Both stages operate on a corpus root: one directory per source, corpus
files inside (`root/<source>/<file>`), and write the same layout under a
destination root. A failure on one file is logged and isolated; it never
aborts the other files.
!*/
mod dedup;
mod reduce;

pub use dedup::DedupCorpus;
pub use reduce::ReduceCorpus;

use std::path::{Path, PathBuf};

use crate::error::Error;

/// One corpus file on disk: source directory name, file name, full path.
#[derive(Debug, Clone)]
pub struct CorpusFile {
    pub source: String,
    pub id: String,
    pub path: PathBuf,
}

/// Enumerates `root/<source>/<file>` corpus files, sorted for
/// deterministic processing order.
pub fn corpus_files(root: &Path) -> Result<Vec<CorpusFile>, Error> {
    let pattern = root.join("*/*");
    let pattern = pattern
        .to_str()
        .ok_or_else(|| Error::Custom(format!("non-utf8 corpus root: {}", root.display())))?;

    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        let (source, id) = match (path.parent().and_then(|p| p.file_name()), path.file_name()) {
            (Some(source), Some(id)) => (
                source.to_string_lossy().into_owned(),
                id.to_string_lossy().into_owned(),
            ),
            _ => continue,
        };
        files.push(CorpusFile { source, id, path });
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}
