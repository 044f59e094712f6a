//! Two-pass near-duplicate elimination over a corpus root.
use std::path::PathBuf;

use log::{error, info};

use crate::error::Error;
use crate::io::{reader, CorpusWriter};
use crate::pipeline::corpus_files;
use crate::processing::dedup::LineEliminator;
use crate::processing::script::TURKISH;
use crate::rules::Rules;

/// Removes corpus-wide boilerplate lines from every file under a root.
///
/// Strictly sequential: the counting pass runs over every file before the
/// first line of the reducing pass is judged.
pub struct DedupCorpus {
    src: PathBuf,
    dst: PathBuf,
    rules_path: PathBuf,
    only_content: bool,
}

impl DedupCorpus {
    pub fn new(src: PathBuf, dst: PathBuf, rules_path: PathBuf, only_content: bool) -> Self {
        Self {
            src,
            dst,
            rules_path,
            only_content,
        }
    }

    pub fn run(&self) -> Result<(), Error> {
        let rules = Rules::from_file(&self.rules_path)?;
        let files = corpus_files(&self.src)?;
        info!("{} corpus files under {}", files.len(), self.src.display());

        let mut eliminator = LineEliminator::new(rules, TURKISH);

        // pass 1: accumulate counts over the whole corpus
        for file in &files {
            match reader::read_corpus(&file.path, &file.source, &file.id) {
                Ok(corpus) => {
                    info!("[{}/{}] counting {} documents", file.source, file.id, corpus.document_count());
                    eliminator.add_for_duplicates(&corpus);
                }
                Err(e) => error!("[{}/{}] {}", file.source, file.id, e),
            }
        }
        info!(
            "counted {} distinct keys, {} repeated, {} documents ignored",
            eliminator.key_count(),
            eliminator.repeated_key_count(),
            eliminator.ignored_documents()
        );

        // pass 2: re-walk and reduce
        let writer = CorpusWriter::new(self.only_content);
        for file in &files {
            let corpus = match reader::read_corpus(&file.path, &file.source, &file.id) {
                Ok(corpus) => corpus,
                Err(e) => {
                    error!("[{}/{}] {}", file.source, file.id, e);
                    continue;
                }
            };
            let reduced = eliminator.reduce_duplicates(&corpus);
            info!(
                "[{}/{}] lines {} -> {}",
                file.source,
                file.id,
                corpus.total_line_count(),
                reduced.total_line_count()
            );
            if let Err(e) = writer.save_to_dir(&reduced, &self.dst) {
                error!("[{}/{}] {}", file.source, file.id, e);
            }
        }
        Ok(())
    }
}
