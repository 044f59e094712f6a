//! Rule-driven reduction over a corpus root.
use std::path::PathBuf;

use log::{error, info, warn};
use rayon::prelude::*;

use crate::corpus::Corpus;
use crate::error::Error;
use crate::io::{reader, CorpusWriter};
use crate::pipeline::{corpus_files, CorpusFile};
use crate::processing::reduce::Reducer;
use crate::processing::script::TURKISH;
use crate::rules::{RuleSet, Rules};

/// Applies per-source rules to every corpus file under a root.
pub struct ReduceCorpus {
    src: PathBuf,
    dst: PathBuf,
    rules_path: PathBuf,
    keep_repeats: bool,
    only_content: bool,
}

impl ReduceCorpus {
    pub fn new(
        src: PathBuf,
        dst: PathBuf,
        rules_path: PathBuf,
        keep_repeats: bool,
        only_content: bool,
    ) -> Self {
        Self {
            src,
            dst,
            rules_path,
            keep_repeats,
            only_content,
        }
    }

    /// A bad rule file is fatal; everything past that point is per-file.
    pub fn run(&self) -> Result<(), Error> {
        let rules = Rules::from_file(&self.rules_path)?;
        info!("loaded {} rule sets from {}", rules.len(), self.rules_path.display());

        let files = corpus_files(&self.src)?;
        info!("{} corpus files under {}", files.len(), self.src.display());

        files.par_iter().for_each(|file| {
            if let Err(e) = self.reduce_file(file, &rules) {
                error!("[{}/{}] {}", file.source, file.id, e);
            }
        });
        Ok(())
    }

    fn reduce_file(&self, file: &CorpusFile, rules: &Rules) -> Result<(), Error> {
        let corpus = reader::read_corpus(&file.path, &file.source, &file.id)?;

        let empty;
        let ruleset: &RuleSet = match rules.get(&file.source) {
            Some(rs) => rs,
            None => {
                warn!("no rules for [{}], passing documents through", file.source);
                empty = RuleSet::empty(&file.source);
                &empty
            }
        };

        let dedup_mode = !self.keep_repeats;
        let reducer = Reducer::new(ruleset, TURKISH);

        let mut reduced = Corpus::new(corpus.source(), corpus.id());
        for document in corpus.documents() {
            let prepared = reducer.prepare_document(document, dedup_mode);
            let result = reducer.reduce(&prepared, dedup_mode);
            if !result.is_empty() {
                reduced.add_document(result);
            }
        }

        info!(
            "[{}/{}] documents {} -> {}, lines {} -> {}",
            file.source,
            file.id,
            corpus.document_count(),
            reduced.document_count(),
            corpus.total_line_count(),
            reduced.total_line_count()
        );
        if reduced.document_count() == 0 {
            warn!("[{}/{}] no document with content left", file.source, file.id);
        }

        CorpusWriter::new(self.only_content).save_to_dir(&reduced, &self.dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = "example.com\nL:^Reklam$\n";

    const CORPUS: &str = "<doc id=\"example.com/haber/1\">\n\
Reklam\n\
Bugün hava çok güzel, yarın yağmur bekleniyor.\n\
Reklam\n\
</doc>\n";

    #[test_log::test]
    fn test_end_to_end_reduce() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("raw");
        let dst = dir.path().join("clean");
        let rules_path = dir.path().join("rules.txt");
        std::fs::create_dir_all(src.join("example.com")).unwrap();
        std::fs::write(src.join("example.com/2015-01-01"), CORPUS).unwrap();
        std::fs::write(&rules_path, RULES).unwrap();

        ReduceCorpus::new(src, dst.clone(), rules_path, false, false)
            .run()
            .unwrap();

        let out = std::fs::read_to_string(dst.join("example.com/2015-01-01")).unwrap();
        assert!(out.contains("Bugün hava çok güzel"));
        assert!(!out.contains("Reklam"));
    }

    #[test_log::test]
    fn test_missing_rules_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("raw");
        let dst = dir.path().join("clean");
        let rules_path = dir.path().join("rules.txt");
        std::fs::create_dir_all(src.join("other.com")).unwrap();
        std::fs::write(
            src.join("other.com/f"),
            "<doc id=\"other.com/1\">\nBugün hava çok güzel, yarın yağmur bekleniyor.\n</doc>\n",
        )
        .unwrap();
        std::fs::write(&rules_path, RULES).unwrap();

        ReduceCorpus::new(src, dst.clone(), rules_path, false, false)
            .run()
            .unwrap();

        let out = std::fs::read_to_string(dst.join("other.com/f")).unwrap();
        assert!(out.contains("Bugün hava çok güzel"));
    }

    #[test_log::test]
    fn test_unreadable_file_does_not_abort_others() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("raw");
        let dst = dir.path().join("clean");
        let rules_path = dir.path().join("rules.txt");
        std::fs::create_dir_all(src.join("example.com")).unwrap();
        // not valid utf-8; reading it fails with an io error
        std::fs::write(src.join("example.com/2015-01-01"), [0xff_u8, 0xfe, 0x00]).unwrap();
        std::fs::write(src.join("example.com/2015-01-02"), CORPUS).unwrap();
        std::fs::write(&rules_path, RULES).unwrap();

        ReduceCorpus::new(src, dst.clone(), rules_path, false, false)
            .run()
            .unwrap();

        // the failing file is logged and skipped, the good one written
        assert!(!dst.join("example.com/2015-01-01").exists());
        let out = std::fs::read_to_string(dst.join("example.com/2015-01-02")).unwrap();
        assert!(out.contains("Bugün hava çok güzel"));
    }

    #[test_log::test]
    fn test_bad_rule_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let rules_path = dir.path().join("rules.txt");
        std::fs::write(&rules_path, "example.com\nL:([broken\n").unwrap();
        let res = ReduceCorpus::new(
            dir.path().join("raw"),
            dir.path().join("clean"),
            rules_path,
            false,
            false,
        )
        .run();
        assert!(matches!(res, Err(Error::Regex(_))));
    }
}
