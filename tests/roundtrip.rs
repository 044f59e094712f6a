use std::path::Path;

use derlem::corpus::{Corpus, Document};
use derlem::io::{reader, CorpusWriter};
use derlem::processing::dedup::LineEliminator;
use derlem::processing::reduce::Reducer;
use derlem::processing::script::TURKISH;
use derlem::rules::Rules;

fn write_rules(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("rules.txt");
    std::fs::write(&path, content).unwrap();
    path
}

fn sample_corpus() -> Corpus {
    let docs = vec![
        Document::from_header(
            "http://www.example.com/haber/1",
            vec![
                "Başbakan açıklama yaptı.".to_string(),
                "Yarın hava güneşli olacak.".to_string(),
            ],
        )
        .unwrap(),
        Document::from_header(
            "<doc id=\"example.com/haber/2\" title=\"Spor özetleri\" crawl-date=\"2015-06-01\">",
            vec!["Dün akşam oynanan maç berabere bitti.".to_string()],
        )
        .unwrap(),
    ];
    Corpus::with_documents("example.com", "2015-06-01", docs)
}

#[test]
fn save_and_reload_preserves_documents() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = sample_corpus();

    CorpusWriter::default().save_to_dir(&corpus, dir.path()).unwrap();

    let path = dir.path().join("example.com").join("2015-06-01");
    let reloaded = reader::read_corpus(&path, "example.com", "2015-06-01").unwrap();

    assert_eq!(reloaded.source(), corpus.source());
    assert_eq!(reloaded.document_count(), corpus.document_count());
    for (orig, read) in corpus.documents().iter().zip(reloaded.documents()) {
        assert_eq!(orig.id(), read.id());
        assert_eq!(orig.source(), read.source());
        assert_eq!(orig.lines(), read.lines());
    }
    // metadata attributes survive the trip too
    assert_eq!(
        reloaded.get_document("example.com/haber/2").unwrap().meta().title.as_deref(),
        Some("Spor özetleri")
    );
}

#[test]
fn reduce_then_dedup_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let rules_path = write_rules(dir.path(), "example.com\nL:^Reklamı gizle$\n");
    let rules = Rules::from_file(&rules_path).unwrap();
    let ruleset = rules.get("example.com").unwrap();
    let reducer = Reducer::new(ruleset, TURKISH);

    // a nav line repeated in every document plus real content
    let nav = "Ana sayfa Haberler Spor Ekonomi İletişim Künye Üyelik Arşiv burada".repeat(4);
    let mut docs = Vec::new();
    for i in 0..3 {
        let doc = Document::from_header(
            &format!("example.com/haber/{}", i),
            vec![
                "Reklamı gizle".to_string(),
                nav.clone(),
                format!("Bu {}. haberin kendine özgü içeriği böyle.", i),
            ],
        )
        .unwrap();
        let prepared = reducer.prepare_document(&doc, false);
        let reduced = reducer.reduce(&prepared, false);
        assert!(!reduced.lines().iter().any(|l| l == "Reklamı gizle"));
        docs.push(reduced);
    }
    let corpus = Corpus::with_documents("example.com", "f", docs);

    let mut eliminator = LineEliminator::new(rules.clone(), TURKISH);
    eliminator.add_for_duplicates(&corpus);
    let deduped = eliminator.reduce_duplicates(&corpus);

    // the nav line normalizes to >200 letters, so the threshold is 1:
    // of three occurrences exactly one survives
    let nav_left = deduped
        .documents()
        .iter()
        .flat_map(|d| d.lines())
        .filter(|l| l.contains("Ana sayfa"))
        .count();
    assert_eq!(nav_left, 1);

    // every unique content line is retained
    for i in 0..3 {
        assert!(deduped.documents().iter().any(|d| {
            d.lines()
                .iter()
                .any(|l| l.contains(&format!("Bu {}. haberin", i)))
        }));
    }
}
