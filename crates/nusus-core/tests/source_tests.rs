use std::fs;

use tempfile::TempDir;

use nusus_core::corpus::RawCorpus;
use nusus_core::error::Error;
use nusus_core::source::load_corpus;
use nusus_core::types::CorpusKind;

#[test]
fn first_existing_candidate_wins() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("quran_lemmatized.json"), r#"[{"surahName": "الفاتحة", "verses": ["الحمد لله"]}]"#).unwrap();
    fs::write(dir.join("quran_cleaned_arabic.json"), r#"["ignored text"]"#).unwrap();

    let candidates = vec![
        "quran_lemmatized_enhanced.json".to_string(),
        "quran_lemmatized.json".to_string(),
        "quran_cleaned_arabic.json".to_string(),
    ];
    let raw = load_corpus(CorpusKind::Scripture, dir, &candidates).expect("load");
    assert!(matches!(raw, RawCorpus::Grouped(ref g) if g.len() == 1));
}

#[test]
fn missing_source_names_every_attempted_path() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("unrelated.json"), "[]").unwrap();

    let candidates = vec!["hadiths_lemmatized.json".to_string(), "bukhari.json".to_string()];
    let err = load_corpus(CorpusKind::Narration, dir, &candidates).unwrap_err();
    match &err {
        Error::DataSourceNotFound { kind, attempted } => {
            assert_eq!(*kind, CorpusKind::Narration);
            assert_eq!(attempted, &vec![dir.join("hadiths_lemmatized.json"), dir.join("bukhari.json")]);
        }
        other => panic!("unexpected error {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("narration"));
    assert!(message.contains("hadiths_lemmatized.json"));
    assert!(message.contains("bukhari.json"));
}

#[test]
fn malformed_json_is_an_invalid_corpus() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("broken.json"), "{ not json").unwrap();

    let err = load_corpus(CorpusKind::Scripture, dir, &["broken.json".to_string()]).unwrap_err();
    assert!(matches!(err, Error::InvalidCorpus(ref msg) if msg.contains("broken.json")));
}

#[test]
fn absolute_candidates_ignore_the_data_dir() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("hadiths.json");
    fs::write(&file, r#"[{"original_text": "إنما الأعمال بالنيات"}]"#).unwrap();

    let elsewhere = TempDir::new().unwrap();
    let raw = load_corpus(CorpusKind::Narration, elsewhere.path(), &[file.to_string_lossy().to_string()])
        .expect("load absolute");
    assert!(matches!(raw, RawCorpus::Records(ref r) if r.len() == 1));
}
