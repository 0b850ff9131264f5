use nusus_core::config::ModelSettings;
use nusus_core::Embedder;
use nusus_embed::{get_default_embedder, resolve_model_dir, HashEmbedder, FAKE_DIM};

fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading a model
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder(&ModelSettings::default()).expect("embedder");
    assert_eq!(embedder.dim(), FAKE_DIM);

    let texts = vec!["الصبر على المصائب".to_string(), "الصبر على المصائب".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    assert_eq!(embs.len(), 2);
    assert_eq!(embs[0].len(), FAKE_DIM);
    assert!((norm(&embs[0]) - 1.0).abs() <= 1e-3, "vector is L2-normalized");
    for (a, b) in embs[0].iter().zip(embs[1].iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn hash_embedder_rewards_shared_tokens() {
    let embedder = HashEmbedder::new(64);
    let texts = vec![
        "الصبر مفتاح الفرج".to_string(),
        "الصبر عند الصدمة الأولى".to_string(),
        "كتاب البيوع".to_string(),
    ];
    let v = embedder.embed_batch(&texts).unwrap();
    assert!(dot(&v[0], &v[1]) > 0.0, "shared token gives positive similarity");
    assert!(dot(&v[0], &v[0]) > dot(&v[0], &v[2]));
}

#[test]
fn hash_embedder_handles_empty_input() {
    let embedder = HashEmbedder::new(16);
    assert!(embedder.embed_batch(&[]).unwrap().is_empty());
    let blank = embedder.embed_batch(&["".to_string()]).unwrap();
    assert!(blank[0].iter().all(|x| *x == 0.0), "no tokens gives a zero vector, not NaN");
}

#[test]
fn missing_model_dir_lists_candidates() {
    let settings = ModelSettings {
        name: "org/definitely-not-present-model".to_string(),
        dir: Some("/nonexistent/model/dir".to_string()),
        ..ModelSettings::default()
    };
    let err = resolve_model_dir(&settings).unwrap_err().to_string();
    assert!(err.contains("/nonexistent/model/dir"));
    assert!(err.contains("definitely-not-present-model"));
}
