use nusus_core::types::{CorpusEntry, Metadata, NarrationMeta, ScriptureMeta};
use nusus_core::{CitationStyle, CorpusPolicy};
use nusus_search::{boosted_score, Reranker};
use nusus_vector::Candidate;

const POLICY: CorpusPolicy = CorpusPolicy { oversample: 3, original_term_boost: 2.0, expanded_term_boost: 1.5 };

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn no_hit_keeps_similarity() {
    let s = boosted_score(0.3, "إنما الأعمال بالنيات", "الصيام", "الصيام رمضان", &POLICY, 3);
    assert!(close(s, 0.3));
}

#[test]
fn each_stage_applies_at_most_once() {
    // Two original terms hit, but the first stage still multiplies once.
    let text = "الصبر ضياء والصلاة نور";
    let s = boosted_score(0.2, text, "الصبر الصلاة", "الصبر الصلاة", &POLICY, 3);
    assert!(close(s, 0.2 * 2.0 * 1.5), "got {s}");

    let only_expanded = boosted_score(0.2, text, "كلمة", "كلمة ضياء", &POLICY, 3);
    assert!(close(only_expanded, 0.2 * 1.5));
}

#[test]
fn short_terms_never_boost() {
    let s = boosted_score(0.4, "في سبيل الله", "في", "في", &POLICY, 3);
    assert!(close(s, 0.4));
    let s = boosted_score(0.1, "في سبيل الله", "في", "في", &POLICY, 2);
    assert!(close(s, 0.1 * 2.0 * 1.5), "threshold is configurable");
}

#[test]
fn boosted_scores_are_capped_at_one() {
    let s = boosted_score(0.9, "الرحمة واسعة", "الرحمة", "الرحمة", &POLICY, 3);
    assert!(close(s, 1.0));
}

#[test]
fn negative_scores_are_never_boosted_or_floored() {
    let s = boosted_score(-0.4, "الرحمة واسعة", "الرحمة", "الرحمة", &POLICY, 3);
    assert!(close(s, -0.4));
}

#[test]
fn boosting_is_monotonic() {
    for sim in [-1.0f32, -0.2, 0.0, 0.05, 0.4, 0.7, 1.0] {
        let plain = boosted_score(sim, "نص بلا تطابق", "الزكاة", "الزكاة", &POLICY, 3);
        let hit = boosted_score(sim, "فضل الزكاة", "الزكاة", "الزكاة", &POLICY, 3);
        assert!(hit >= plain, "sim {sim}: {hit} < {plain}");
    }
}

fn scripture(text: &str, citation: Option<&str>) -> CorpusEntry {
    CorpusEntry {
        text: text.to_string(),
        metadata: Metadata::Scripture(ScriptureMeta {
            group_index: Some(2),
            group_name: Some("البقرة".to_string()),
            item_index: Some(153),
            citation: citation.map(str::to_string),
        }),
    }
}

#[test]
fn rerank_reorders_fills_citations_and_truncates() {
    let entries = [
        scripture("يا أيها الذين آمنوا استعينوا", Some("Qur'an البقرة (2):153")),
        scripture("إن الله مع الصابرين دائما", None),
        CorpusEntry {
            text: "من يرد الله به خيرا".to_string(),
            metadata: Metadata::Narration(NarrationMeta {
                collection_name: "صحيح البخاري".to_string(),
                book_title: Some("كتاب العلم".to_string()),
                ..NarrationMeta::default()
            }),
        },
    ];
    let candidates: Vec<Candidate<'_>> = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| Candidate { position, similarity: 0.5 - 0.1 * position as f32, entry })
        .collect();

    let style = CitationStyle::default();
    let reranker = Reranker { policy: &POLICY, min_term_chars: 3, style: &style };
    let results = reranker.rerank(&candidates, "الصابرين", "الصابرين البلاء", 2);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].text, "إن الله مع الصابرين دائما", "boost lifts the second candidate");
    assert!(close(results[0].score, 1.0), "0.4 * 2.0 * 1.5 is capped");
    assert_eq!(results[0].citation(), "Qur'an البقرة (2):153", "missing citation is formatted");
    assert_eq!(results[1].citation(), "Qur'an البقرة (2):153");
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn rerank_keeps_candidate_order_on_ties() {
    let entries = [scripture("نص أول هنا", Some("a")), scripture("نص ثان هنا", Some("b"))];
    let candidates: Vec<Candidate<'_>> = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| Candidate { position, similarity: 0.5, entry })
        .collect();
    let style = CitationStyle::default();
    let reranker = Reranker { policy: &POLICY, min_term_chars: 3, style: &style };

    let results = reranker.rerank(&candidates, "شيء", "شيء", 10);
    let citations: Vec<&str> = results.iter().map(|r| r.citation()).collect();
    assert_eq!(citations, vec!["a", "b"]);
    assert!(reranker.rerank(&candidates, "شيء", "شيء", 0).is_empty());
}
