//! Behavioural guarantees of the anonymization pipeline

mod common;

use common::{finnish_predictor, shipped_anonymizer, shipped_config, KeywordPredictor};
use std::collections::BTreeSet;
use std::sync::Arc;
use text_anonymizer::anonymization::{
    AnonymizeOptions, Anonymizer, AnonymizerConfig, AnonymizerResult, ChunkingConfig,
    InMemoryConfigStore, RegexPattern,
};

fn assert_consistent(result: &AnonymizerResult) {
    let counted: usize = result.summary.values().sum();
    let listed: usize = result.details.values().map(Vec::len).sum();
    assert_eq!(counted, listed);
    assert!(result.is_consistent());
}

fn assert_non_overlapping(result: &AnonymizerResult) {
    for pair in result.entities.windows(2) {
        assert!(
            pair[0].end <= pair[1].start,
            "entities overlap: {:?} and {:?}",
            pair[0],
            pair[1]
        );
    }
}

#[tokio::test]
async fn test_text_without_entities_is_unchanged() {
    let anonymizer = shipped_anonymizer(Arc::new(finnish_predictor()));
    let text = "Tänään sataa vettä ja on kylmä.";

    let result = anonymizer
        .anonymize(text, &AnonymizeOptions::new())
        .await
        .unwrap();

    assert_eq!(result.anonymized_text.as_deref(), Some(text));
    assert!(result.summary.is_empty());
    assert!(result.details.is_empty());
}

#[tokio::test]
async fn test_resolved_entities_never_overlap() {
    let predictor = KeywordPredictor::new()
        .with("Matti Virtanen", "person", 0.9)
        .with("Virtanen", "person", 0.95)
        .with("Virtasenkatu 3", "address", 0.7)
        .with("Virtasenkatu", "person", 0.65)
        .with("040 1234567", "phone number", 0.8)
        .with("1234567", "phone number", 0.99);
    let anonymizer = shipped_anonymizer(Arc::new(predictor));
    let text = "Matti Virtanen asuu osoitteessa Virtasenkatu 3, puh. 040 1234567, HETU 311299-999A.";

    let result = anonymizer
        .anonymize(text, &AnonymizeOptions::new())
        .await
        .unwrap();

    assert_non_overlapping(&result);
    assert_consistent(&result);
    let redacted = result.anonymized_text.unwrap();
    assert!(!redacted.contains("Virtanen"));
    assert!(!redacted.contains("1234567"));
    assert!(!redacted.contains("311299-999A"));
}

#[tokio::test]
async fn test_grantlist_wins_over_every_source() {
    let store = InMemoryConfigStore::new()
        .with_blocklist("org", ["Kela"])
        .with_grantlist("org", ["kela"])
        .with_pattern("org", RegexPattern::new("ORGANISAATIO", r"\bKela\b"))
        .with_label_mapping("PERSON", "NIMI");
    let predictor = KeywordPredictor::new()
        .with("Kela", "person", 0.9)
        .with("Matti Virtanen", "person", 0.9);
    let anonymizer = Anonymizer::new(
        AnonymizerConfig::default(),
        Arc::new(predictor),
        Arc::new(store),
    )
    .unwrap();

    let result = anonymizer
        .anonymize(
            "Matti Virtanen asioi Kelassa ja Kela vastasi.",
            &AnonymizeOptions::new().with_profile("org"),
        )
        .await
        .unwrap();

    assert_eq!(
        result.anonymized_text.as_deref(),
        Some("<NIMI> asioi Kelassa ja Kela vastasi.")
    );
    assert_eq!(result.summary.get("NIMI"), Some(&1));
}

#[tokio::test]
async fn test_default_profile_grantlist_applies_to_unnamed_calls() {
    let store = InMemoryConfigStore::new()
        .with_pattern("default", RegexPattern::new("ORGANISAATIO", r"\bKela\b"))
        .with_grantlist("default", ["Kela"]);
    let anonymizer = Anonymizer::new(
        AnonymizerConfig::default(),
        Arc::new(KeywordPredictor::new()),
        Arc::new(store),
    )
    .unwrap();

    let options = AnonymizeOptions::new().with_labels(["person_ner"]);
    let unnamed = anonymizer.anonymize("Kela vastasi.", &options).await.unwrap();
    let named = anonymizer
        .anonymize("Kela vastasi.", &options.clone().with_profile("default"))
        .await
        .unwrap();

    assert_eq!(unnamed.anonymized_text.as_deref(), Some("Kela vastasi."));
    assert!(unnamed.summary.is_empty());
    assert_eq!(unnamed.anonymized_text, named.anonymized_text);
}

#[tokio::test]
async fn test_blocklist_term_is_always_redacted() {
    let anonymizer = shipped_anonymizer(Arc::new(finnish_predictor()));

    let result = anonymizer
        .anonymize(
            "Tunniste blockword123 on lauseessa.",
            &AnonymizeOptions::new().with_profile("example"),
        )
        .await
        .unwrap();

    let redacted = result.anonymized_text.unwrap();
    assert!(!redacted.contains("blockword123"));
    assert!(result.summary.get("MUU_TUNNISTE").copied().unwrap_or(0) >= 1);
    assert_eq!(redacted, "Tunniste <MUU_TUNNISTE> on lauseessa.");
}

#[tokio::test]
async fn test_regex_label_redacts_hetu() {
    let predictor = Arc::new(finnish_predictor());
    let anonymizer = shipped_anonymizer(predictor.clone());

    let result = anonymizer
        .anonymize(
            "HETU: 311299-999A",
            &AnonymizeOptions::new().with_labels(["fi_hetu_regex"]),
        )
        .await
        .unwrap();

    let redacted = result.anonymized_text.unwrap();
    assert!(!redacted.contains("311299-999A"));
    assert_eq!(redacted, "HETU: <HETU>");
    assert_eq!(result.entities[0].label, "FI_HETU");
    assert!(predictor.calls().is_empty());
}

#[tokio::test]
async fn test_label_forms_are_equivalent() {
    let anonymizer = shipped_anonymizer(Arc::new(finnish_predictor()));
    let text = "Soita numeroon 040 1234567 tai lähetä viesti.";

    let suffixed = anonymizer
        .anonymize(text, &AnonymizeOptions::new().with_labels(["phone_number_ner"]))
        .await
        .unwrap();
    let spaced = anonymizer
        .anonymize(text, &AnonymizeOptions::new().with_labels(["phone number"]))
        .await
        .unwrap();
    let bare = anonymizer
        .anonymize(text, &AnonymizeOptions::new().with_labels(["phone_number"]))
        .await
        .unwrap();

    assert_eq!(suffixed.anonymized_text, spaced.anonymized_text);
    assert_eq!(suffixed.summary, spaced.summary);
    assert_eq!(suffixed.anonymized_text, bare.anonymized_text);
    assert_eq!(suffixed.summary.get("PUHELIN"), Some(&1));
}

#[tokio::test]
async fn test_summary_matches_details_for_mixed_text() {
    let anonymizer = shipped_anonymizer(Arc::new(finnish_predictor()));
    let texts = [
        "Matti Virtanen ja Liisa Korhonen tapasivat.",
        "Sähköposti matti.virtanen@example.fi, puhelin 040 1234567.",
        "Tilinumero FI49 5000 9420 0287 30, auto ABC-123, liite raportti.pdf.",
        "Tunniste blockword123 ja Matti Virtanen.",
    ];

    for text in texts {
        for options in [
            AnonymizeOptions::new(),
            AnonymizeOptions::new().with_profile("example"),
        ] {
            let result = anonymizer.anonymize(text, &options).await.unwrap();
            assert_consistent(&result);
            assert_non_overlapping(&result);
        }
    }
}

#[tokio::test]
async fn test_chunking_does_not_change_findings() {
    let template = "Asiakas Matti Virtanen soitti numerosta 040 1234567 eilen. ";
    let text = template.repeat(30);

    let small_chunks = AnonymizerConfig {
        chunking: ChunkingConfig {
            max_chars: 150,
            overlap_chars: 40,
            ..ChunkingConfig::default()
        },
        ..shipped_config()
    };
    let one_chunk = AnonymizerConfig {
        chunking: ChunkingConfig {
            max_chars: text.chars().count() + 100,
            overlap_chars: 40,
            ..ChunkingConfig::default()
        },
        ..shipped_config()
    };

    let predictor = Arc::new(finnish_predictor());
    let chunked = Anonymizer::from_config(small_chunks, predictor.clone()).unwrap();
    let whole = Anonymizer::from_config(one_chunk, predictor).unwrap();

    let entity_set = |result: &AnonymizerResult| -> BTreeSet<(usize, usize, String)> {
        result
            .entities
            .iter()
            .map(|e| (e.start, e.end, e.display_label.clone()))
            .collect()
    };

    let options = AnonymizeOptions::new();
    let from_chunks = chunked.anonymize(&text, &options).await.unwrap();
    let from_whole = whole.anonymize(&text, &options).await.unwrap();

    assert_eq!(entity_set(&from_chunks), entity_set(&from_whole));
    assert_eq!(from_chunks.anonymized_text, from_whole.anonymized_text);
    assert_eq!(from_chunks.summary.get("NIMI"), Some(&30));
}

#[tokio::test]
async fn test_empty_input_returns_empty_result() {
    let predictor = Arc::new(finnish_predictor());
    let anonymizer = shipped_anonymizer(predictor.clone());

    let result = anonymizer
        .anonymize("", &AnonymizeOptions::new().with_profile("example"))
        .await
        .unwrap();

    assert!(result.anonymized_text.is_none());
    assert!(result.summary.is_empty());
    assert!(predictor.calls().is_empty());
}
