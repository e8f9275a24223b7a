//! End-to-end pipeline behaviour: predictor passes, boosting, failures, batches

mod common;

use common::{finnish_predictor, shipped_anonymizer, shipped_config, KeywordPredictor};
use std::sync::Arc;
use text_anonymizer::anonymization::{
    AnonymizeOptions, Anonymizer, AnonymizerConfig, ChunkingConfig, SourceKind,
};
use text_anonymizer::domain::AnonymizerError;

#[tokio::test]
async fn test_address_runs_in_its_own_pass() {
    let predictor = Arc::new(finnish_predictor());
    let anonymizer = shipped_anonymizer(predictor.clone());

    anonymizer
        .anonymize(
            "Matti Virtanen muutti.",
            &AnonymizeOptions::new()
                .with_labels(["person_ner", "address_ner", "email_ner"])
                .with_threshold(0.6),
        )
        .await
        .unwrap();

    let calls = predictor.calls();
    assert_eq!(calls.len(), 2);

    let address_call = calls
        .iter()
        .find(|(labels, _)| labels == &vec!["address".to_string()])
        .expect("address pass");
    assert!((address_call.1 - 0.5).abs() < 1e-6);

    let other_call = calls
        .iter()
        .find(|(labels, _)| labels.contains(&"person".to_string()))
        .expect("person pass");
    assert_eq!(other_call.0, vec!["person".to_string(), "email".to_string()]);
    assert_eq!(other_call.1, 0.6);
}

#[tokio::test]
async fn test_single_pass_without_address() {
    let predictor = Arc::new(finnish_predictor());
    let anonymizer = shipped_anonymizer(predictor.clone());

    anonymizer
        .anonymize(
            "Matti Virtanen muutti.",
            &AnonymizeOptions::new().with_labels(["person_ner", "email_ner"]),
        )
        .await
        .unwrap();

    let calls = predictor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, 0.6);
}

#[tokio::test]
async fn test_address_boost_resolves_street_named_after_person() {
    let text = "Toimitus osoitteeseen Virtasenkatu 3 huomenna.";
    let predictor = Arc::new(
        KeywordPredictor::new()
            .with("Virtasenkatu 3", "person", 0.7)
            .with("Virtasenkatu 3", "address", 0.6),
    );
    let options = AnonymizeOptions::new().with_labels(["person_ner", "address_ner"]);

    let boosted = shipped_anonymizer(predictor.clone());
    let result = boosted.anonymize(text, &options).await.unwrap();
    assert_eq!(
        result.anonymized_text.as_deref(),
        Some("Toimitus osoitteeseen <OSOITE> huomenna.")
    );

    let unboosted = Anonymizer::from_config(
        AnonymizerConfig {
            address_boost: 0.0,
            ..shipped_config()
        },
        predictor,
    )
    .unwrap();
    let result = unboosted.anonymize(text, &options).await.unwrap();
    assert_eq!(
        result.anonymized_text.as_deref(),
        Some("Toimitus osoitteeseen <NIMI> huomenna.")
    );
}

#[tokio::test]
async fn test_pattern_beats_predictor_on_same_start() {
    let predictor = Arc::new(KeywordPredictor::new().with("311299-999A ja", "person", 0.99));
    let anonymizer = shipped_anonymizer(predictor);

    let result = anonymizer
        .anonymize("Tunnus 311299-999A ja muuta.", &AnonymizeOptions::new())
        .await
        .unwrap();

    assert_eq!(result.entities.len(), 1);
    assert_eq!(result.entities[0].source, SourceKind::Pattern);
    assert_eq!(
        result.anonymized_text.as_deref(),
        Some("Tunnus <HETU> ja muuta.")
    );
}

#[tokio::test]
async fn test_failed_chunk_keeps_other_chunks() {
    let predictor = Arc::new(finnish_predictor().failing_on("VIRHE"));
    let config = AnonymizerConfig {
        chunking: ChunkingConfig {
            max_chars: 60,
            overlap_chars: 10,
            ..ChunkingConfig::default()
        },
        ..shipped_config()
    };
    let anonymizer = Anonymizer::from_config(config, predictor).unwrap();

    let text = "Matti Virtanen saapui aamulla paikalle. \
                Tässä lauseessa on VIRHE joka kaataa mallin. \
                Iltapäivällä Liisa Korhonen lähti kotiin.";
    let result = anonymizer
        .anonymize(text, &AnonymizeOptions::new().with_labels(["person_ner"]))
        .await
        .unwrap();

    let redacted = result.anonymized_text.unwrap();
    assert!(!redacted.contains("Matti Virtanen"));
    assert!(!redacted.contains("Liisa Korhonen"));
    assert_eq!(result.summary.get("NIMI"), Some(&2));
}

#[tokio::test]
async fn test_predictor_down_fails_the_call() {
    let predictor = Arc::new(finnish_predictor().failing_on(""));
    let anonymizer = shipped_anonymizer(predictor);

    let err = anonymizer
        .anonymize("Matti Virtanen", &AnonymizeOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, AnonymizerError::Predictor(_)));
}

#[tokio::test]
async fn test_profile_label_set_from_files() {
    let predictor = Arc::new(finnish_predictor());
    let anonymizer = shipped_anonymizer(predictor.clone());

    let result = anonymizer
        .anonymize(
            "Asiakas AS-123456, Matti Virtanen, auto ABC-123.",
            &AnonymizeOptions::new().with_profile("example"),
        )
        .await
        .unwrap();

    let redacted = result.anonymized_text.unwrap();
    assert!(!redacted.contains("AS-123456"));
    assert!(redacted.contains("<ASIAKASNUMERO>"));
    assert!(redacted.contains("<NIMI>"));
    // The example profile carries no registration plate pattern
    assert!(redacted.contains("ABC-123"));
    assert!(predictor
        .calls()
        .iter()
        .all(|(labels, _)| !labels.contains(&"address".to_string())));
}

#[tokio::test]
async fn test_anonymize_text_convenience() {
    let anonymizer = shipped_anonymizer(Arc::new(finnish_predictor()));

    let text = anonymizer
        .anonymize_text(
            "Ota yhteyttä: matti.virtanen@example.fi",
            &AnonymizeOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(text, "Ota yhteyttä: <SÄHKÖPOSTI>");
}

#[tokio::test]
async fn test_batch_report_combines_documents() {
    let anonymizer = shipped_anonymizer(Arc::new(finnish_predictor().failing_on("KAATUU")));
    let texts = vec![
        "Matti Virtanen soitti.".to_string(),
        "KAATUU Liisa Korhonen".to_string(),
        "Sää on kaunis.".to_string(),
        "Liisa Korhonen, HETU 311299-999A".to_string(),
    ];

    let (results, report) = anonymizer
        .anonymize_batch(&texts, &AnonymizeOptions::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(report.total_documents, 4);
    assert_eq!(report.failed_documents, vec![1]);
    assert_eq!(report.summary.get("NIMI"), Some(&2));
    assert_eq!(report.summary.get("HETU"), Some(&1));
    assert_eq!(report.stats.documents_without_pii, 1);
    assert!(!report.format_console().contains("Korhonen"));

    let combined = text_anonymizer::anonymization::AnonymizerResult::combine(&results);
    assert_eq!(combined.summary, report.summary);
}

#[tokio::test]
async fn test_shared_across_tasks() {
    let anonymizer = Arc::new(shipped_anonymizer(Arc::new(finnish_predictor())));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let anonymizer = Arc::clone(&anonymizer);
            tokio::spawn(async move {
                let text = format!("Viesti {i}: Matti Virtanen, HETU 311299-999A.");
                anonymizer
                    .anonymize_text(&text, &AnonymizeOptions::new())
                    .await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let text = handle.await.unwrap().unwrap();
        assert_eq!(text, format!("Viesti {i}: <NIMI>, HETU <HETU>."));
    }
}
