use std::sync::Arc;
use std::thread;

use indexmap::IndexMap;

use sieve::analysis::char_filter::MarkupStripCharFilter;
use sieve::classifier::{Classifier, LabelScore, ModelSnapshot, SharedClassifier};
use sieve::error::Result;

const CORPUS: &[(&str, &str)] = &[
    ("spam", "buy cheap now"),
    ("ham", "let's meet for lunch"),
    ("spam", "cheap pills now"),
    ("ham", "lunch is at noon, see you there"),
    ("news", "markets rally as rates hold"),
];

fn trained(samples: &[(&str, &str)]) -> Classifier {
    let mut classifier = Classifier::default();
    classifier.train_all(samples.iter().copied());
    classifier
}

fn sorted_by_label(mut scores: Vec<LabelScore>) -> Vec<LabelScore> {
    scores.sort_by(|a, b| a.label.cmp(&b.label));
    scores
}

#[test]
fn spam_outranks_ham_for_spammy_text() {
    let mut classifier = Classifier::default();
    classifier.train("spam", "buy cheap now");
    classifier.train("ham", "let's meet for lunch");
    classifier.train("spam", "cheap pills now");

    let scores = classifier.classify("cheap now");
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].label, "spam");
    assert_eq!(scores[1].label, "ham");
    assert!(scores[0].score > scores[1].score);
}

#[test]
fn untrained_classifier_returns_nothing() {
    let classifier = Classifier::default();
    assert!(classifier.is_empty());
    assert!(classifier.classify("anything at all").is_empty());
}

#[test]
fn unseen_tokens_score_exactly_half() {
    let classifier = trained(CORPUS);
    let scores = classifier.classify("zebra quokka");

    assert_eq!(scores.len(), 3);
    assert!(scores.iter().all(|s| s.score == 0.5));
    // Equal scores keep first-trained order.
    let labels: Vec<_> = scores.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["spam", "ham", "news"]);
}

#[test]
fn single_label_yields_empty_result() {
    let classifier = trained(&[("only", "one label here"), ("only", "and here")]);
    assert!(classifier.classify("one label").is_empty());
}

#[test]
fn scores_stay_within_unit_interval_and_sorted() {
    let classifier = trained(CORPUS);
    for text in ["cheap lunch", "markets now", "see you at noon", ""] {
        let scores = classifier.classify(text);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(&s.score)));
        assert!(scores.windows(2).all(|w| w[0].score >= w[1].score));
    }
}

#[test]
fn counts_are_additive_and_conserved() {
    let classifier = trained(CORPUS);

    assert_eq!(classifier.total_documents(), CORPUS.len() as u64);
    assert_eq!(classifier.document_count("spam"), 2);
    assert_eq!(classifier.token_count("cheap"), 2);
    assert_eq!(classifier.label_token_count("spam", "now"), 2);

    let snapshot = classifier.snapshot();
    for (label, total) in &snapshot.labels {
        let per_token: u64 = snapshot.data[label].values().sum();
        assert_eq!(*total, per_token);
    }
    for (token, count) in &snapshot.tokens {
        let across_labels: u64 = snapshot
            .data
            .values()
            .map(|tokens| tokens.get(token).copied().unwrap_or(0))
            .sum();
        assert_eq!(*count, across_labels);
    }
}

#[test]
fn training_twice_doubles_every_count() {
    let once = trained(&[("spam", "cheap cheap now")]);
    let twice = trained(&[("spam", "cheap cheap now"), ("spam", "cheap cheap now")]);

    let doubled = |map: &IndexMap<String, u64>| -> IndexMap<String, u64> {
        map.iter().map(|(k, v)| (k.clone(), v * 2)).collect()
    };
    let single = once.snapshot();
    let double = twice.snapshot();

    assert_eq!(double.labels, doubled(&single.labels));
    assert_eq!(double.docs, doubled(&single.docs));
    assert_eq!(double.tokens, doubled(&single.tokens));
    assert_eq!(double.data["spam"], doubled(&single.data["spam"]));
    assert_eq!(twice.token_count("cheap"), 4);
}

#[test]
fn incremental_training_matches_batch_training() {
    let batch = trained(CORPUS);

    let mut incremental = trained(&CORPUS[..2]);
    for (label, text) in &CORPUS[2..] {
        incremental.train(label, text);
    }

    assert_eq!(batch.snapshot(), incremental.snapshot());
}

#[test]
fn training_order_does_not_change_scores() {
    let forward = trained(CORPUS);
    let reversed: Vec<_> = CORPUS.iter().rev().copied().collect();
    let backward = trained(&reversed);

    assert_eq!(forward.snapshot(), backward.snapshot());
    for text in ["cheap now", "lunch at noon", "rates"] {
        assert_eq!(
            sorted_by_label(forward.classify(text)),
            sorted_by_label(backward.classify(text))
        );
    }
}

#[test]
fn reset_forgets_everything() {
    let mut classifier = trained(CORPUS);
    classifier.reset();

    assert!(classifier.is_empty());
    assert_eq!(classifier.total_documents(), 0);
    assert_eq!(classifier.vocabulary_size(), 0);
    assert!(classifier.classify("cheap now").is_empty());
    assert_eq!(classifier.snapshot(), ModelSnapshot::default());
}

#[test]
fn labels_and_text_are_case_folded() {
    let mut classifier = Classifier::default();
    classifier.train("SPAM", "Cheap NOW");
    classifier.train("ham", "Lunch");

    assert_eq!(classifier.labels(), vec!["spam", "ham"]);
    assert_eq!(classifier.token_count("cheap"), 1);
    assert_eq!(classifier.classify("CHEAP")[0].label, "spam");
}

#[test]
fn empty_document_still_counts() {
    let mut classifier = Classifier::default();
    classifier.train("blank", "");
    classifier.train("blank", "  ,, ..  ");

    assert_eq!(classifier.document_count("blank"), 2);
    assert_eq!(classifier.label_token_total("blank"), 0);
    assert_eq!(classifier.vocabulary_size(), 0);
}

#[test]
fn markup_is_stripped_before_tokenizing() {
    let mut classifier =
        Classifier::default().with_sanitizer(Arc::new(MarkupStripCharFilter::new()));
    classifier.train("spam", "<b>cheap</b> <a href=\"x\">pills</a>");
    classifier.train("ham", "<p>lunch</p>");

    assert_eq!(classifier.token_count("cheap"), 1);
    assert_eq!(classifier.token_count("b"), 0);
    assert_eq!(classifier.token_count("href"), 0);
}

#[test]
fn empty_denominator_falls_back_to_neutral_probability() -> Result<()> {
    let snapshot = ModelSnapshot {
        labels: IndexMap::from([("a".to_string(), 1), ("b".to_string(), 0)]),
        docs: IndexMap::from([("a".to_string(), 0), ("b".to_string(), 1)]),
        tokens: IndexMap::from([("x".to_string(), 1)]),
        data: IndexMap::from([
            ("a".to_string(), IndexMap::from([("x".to_string(), 1)])),
            ("b".to_string(), IndexMap::new()),
        ]),
    };

    let mut classifier = Classifier::default();
    classifier.restore(snapshot)?;

    let scores = classifier.classify("x");
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].label, "a");
    assert_eq!(scores[0].score, 0.5);
    Ok(())
}

#[test]
fn shared_classifier_serves_concurrent_readers() {
    let shared = SharedClassifier::from(trained(CORPUS));
    let expected = shared.classify("cheap now");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || shared.classify("cheap now"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn shared_classifier_accepts_concurrent_training() {
    let shared = SharedClassifier::default();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    shared.train(if i % 2 == 0 { "even" } else { "odd" }, "some words");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    shared.with_read(|classifier| {
        assert_eq!(classifier.total_documents(), 100);
        assert_eq!(classifier.token_count("words"), 100);
    });
}
