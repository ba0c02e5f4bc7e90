use std::collections::HashSet;

use hint_engine::{
    engine::error::HintError,
    hints::{
        hint_model::{Label, LabelConfig, OverflowPolicy},
        labels::allocate,
    },
};

/// Prefix-freeness via a set lookup, fast enough for the full label space.
fn assert_prefix_free(labels: &[Label]) {
    let set: HashSet<&str> = labels.iter().map(Label::as_str).collect();
    assert_eq!(set.len(), labels.len(), "labels must be pairwise distinct");
    for label in labels {
        let text = label.as_str();
        for end in 1..text.len() {
            assert!(
                !set.contains(&text[..end]),
                "{} is a prefix of {}",
                &text[..end],
                text
            );
        }
    }
}

// =========================================================================
// Allocation properties
// =========================================================================

#[test]
fn every_count_gets_distinct_prefix_free_labels() {
    let config = LabelConfig::default();
    for count in (0..=120).chain([200, 675, 676, 677, 1000]) {
        let alloc = allocate(count, &config);
        assert_eq!(alloc.labels.len(), count, "label count for {}", count);
        assert_eq!(alloc.dropped, 0);
        for label in &alloc.labels {
            assert!((1..=3).contains(&label.len()), "length of {}", label);
            assert!(
                label.as_str().chars().all(|c| c.is_ascii_uppercase()),
                "{} must be uppercase letters only",
                label
            );
        }
        assert_prefix_free(&alloc.labels);
    }
}

#[test]
fn label_length_grows_only_when_needed() {
    let config = LabelConfig::default();
    assert_eq!(allocate(26, &config).labels.iter().map(Label::len).max(), Some(1));
    assert_eq!(allocate(27, &config).labels.iter().map(Label::len).max(), Some(2));
    assert_eq!(allocate(676, &config).labels.iter().map(Label::len).max(), Some(2));
    assert_eq!(allocate(677, &config).labels.iter().map(Label::len).max(), Some(3));
}

#[test]
fn allocation_is_deterministic() {
    let config = LabelConfig::default();
    assert_eq!(allocate(45, &config), allocate(45, &config));
}

#[test]
fn full_label_space_is_usable_and_then_truncated() {
    let config = LabelConfig::default();
    let capacity = config.capacity();
    assert_eq!(capacity, 26 * 26 * 26);

    let full = allocate(capacity, &config);
    assert_eq!(full.labels.len(), capacity);
    assert_eq!(full.dropped, 0);
    assert_prefix_free(&full.labels);

    let over = allocate(capacity + 5, &config);
    assert_eq!(over.labels.len(), capacity);
    assert_eq!(over.dropped, 5, "overflow must be reported, not hidden");
    assert_prefix_free(&over.labels);
}

#[test]
fn extend_policy_keeps_every_candidate() {
    let config = LabelConfig {
        alphabet: "ASDF".into(),
        max_length: 2,
        overflow: OverflowPolicy::Extend,
    };
    let alloc = allocate(40, &config);
    assert_eq!(alloc.labels.len(), 40);
    assert_eq!(alloc.dropped, 0);
    assert!(alloc.labels.iter().any(|l| l.len() > 2));
    assert_prefix_free(&alloc.labels);
}

#[test]
fn custom_alphabet_order_is_respected() {
    let config = LabelConfig {
        alphabet: "ASDF".into(),
        ..LabelConfig::default()
    };
    let labels: Vec<_> = allocate(4, &config)
        .labels
        .into_iter()
        .map(|l| l.to_string())
        .collect();
    assert_eq!(labels, vec!["A", "S", "D", "F"]);
}

// =========================================================================
// Config validation
// =========================================================================

#[test]
fn invalid_alphabets_are_rejected() {
    let with = |alphabet: &str| LabelConfig {
        alphabet: alphabet.into(),
        ..LabelConfig::default()
    };
    assert!(matches!(with("A").validate(), Err(HintError::InvalidAlphabet(_))));
    assert!(matches!(with("ABCA").validate(), Err(HintError::InvalidAlphabet(_))));
    assert!(matches!(with("abc").validate(), Err(HintError::InvalidAlphabet(_))));
    assert!(with("ASDFJKL").validate().is_ok());

    let zero = LabelConfig {
        max_length: 0,
        ..LabelConfig::default()
    };
    assert!(matches!(zero.validate(), Err(HintError::InvalidLabelLength(0))));
}
