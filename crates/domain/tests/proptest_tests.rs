//! Property-based tests for the filtering and moderation rules
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{
    Detection, FilterMode, ModerationThresholds, NudityLabel, PolicyConfig, ProxyReference,
    RawResult, ResultType,
};
use proptest::prelude::*;

fn filter_mode() -> impl Strategy<Value = FilterMode> {
    prop_oneof![
        Just(FilterMode::Relaxed),
        Just(FilterMode::Moderate),
        Just(FilterMode::Strict),
    ]
}

fn raw_result() -> impl Strategy<Value = RawResult> {
    (
        "[a-zA-Z ]{0,20}",
        prop_oneof![
            Just(String::new()),
            "https://[a-z]{1,8}\\.(com|org|net)/[a-z]{0,8}",
            "https://[a-z]{1,5}\\.wikipedia\\.org/wiki/[A-Za-z_]{1,10}",
        ],
        "[a-zA-Z ]{0,30}",
    )
        .prop_map(|(title, url, snippet)| RawResult::new(title, url, snippet))
}

fn policy() -> impl Strategy<Value = PolicyConfig> {
    (
        prop::collection::vec("[a-z]{1,4}", 0..4),
        prop::collection::vec(prop_oneof![Just("wikipedia.org"), Just("example.com")], 0..2),
    )
        .prop_map(|(keywords, domains)| PolicyConfig::new(keywords, domains))
}

fn detection() -> impl Strategy<Value = Detection> {
    (0..NudityLabel::CLASS_COUNT, 0.0f32..=1.0f32).prop_map(|(index, score)| {
        let label =
            NudityLabel::from_index(index).unwrap_or_else(|| NudityLabel::Other(String::new()));
        Detection::new(label, score)
    })
}

// ============================================================================
// Policy Filter Property Tests
// ============================================================================

mod policy_tests {
    use super::*;

    proptest! {
        #[test]
        fn blocked_plus_passed_equals_input(
            results in prop::collection::vec(raw_result(), 0..20),
            policy in policy(),
            mode in filter_mode()
        ) {
            let total = results.len();
            let outcome = policy.apply(results, mode);
            prop_assert_eq!(outcome.blocked_count + outcome.passed.len(), total);
        }

        #[test]
        fn relaxed_never_blocks(
            results in prop::collection::vec(raw_result(), 0..20),
            policy in policy()
        ) {
            let expected = results.clone();
            let outcome = policy.apply(results, FilterMode::Relaxed);
            prop_assert_eq!(outcome.blocked_count, 0);
            prop_assert_eq!(outcome.passed, expected);
        }

        #[test]
        fn passed_preserves_input_order(
            results in prop::collection::vec(raw_result(), 0..20),
            policy in policy(),
            mode in filter_mode()
        ) {
            let outcome = policy.apply(results.clone(), mode);
            let mut remaining = results.iter();
            for passed in &outcome.passed {
                prop_assert!(remaining.any(|r| r == passed));
            }
        }

        #[test]
        fn allow_list_admits_subdomains(sub in "[a-z]{1,10}") {
            let policy = PolicyConfig::new(Vec::<String>::new(), ["wikipedia.org"]);
            let subdomain_url = format!("https://{sub}.wikipedia.org/wiki/X");
            let lookalike_url = format!("https://{sub}wikipedia.org/wiki/X");
            prop_assert!(policy.domain_allowed(&subdomain_url));
            prop_assert!(policy.domain_allowed("https://wikipedia.org/"));
            prop_assert!(!policy.domain_allowed(&lookalike_url));
        }

        #[test]
        fn empty_allow_list_is_noop(url in ".*") {
            prop_assert!(PolicyConfig::unrestricted().domain_allowed(&url));
        }
    }
}

// ============================================================================
// Classifier Property Tests
// ============================================================================

mod classifier_tests {
    use super::*;

    proptest! {
        #[test]
        fn preview_always_classifies_as_image(
            result in raw_result(),
            original in "https://[a-z]{1,8}\\.com/[a-z]{1,8}"
        ) {
            let reference = ProxyReference::for_image(&original);
            let with_preview = result.with_preview(reference.into_string());
            prop_assert_eq!(with_preview.classify(), ResultType::Image);
        }

        #[test]
        fn classify_is_total(url in ".*", preview in proptest::option::of(".*")) {
            // Must not panic for arbitrary input
            let _ = ResultType::classify(&url, preview.as_deref());
        }
    }
}

// ============================================================================
// Moderation Threshold Property Tests
// ============================================================================

mod moderation_tests {
    use super::*;

    proptest! {
        #[test]
        fn strict_censors_superset_of_moderate(
            strict in 0.01f32..=1.0f32,
            gap in 0.0f32..=1.0f32,
            detections in prop::collection::vec(detection(), 0..8)
        ) {
            let moderate = (strict + gap).min(1.0);
            let thresholds = ModerationThresholds::new(moderate, strict).unwrap();
            if thresholds.should_censor(&detections, FilterMode::Moderate) {
                prop_assert!(thresholds.should_censor(&detections, FilterMode::Strict));
            }
        }

        #[test]
        fn relaxed_never_censors(detections in prop::collection::vec(detection(), 0..8)) {
            let thresholds = ModerationThresholds::default();
            prop_assert!(!thresholds.should_censor(&detections, FilterMode::Relaxed));
        }

        #[test]
        fn inverted_thresholds_rejected(
            moderate in 0.01f32..0.5f32,
            gap in 0.01f32..0.5f32
        ) {
            prop_assert!(ModerationThresholds::new(moderate, moderate + gap).is_err());
        }
    }
}

// ============================================================================
// Proxy Reference Property Tests
// ============================================================================

mod proxy_reference_tests {
    use super::*;

    proptest! {
        #[test]
        fn reference_never_exposes_raw_url(path in "[a-z0-9/?=&]{0,30}") {
            let original = format!("https://cdn.example.com/{path}");
            let reference = ProxyReference::for_image(&original);
            prop_assert!(reference.as_str().starts_with("/media/proxy?url="));
            prop_assert!(!reference.as_str().contains("://"));
            prop_assert_eq!(
                ProxyReference::original_url(reference.as_str()),
                Some(original)
            );
        }
    }
}
