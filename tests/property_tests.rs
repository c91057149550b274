// Property tests for Compat Engine

use compat_engine::core::{
    array_overlap, compute_compatibility, is_gender_compatible, numeric_similarity,
    CompatibilityConfig,
};
use compat_engine::models::{BasicInfo, FamilyPlans, RelationshipStyle, Traits, UserProfile};
use proptest::prelude::*;
use proptest::test_runner::Config;

const GENDERS: &[&str] = &["Man", "Woman", "man", "Non-binary", "Agender", ""];
const SEXUALITIES: &[&str] = &[
    "straight", "Gay", "lesbian", "bisexual", "pansexual", "queer", "men", "women", "everyone",
    "asexual", "",
];

fn label(options: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::sample::select(options).prop_map(str::to_string))
}

fn basic_info() -> impl Strategy<Value = BasicInfo> {
    (label(GENDERS), label(SEXUALITIES)).prop_map(|(gender, sexuality)| BasicInfo {
        gender,
        sexuality,
        ..Default::default()
    })
}

/// Includes out-of-range and non-finite numbers
fn raw_score() -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(prop_oneof![
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        -50.0_f64..50.0_f64,
    ])
}

fn tag_list() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[A-Za-z ]{0,8}", 0..6)
}

fn choice() -> impl Strategy<Value = Option<String>> {
    label(&["yes", "No", "maybe", "Night Owl", "night owl"])
}

fn profile() -> impl Strategy<Value = UserProfile> {
    (
        (tag_list(), tag_list(), tag_list(), tag_list()),
        proptest::collection::vec(raw_score(), 6),
        (choice(), choice(), raw_score()),
        (choice(), choice(), raw_score()),
    )
        .prop_map(|(tags, traits, style, family)| {
            let (values, interests, dealbreakers, keywords) = tags;
            UserProfile {
                values,
                interests,
                dealbreakers,
                keywords,
                traits: Traits {
                    introversion: traits[0],
                    adventurousness: traits[1],
                    ambition: traits[2],
                    emotional_openness: traits[3],
                    traditional_values: traits[4],
                    independence_need: traits[5],
                },
                relationship_style: RelationshipStyle {
                    love_language: style.0,
                    conflict_style: style.1,
                    alone_time_need: style.2,
                    ..Default::default()
                },
                family_plans: FamilyPlans {
                    wants_kids: family.0,
                    parenting_style: family.1,
                    family_closeness: family.2,
                    ..Default::default()
                },
                ..Default::default()
            }
        })
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn gender_compatibility_is_symmetric(a in basic_info(), b in basic_info()) {
        prop_assert_eq!(is_gender_compatible(&a, &b), is_gender_compatible(&b, &a));
    }

    #[test]
    fn overlap_stays_in_unit_interval(a in tag_list(), b in tag_list()) {
        let overlap = array_overlap(&a, &b);
        prop_assert!((0.0..=1.0).contains(&overlap));
        prop_assert_eq!(overlap, array_overlap(&b, &a));
        prop_assert_eq!(array_overlap(&a, &a), 1.0);
    }

    #[test]
    fn numeric_similarity_stays_in_unit_interval(a in -20.0_f64..20.0, b in -20.0_f64..20.0) {
        let sim = numeric_similarity(a, b, 10.0);
        prop_assert!((0.0..=1.0).contains(&sim));
        prop_assert_eq!(numeric_similarity(a, a, 10.0), 1.0);
    }

    #[test]
    fn compatibility_is_bounded_and_repeatable(a in profile(), b in profile()) {
        let config = CompatibilityConfig::default();

        let first = compute_compatibility(&a, &b, &config);
        let second = compute_compatibility(&a, &b, &config);

        prop_assert!(first.overall_score.is_finite());
        prop_assert!((0.0..=1.0).contains(&first.overall_score));
        for score in [
            first.category_scores.the_basics,
            first.category_scores.who_you_are,
            first.category_scores.relationship_style,
            first.category_scores.lifestyle,
            first.category_scores.life_future,
            first.category_scores.the_deeper_stuff,
        ] {
            prop_assert!((0.0..=1.0).contains(&score));
        }
        prop_assert_eq!(first, second);
    }

    #[test]
    fn self_comparison_never_scores_below_neutral(a in profile()) {
        let config = CompatibilityConfig::default();

        for candidate in [a.clone(), a.normalized()] {
            let result = compute_compatibility(&candidate, &candidate, &config);
            prop_assert!(result.overall_score >= config.neutral_score - 1e-9);
            prop_assert_eq!(result.category_scores.the_basics, 1.0);
            prop_assert_eq!(result.category_scores.the_deeper_stuff, 1.0);
            prop_assert!(result.category_scores.who_you_are >= config.neutral_score);
        }
    }
}
