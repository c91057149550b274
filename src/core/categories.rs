use crate::core::compatibility::CompatibilityConfig;
use crate::core::similarity::{
    array_overlap, categorical_match, optional_numeric_similarity, WeightedAverage,
};
use crate::models::{CategoryScores, UserProfile};
use serde::{Deserialize, Serialize};

/// Every field inside a category counts the same
const FIELD_WEIGHT: f64 = 1.0;

/// Life-facet categories a pair is scored on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    TheBasics,
    WhoYouAre,
    RelationshipStyle,
    Lifestyle,
    LifeFuture,
    TheDeeperStuff,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::TheBasics,
        Category::WhoYouAre,
        Category::RelationshipStyle,
        Category::Lifestyle,
        Category::LifeFuture,
        Category::TheDeeperStuff,
    ];

    /// Key used in serialized score records
    pub fn key(&self) -> &'static str {
        match self {
            Category::TheBasics => "theBasics",
            Category::WhoYouAre => "whoYouAre",
            Category::RelationshipStyle => "relationshipStyle",
            Category::Lifestyle => "lifestyle",
            Category::LifeFuture => "lifeFuture",
            Category::TheDeeperStuff => "theDeeperStuff",
        }
    }

    /// Human-readable name shown to users
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::TheBasics => "The Basics",
            Category::WhoYouAre => "Who You Are",
            Category::RelationshipStyle => "Relationship Style",
            Category::Lifestyle => "Lifestyle",
            Category::LifeFuture => "Life & Future",
            Category::TheDeeperStuff => "The Deeper Stuff",
        }
    }
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::TheBasics => self.the_basics,
            Category::WhoYouAre => self.who_you_are,
            Category::RelationshipStyle => self.relationship_style,
            Category::Lifestyle => self.lifestyle,
            Category::LifeFuture => self.life_future,
            Category::TheDeeperStuff => self.the_deeper_stuff,
        }
    }
}

/// Score two profiles on a single category (0-1)
pub fn score_category(
    category: Category,
    a: &UserProfile,
    b: &UserProfile,
    config: &CompatibilityConfig,
) -> f64 {
    let mut avg = WeightedAverage::new();

    match category {
        Category::TheBasics => {
            avg.add(Some(array_overlap(&a.interests, &b.interests)), FIELD_WEIGHT)
                .add(Some(array_overlap(&a.keywords, &b.keywords)), FIELD_WEIGHT);
        }
        Category::WhoYouAre => {
            for ((_, va), (_, vb)) in a.traits.named().into_iter().zip(b.traits.named()) {
                avg.add(optional_numeric_similarity(va, vb, config.scale_max), FIELD_WEIGHT);
            }
        }
        Category::RelationshipStyle => {
            let (ra, rb) = (&a.relationship_style, &b.relationship_style);
            let scale = config.scale_max;
            avg.add(label(&ra.love_language, &rb.love_language), FIELD_WEIGHT)
                .add(label(&ra.conflict_style, &rb.conflict_style), FIELD_WEIGHT)
                .add(label(&ra.communication_frequency, &rb.communication_frequency), FIELD_WEIGHT)
                .add(label(&ra.financial_approach, &rb.financial_approach), FIELD_WEIGHT)
                .add(
                    optional_numeric_similarity(ra.alone_time_need, rb.alone_time_need, scale),
                    FIELD_WEIGHT,
                );
        }
        Category::Lifestyle => {
            for ((_, va), (_, vb)) in a.lifestyle.named().into_iter().zip(b.lifestyle.named()) {
                avg.add(categorical_match(va, vb), FIELD_WEIGHT);
            }
        }
        Category::LifeFuture => {
            let (fa, fb) = (&a.family_plans, &b.family_plans);
            let scale = config.scale_max;
            avg.add(label(&fa.wants_kids, &fb.wants_kids), FIELD_WEIGHT)
                .add(label(&fa.kids_timeline, &fb.kids_timeline), FIELD_WEIGHT)
                .add(label(&fa.parenting_style, &fb.parenting_style), FIELD_WEIGHT)
                .add(
                    optional_numeric_similarity(fa.family_closeness, fb.family_closeness, scale),
                    FIELD_WEIGHT,
                );
        }
        Category::TheDeeperStuff => {
            // Dealbreakers gate the pair separately and never feed the score
            avg.add(Some(array_overlap(&a.values, &b.values)), FIELD_WEIGHT);
        }
    }

    avg.finish(config.neutral_score)
}

#[inline]
fn label(a: &Option<String>, b: &Option<String>) -> Option<f64> {
    categorical_match(a.as_deref(), b.as_deref())
}

/// Score two profiles on every category
pub fn score_categories(
    a: &UserProfile,
    b: &UserProfile,
    config: &CompatibilityConfig,
) -> CategoryScores {
    CategoryScores {
        the_basics: score_category(Category::TheBasics, a, b, config),
        who_you_are: score_category(Category::WhoYouAre, a, b, config),
        relationship_style: score_category(Category::RelationshipStyle, a, b, config),
        lifestyle: score_category(Category::Lifestyle, a, b, config),
        life_future: score_category(Category::LifeFuture, a, b, config),
        the_deeper_stuff: score_category(Category::TheDeeperStuff, a, b, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Lifestyle, RelationshipStyle, Traits};

    fn config() -> CompatibilityConfig {
        CompatibilityConfig::default()
    }

    fn traits(value: f64) -> Traits {
        Traits {
            introversion: Some(value),
            adventurousness: Some(value),
            ambition: Some(value),
            emotional_openness: Some(value),
            traditional_values: Some(value),
            independence_need: Some(value),
        }
    }

    #[test]
    fn test_identical_traits_score_one() {
        let a = UserProfile {
            traits: traits(6.0),
            ..Default::default()
        };

        assert_eq!(score_category(Category::WhoYouAre, &a, &a.clone(), &config()), 1.0);
    }

    #[test]
    fn test_trait_gap_lowers_who_you_are() {
        let a = UserProfile {
            traits: traits(5.0),
            ..Default::default()
        };
        let mut b = a.clone();
        b.traits.introversion = Some(10.0);
        let mut c = a.clone();
        c.traits.introversion = Some(1.0);

        let near = score_category(Category::WhoYouAre, &a, &b, &config());
        let far = score_category(Category::WhoYouAre, &b, &c, &config());

        assert!(near < 1.0);
        assert!(far < near);
        assert!((far - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_scalar_is_excluded_not_defaulted() {
        let a = UserProfile {
            relationship_style: RelationshipStyle {
                love_language: Some("Quality Time".to_string()),
                alone_time_need: Some(3.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let b = UserProfile {
            relationship_style: RelationshipStyle {
                love_language: Some("quality time".to_string()),
                conflict_style: Some("avoidant".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        // Only love language is stated on both sides
        assert_eq!(score_category(Category::RelationshipStyle, &a, &b, &config()), 1.0);
    }

    #[test]
    fn test_lifestyle_has_no_partial_credit() {
        let a = UserProfile {
            lifestyle: Lifestyle {
                sleep_schedule: Some("night owl".to_string()),
                exercise_level: Some("daily".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let b = UserProfile {
            lifestyle: Lifestyle {
                sleep_schedule: Some("Night Owl".to_string()),
                exercise_level: Some("weekly".to_string()),
                diet_type: Some("vegan".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(score_category(Category::Lifestyle, &a, &b, &config()), 0.5);
    }

    #[test]
    fn test_nothing_stated_scores_neutral() {
        let empty = UserProfile::default();
        let scores = score_categories(&empty, &empty, &config());

        assert_eq!(scores.who_you_are, config().neutral_score);
        assert_eq!(scores.lifestyle, config().neutral_score);
        // Two empty tag sets are full agreement
        assert_eq!(scores.the_basics, 1.0);
        assert_eq!(scores.the_deeper_stuff, 1.0);
    }

    #[test]
    fn test_listing_dealbreakers_does_not_lower_deeper_stuff() {
        let a = UserProfile {
            values: vec!["honesty".to_string()],
            dealbreakers: vec!["smoking".to_string(), "gambling".to_string()],
            ..Default::default()
        };
        let b = UserProfile {
            values: vec!["Honesty".to_string()],
            ..Default::default()
        };

        assert_eq!(score_category(Category::TheDeeperStuff, &a, &b, &config()), 1.0);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Category::ALL.len(), 6);
        assert_eq!(Category::LifeFuture.display_name(), "Life & Future");
        assert_eq!(Category::TheDeeperStuff.key(), "theDeeperStuff");
    }
}
