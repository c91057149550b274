use crate::core::categories::{score_categories, Category};
use crate::core::dealbreakers::evaluate_dealbreakers;
use crate::core::similarity::shared_tags;
use crate::models::domain::SCALE_MAX;
use crate::models::{CategoryScores, CompatibilityResult, UserProfile};
use serde::{Deserialize, Serialize};

/// Tolerance when checking that category weights sum to one
pub const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Weight of each category in the overall score
///
/// Early-onboarding categories carry more weight since more users answer them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWeights {
    pub the_basics: f64,
    pub who_you_are: f64,
    pub relationship_style: f64,
    pub lifestyle: f64,
    pub life_future: f64,
    pub the_deeper_stuff: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            the_basics: 0.25,
            who_you_are: 0.20,
            relationship_style: 0.20,
            lifestyle: 0.15,
            life_future: 0.10,
            the_deeper_stuff: 0.10,
        }
    }
}

impl CategoryWeights {
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

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Weights must be non-negative and sum to one
    pub fn is_valid(&self) -> bool {
        Category::ALL.iter().all(|c| {
            let w = self.get(*c);
            w.is_finite() && w >= 0.0
        }) && (self.sum() - 1.0).abs() < WEIGHT_SUM_EPSILON
    }
}

/// Immutable scoring configuration, built once at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityConfig {
    pub weights: CategoryWeights,
    /// Top of the 1-based numeric scale
    pub scale_max: f64,
    /// Numeric gap at or above which a warning is raised
    pub warning_gap: f64,
    /// Score for a category where nothing was stated on both sides
    pub neutral_score: f64,
}

impl Default for CompatibilityConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            scale_max: SCALE_MAX,
            warning_gap: 6.0,
            neutral_score: 0.5,
        }
    }
}

/// Weighted sum of the category scores, clamped to [0, 1]
pub fn overall_score(scores: &CategoryScores, weights: &CategoryWeights) -> f64 {
    let total: f64 = Category::ALL
        .iter()
        .map(|c| scores.get(*c) * weights.get(*c))
        .sum();

    if total.is_finite() {
        total.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Score two profiles against each other
///
/// Pure and deterministic: the same inputs always produce the same result.
pub fn compute_compatibility(
    a: &UserProfile,
    b: &UserProfile,
    config: &CompatibilityConfig,
) -> CompatibilityResult {
    let category_scores = score_categories(a, b, config);
    let overall_score = overall_score(&category_scores, &config.weights);

    CompatibilityResult {
        overall_score,
        category_scores,
        dealbreakers: evaluate_dealbreakers(a, b, config),
        shared_interests: shared_tags(&a.interests, &b.interests),
        shared_values: shared_tags(&a.values, &b.values),
    }
}
