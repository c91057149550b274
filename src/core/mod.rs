// Core algorithm exports
pub mod categories;
pub mod compatibility;
pub mod dealbreakers;
pub mod eligibility;
pub mod matcher;
pub mod similarity;

pub use categories::{score_categories, score_category, Category};
pub use compatibility::{
    compute_compatibility, overall_score, CategoryWeights, CompatibilityConfig,
};
pub use dealbreakers::evaluate_dealbreakers;
pub use eligibility::{
    attracted_to, is_age_compatible, is_age_compatible_at, is_gender_compatible,
    is_mutually_eligible, Gender, Sexuality,
};
pub use matcher::{
    IneligibleReason, MatchResult, Matcher, PairOutcome, Participant, ScoredCandidate,
};
pub use similarity::{array_overlap, categorical_match, numeric_similarity};
