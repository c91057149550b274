use serde::{Deserialize, Serialize};
use crate::models::lenient;
use std::collections::BTreeSet;
use std::fmt;

/// Lowest value on every 1-10 profile scale
pub const SCALE_MIN: f64 = 1.0;
/// Highest value on every 1-10 profile scale
pub const SCALE_MAX: f64 = 10.0;

/// Structured profile produced upstream by AI parsing of onboarding answers
///
/// Every scalar is optional: an absent field means "no preference stated".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient::tags")]
    pub values: Vec<String>,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub dealbreakers: Vec<String>,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub traits: Traits,
    #[serde(rename = "relationshipStyle", default, deserialize_with = "lenient::nested")]
    pub relationship_style: RelationshipStyle,
    #[serde(rename = "familyPlans", default, deserialize_with = "lenient::nested")]
    pub family_plans: FamilyPlans,
    #[serde(default, deserialize_with = "lenient::nested")]
    pub lifestyle: Lifestyle,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub keywords: Vec<String>,
    #[serde(rename = "processedAt", default, deserialize_with = "lenient::timestamp")]
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "openaiModel", default, deserialize_with = "lenient::text")]
    pub openai_model: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub confidence: Option<f64>,
}

impl UserProfile {
    /// Clamp every numeric field into its valid range
    ///
    /// Non-finite numbers are dropped and treated as absent.
    pub fn normalized(mut self) -> Self {
        let t = &mut self.traits;
        for field in [
            &mut t.introversion,
            &mut t.adventurousness,
            &mut t.ambition,
            &mut t.emotional_openness,
            &mut t.traditional_values,
            &mut t.independence_need,
        ] {
            *field = clamp_scale(*field);
        }
        let style = &mut self.relationship_style;
        style.alone_time_need = clamp_scale(style.alone_time_need);
        self.family_plans.family_closeness = clamp_scale(self.family_plans.family_closeness);
        self.confidence = self
            .confidence
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0));
        self
    }
}

fn clamp_scale(value: Option<f64>) -> Option<f64> {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(SCALE_MIN, SCALE_MAX))
}

/// Personality traits, each on a 1-10 scale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Traits {
    #[serde(default, deserialize_with = "lenient::number")]
    pub introversion: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub adventurousness: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub ambition: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub emotional_openness: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub traditional_values: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub independence_need: Option<f64>,
}

impl Traits {
    /// Named trait values in a fixed order
    pub fn named(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("introversion", self.introversion),
            ("adventurousness", self.adventurousness),
            ("ambition", self.ambition),
            ("emotionalOpenness", self.emotional_openness),
            ("traditionalValues", self.traditional_values),
            ("independenceNeed", self.independence_need),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipStyle {
    #[serde(default, deserialize_with = "lenient::text")]
    pub love_language: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub conflict_style: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub communication_frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub financial_approach: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub alone_time_need: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyPlans {
    #[serde(default, deserialize_with = "lenient::text")]
    pub wants_kids: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub kids_timeline: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub family_closeness: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub parenting_style: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    #[serde(default, deserialize_with = "lenient::text")]
    pub sleep_schedule: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub exercise_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub diet_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub alcohol_use: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub drug_use: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pet_preference: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location_preference: Option<String>,
}

impl Lifestyle {
    /// Named lifestyle fields in a fixed order
    pub fn named(&self) -> [(&'static str, Option<&str>); 7] {
        [
            ("sleepSchedule", self.sleep_schedule.as_deref()),
            ("exerciseLevel", self.exercise_level.as_deref()),
            ("dietType", self.diet_type.as_deref()),
            ("alcoholUse", self.alcohol_use.as_deref()),
            ("drugUse", self.drug_use.as_deref()),
            ("petPreference", self.pet_preference.as_deref()),
            ("locationPreference", self.location_preference.as_deref()),
        ]
    }
}

/// Basic info authored directly during onboarding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sexuality: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub birthdate: Option<String>,
    #[serde(rename = "ageRangeMin", default, deserialize_with = "lenient::whole_number")]
    pub age_range_min: Option<u32>,
    #[serde(rename = "ageRangeMax", default, deserialize_with = "lenient::whole_number")]
    pub age_range_max: Option<u32>,
    #[serde(rename = "ageRangeDealbreaker", default, deserialize_with = "lenient::flag")]
    pub age_range_dealbreaker: Option<bool>,
}

impl BasicInfo {
    /// Helper to get the age-range dealbreaker flag, defaulting to false
    pub fn age_dealbreaker(&self) -> bool {
        self.age_range_dealbreaker.unwrap_or(false)
    }
}

/// Per-category similarity scores, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub the_basics: f64,
    pub who_you_are: f64,
    pub relationship_style: f64,
    pub lifestyle: f64,
    pub life_future: f64,
    pub the_deeper_stuff: f64,
}

/// Dealbreaker evaluation for a pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealbreakerReport {
    pub triggered: Vec<String>,
    pub warnings: Vec<String>,
    pub passed: bool,
}

/// Outcome of scoring two profiles against each other
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    #[serde(rename = "overallScore")]
    pub overall_score: f64,
    #[serde(rename = "categoryScores")]
    pub category_scores: CategoryScores,
    pub dealbreakers: DealbreakerReport,
    #[serde(rename = "sharedInterests")]
    pub shared_interests: BTreeSet<String>,
    #[serde(rename = "sharedValues")]
    pub shared_values: BTreeSet<String>,
}

/// Order-independent identity of a user pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairKey(String);

impl PairKey {
    pub fn new(user_a: &str, user_b: &str) -> Self {
        let (first, second) = if user_a <= user_b {
            (user_a, user_b)
        } else {
            (user_b, user_a)
        };
        Self(format!("{}_{}", first, second))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted compatibility result, one per unordered pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCompatibility {
    #[serde(rename = "pairKey")]
    pub pair_key: PairKey,
    #[serde(rename = "userA")]
    pub user_a: String,
    #[serde(rename = "userB")]
    pub user_b: String,
    pub result: CompatibilityResult,
    #[serde(rename = "computedAt")]
    pub computed_at: chrono::DateTime<chrono::Utc>,
}

impl StoredCompatibility {
    pub fn new(user_a: &str, user_b: &str, result: CompatibilityResult) -> Self {
        Self {
            pair_key: PairKey::new(user_a, user_b),
            user_a: user_a.to_string(),
            user_b: user_b.to_string(),
            result,
            computed_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        assert_eq!(PairKey::new("bob", "alice"), PairKey::new("alice", "bob"));
        assert_eq!(PairKey::new("bob", "alice").as_str(), "alice_bob");
    }

    #[test]
    fn test_normalized_clamps_and_drops_non_finite() {
        let mut profile = UserProfile::default();
        profile.traits.introversion = Some(42.0);
        profile.traits.ambition = Some(-3.0);
        profile.traits.adventurousness = Some(f64::NAN);
        profile.relationship_style.alone_time_need = Some(f64::INFINITY);
        profile.confidence = Some(1.7);

        let profile = profile.normalized();

        assert_eq!(profile.traits.introversion, Some(10.0));
        assert_eq!(profile.traits.ambition, Some(1.0));
        assert_eq!(profile.traits.adventurousness, None);
        assert_eq!(profile.relationship_style.alone_time_need, None);
        assert_eq!(profile.confidence, Some(1.0));
    }

    #[test]
    fn test_profile_deserializes_from_camel_case_document() {
        let json = r#"{
            "values": ["Honesty"],
            "traits": {"introversion": 3, "emotionalOpenness": 8},
            "relationshipStyle": {"loveLanguage": "touch", "aloneTimeNeed": 4},
            "familyPlans": {"wantsKids": "yes"},
            "lifestyle": {"sleepSchedule": "early bird"},
            "openaiModel": "gpt-4o",
            "confidence": 0.9
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.values, vec!["Honesty"]);
        assert_eq!(profile.traits.emotional_openness, Some(8.0));
        assert_eq!(profile.relationship_style.alone_time_need, Some(4.0));
        assert_eq!(profile.lifestyle.sleep_schedule.as_deref(), Some("early bird"));
        assert!(profile.interests.is_empty());
    }

    #[test]
    fn test_epoch_millis_processed_at_is_accepted() {
        let json = r#"{"processedAt": 1700000000000, "values": ["growth"]}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(
            profile.processed_at.map(|t| t.timestamp_millis()),
            Some(1_700_000_000_000)
        );
        assert_eq!(profile.values, vec!["growth"]);
    }

    #[test]
    fn test_malformed_fields_read_as_absent() {
        let json = r#"{
            "values": ["honesty", null],
            "interests": "hiking",
            "traits": {"introversion": "7", "ambition": "very", "adventurousness": [1]},
            "relationshipStyle": "{\"loveLanguage\": \"touch\"}",
            "familyPlans": 5,
            "processedAt": "yesterday",
            "confidence": "high"
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.values, vec!["honesty"]);
        assert_eq!(profile.interests, vec!["hiking"]);
        assert_eq!(profile.traits.introversion, Some(7.0));
        assert_eq!(profile.traits.ambition, None);
        assert_eq!(profile.traits.adventurousness, None);
        assert_eq!(profile.relationship_style.love_language.as_deref(), Some("touch"));
        assert_eq!(profile.family_plans, FamilyPlans::default());
        assert_eq!(profile.processed_at, None);
        assert_eq!(profile.confidence, None);
    }

    #[test]
    fn test_basic_info_accepts_stringly_typed_ranges() {
        let json = r#"{
            "gender": "Woman",
            "ageRangeMin": "25",
            "ageRangeMax": 35.0,
            "ageRangeDealbreaker": "true"
        }"#;
        let info: BasicInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.age_range_min, Some(25));
        assert_eq!(info.age_range_max, Some(35));
        assert!(info.age_dealbreaker());
    }
}
