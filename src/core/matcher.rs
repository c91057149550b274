use crate::core::{
    compatibility::{compute_compatibility, CompatibilityConfig},
    eligibility::{is_age_compatible_at, is_gender_compatible},
};
use crate::models::{BasicInfo, CompatibilityResult, PairKey, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a pair was filtered out before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IneligibleReason {
    Gender,
    Age,
}

impl IneligibleReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IneligibleReason::Gender => "gender",
            IneligibleReason::Age => "age",
        }
    }
}

/// Outcome of evaluating one pair
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    /// Failed the eligibility filter; no score computed
    Ineligible(IneligibleReason),
    /// At least one side has no parsed profile yet
    Unscorable,
    Scored(CompatibilityResult),
}

impl PairOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            PairOutcome::Ineligible(_) => "ineligible",
            PairOutcome::Unscorable => "unscorable",
            PairOutcome::Scored(_) => "scored",
        }
    }
}

/// One side of a pair as seen by the matcher
#[derive(Debug, Clone, Default)]
pub struct Participant {
    pub user_id: String,
    pub basic: BasicInfo,
    pub profile: Option<UserProfile>,
}

/// A candidate that survived filtering, with its result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "pairKey")]
    pub pair_key: PairKey,
    pub result: CompatibilityResult,
}

/// Result of ranking a candidate list
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredCandidate>,
    pub total_candidates: usize,
    pub ineligible: usize,
    pub unscorable: usize,
}

/// Pairwise compatibility pipeline
///
/// # Pipeline Stages
/// 1. Gender/sexuality eligibility
/// 2. Age dealbreakers, both directions
/// 3. Profile availability
/// 4. Category scoring and aggregation
#[derive(Debug, Clone)]
pub struct Matcher {
    config: CompatibilityConfig,
    suppress_dealbreakers: bool,
}

impl Matcher {
    pub fn new(config: CompatibilityConfig, suppress_dealbreakers: bool) -> Self {
        Self {
            config,
            suppress_dealbreakers,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(CompatibilityConfig::default(), false)
    }

    pub fn config(&self) -> &CompatibilityConfig {
        &self.config
    }

    /// Score two profiles with this matcher's configuration
    pub fn compute(&self, a: &UserProfile, b: &UserProfile) -> CompatibilityResult {
        compute_compatibility(a, b, &self.config)
    }

    /// Run the full pipeline for one pair
    pub fn evaluate_pair(
        &self,
        me: &Participant,
        them: &Participant,
        now: DateTime<Utc>,
    ) -> PairOutcome {
        if !is_gender_compatible(&me.basic, &them.basic) {
            tracing::trace!("{} / {} filtered: gender", me.user_id, them.user_id);
            return PairOutcome::Ineligible(IneligibleReason::Gender);
        }

        if !is_age_compatible_at(&me.basic, &them.basic, now)
            || !is_age_compatible_at(&them.basic, &me.basic, now)
        {
            tracing::trace!("{} / {} filtered: age", me.user_id, them.user_id);
            return PairOutcome::Ineligible(IneligibleReason::Age);
        }

        match (&me.profile, &them.profile) {
            (Some(a), Some(b)) => PairOutcome::Scored(self.compute(a, b)),
            _ => PairOutcome::Unscorable,
        }
    }

    /// Rank candidates for a user
    ///
    /// Candidates that pass their dealbreakers come first, then by overall
    /// score descending. When suppression is on, triggered candidates are
    /// dropped entirely.
    pub fn rank_candidates(
        &self,
        me: &Participant,
        candidates: Vec<Participant>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> MatchResult {
        let total_candidates = candidates.len();
        let mut ineligible = 0;
        let mut unscorable = 0;

        let mut matches: Vec<ScoredCandidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.user_id != me.user_id)
            .filter_map(|candidate| match self.evaluate_pair(me, &candidate, now) {
                PairOutcome::Scored(result) => Some(ScoredCandidate {
                    pair_key: PairKey::new(&me.user_id, &candidate.user_id),
                    user_id: candidate.user_id,
                    result,
                }),
                PairOutcome::Ineligible(_) => {
                    ineligible += 1;
                    None
                }
                PairOutcome::Unscorable => {
                    unscorable += 1;
                    None
                }
            })
            .filter(|m| !self.suppress_dealbreakers || m.result.dealbreakers.passed)
            .collect();

        matches.sort_by(|a, b| {
            b.result
                .dealbreakers
                .passed
                .cmp(&a.result.dealbreakers.passed)
                .then_with(|| {
                    b.result
                        .overall_score
                        .partial_cmp(&a.result.overall_score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        matches.truncate(limit);

        tracing::debug!(
            "Ranked {} matches for {} ({} candidates, {} ineligible, {} unscorable)",
            matches.len(),
            me.user_id,
            total_candidates,
            ineligible,
            unscorable
        );

        MatchResult {
            matches,
            total_candidates,
            ineligible,
            unscorable,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}
