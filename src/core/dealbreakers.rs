use crate::core::compatibility::CompatibilityConfig;
use crate::core::similarity::{categorical_match, normalize_set};
use crate::models::domain::SCALE_MIN;
use crate::models::{DealbreakerReport, UserProfile};

/// Shorter dealbreakers only match whole tags
const MIN_SUBSTRING_LEN: usize = 3;

/// Cross-check both parties' dealbreakers and collect non-fatal warnings
pub fn evaluate_dealbreakers(
    a: &UserProfile,
    b: &UserProfile,
    config: &CompatibilityConfig,
) -> DealbreakerReport {
    let mut triggered: Vec<String> = Vec::new();

    for (owner, other) in [(a, b), (b, a)] {
        let targets = match_targets(other);
        for dealbreaker in normalize_set(&owner.dealbreakers) {
            if triggered.contains(&dealbreaker) {
                continue;
            }
            if targets.iter().any(|target| matches_dealbreaker(target, &dealbreaker)) {
                triggered.push(dealbreaker);
            }
        }
    }

    let warnings = collect_warnings(a, b, config);

    DealbreakerReport {
        passed: triggered.is_empty(),
        triggered,
        warnings,
    }
}

/// Everything about a profile a dealbreaker can hit, lower-cased
fn match_targets(profile: &UserProfile) -> Vec<String> {
    let mut targets: Vec<String> = normalize_set(&profile.values)
        .into_iter()
        .chain(normalize_set(&profile.interests))
        .chain(normalize_set(&profile.keywords))
        .collect();

    targets.extend(
        profile
            .lifestyle
            .named()
            .into_iter()
            .filter_map(|(_, value)| value)
            .map(|value| value.trim().to_lowercase()),
    );

    targets.retain(|t| !t.is_empty());
    targets
}

#[inline]
fn matches_dealbreaker(target: &str, dealbreaker: &str) -> bool {
    target == dealbreaker
        || (dealbreaker.chars().count() >= MIN_SUBSTRING_LEN && target.contains(dealbreaker))
}

fn collect_warnings(a: &UserProfile, b: &UserProfile, config: &CompatibilityConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut numeric: Vec<(&str, Option<f64>, Option<f64>)> = a
        .traits
        .named()
        .into_iter()
        .zip(b.traits.named())
        .map(|((name, va), (_, vb))| (name, va, vb))
        .collect();
    numeric.push((
        "aloneTimeNeed",
        a.relationship_style.alone_time_need,
        b.relationship_style.alone_time_need,
    ));
    numeric.push((
        "familyCloseness",
        a.family_plans.family_closeness,
        b.family_plans.family_closeness,
    ));

    for (name, va, vb) in numeric {
        if let (Some(va), Some(vb)) = (finite(va), finite(vb)) {
            let scale_max = config.scale_max.max(SCALE_MIN);
            let gap = (va.clamp(SCALE_MIN, scale_max) - vb.clamp(SCALE_MIN, scale_max)).abs();
            if gap >= config.warning_gap {
                warnings.push(format!("Large difference in {}", name));
            }
        }
    }

    if categorical_match(
        a.family_plans.wants_kids.as_deref(),
        b.family_plans.wants_kids.as_deref(),
    ) == Some(0.0)
    {
        warnings.push("Different plans for kids".to_string());
    }

    warnings
}

#[inline]
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
