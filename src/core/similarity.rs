use std::collections::BTreeSet;

/// Similarity (0-1) of two values on a 1-based scale topping out at `max`
///
/// Inputs are clamped to `[1, max]` first, so identical values score 1 and
/// the two scale extremes score 0.
#[inline]
pub fn numeric_similarity(v1: f64, v2: f64, max: f64) -> f64 {
    if !max.is_finite() || max <= 1.0 {
        return 1.0;
    }

    let a = clamp_to_scale(v1, max);
    let b = clamp_to_scale(v2, max);
    let width = max - 1.0;

    (1.0 - (a - b).abs() / width).clamp(0.0, 1.0)
}

#[inline]
fn clamp_to_scale(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(1.0, max)
    } else {
        1.0
    }
}

/// Lower-case, trim and dedupe a list of tags
///
/// Blank tags carry no information and are dropped.
pub fn normalize_set<S: AsRef<str>>(items: &[S]) -> BTreeSet<String> {
    items
        .iter()
        .map(|item| item.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Jaccard similarity of two tag lists, case-insensitive
///
/// Both empty scores 1 (nobody stated anything). Exactly one empty scores 0.
pub fn array_overlap<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> f64 {
    let a = normalize_set(a);
    let b = normalize_set(b);

    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let intersection = a.intersection(&b).count() as f64;
    let union = a.union(&b).count() as f64;

    intersection / union
}

/// Case-insensitive intersection of two tag lists
pub fn shared_tags<A: AsRef<str>, B: AsRef<str>>(a: &[A], b: &[B]) -> BTreeSet<String> {
    let b = normalize_set(b);
    normalize_set(a)
        .into_iter()
        .filter(|tag| b.contains(tag))
        .collect()
}

/// Exact case-insensitive equality: 1 or 0, no partial credit
///
/// Returns `None` when either side is absent or blank.
pub fn categorical_match(a: Option<&str>, b: Option<&str>) -> Option<f64> {
    let a = a.map(str::trim).filter(|s| !s.is_empty())?;
    let b = b.map(str::trim).filter(|s| !s.is_empty())?;

    Some(if a.to_lowercase() == b.to_lowercase() { 1.0 } else { 0.0 })
}

/// Numeric similarity that skips absent or non-finite values
pub fn optional_numeric_similarity(a: Option<f64>, b: Option<f64>, max: f64) -> Option<f64> {
    let a = a.filter(|v| v.is_finite())?;
    let b = b.filter(|v| v.is_finite())?;
    Some(numeric_similarity(a, b, max))
}

/// Weighted average over the fields that actually contributed
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedAverage {
    total: f64,
    weight: f64,
}

impl WeightedAverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component; `None` is excluded from the average
    pub fn add(&mut self, score: Option<f64>, weight: f64) -> &mut Self {
        if let Some(score) = score.filter(|s| s.is_finite()) {
            if weight > 0.0 {
                self.total += score.clamp(0.0, 1.0) * weight;
                self.weight += weight;
            }
        }
        self
    }

    /// Average of contributing components, or `neutral` if none contributed
    pub fn finish(&self, neutral: f64) -> f64 {
        if self.weight > 0.0 {
            (self.total / self.weight).clamp(0.0, 1.0)
        } else {
            neutral
        }
    }
}
