use crate::models::BasicInfo;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeSet;

/// Average year length used for age computation, in milliseconds
pub const MS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

/// Lower age bound when a user has not set one
pub const DEFAULT_AGE_MIN: u32 = 18;

/// Upper age bound when a user has not set one
pub const DEFAULT_AGE_MAX: u32 = 99;

/// Canonical gender, normalized from free text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Man,
    Woman,
    NonBinary,
    /// Any other label, kept lower-cased
    Other(String),
}

impl Gender {
    pub fn parse(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        match label.as_str() {
            "man" => Gender::Man,
            "woman" => Gender::Woman,
            "non-binary" => Gender::NonBinary,
            _ => Gender::Other(label),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Gender::Man => "man",
            Gender::Woman => "woman",
            Gender::NonBinary => "non-binary",
            Gender::Other(label) => label,
        }
    }

    fn everyone() -> BTreeSet<Gender> {
        BTreeSet::from([Gender::Man, Gender::Woman, Gender::NonBinary])
    }
}

/// Canonical sexuality, normalized from free text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sexuality {
    Women,
    Men,
    Everyone,
    Bisexual,
    Pansexual,
    Queer,
    Straight,
    Gay,
    /// Unrecognized label; never narrows eligibility
    Unknown(String),
}

impl Sexuality {
    pub fn parse(raw: &str) -> Self {
        let label = raw.trim().to_lowercase();
        match label.as_str() {
            "women" => Sexuality::Women,
            "men" => Sexuality::Men,
            "everyone" => Sexuality::Everyone,
            "bisexual" => Sexuality::Bisexual,
            "pansexual" => Sexuality::Pansexual,
            "queer" => Sexuality::Queer,
            "straight" | "heterosexual" => Sexuality::Straight,
            "gay" | "lesbian" | "homosexual" => Sexuality::Gay,
            _ => Sexuality::Unknown(label),
        }
    }
}

/// Genders a person with the given sexuality and gender is attracted to
pub fn attracted_to(sexuality: &Sexuality, gender: &Gender) -> BTreeSet<Gender> {
    match sexuality {
        Sexuality::Women => BTreeSet::from([Gender::Woman]),
        Sexuality::Men => BTreeSet::from([Gender::Man]),
        Sexuality::Straight => match gender {
            Gender::Man => BTreeSet::from([Gender::Woman]),
            _ => BTreeSet::from([Gender::Man]),
        },
        Sexuality::Gay => BTreeSet::from([gender.clone()]),
        Sexuality::Everyone
        | Sexuality::Bisexual
        | Sexuality::Pansexual
        | Sexuality::Queer
        | Sexuality::Unknown(_) => Gender::everyone(),
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// Check that each party is in the other's attraction set
///
/// Incomplete records (missing gender or sexuality on either side) are
/// always compatible.
pub fn is_gender_compatible(me: &BasicInfo, them: &BasicInfo) -> bool {
    let (Some(my_gender), Some(my_sexuality), Some(their_gender), Some(their_sexuality)) = (
        present(&me.gender),
        present(&me.sexuality),
        present(&them.gender),
        present(&them.sexuality),
    ) else {
        return true;
    };

    let my_gender = Gender::parse(my_gender);
    let their_gender = Gender::parse(their_gender);

    attracted_to(&Sexuality::parse(my_sexuality), &my_gender).contains(&their_gender)
        && attracted_to(&Sexuality::parse(their_sexuality), &their_gender).contains(&my_gender)
}

/// Check `them` against `me`'s age range, as of now
pub fn is_age_compatible(me: &BasicInfo, them: &BasicInfo) -> bool {
    is_age_compatible_at(me, them, Utc::now())
}

/// Check `them` against `me`'s age range at a fixed instant
///
/// Only enforced when `me` marked the range as a dealbreaker. A missing or
/// malformed birthdate passes.
pub fn is_age_compatible_at(me: &BasicInfo, them: &BasicInfo, now: DateTime<Utc>) -> bool {
    if !me.age_dealbreaker() {
        return true;
    }

    let Some(birthdate) = them.birthdate.as_deref().and_then(parse_birthdate) else {
        return true;
    };

    let age = age_in_years(birthdate, now);
    let min = i64::from(me.age_range_min.unwrap_or(DEFAULT_AGE_MIN));
    let max = i64::from(me.age_range_max.unwrap_or(DEFAULT_AGE_MAX));

    age >= min && age <= max
}

/// Gender compatibility plus each party's age dealbreaker against the other
pub fn is_mutually_eligible(me: &BasicInfo, them: &BasicInfo, now: DateTime<Utc>) -> bool {
    is_gender_compatible(me, them)
        && is_age_compatible_at(me, them, now)
        && is_age_compatible_at(them, me, now)
}

/// Whole years elapsed since `birthdate`, using 365.25-day years
pub fn age_in_years(birthdate: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_ms = (now - birthdate).num_milliseconds() as f64;
    (elapsed_ms / MS_PER_YEAR).floor() as i64
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date
pub fn parse_birthdate(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn info(gender: &str, sexuality: &str) -> BasicInfo {
        BasicInfo {
            gender: Some(gender.to_string()),
            sexuality: Some(sexuality.to_string()),
            ..Default::default()
        }
    }

    fn years_ago(now: DateTime<Utc>, years: f64) -> String {
        (now - Duration::milliseconds((years * MS_PER_YEAR) as i64)).to_rfc3339()
    }

    fn with_range(min: u32, max: u32) -> BasicInfo {
        BasicInfo {
            age_range_min: Some(min),
            age_range_max: Some(max),
            age_range_dealbreaker: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn test_simple_selector_labels() {
        let women = BTreeSet::from([Gender::Woman]);
        let men = BTreeSet::from([Gender::Man]);
        assert_eq!(attracted_to(&Sexuality::parse("Women"), &Gender::Man), women);
        assert_eq!(attracted_to(&Sexuality::parse("men"), &Gender::Man), men);
        assert_eq!(attracted_to(&Sexuality::parse("everyone"), &Gender::Woman).len(), 3);
    }

    #[test]
    fn test_straight_picks_opposite_binary_gender() {
        let straight = Sexuality::parse("Heterosexual");
        let women = BTreeSet::from([Gender::Woman]);
        let men = BTreeSet::from([Gender::Man]);
        assert_eq!(attracted_to(&straight, &Gender::parse("MAN")), women);
        assert_eq!(attracted_to(&straight, &Gender::parse("woman")), men);
        assert_eq!(attracted_to(&straight, &Gender::parse("non-binary")), men);
    }

    #[test]
    fn test_gay_is_own_gender() {
        let attraction = attracted_to(&Sexuality::parse("lesbian"), &Gender::parse("Woman"));
        assert_eq!(attraction, BTreeSet::from([Gender::Woman]));

        let attraction = attracted_to(&Sexuality::parse("gay"), &Gender::parse("Agender"));
        assert_eq!(attraction, BTreeSet::from([Gender::Other("agender".to_string())]));
    }

    #[test]
    fn test_unknown_sexuality_fails_open() {
        let attraction = attracted_to(&Sexuality::parse("demisexual"), &Gender::Man);
        assert_eq!(attraction.len(), 3);
    }

    #[test]
    fn test_gender_compatibility_both_directions() {
        assert!(is_gender_compatible(&info("Man", "Straight"), &info("Woman", "Straight")));
        assert!(!is_gender_compatible(&info("Man", "Straight"), &info("Man", "Straight")));
        assert!(!is_gender_compatible(&info("Man", "Straight"), &info("Woman", "lesbian")));
        assert!(is_gender_compatible(&info("Woman", "bisexual"), &info("Woman", "Gay")));
    }

    #[test]
    fn test_incomplete_profile_is_compatible() {
        let me = BasicInfo {
            gender: Some("Man".to_string()),
            ..Default::default()
        };
        assert!(is_gender_compatible(&me, &info("Woman", "Straight")));

        let blank = info("  ", "straight");
        assert!(is_gender_compatible(&blank, &info("Man", "straight")));
    }

    #[test]
    fn test_age_only_enforced_with_dealbreaker() {
        let now = Utc::now();
        let mut me = with_range(25, 35);
        me.age_range_dealbreaker = Some(false);
        let them = BasicInfo {
            birthdate: Some(years_ago(now, 60.0)),
            ..Default::default()
        };

        assert!(is_age_compatible_at(&me, &them, now));
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        let now = Utc::now();
        let me = with_range(25, 35);

        let cases = [(25.0, true), (30.0, true), (35.0, true), (24.9, false), (36.0, false)];
        for (years, expected) in cases {
            let them = BasicInfo {
                birthdate: Some(years_ago(now, years)),
                ..Default::default()
            };
            assert_eq!(is_age_compatible_at(&me, &them, now), expected, "age {}", years);
        }
    }

    #[test]
    fn test_missing_or_malformed_birthdate_passes() {
        let now = Utc::now();
        let me = with_range(25, 35);

        assert!(is_age_compatible_at(&me, &BasicInfo::default(), now));

        let malformed = BasicInfo {
            birthdate: Some("not a date".to_string()),
            ..Default::default()
        };
        assert!(is_age_compatible_at(&me, &malformed, now));
    }

    #[test]
    fn test_default_age_bounds() {
        let now = Utc::now();
        let me = BasicInfo {
            age_range_dealbreaker: Some(true),
            ..Default::default()
        };
        let minor = BasicInfo {
            birthdate: Some(years_ago(now, 17.0)),
            ..Default::default()
        };
        let adult = BasicInfo {
            birthdate: Some(years_ago(now, 18.0)),
            ..Default::default()
        };

        assert!(!is_age_compatible_at(&me, &minor, now));
        assert!(is_age_compatible_at(&me, &adult, now));
    }

    #[test]
    fn test_parse_birthdate_formats() {
        assert!(parse_birthdate("1995-06-15").is_some());
        assert!(parse_birthdate("1995-06-15T10:30:00Z").is_some());
        assert!(parse_birthdate("1995-06-15T10:30:00.000+02:00").is_some());
        assert!(parse_birthdate("1995-06-15T10:30:00.000").is_some());
        assert!(parse_birthdate("15/06/1995").is_none());
        assert!(parse_birthdate("").is_none());
    }

    #[test]
    fn test_mutual_eligibility_checks_both_age_ranges() {
        let now = Utc::now();
        let mut me = info("Man", "straight");
        me.birthdate = Some(years_ago(now, 40.0));
        let mut them = info("Woman", "straight");
        them.birthdate = Some(years_ago(now, 30.0));
        them.age_range_min = Some(25);
        them.age_range_max = Some(35);
        them.age_range_dealbreaker = Some(true);

        assert!(is_age_compatible_at(&me, &them, now));
        assert!(!is_mutually_eligible(&me, &them, now));
    }
}
