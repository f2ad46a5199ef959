// ⚖️ Eligibility Resolver - pure classification from birth date, gender, weight
//
// No I/O and no shared mutable state: the resolver borrows an immutable
// category table and every call works on its own locals, so concurrent
// callers need no coordination.

use crate::categories::CategoryTable;
use crate::member::{parse_date, Gender, Member, RoleDetails};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum EligibilityError {
    /// Birth date present but unparseable. Fatal to this one resolution:
    /// the caller must surface "age unknown" instead of defaulting to
    /// "no categories".
    #[error("invalid birth date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
}

// ============================================================================
// RESULT SHAPE
// ============================================================================

/// The two label sets a member qualifies for. Ordered sets so identical
/// inputs always serialize identically and duplicates across overlapping
/// brackets collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Eligibility {
    pub kumite: BTreeSet<String>,
    pub kata: BTreeSet<String>,
}

impl Eligibility {
    pub fn is_empty(&self) -> bool {
        self.kumite.is_empty() && self.kata.is_empty()
    }

    /// Kumite labels joined with ", " for document contexts and exports
    pub fn kumite_joined(&self) -> String {
        self.kumite.iter().cloned().collect::<Vec<_>>().join(", ")
    }

    /// Kata labels joined with ", "
    pub fn kata_joined(&self) -> String {
        self.kata.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

// ============================================================================
// AGE
// ============================================================================

/// Whole years elapsed between `dob` and `on`. An anniversary not yet
/// reached does not count: born Dec 31, evaluated May 1, is one year
/// younger than the calendar-year difference.
pub fn age_on(dob: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - dob.year();
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

// ============================================================================
// RESOLVER
// ============================================================================

pub struct EligibilityResolver {
    table: Arc<CategoryTable>,
}

impl EligibilityResolver {
    /// Resolver over an injected table (the table is read-only from here on)
    pub fn new(table: Arc<CategoryTable>) -> Self {
        EligibilityResolver { table }
    }

    /// Resolver over the standard federation table
    pub fn standard() -> Self {
        Self::new(Arc::new(CategoryTable::standard()))
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Resolve against today's date
    pub fn resolve(
        &self,
        dob: &str,
        gender: Option<Gender>,
        weight_kg: Option<f64>,
    ) -> Result<Eligibility, EligibilityError> {
        self.resolve_on(dob, gender, weight_kg, Local::now().date_naive())
    }

    /// Resolve against an explicit evaluation date. Deterministic: same
    /// inputs and date always produce the same sets.
    ///
    /// Degrade policy, matching long-standing registry behavior:
    /// - unknown gender -> both sets empty (logged, not an error)
    /// - missing or non-positive weight -> Kumite empty, Kata still resolves
    /// - only a malformed birth date is a hard error
    pub fn resolve_on(
        &self,
        dob: &str,
        gender: Option<Gender>,
        weight_kg: Option<f64>,
        on: NaiveDate,
    ) -> Result<Eligibility, EligibilityError> {
        let dob = parse_date(dob).ok_or_else(|| EligibilityError::InvalidDate(dob.to_string()))?;

        let gender = match gender {
            Some(g) => g,
            None => {
                warn!(dob = %dob, "gender unknown, no categories resolved");
                return Ok(Eligibility::default());
            }
        };

        let age = age_on(dob, on);
        if age < 0 {
            warn!(%dob, %on, "birth date after evaluation date, no categories resolved");
            return Ok(Eligibility::default());
        }

        let weight = match weight_kg {
            Some(w) if w > 0.0 && w.is_finite() => Some(w),
            Some(w) => {
                warn!(weight = w, "non-positive weight, Kumite skipped");
                None
            }
            None => None,
        };

        let mut result = Eligibility::default();

        for bracket in self.table.matching_brackets(age as u32) {
            if let Some(w) = weight {
                for class in bracket.kumite_for(gender) {
                    if class.admits(w) {
                        result.kumite.insert(class.label.clone());
                    }
                }
            }
            for kata in bracket.kata_for(gender) {
                result.kata.insert(kata.clone());
            }
        }

        debug!(
            age,
            %gender,
            kumite = result.kumite.len(),
            kata = result.kata.len(),
            "eligibility resolved"
        );

        Ok(result)
    }

    /// Resolve a member record. A member without a birth date has an
    /// unknown age and resolves to empty sets; weight only counts when the
    /// member is a Player.
    pub fn resolve_member(
        &self,
        member: &Member,
        on: NaiveDate,
    ) -> Result<Eligibility, EligibilityError> {
        let dob = match &member.dob {
            Some(dob) => dob,
            None => {
                debug!(pkf_id = %member.pkf_id, "no birth date on record, age unknown");
                return Ok(Eligibility::default());
            }
        };

        let weight = match &member.details {
            RoleDetails::Player { weight, .. } => *weight,
            _ => None,
        };

        self.resolve_on(dob, member.gender, weight, on)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Role;

    fn on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn test_age_counts_whole_years_only() {
        let dob = NaiveDate::from_ymd_opt(2000, 12, 31).unwrap();
        let eval = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        // Calendar difference says 25, but the birthday has not come yet
        assert_eq!(age_on(dob, eval), 24);

        let birthday = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(age_on(dob, birthday), 25);
    }

    #[test]
    fn test_cadet_male_60kg() {
        let resolver = EligibilityResolver::standard();

        // 14 years old on the evaluation date
        let result = resolver
            .resolve_on("2012-01-15", Some(Gender::Male), Some(60.0), on())
            .unwrap();

        assert_eq!(
            result.kumite,
            BTreeSet::from(["-63kg".to_string()]),
        );
        assert_eq!(
            result.kata,
            BTreeSet::from(["Kata Individual (Cadets)".to_string()]),
        );
    }

    #[test]
    fn test_weight_boundary_is_inclusive() {
        let resolver = EligibilityResolver::standard();

        // Exactly 57.0 still fights in -57kg
        let at_limit = resolver
            .resolve_on("2012-01-15", Some(Gender::Male), Some(57.0), on())
            .unwrap();
        assert_eq!(at_limit.kumite, BTreeSet::from(["-57kg".to_string()]));

        // 57.01 is the first weight of -63kg
        let above = resolver
            .resolve_on("2012-01-15", Some(Gender::Male), Some(57.01), on())
            .unwrap();
        assert_eq!(above.kumite, BTreeSet::from(["-63kg".to_string()]));
    }

    #[test]
    fn test_overlapping_brackets_merge_and_dedupe() {
        let resolver = EligibilityResolver::standard();

        // 18 years old: U21 and Seniors both apply. The female tables are
        // identical, so the Kumite label collapses to one entry while the
        // Kata labels stay distinct per bracket.
        let result = resolver
            .resolve_on("2008-05-01", Some(Gender::Female), Some(50.0), on())
            .unwrap();

        assert_eq!(result.kumite, BTreeSet::from(["-50kg".to_string()]));
        assert_eq!(
            result.kata,
            BTreeSet::from([
                "Kata Individual (U21)".to_string(),
                "Kata Individual (Seniors)".to_string(),
            ]),
        );
    }

    #[test]
    fn test_missing_weight_still_resolves_kata() {
        let resolver = EligibilityResolver::standard();

        // 10 years old, no weigh-in yet
        let result = resolver
            .resolve_on("2016-03-20", Some(Gender::Male), None, on())
            .unwrap();

        assert!(result.kumite.is_empty());
        assert_eq!(
            result.kata,
            BTreeSet::from(["Kata Individual (10-11 years)".to_string()]),
        );
    }

    #[test]
    fn test_non_positive_weight_degrades_like_missing() {
        let resolver = EligibilityResolver::standard();

        let result = resolver
            .resolve_on("2016-03-20", Some(Gender::Male), Some(-4.0), on())
            .unwrap();

        assert!(result.kumite.is_empty());
        assert!(!result.kata.is_empty());
    }

    #[test]
    fn test_invalid_birth_date_is_a_hard_error() {
        let resolver = EligibilityResolver::standard();

        let err = resolver
            .resolve_on("not-a-date", Some(Gender::Male), Some(60.0), on())
            .unwrap_err();

        assert_eq!(err, EligibilityError::InvalidDate("not-a-date".to_string()));
    }

    #[test]
    fn test_unknown_gender_degrades_to_empty() {
        let resolver = EligibilityResolver::standard();

        let result = resolver
            .resolve_on("2012-01-15", None, Some(60.0), on())
            .unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_age_outside_every_bracket() {
        let resolver = EligibilityResolver::standard();

        // 4 years old: below the youngest bracket
        let result = resolver
            .resolve_on("2022-01-15", Some(Gender::Female), Some(18.0), on())
            .unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_birth_date_after_evaluation_date() {
        let resolver = EligibilityResolver::standard();

        let result = resolver
            .resolve_on("2030-01-01", Some(Gender::Male), Some(60.0), on())
            .unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let resolver = EligibilityResolver::standard();

        let a = resolver
            .resolve_on("2008-05-01", Some(Gender::Female), Some(50.0), on())
            .unwrap();
        let b = resolver
            .resolve_on("2008-05-01", Some(Gender::Female), Some(50.0), on())
            .unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_member_uses_player_weight() {
        let resolver = EligibilityResolver::standard();

        let mut member = Member::new("PKF-0001", "Lina Odeh", Role::Player);
        member.dob = Some("2008-05-01".to_string());
        member.gender = Some(Gender::Female);
        member.details = RoleDetails::Player {
            weight: Some(50.0),
            kata: true,
            kumite: true,
            national_rank: None,
            national_rank_points: None,
            international_rank: None,
            international_rank_points: None,
        };

        let result = resolver.resolve_member(&member, on()).unwrap();
        assert_eq!(result.kumite, BTreeSet::from(["-50kg".to_string()]));
    }

    #[test]
    fn test_resolve_member_without_dob_is_empty() {
        let resolver = EligibilityResolver::standard();
        let member = Member::new("PKF-0002", "Sami Khalil", Role::Player);

        let result = resolver.resolve_member(&member, on()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_coach_resolves_without_weight() {
        let resolver = EligibilityResolver::standard();

        // A coach can still appear on Kata start lists for masters events;
        // what matters here is that a non-Player record never supplies a
        // weight and therefore never gets Kumite classes.
        let mut member = Member::new("PKF-0003", "Omar Nasser", Role::Coach);
        member.dob = Some("1980-02-10".to_string());
        member.gender = Some(Gender::Male);

        let result = resolver.resolve_member(&member, on()).unwrap();
        assert!(result.kumite.is_empty());
        assert_eq!(
            result.kata,
            BTreeSet::from(["Kata Individual (Seniors)".to_string()]),
        );
    }

    #[test]
    fn test_joined_output_shape() {
        let resolver = EligibilityResolver::standard();

        let result = resolver
            .resolve_on("2008-05-01", Some(Gender::Female), Some(50.0), on())
            .unwrap();

        assert_eq!(result.kumite_joined(), "-50kg");
        assert_eq!(
            result.kata_joined(),
            "Kata Individual (Seniors), Kata Individual (U21)"
        );
    }
}
