// Club records and the append-only point ledger

use crate::member::{parse_date, FieldError, Gender};
use serde::{Deserialize, Serialize};

// ============================================================================
// POINT LEDGER
// ============================================================================

/// One dated score delta, e.g. from a championship result. Immutable once
/// recorded: corrections are made by appending a compensating entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEntry {
    /// Stable entry id. The row never changes after it is written, so the
    /// id is the audit handle for it.
    #[serde(default = "new_entry_id")]
    pub id: String,

    /// YYYY-MM-DD
    pub date: String,

    /// e.g. "National Championship 2026 - 2nd place team Kumite"
    pub description: String,

    pub points: i64,
}

fn new_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl PointEntry {
    pub fn new(date: &str, description: &str, points: i64) -> Self {
        PointEntry {
            id: new_entry_id(),
            date: date.to_string(),
            description: description.to_string(),
            points,
        }
    }
}

// ============================================================================
// CLUB
// ============================================================================

/// An affiliated club. `club_membership_id` is unique and immutable once
/// issued. The ledger is append-only and the club's score is always the
/// ledger sum; callers may cache the sum but never treat the cache as the
/// source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub club_membership_id: String,

    pub name: String,

    #[serde(default)]
    pub representative_name: Option<String>,

    #[serde(default)]
    pub representative_gender: Option<Gender>,

    #[serde(default)]
    pub classification: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// YYYY-MM-DD
    #[serde(default)]
    pub affiliation_date: Option<String>,

    /// YYYY-MM-DD
    #[serde(default)]
    pub subscription_expiry_date: Option<String>,

    #[serde(default)]
    ledger: Vec<PointEntry>,
}

impl Club {
    pub fn new(club_membership_id: &str, name: &str) -> Self {
        Club {
            club_membership_id: club_membership_id.to_string(),
            name: name.to_string(),
            representative_name: None,
            representative_gender: None,
            classification: None,
            address: None,
            phone: None,
            email: None,
            affiliation_date: None,
            subscription_expiry_date: None,
            ledger: Vec::new(),
        }
    }

    /// Attach ledger rows loaded from the store. Only for hydration; live
    /// changes go through `award_points`.
    pub fn with_ledger(mut self, entries: Vec<PointEntry>) -> Self {
        self.ledger = entries;
        self
    }

    /// Append a point entry. There is no removal: the ledger only grows.
    pub fn award_points(&mut self, entry: PointEntry) {
        self.ledger.push(entry);
    }

    pub fn ledger(&self) -> &[PointEntry] {
        &self.ledger
    }

    /// Current score: the ledger sum, computed on demand
    pub fn total_points(&self) -> i64 {
        self.ledger.iter().map(|e| e.points).sum()
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.club_membership_id.trim().is_empty() {
            errors.push(FieldError::new(
                "club_membership_id",
                "Club membership id is required",
            ));
        }

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Club name is required"));
        }

        for (field, value) in [
            ("affiliation_date", &self.affiliation_date),
            ("subscription_expiry_date", &self.subscription_expiry_date),
        ] {
            if let Some(raw) = value {
                if parse_date(raw).is_none() {
                    errors.push(FieldError::new(
                        field,
                        format!("'{}' is not a valid YYYY-MM-DD date", raw),
                    ));
                }
            }
        }

        for entry in &self.ledger {
            if parse_date(&entry.date).is_none() {
                errors.push(FieldError::new(
                    "ledger",
                    format!("point entry date '{}' is not a valid date", entry.date),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_points_is_ledger_sum() {
        let mut club = Club::new("PKF-C-001", "Gaza Karate Academy");
        assert_eq!(club.total_points(), 0);

        club.award_points(PointEntry::new("2026-02-10", "Regional cup", 30));
        club.award_points(PointEntry::new("2026-04-22", "Nationals", 55));
        club.award_points(PointEntry::new("2026-05-01", "Scoring correction", -5));

        assert_eq!(club.total_points(), 80);
        assert_eq!(club.ledger().len(), 3);
    }

    #[test]
    fn test_validate_ok() {
        let mut club = Club::new("PKF-C-002", "Nablus Dojo");
        club.affiliation_date = Some("2020-09-01".to_string());
        club.award_points(PointEntry::new("2026-02-10", "Regional cup", 10));

        assert!(club.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_id_and_name() {
        let club = Club::new("", "");
        let errors = club.validate().unwrap_err();

        assert!(errors.iter().any(|e| e.field == "club_membership_id"));
        assert!(errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn test_validate_bad_ledger_date() {
        let mut club = Club::new("PKF-C-003", "Hebron Karate Club");
        club.award_points(PointEntry::new("last tuesday", "Friendly", 5));

        let errors = club.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "ledger"));
    }
}
