// 🥋 Member Records - Core identity plus role-specific details
// One typed variant per role replaces the free-form specific_data JSON bag

use serde::{Deserialize, Serialize};

// ============================================================================
// GENDER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Lenient parse for values arriving from forms, CSV rows, or old
    /// database records. Anything outside the two supported values is None.
    pub fn parse(raw: &str) -> Option<Gender> {
        match raw.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ROLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Coach,
    Referee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "Player",
            Role::Coach => "Coach",
            Role::Referee => "Referee",
            Role::Admin => "Admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_lowercase().as_str() {
            "player" => Some(Role::Player),
            "coach" => Some(Role::Coach),
            "referee" => Some(Role::Referee),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn all() -> [Role; 4] {
        [Role::Player, Role::Coach, Role::Referee, Role::Admin]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ROLE DETAILS (tagged union, one variant per role)
// ============================================================================

/// Role-specific details. The serialized shape keeps the historical
/// `specific_data` key names so existing card/profile templates keep working.
///
/// The variant IS the role: `Member::change_role` takes a `RoleDetails` and
/// derives the role field from it, so a stale extension after a role switch
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role")]
pub enum RoleDetails {
    Player {
        /// Competition weight in kg. Unset until the first weigh-in.
        #[serde(default)]
        weight: Option<f64>,

        /// Registered for Kata events
        #[serde(default, rename = "kata_check")]
        kata: bool,

        /// Registered for Kumite events
        #[serde(default, rename = "kumite_check")]
        kumite: bool,

        #[serde(default, rename = "nat_rank")]
        national_rank: Option<String>,

        #[serde(default, rename = "nat_rank_points")]
        national_rank_points: Option<i64>,

        #[serde(default, rename = "int_rank")]
        international_rank: Option<String>,

        #[serde(default, rename = "int_rank_points")]
        international_rank_points: Option<i64>,
    },

    Coach {
        #[serde(default, rename = "coach_national_degree")]
        national_degree: Option<String>,

        #[serde(default, rename = "coach_asian_degree")]
        asian_degree: Option<String>,

        #[serde(default, rename = "coach_international_degree")]
        international_degree: Option<String>,
    },

    Referee {
        #[serde(default, rename = "ref_kumite_national_degree")]
        kumite_national_degree: Option<String>,

        #[serde(default, rename = "ref_kumite_asian_degree")]
        kumite_asian_degree: Option<String>,

        #[serde(default, rename = "ref_kumite_international_degree")]
        kumite_international_degree: Option<String>,

        #[serde(default, rename = "ref_kata_national_degree")]
        kata_national_degree: Option<String>,

        #[serde(default, rename = "ref_kata_asian_degree")]
        kata_asian_degree: Option<String>,

        #[serde(default, rename = "ref_kata_international_degree")]
        kata_international_degree: Option<String>,

        #[serde(default)]
        license_date: Option<String>,
    },

    Admin {
        #[serde(default, rename = "admin_title")]
        title: Option<String>,
    },
}

impl RoleDetails {
    /// The role this variant belongs to
    pub fn role(&self) -> Role {
        match self {
            RoleDetails::Player { .. } => Role::Player,
            RoleDetails::Coach { .. } => Role::Coach,
            RoleDetails::Referee { .. } => Role::Referee,
            RoleDetails::Admin { .. } => Role::Admin,
        }
    }

    /// Empty details for a freshly registered member of the given role
    pub fn default_for(role: Role) -> RoleDetails {
        match role {
            Role::Player => RoleDetails::Player {
                weight: None,
                kata: false,
                kumite: false,
                national_rank: None,
                national_rank_points: None,
                international_rank: None,
                international_rank_points: None,
            },
            Role::Coach => RoleDetails::Coach {
                national_degree: None,
                asian_degree: None,
                international_degree: None,
            },
            Role::Referee => RoleDetails::Referee {
                kumite_national_degree: None,
                kumite_asian_degree: None,
                kumite_international_degree: None,
                kata_national_degree: None,
                kata_asian_degree: None,
                kata_international_degree: None,
                license_date: None,
            },
            Role::Admin => RoleDetails::Admin { title: None },
        }
    }

    /// Competition weight, Player only
    pub fn weight_kg(&self) -> Option<f64> {
        match self {
            RoleDetails::Player { weight, .. } => *weight,
            _ => None,
        }
    }

    /// Highest Kumite refereeing grade (international beats asian beats
    /// national), as printed on referee cards
    pub fn highest_kumite_grade(&self) -> Option<&str> {
        match self {
            RoleDetails::Referee {
                kumite_international_degree,
                kumite_asian_degree,
                kumite_national_degree,
                ..
            } => kumite_international_degree
                .as_deref()
                .or(kumite_asian_degree.as_deref())
                .or(kumite_national_degree.as_deref()),
            _ => None,
        }
    }

    /// Highest Kata refereeing grade, same ladder as Kumite
    pub fn highest_kata_grade(&self) -> Option<&str> {
        match self {
            RoleDetails::Referee {
                kata_international_degree,
                kata_asian_degree,
                kata_national_degree,
                ..
            } => kata_international_degree
                .as_deref()
                .or(kata_asian_degree.as_deref())
                .or(kata_national_degree.as_deref()),
            _ => None,
        }
    }
}

// ============================================================================
// BELT HISTORY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeltRecord {
    pub belt: String,

    /// Date obtained, YYYY-MM-DD
    pub date: String,

    /// Awarding body or event
    pub source: String,
}

// ============================================================================
// MEMBER
// ============================================================================

/// A federation member. `pkf_id` is the stable identity: unique across the
/// federation and never reassigned once issued.
///
/// `dob` is kept as the raw string the registry received. Parsing happens at
/// the point of use (validation, eligibility) so a malformed stored value
/// surfaces as an explicit error instead of silently becoming "no age".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub pkf_id: String,

    /// Full name, English
    pub full_name: String,

    /// Full name, Arabic
    #[serde(default)]
    pub full_name_ar: String,

    /// Date of birth, YYYY-MM-DD
    #[serde(default)]
    pub dob: Option<String>,

    #[serde(default)]
    pub gender: Option<Gender>,

    pub role: Role,

    #[serde(default)]
    pub club_name: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub profession: Option<String>,

    /// Membership expiry, YYYY-MM-DD
    #[serde(default)]
    pub expiry_date: Option<String>,

    #[serde(default)]
    pub passport_number: Option<String>,

    /// Passport expiry, YYYY-MM-DD
    #[serde(default)]
    pub passport_expiry_date: Option<String>,

    #[serde(default)]
    pub current_belt: Option<String>,

    /// Promotion history, oldest first
    #[serde(default)]
    pub belts: Vec<BeltRecord>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Role-specific details. Replaced wholesale on update, never merged.
    pub details: RoleDetails,
}

impl Member {
    /// New member with empty details for the given role
    pub fn new(pkf_id: &str, full_name: &str, role: Role) -> Self {
        Member {
            pkf_id: pkf_id.to_string(),
            full_name: full_name.to_string(),
            full_name_ar: String::new(),
            dob: None,
            gender: None,
            role,
            club_name: None,
            phone: None,
            email: None,
            profession: None,
            expiry_date: None,
            passport_number: None,
            passport_expiry_date: None,
            current_belt: None,
            belts: Vec::new(),
            notes: None,
            details: RoleDetails::default_for(role),
        }
    }

    /// Switch role and details together. The role field is derived from the
    /// variant, so the old extension can never survive a role change.
    pub fn change_role(&mut self, details: RoleDetails) {
        self.role = details.role();
        self.details = details;
    }

    /// Competition weight when the member is a Player
    pub fn weight_kg(&self) -> Option<f64> {
        self.details.weight_kg()
    }

    /// Structural validation. Collects every problem instead of stopping at
    /// the first, so a form can show all of them at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.pkf_id.trim().is_empty() {
            errors.push(FieldError::new("pkf_id", "Membership id is required"));
        }

        if self.full_name.trim().is_empty() {
            errors.push(FieldError::new("full_name", "Full name is required"));
        }

        if let Some(dob) = &self.dob {
            if parse_date(dob).is_none() {
                errors.push(FieldError::new(
                    "dob",
                    format!("'{}' is not a valid YYYY-MM-DD date", dob),
                ));
            }
        }

        // Role and details must agree. The old system silently kept the
        // stale extension after a role switch; here it is a hard failure.
        if self.details.role() != self.role {
            errors.push(FieldError::new(
                "details",
                format!(
                    "role is {} but details belong to {}",
                    self.role,
                    self.details.role()
                ),
            ));
        }

        if let RoleDetails::Player {
            weight: Some(w), ..
        } = self.details
        {
            if w <= 0.0 || !w.is_finite() {
                errors.push(FieldError::new(
                    "weight",
                    format!("weight must be a positive number of kg, got {}", w),
                ));
            }
        }

        for (field, value) in [
            ("expiry_date", &self.expiry_date),
            ("passport_expiry_date", &self.passport_expiry_date),
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

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Parse a YYYY-MM-DD date string
pub fn parse_date(raw: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

// ============================================================================
// FIELD ERROR
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for FieldError {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_player() -> Member {
        let mut m = Member::new("PKF-0042", "Ahmad Hassan", Role::Player);
        m.full_name_ar = "أحمد حسن".to_string();
        m.dob = Some("2010-03-14".to_string());
        m.gender = Some(Gender::Male);
        m.club_name = Some("Jerusalem Karate Club".to_string());
        m.details = RoleDetails::Player {
            weight: Some(48.5),
            kata: true,
            kumite: true,
            national_rank: Some("3rd".to_string()),
            national_rank_points: Some(120),
            international_rank: None,
            international_rank_points: None,
        };
        m
    }

    #[test]
    fn test_gender_parse_lenient() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse(" female "), Some(Gender::Female));
        assert_eq!(Gender::parse("F"), Some(Gender::Female));
        assert_eq!(Gender::parse("other"), None);
        assert_eq!(Gender::parse(""), None);
    }

    #[test]
    fn test_validate_ok() {
        assert!(test_player().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_pkf_id() {
        let mut m = test_player();
        m.pkf_id = "  ".to_string();

        let errors = m.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "pkf_id"));
    }

    #[test]
    fn test_validate_bad_dob() {
        let mut m = test_player();
        m.dob = Some("14/03/2010".to_string());

        let errors = m.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "dob"));
    }

    #[test]
    fn test_validate_missing_dob_is_allowed() {
        let mut m = test_player();
        m.dob = None;
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_validate_role_details_mismatch() {
        let mut m = test_player();
        // Simulate a corrupted record: role flipped without replacing details
        m.role = Role::Coach;

        let errors = m.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "details"));
    }

    #[test]
    fn test_validate_non_positive_weight() {
        let mut m = test_player();
        m.details = RoleDetails::Player {
            weight: Some(0.0),
            kata: false,
            kumite: true,
            national_rank: None,
            national_rank_points: None,
            international_rank: None,
            international_rank_points: None,
        };

        let errors = m.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "weight"));
    }

    #[test]
    fn test_change_role_replaces_details() {
        let mut m = test_player();
        m.change_role(RoleDetails::Coach {
            national_degree: Some("B".to_string()),
            asian_degree: None,
            international_degree: None,
        });

        assert_eq!(m.role, Role::Coach);
        assert_eq!(m.details.role(), Role::Coach);
        assert_eq!(m.weight_kg(), None);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_details_serialize_keeps_template_keys() {
        let m = test_player();
        let json = serde_json::to_value(&m.details).unwrap();

        assert_eq!(json["role"], "Player");
        assert_eq!(json["weight"], 48.5);
        assert_eq!(json["kata_check"], true);
        assert_eq!(json["nat_rank"], "3rd");
    }

    #[test]
    fn test_details_deserialize_defaults_missing_fields() {
        let details: RoleDetails =
            serde_json::from_str(r#"{"role": "Admin"}"#).unwrap();
        assert_eq!(details, RoleDetails::Admin { title: None });
    }

    #[test]
    fn test_referee_highest_grade_ladder() {
        let details = RoleDetails::Referee {
            kumite_national_degree: Some("Judge B".to_string()),
            kumite_asian_degree: Some("Judge A".to_string()),
            kumite_international_degree: None,
            kata_national_degree: Some("Judge B".to_string()),
            kata_asian_degree: None,
            kata_international_degree: None,
            license_date: Some("2024-01-01".to_string()),
        };

        assert_eq!(details.highest_kumite_grade(), Some("Judge A"));
        assert_eq!(details.highest_kata_grade(), Some("Judge B"));
    }
}
