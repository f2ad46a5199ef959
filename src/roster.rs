// Roster import/export - CSV rows in, CSV rows out
// One bad row never sinks the batch; problems come back per line

use crate::eligibility::{Eligibility, EligibilityError, EligibilityResolver};
use crate::member::{Gender, Member, Role, RoleDetails};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tracing::warn;

// ============================================================================
// ROW SHAPE
// ============================================================================

/// Flat roster row. `Specific_Data` carries the role extension as JSON,
/// exactly as the registry stores it; the two category columns are filled
/// on export and ignored on import.
#[derive(Debug, Serialize, Deserialize)]
struct RosterRow {
    #[serde(rename = "PKF_ID")]
    pkf_id: String,

    #[serde(rename = "Full_Name")]
    full_name: String,

    #[serde(rename = "Full_Name_AR", default)]
    full_name_ar: String,

    #[serde(rename = "DOB", default)]
    dob: Option<String>,

    #[serde(rename = "Gender", default)]
    gender: Option<String>,

    #[serde(rename = "Role")]
    role: String,

    #[serde(rename = "Club", default)]
    club_name: Option<String>,

    #[serde(rename = "Phone", default)]
    phone: Option<String>,

    #[serde(rename = "Email", default)]
    email: Option<String>,

    #[serde(rename = "Profession", default)]
    profession: Option<String>,

    #[serde(rename = "Expiry_Date", default)]
    expiry_date: Option<String>,

    #[serde(rename = "Passport_Number", default)]
    passport_number: Option<String>,

    #[serde(rename = "Passport_Expiry", default)]
    passport_expiry_date: Option<String>,

    #[serde(rename = "Current_Belt", default)]
    current_belt: Option<String>,

    #[serde(rename = "Notes", default)]
    notes: Option<String>,

    #[serde(rename = "Specific_Data", default)]
    specific_data: Option<String>,

    #[serde(rename = "Kumite_Categories", default)]
    kumite_categories: Option<String>,

    #[serde(rename = "Kata_Categories", default)]
    kata_categories: Option<String>,
}

// ============================================================================
// IMPORT
// ============================================================================

#[derive(Debug)]
pub struct RowError {
    /// 1-based line in the CSV file, header included
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RosterImport {
    pub members: Vec<Member>,
    pub errors: Vec<RowError>,
}

pub fn import_members_from_path<P: AsRef<Path>>(path: P) -> Result<RosterImport> {
    let file = std::fs::File::open(path.as_ref())
        .with_context(|| format!("Failed to open roster file: {:?}", path.as_ref()))?;
    import_members(file)
}

/// Read roster rows, validating each. Rows that fail land in `errors` with
/// their line number; the rest become members.
pub fn import_members<R: Read>(reader: R) -> Result<RosterImport> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut import = RosterImport::default();

    for (index, result) in rdr.deserialize::<RosterRow>().enumerate() {
        let line = index + 2; // header is line 1

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                import.errors.push(RowError {
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };

        match row_to_member(row) {
            Ok(member) => import.members.push(member),
            Err(message) => import.errors.push(RowError { line, message }),
        }
    }

    Ok(import)
}

fn row_to_member(row: RosterRow) -> std::result::Result<Member, String> {
    let role = Role::parse(&row.role).ok_or_else(|| format!("unknown role '{}'", row.role))?;

    let details = match row.specific_data.as_deref().map(str::trim) {
        Some(json) if !json.is_empty() => serde_json::from_str::<RoleDetails>(json)
            .map_err(|e| format!("bad Specific_Data JSON: {}", e))?,
        _ => RoleDetails::default_for(role),
    };

    let mut member = Member::new(&row.pkf_id, &row.full_name, role);
    member.full_name_ar = row.full_name_ar;
    member.dob = row.dob.filter(|d| !d.trim().is_empty());
    member.gender = row.gender.as_deref().and_then(Gender::parse);
    member.club_name = row.club_name.filter(|v| !v.trim().is_empty());
    member.phone = row.phone.filter(|v| !v.trim().is_empty());
    member.email = row.email.filter(|v| !v.trim().is_empty());
    member.profession = row.profession.filter(|v| !v.trim().is_empty());
    member.expiry_date = row.expiry_date.filter(|v| !v.trim().is_empty());
    member.passport_number = row.passport_number.filter(|v| !v.trim().is_empty());
    member.passport_expiry_date = row.passport_expiry_date.filter(|v| !v.trim().is_empty());
    member.current_belt = row.current_belt.filter(|v| !v.trim().is_empty());
    member.notes = row.notes.filter(|v| !v.trim().is_empty());
    member.details = details;

    if let Err(errors) = member.validate() {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(joined);
    }

    Ok(member)
}

// ============================================================================
// EXPORT
// ============================================================================

pub fn export_members_to_path<P: AsRef<Path>>(
    path: P,
    members: &[Member],
    resolver: &EligibilityResolver,
    on: NaiveDate,
) -> Result<usize> {
    let file = std::fs::File::create(path.as_ref())
        .with_context(|| format!("Failed to create roster file: {:?}", path.as_ref()))?;
    export_members(file, members, resolver, on)
}

/// Write the roster including each member's current eligibility. A member
/// whose eligibility cannot be computed is still exported, with empty
/// category columns and a warning - the export is a report, not a gate.
pub fn export_members<W: Write>(
    writer: W,
    members: &[Member],
    resolver: &EligibilityResolver,
    on: NaiveDate,
) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut written = 0;

    for member in members {
        let eligibility = match resolver.resolve_member(member, on) {
            Ok(e) => e,
            Err(e) => {
                warn!(pkf_id = %member.pkf_id, error = %e, "exported without categories");
                Eligibility::default()
            }
        };

        let row = RosterRow {
            pkf_id: member.pkf_id.clone(),
            full_name: member.full_name.clone(),
            full_name_ar: member.full_name_ar.clone(),
            dob: member.dob.clone(),
            gender: member.gender.map(|g| g.as_str().to_string()),
            role: member.role.as_str().to_string(),
            club_name: member.club_name.clone(),
            phone: member.phone.clone(),
            email: member.email.clone(),
            profession: member.profession.clone(),
            expiry_date: member.expiry_date.clone(),
            passport_number: member.passport_number.clone(),
            passport_expiry_date: member.passport_expiry_date.clone(),
            current_belt: member.current_belt.clone(),
            notes: member.notes.clone(),
            specific_data: Some(serde_json::to_string(&member.details)?),
            kumite_categories: Some(eligibility.kumite_joined()),
            kata_categories: Some(eligibility.kata_joined()),
        };

        wtr.serialize(row)?;
        written += 1;
    }

    wtr.flush()?;
    Ok(written)
}

// ============================================================================
// BATCH RECLASSIFICATION
// ============================================================================

#[derive(Debug)]
pub struct Reclassification {
    pub pkf_id: String,
    pub outcome: std::result::Result<Eligibility, EligibilityError>,
}

/// Resolve every member against the same evaluation date. Side-effect free;
/// a failed resolution is recorded in its own outcome and the batch runs on.
pub fn reclassify(
    resolver: &EligibilityResolver,
    members: &[Member],
    on: NaiveDate,
) -> Vec<Reclassification> {
    members
        .iter()
        .map(|member| Reclassification {
            pkf_id: member.pkf_id.clone(),
            outcome: resolver.resolve_member(member, on),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    const ROSTER: &str = "\
PKF_ID,Full_Name,Full_Name_AR,DOB,Gender,Role,Club,Specific_Data
PKF-0001,Ahmad Hassan,أحمد حسن,2012-01-15,Male,Player,\"Jerusalem Karate Club\",\"{\"\"role\"\":\"\"Player\"\",\"\"weight\"\":60.0}\"
PKF-0002,Lina Odeh,لينا عودة,2008-05-01,Female,Coach,,
PKF-0003,Bad Row,,12/31/2001,Male,Player,,
PKF-0004,No Such Role,,2001-12-31,Male,Sensei,,
";

    #[test]
    fn test_import_collects_row_errors_without_aborting() {
        let import = import_members(ROSTER.as_bytes()).unwrap();

        assert_eq!(import.members.len(), 2);
        assert_eq!(import.errors.len(), 2);

        // Bad date on line 4, unknown role on line 5
        assert_eq!(import.errors[0].line, 4);
        assert!(import.errors[0].message.contains("dob"));
        assert_eq!(import.errors[1].line, 5);
        assert!(import.errors[1].message.contains("Sensei"));
    }

    #[test]
    fn test_import_parses_specific_data() {
        let import = import_members(ROSTER.as_bytes()).unwrap();

        let ahmad = &import.members[0];
        assert_eq!(ahmad.role, Role::Player);
        assert_eq!(ahmad.weight_kg(), Some(60.0));
        assert_eq!(ahmad.gender, Some(Gender::Male));

        // Empty Specific_Data falls back to empty details for the role
        let lina = &import.members[1];
        assert_eq!(lina.details, RoleDetails::default_for(Role::Coach));
    }

    #[test]
    fn test_export_includes_eligibility() {
        let import = import_members(ROSTER.as_bytes()).unwrap();
        let resolver = EligibilityResolver::standard();

        let mut out = Vec::new();
        let written = export_members(&mut out, &import.members, &resolver, on()).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(out).unwrap();
        // 14-year-old male at 60kg fights in -63kg (Cadets)
        assert!(text.contains("-63kg"));
        assert!(text.contains("Kata Individual (Cadets)"));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let import = import_members(ROSTER.as_bytes()).unwrap();
        let resolver = EligibilityResolver::standard();

        let mut out = Vec::new();
        export_members(&mut out, &import.members, &resolver, on()).unwrap();

        let again = import_members(out.as_slice()).unwrap();
        assert!(again.errors.is_empty());
        assert_eq!(again.members, import.members);
    }

    #[test]
    fn test_reclassify_isolates_failures() {
        let mut good = Member::new("PKF-0001", "Ahmad Hassan", Role::Player);
        good.dob = Some("2012-01-15".to_string());
        good.gender = Some(Gender::Male);

        let mut bad = Member::new("PKF-0002", "Corrupt Record", Role::Player);
        bad.dob = Some("??".to_string());
        bad.gender = Some(Gender::Male);

        let resolver = EligibilityResolver::standard();
        let results = reclassify(&resolver, &[good, bad], on());

        assert_eq!(results.len(), 2);
        assert!(results[0].outcome.is_ok());
        assert!(matches!(
            results[1].outcome,
            Err(EligibilityError::InvalidDate(_))
        ));
    }
}
