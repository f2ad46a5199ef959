// 📄 Document Contexts - flat key/value maps for the template layer
// The registry never renders anything; it hands the templating service a
// stable map of strings and the service fills the docx placeholders

use crate::club::Club;
use crate::eligibility::Eligibility;
use crate::labels::{self, Lang};
use crate::member::{Member, RoleDetails};
use std::collections::HashMap;

// ============================================================================
// ID CARD CONTEXT
// ============================================================================

/// Context for the role-specific ID card templates. Keys match the
/// placeholders in the existing card templates; missing values become empty
/// strings so a template never renders a literal "None".
pub fn card_context(member: &Member, eligibility: Option<&Eligibility>) -> HashMap<String, String> {
    let mut ctx = HashMap::new();

    ctx.insert("name_ar".to_string(), member.full_name_ar.clone());
    ctx.insert("name_en".to_string(), member.full_name.clone());
    ctx.insert("pkf_id".to_string(), member.pkf_id.clone());
    ctx.insert("role".to_string(), member.role.as_str().to_string());
    ctx.insert("dob".to_string(), or_empty(&member.dob));
    ctx.insert("club".to_string(), or_empty(&member.club_name));
    ctx.insert("belt".to_string(), or_empty(&member.current_belt));

    match &member.details {
        RoleDetails::Player {
            weight,
            kata,
            kumite,
            national_rank,
            international_rank,
            ..
        } => {
            ctx.insert(
                "weight".to_string(),
                weight.map(|w| format!("{}", w)).unwrap_or_default(),
            );
            ctx.insert("rank_loc".to_string(), or_empty(national_rank));
            ctx.insert("rank_intl".to_string(), or_empty(international_rank));
            // Checkbox marks on the card
            ctx.insert("x_kata".to_string(), mark(*kata));
            ctx.insert("x_kumite".to_string(), mark(*kumite));
        }

        RoleDetails::Coach {
            national_degree,
            asian_degree,
            international_degree,
        } => {
            ctx.insert("coach_nat".to_string(), or_empty(national_degree));
            ctx.insert("coach_asia".to_string(), or_empty(asian_degree));
            ctx.insert("coach_intl".to_string(), or_empty(international_degree));
        }

        RoleDetails::Referee { license_date, .. } => {
            ctx.insert(
                "ref_kumite".to_string(),
                member
                    .details
                    .highest_kumite_grade()
                    .unwrap_or("N/A")
                    .to_string(),
            );
            ctx.insert(
                "ref_kata".to_string(),
                member
                    .details
                    .highest_kata_grade()
                    .unwrap_or("N/A")
                    .to_string(),
            );
            ctx.insert("license_date".to_string(), or_empty(license_date));
        }

        RoleDetails::Admin { title } => {
            ctx.insert("admin_title".to_string(), or_empty(title));
        }
    }

    if let Some(eligibility) = eligibility {
        ctx.insert(
            "kumite_categories".to_string(),
            eligibility.kumite_joined(),
        );
        ctx.insert("kata_categories".to_string(), eligibility.kata_joined());
    }

    ctx
}

fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn mark(checked: bool) -> String {
    if checked { "X" } else { "" }.to_string()
}

// ============================================================================
// PROFILE SHEET ROWS
// ============================================================================

/// One printed line of a bilingual profile sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRow {
    pub field: String,
    pub label_en: String,
    pub label_ar: String,
    pub value: String,
}

fn profile_row(field: &str, value: String) -> ProfileRow {
    ProfileRow {
        field: field.to_string(),
        label_en: labels::member_label(field, Lang::En)
            .unwrap_or(field)
            .to_string(),
        label_ar: labels::member_label(field, Lang::Ar)
            .unwrap_or(field)
            .to_string(),
        value,
    }
}

/// The member profile sheet: core fields in print order, skipping fields
/// the member has no value for, then the belt history.
pub fn member_profile_rows(member: &Member) -> Vec<ProfileRow> {
    let mut rows = vec![
        profile_row("pkf_id", member.pkf_id.clone()),
        profile_row("full_name", member.full_name.clone()),
    ];

    if !member.full_name_ar.is_empty() {
        rows.push(profile_row("full_name_ar", member.full_name_ar.clone()));
    }

    rows.push(profile_row("role", member.role.as_str().to_string()));

    for (field, value) in [
        ("dob", &member.dob),
        ("club_name", &member.club_name),
        ("phone", &member.phone),
        ("email", &member.email),
        ("profession", &member.profession),
        ("current_belt", &member.current_belt),
        ("expiry_date", &member.expiry_date),
        ("passport_number", &member.passport_number),
        ("passport_expiry_date", &member.passport_expiry_date),
        ("notes", &member.notes),
    ] {
        if let Some(value) = value {
            rows.push(profile_row(field, value.clone()));
        }
    }

    if let Some(gender) = member.gender {
        rows.push(ProfileRow {
            field: "gender".to_string(),
            label_en: "Gender".to_string(),
            label_ar: "الجنس".to_string(),
            value: gender.as_str().to_string(),
        });
    }

    for belt in &member.belts {
        rows.push(ProfileRow {
            field: "belt_history".to_string(),
            label_en: "Belt".to_string(),
            label_ar: "الحزام".to_string(),
            value: format!("{} ({}, {})", belt.belt, belt.date, belt.source),
        });
    }

    rows
}

/// The club profile sheet, ending with the ledger-derived point total
pub fn club_profile_rows(club: &Club) -> Vec<ProfileRow> {
    let mut rows = vec![
        club_row("club_membership_id", club.club_membership_id.clone()),
        club_row("name", club.name.clone()),
    ];

    for (field, value) in [
        ("representative_name", &club.representative_name),
        ("classification", &club.classification),
        ("address", &club.address),
        ("phone", &club.phone),
        ("email", &club.email),
        ("affiliation_date", &club.affiliation_date),
        ("subscription_expiry_date", &club.subscription_expiry_date),
    ] {
        if let Some(value) = value {
            rows.push(club_row(field, value.clone()));
        }
    }

    rows.push(club_row("points", club.total_points().to_string()));
    rows
}

fn club_row(field: &str, value: String) -> ProfileRow {
    ProfileRow {
        field: field.to_string(),
        label_en: labels::club_label(field, Lang::En)
            .unwrap_or(field)
            .to_string(),
        label_ar: labels::club_label(field, Lang::Ar)
            .unwrap_or(field)
            .to_string(),
        value,
    }
}

// ============================================================================
// TESTS
// ============================================================================
