// Embedded registry store - members, clubs, and the club point ledger
// SQLite with WAL, in the same shape the rest of the federation tooling reads

use crate::alerts;
use crate::club::{Club, PointEntry};
use crate::member::{Gender, Member, Role};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use thiserror::Error;

// ============================================================================
// STORE ERRORS
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// Membership ids are unique and immutable; a second insert with the
    /// same id is an operator mistake, not a crash.
    #[error("membership id '{0}' already exists")]
    DuplicateId(String),

    #[error("no member with id '{0}'")]
    MemberNotFound(String),

    #[error("no club with id '{0}'")]
    ClubNotFound(String),
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Members Table
    // Role-specific details live in a JSON column written wholesale on every
    // update, so a role change can never leave half of the old extension
    // behind. Belt history is a JSON array, oldest first.
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pkf_id TEXT UNIQUE NOT NULL,
            full_name TEXT NOT NULL,
            full_name_ar TEXT NOT NULL DEFAULT '',
            dob TEXT,
            gender TEXT,
            role TEXT NOT NULL,
            club_name TEXT,
            phone TEXT,
            email TEXT,
            profession TEXT,
            expiry_date TEXT,
            passport_number TEXT,
            passport_expiry_date TEXT,
            current_belt TEXT,
            belts TEXT NOT NULL DEFAULT '[]',
            notes TEXT,
            details TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Clubs Table
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS clubs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            club_membership_id TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            representative_name TEXT,
            representative_gender TEXT,
            classification TEXT,
            address TEXT,
            phone TEXT,
            email TEXT,
            affiliation_date TEXT,
            subscription_expiry_date TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Club Points Table (append-only ledger; the club score is SUM(points))
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS club_points (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id TEXT UNIQUE NOT NULL,
            club_membership_id TEXT NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            points INTEGER NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_members_pkf_id ON members(pkf_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_members_full_name ON members(full_name)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_members_expiry ON members(expiry_date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_club_points_club ON club_points(club_membership_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// MEMBERS
// ============================================================================

pub fn insert_member(conn: &Connection, member: &Member) -> Result<()> {
    let belts_json = serde_json::to_string(&member.belts)?;
    let details_json = serde_json::to_string(&member.details)?;

    let result = conn.execute(
        "INSERT INTO members (
            pkf_id, full_name, full_name_ar, dob, gender, role, club_name,
            phone, email, profession, expiry_date, passport_number,
            passport_expiry_date, current_belt, belts, notes, details
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            member.pkf_id,
            member.full_name,
            member.full_name_ar,
            member.dob,
            member.gender.map(|g| g.as_str()),
            member.role.as_str(),
            member.club_name,
            member.phone,
            member.email,
            member.profession,
            member.expiry_date,
            member.passport_number,
            member.passport_expiry_date,
            member.current_belt,
            belts_json,
            member.notes,
            details_json,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::DuplicateId(member.pkf_id.clone()).into())
        }
        Err(e) => Err(e).context("Failed to insert member"),
    }
}

/// Update a member row. The details JSON is replaced wholesale - the store
/// never merges old and new extension fields.
pub fn update_member(conn: &Connection, member: &Member) -> Result<()> {
    let belts_json = serde_json::to_string(&member.belts)?;
    let details_json = serde_json::to_string(&member.details)?;

    let changed = conn.execute(
        "UPDATE members SET
            full_name = ?2, full_name_ar = ?3, dob = ?4, gender = ?5,
            role = ?6, club_name = ?7, phone = ?8, email = ?9,
            profession = ?10, expiry_date = ?11, passport_number = ?12,
            passport_expiry_date = ?13, current_belt = ?14, belts = ?15,
            notes = ?16, details = ?17
        WHERE pkf_id = ?1",
        params![
            member.pkf_id,
            member.full_name,
            member.full_name_ar,
            member.dob,
            member.gender.map(|g| g.as_str()),
            member.role.as_str(),
            member.club_name,
            member.phone,
            member.email,
            member.profession,
            member.expiry_date,
            member.passport_number,
            member.passport_expiry_date,
            member.current_belt,
            belts_json,
            member.notes,
            details_json,
        ],
    )?;

    if changed == 0 {
        return Err(StoreError::MemberNotFound(member.pkf_id.clone()).into());
    }
    Ok(())
}

const MEMBER_COLUMNS: &str = "pkf_id, full_name, full_name_ar, dob, gender, role, club_name,
    phone, email, profession, expiry_date, passport_number,
    passport_expiry_date, current_belt, belts, notes, details";

fn row_to_member(row: &rusqlite::Row<'_>) -> rusqlite::Result<Member> {
    let gender_str: Option<String> = row.get(4)?;
    let role_str: String = row.get(5)?;
    let belts_json: String = row.get(14)?;
    let details_json: String = row.get(16)?;

    Ok(Member {
        pkf_id: row.get(0)?,
        full_name: row.get(1)?,
        full_name_ar: row.get(2)?,
        dob: row.get(3)?,
        // Lenient on read: unknown stored values become None, matching the
        // ingestion boundary
        gender: gender_str.as_deref().and_then(Gender::parse),
        role: Role::parse(&role_str).ok_or(rusqlite::Error::InvalidQuery)?,
        club_name: row.get(6)?,
        phone: row.get(7)?,
        email: row.get(8)?,
        profession: row.get(9)?,
        expiry_date: row.get(10)?,
        passport_number: row.get(11)?,
        passport_expiry_date: row.get(12)?,
        current_belt: row.get(13)?,
        belts: serde_json::from_str(&belts_json).map_err(|_| rusqlite::Error::InvalidQuery)?,
        notes: row.get(15)?,
        details: serde_json::from_str(&details_json).map_err(|_| rusqlite::Error::InvalidQuery)?,
    })
}

pub fn get_member(conn: &Connection, pkf_id: &str) -> Result<Option<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM members WHERE pkf_id = ?1",
        MEMBER_COLUMNS
    ))?;

    let mut rows = stmt.query_map(params![pkf_id], row_to_member)?;
    match rows.next() {
        Some(member) => Ok(Some(member?)),
        None => Ok(None),
    }
}

pub fn get_all_members(conn: &Connection) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM members ORDER BY pkf_id",
        MEMBER_COLUMNS
    ))?;

    let members = stmt
        .query_map([], row_to_member)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(members)
}

/// Search by name or membership id substring. An empty query returns the
/// most recently added members, as the registration desk expects.
pub fn search_members(conn: &Connection, query: &str) -> Result<Vec<Member>> {
    if query.trim().is_empty() {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM members ORDER BY id DESC LIMIT 20",
            MEMBER_COLUMNS
        ))?;
        let members = stmt
            .query_map([], row_to_member)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        return Ok(members);
    }

    let pattern = format!("%{}%", query.trim().to_lowercase());
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM members
         WHERE lower(full_name) LIKE ?1 OR lower(full_name_ar) LIKE ?1 OR lower(pkf_id) LIKE ?1
         ORDER BY full_name LIMIT 50",
        MEMBER_COLUMNS
    ))?;

    let members = stmt
        .query_map(params![pattern], row_to_member)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(members)
}

/// Hard delete. Returns whether a row was removed. Attachment files and
/// other owned artifacts are the caller's cascade; the store only owns rows.
pub fn delete_member(conn: &Connection, pkf_id: &str) -> Result<bool> {
    let changed = conn.execute("DELETE FROM members WHERE pkf_id = ?1", params![pkf_id])?;
    Ok(changed > 0)
}

/// Next sequential membership id: PKF-0001, PKF-0002, ...
pub fn next_pkf_id(conn: &Connection) -> Result<String> {
    let mut stmt = conn.prepare("SELECT pkf_id FROM members")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let max = ids
        .iter()
        .filter_map(|id| id.strip_prefix("PKF-")?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(format!("PKF-{:04}", max + 1))
}

// ============================================================================
// CLUBS
// ============================================================================

pub fn insert_club(conn: &Connection, club: &Club) -> Result<()> {
    let result = conn.execute(
        "INSERT INTO clubs (
            club_membership_id, name, representative_name, representative_gender,
            classification, address, phone, email, affiliation_date,
            subscription_expiry_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            club.club_membership_id,
            club.name,
            club.representative_name,
            club.representative_gender.map(|g| g.as_str()),
            club.classification,
            club.address,
            club.phone,
            club.email,
            club.affiliation_date,
            club.subscription_expiry_date,
        ],
    );

    match result {
        Ok(_) => {
            for entry in club.ledger() {
                append_point_entry(conn, &club.club_membership_id, entry)?;
            }
            Ok(())
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::DuplicateId(club.club_membership_id.clone()).into())
        }
        Err(e) => Err(e).context("Failed to insert club"),
    }
}

/// Update club core fields. The ledger is not touched here: point entries
/// only ever arrive through `award_club_points`.
pub fn update_club(conn: &Connection, club: &Club) -> Result<()> {
    let changed = conn.execute(
        "UPDATE clubs SET
            name = ?2, representative_name = ?3, representative_gender = ?4,
            classification = ?5, address = ?6, phone = ?7, email = ?8,
            affiliation_date = ?9, subscription_expiry_date = ?10
        WHERE club_membership_id = ?1",
        params![
            club.club_membership_id,
            club.name,
            club.representative_name,
            club.representative_gender.map(|g| g.as_str()),
            club.classification,
            club.address,
            club.phone,
            club.email,
            club.affiliation_date,
            club.subscription_expiry_date,
        ],
    )?;

    if changed == 0 {
        return Err(StoreError::ClubNotFound(club.club_membership_id.clone()).into());
    }
    Ok(())
}

const CLUB_COLUMNS: &str = "club_membership_id, name, representative_name, representative_gender,
    classification, address, phone, email, affiliation_date, subscription_expiry_date";

fn row_to_club(row: &rusqlite::Row<'_>) -> rusqlite::Result<Club> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let gender_str: Option<String> = row.get(3)?;

    let mut club = Club::new(&id, &name);
    club.representative_name = row.get(2)?;
    club.representative_gender = gender_str.as_deref().and_then(Gender::parse);
    club.classification = row.get(4)?;
    club.address = row.get(5)?;
    club.phone = row.get(6)?;
    club.email = row.get(7)?;
    club.affiliation_date = row.get(8)?;
    club.subscription_expiry_date = row.get(9)?;
    Ok(club)
}

pub fn get_club(conn: &Connection, club_membership_id: &str) -> Result<Option<Club>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM clubs WHERE club_membership_id = ?1",
        CLUB_COLUMNS
    ))?;

    let mut rows = stmt.query_map(params![club_membership_id], row_to_club)?;
    let club = match rows.next() {
        Some(club) => club?,
        None => return Ok(None),
    };

    let ledger = get_club_ledger(conn, club_membership_id)?;
    Ok(Some(club.with_ledger(ledger)))
}

pub fn get_all_clubs(conn: &Connection) -> Result<Vec<Club>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM clubs ORDER BY club_membership_id",
        CLUB_COLUMNS
    ))?;

    let clubs = stmt
        .query_map([], row_to_club)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    clubs
        .into_iter()
        .map(|club| {
            let ledger = get_club_ledger(conn, &club.club_membership_id)?;
            Ok(club.with_ledger(ledger))
        })
        .collect()
}

/// Hard delete of a club and its owned ledger rows
pub fn delete_club(conn: &Connection, club_membership_id: &str) -> Result<bool> {
    conn.execute(
        "DELETE FROM club_points WHERE club_membership_id = ?1",
        params![club_membership_id],
    )?;
    let changed = conn.execute(
        "DELETE FROM clubs WHERE club_membership_id = ?1",
        params![club_membership_id],
    )?;
    Ok(changed > 0)
}

/// Next sequential club id: PKF-C-001, PKF-C-002, ...
pub fn next_club_membership_id(conn: &Connection) -> Result<String> {
    let mut stmt = conn.prepare("SELECT club_membership_id FROM clubs")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let max = ids
        .iter()
        .filter_map(|id| id.strip_prefix("PKF-C-")?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(format!("PKF-C-{:03}", max + 1))
}

// ============================================================================
// CLUB POINT LEDGER
// ============================================================================

/// Append a point entry for an existing club. Entries are immutable once
/// recorded; there is no update or delete for ledger rows.
pub fn award_club_points(
    conn: &Connection,
    club_membership_id: &str,
    entry: &PointEntry,
) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM clubs WHERE club_membership_id = ?1)",
        params![club_membership_id],
        |row| row.get(0),
    )?;

    if !exists {
        return Err(StoreError::ClubNotFound(club_membership_id.to_string()).into());
    }

    append_point_entry(conn, club_membership_id, entry)
}

fn append_point_entry(
    conn: &Connection,
    club_membership_id: &str,
    entry: &PointEntry,
) -> Result<()> {
    conn.execute(
        "INSERT INTO club_points (entry_id, club_membership_id, date, description, points)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.id,
            club_membership_id,
            entry.date,
            entry.description,
            entry.points
        ],
    )?;
    Ok(())
}

pub fn get_club_ledger(conn: &Connection, club_membership_id: &str) -> Result<Vec<PointEntry>> {
    let mut stmt = conn.prepare(
        "SELECT entry_id, date, description, points FROM club_points
         WHERE club_membership_id = ?1
         ORDER BY date, id",
    )?;

    let entries = stmt
        .query_map(params![club_membership_id], |row| {
            Ok(PointEntry {
                id: row.get(0)?,
                date: row.get(1)?,
                description: row.get(2)?,
                points: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(entries)
}

/// Current club score straight from the ledger
pub fn club_total_points(conn: &Connection, club_membership_id: &str) -> Result<i64> {
    let total: i64 = conn.query_row(
        "SELECT COALESCE(SUM(points), 0) FROM club_points WHERE club_membership_id = ?1",
        params![club_membership_id],
        |row| row.get(0),
    )?;
    Ok(total)
}

// ============================================================================
// EXPIRY QUERIES
// ============================================================================

pub fn get_expiring_members(conn: &Connection, today: NaiveDate, days: i64) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM members WHERE expiry_date IS NOT NULL",
        MEMBER_COLUMNS
    ))?;

    let members = stmt
        .query_map([], row_to_member)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(members
        .into_iter()
        .filter(|m| {
            m.expiry_date
                .as_deref()
                .map_or(false, |d| alerts::expires_within(d, today, days))
        })
        .collect())
}

pub fn get_expiring_passports(
    conn: &Connection,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM members WHERE passport_expiry_date IS NOT NULL",
        MEMBER_COLUMNS
    ))?;

    let members = stmt
        .query_map([], row_to_member)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(members
        .into_iter()
        .filter(|m| {
            m.passport_expiry_date
                .as_deref()
                .map_or(false, |d| alerts::expires_within(d, today, days))
        })
        .collect())
}

pub fn get_expiring_club_subscriptions(
    conn: &Connection,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<Club>> {
    Ok(get_all_clubs(conn)?
        .into_iter()
        .filter(|c| {
            c.subscription_expiry_date
                .as_deref()
                .map_or(false, |d| alerts::expires_within(d, today, days))
        })
        .collect())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::RoleDetails;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();
        conn
    }

    fn sample_player() -> Member {
        let mut m = Member::new("PKF-0001", "Ahmad Hassan", Role::Player);
        m.full_name_ar = "أحمد حسن".to_string();
        m.dob = Some("2010-03-14".to_string());
        m.gender = Some(Gender::Male);
        m.club_name = Some("Jerusalem Karate Club".to_string());
        m.expiry_date = Some("2026-12-31".to_string());
        m.current_belt = Some("Brown".to_string());
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
    fn test_member_roundtrip() {
        let conn = test_conn();
        let member = sample_player();

        insert_member(&conn, &member).unwrap();
        let loaded = get_member(&conn, "PKF-0001").unwrap().unwrap();

        assert_eq!(loaded, member);
    }

    #[test]
    fn test_duplicate_pkf_id_rejected() {
        let conn = test_conn();
        insert_member(&conn, &sample_player()).unwrap();

        let err = insert_member(&conn, &sample_player()).unwrap_err();
        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert_eq!(*store_err, StoreError::DuplicateId("PKF-0001".to_string()));
    }

    #[test]
    fn test_update_replaces_details_wholesale() {
        let conn = test_conn();
        let mut member = sample_player();
        insert_member(&conn, &member).unwrap();

        member.change_role(RoleDetails::Coach {
            national_degree: Some("A".to_string()),
            asian_degree: None,
            international_degree: None,
        });
        update_member(&conn, &member).unwrap();

        let loaded = get_member(&conn, "PKF-0001").unwrap().unwrap();
        assert_eq!(loaded.role, Role::Coach);
        // No Player residue survives the role change
        assert_eq!(loaded.weight_kg(), None);
        assert_eq!(loaded.details.role(), Role::Coach);
    }

    #[test]
    fn test_update_missing_member() {
        let conn = test_conn();
        let err = update_member(&conn, &sample_player()).unwrap_err();
        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert_eq!(
            *store_err,
            StoreError::MemberNotFound("PKF-0001".to_string())
        );
    }

    #[test]
    fn test_search_by_name_and_id() {
        let conn = test_conn();
        insert_member(&conn, &sample_player()).unwrap();
        insert_member(&conn, &Member::new("PKF-0002", "Lina Odeh", Role::Coach)).unwrap();

        assert_eq!(search_members(&conn, "ahmad").unwrap().len(), 1);
        assert_eq!(search_members(&conn, "PKF-00").unwrap().len(), 2);
        assert_eq!(search_members(&conn, "nobody").unwrap().len(), 0);
        // Empty query: recent members
        assert_eq!(search_members(&conn, "").unwrap().len(), 2);
    }

    #[test]
    fn test_delete_member() {
        let conn = test_conn();
        insert_member(&conn, &sample_player()).unwrap();

        assert!(delete_member(&conn, "PKF-0001").unwrap());
        assert!(!delete_member(&conn, "PKF-0001").unwrap());
        assert!(get_member(&conn, "PKF-0001").unwrap().is_none());
    }

    #[test]
    fn test_next_pkf_id_sequence() {
        let conn = test_conn();
        assert_eq!(next_pkf_id(&conn).unwrap(), "PKF-0001");

        insert_member(&conn, &sample_player()).unwrap();
        insert_member(&conn, &Member::new("PKF-0007", "Lina Odeh", Role::Coach)).unwrap();

        assert_eq!(next_pkf_id(&conn).unwrap(), "PKF-0008");
    }

    #[test]
    fn test_club_roundtrip_with_ledger() {
        let conn = test_conn();
        let mut club = Club::new("PKF-C-001", "Gaza Karate Academy");
        club.subscription_expiry_date = Some("2026-09-30".to_string());
        club.award_points(PointEntry::new("2026-02-10", "Regional cup", 30));
        insert_club(&conn, &club).unwrap();

        award_club_points(
            &conn,
            "PKF-C-001",
            &PointEntry::new("2026-04-22", "Nationals", 55),
        )
        .unwrap();

        let loaded = get_club(&conn, "PKF-C-001").unwrap().unwrap();
        assert_eq!(loaded.ledger().len(), 2);
        assert_eq!(loaded.total_points(), 85);
        assert_eq!(club_total_points(&conn, "PKF-C-001").unwrap(), 85);
    }

    #[test]
    fn test_points_for_unknown_club_rejected() {
        let conn = test_conn();
        let err = award_club_points(
            &conn,
            "PKF-C-999",
            &PointEntry::new("2026-04-22", "Nationals", 55),
        )
        .unwrap_err();

        let store_err = err.downcast_ref::<StoreError>().unwrap();
        assert_eq!(*store_err, StoreError::ClubNotFound("PKF-C-999".to_string()));
    }

    #[test]
    fn test_delete_club_cascades_ledger() {
        let conn = test_conn();
        let mut club = Club::new("PKF-C-001", "Gaza Karate Academy");
        club.award_points(PointEntry::new("2026-02-10", "Regional cup", 30));
        insert_club(&conn, &club).unwrap();

        assert!(delete_club(&conn, "PKF-C-001").unwrap());

        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM club_points", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_next_club_membership_id() {
        let conn = test_conn();
        assert_eq!(next_club_membership_id(&conn).unwrap(), "PKF-C-001");

        insert_club(&conn, &Club::new("PKF-C-003", "Nablus Dojo")).unwrap();
        assert_eq!(next_club_membership_id(&conn).unwrap(), "PKF-C-004");
    }

    #[test]
    fn test_expiring_queries() {
        let conn = test_conn();
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

        let mut member = sample_player();
        member.expiry_date = Some("2026-08-15".to_string());
        member.passport_expiry_date = Some("2027-01-01".to_string());
        insert_member(&conn, &member).unwrap();

        let mut club = Club::new("PKF-C-001", "Gaza Karate Academy");
        club.subscription_expiry_date = Some("2026-08-20".to_string());
        insert_club(&conn, &club).unwrap();

        assert_eq!(get_expiring_members(&conn, today, 30).unwrap().len(), 1);
        assert_eq!(get_expiring_passports(&conn, today, 30).unwrap().len(), 0);
        assert_eq!(
            get_expiring_club_subscriptions(&conn, today, 30)
                .unwrap()
                .len(),
            1
        );
    }
}
