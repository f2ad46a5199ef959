// PKF Registry - Core Library
// Membership records, competition eligibility, and the supporting store for
// the federation's registration tooling

pub mod alerts;
pub mod categories;
pub mod club;
pub mod db;
pub mod dedup;
pub mod documents;
pub mod eligibility;
pub mod labels;
pub mod member;
pub mod roster;

// Re-export commonly used types
pub use categories::{AgeBracket, CategoryTable, KumiteCategory};
pub use club::{Club, PointEntry};
pub use db::{
    award_club_points, club_total_points, delete_club, delete_member, get_all_clubs,
    get_all_members, get_club, get_club_ledger, get_expiring_club_subscriptions,
    get_expiring_members, get_expiring_passports, get_member, insert_club, insert_member,
    next_club_membership_id, next_pkf_id, search_members, setup_database, update_club,
    update_member, StoreError,
};
pub use dedup::{DeduplicationEngine, DuplicateMatch, MatchStrategy};
pub use documents::{card_context, club_profile_rows, member_profile_rows, ProfileRow};
pub use eligibility::{age_on, Eligibility, EligibilityError, EligibilityResolver};
pub use labels::Lang;
pub use member::{BeltRecord, FieldError, Gender, Member, Role, RoleDetails};
pub use roster::{
    export_members, export_members_to_path, import_members, import_members_from_path, reclassify,
    Reclassification, RosterImport, RowError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
