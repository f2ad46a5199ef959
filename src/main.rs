use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use std::env;
use std::path::Path;

// Use library instead of local modules
use pkf_registry::{
    export_members_to_path, get_all_members, get_expiring_club_subscriptions,
    get_expiring_members, get_expiring_passports, get_member, import_members_from_path,
    insert_member, next_pkf_id, setup_database, CategoryTable, DeduplicationEngine,
    EligibilityResolver,
};

const DB_PATH: &str = "pkf-registry.db";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("init") => run_init(),
        Some("import") if args.len() > 2 => run_import(&args[2]),
        Some("export") if args.len() > 2 => run_export(&args[2]),
        Some("resolve") if args.len() > 2 => run_resolve(&args[2]),
        Some("alerts") => run_alerts(args.get(2).and_then(|d| d.parse().ok()).unwrap_or(30)),
        Some("duplicates") => run_duplicates(),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("PKF Registry v{}", pkf_registry::VERSION);
    println!();
    println!("Usage:");
    println!("  pkf-registry init              Create the database and check the category table");
    println!("  pkf-registry import <csv>      Import a member roster");
    println!("  pkf-registry export <csv>      Export the roster with current eligibility");
    println!("  pkf-registry resolve <pkf_id>  Show a member's competition categories");
    println!("  pkf-registry alerts [days]     List expiring memberships/passports/subscriptions");
    println!("  pkf-registry duplicates        Scan for likely duplicate registrations");
}

fn open_db() -> Result<Connection> {
    if !Path::new(DB_PATH).exists() {
        eprintln!("❌ Database not found!");
        eprintln!("   Run: pkf-registry init");
        std::process::exit(1);
    }
    Ok(Connection::open(DB_PATH)?)
}

fn run_init() -> Result<()> {
    println!("🔧 Setting up database...");
    let conn = Connection::open(DB_PATH)?;
    setup_database(&conn)?;
    println!("✓ Database initialized with WAL mode at {}", DB_PATH);

    // The table ships in code; a broken edit should fail loudly at startup
    println!("\n🏷️  Checking competition category table...");
    let table = CategoryTable::standard();
    match table.validate() {
        Ok(()) => println!("✓ {} age brackets, all weight classes contiguous", table.brackets().len()),
        Err(issues) => {
            for issue in &issues {
                eprintln!("  ✗ {}", issue);
            }
            anyhow::bail!("category table failed validation");
        }
    }

    Ok(())
}

fn run_import(csv_path: &str) -> Result<()> {
    let conn = open_db()?;

    println!("📂 Reading roster from {}...", csv_path);
    let import = import_members_from_path(csv_path)?;
    println!("✓ Parsed {} members", import.members.len());

    for error in &import.errors {
        eprintln!("  ✗ line {}: {}", error.line, error.message);
    }

    let mut inserted = 0;
    let mut skipped = 0;
    for mut member in import.members {
        if member.pkf_id.trim().is_empty() {
            member.pkf_id = next_pkf_id(&conn)?;
        }
        match insert_member(&conn, &member) {
            Ok(()) => inserted += 1,
            Err(e) => {
                eprintln!("  ✗ {}: {}", member.pkf_id, e);
                skipped += 1;
            }
        }
    }

    println!("✓ Inserted: {} members", inserted);
    if skipped > 0 {
        println!("✓ Skipped: {} members", skipped);
    }

    Ok(())
}

fn run_export(csv_path: &str) -> Result<()> {
    let conn = open_db()?;

    println!("📊 Loading members...");
    let members = get_all_members(&conn)?;

    let resolver = EligibilityResolver::standard();
    let today = Local::now().date_naive();
    let written = export_members_to_path(csv_path, &members, &resolver, today)?;

    println!("✓ Exported {} members to {}", written, csv_path);
    Ok(())
}

fn run_resolve(pkf_id: &str) -> Result<()> {
    let conn = open_db()?;

    let member = match get_member(&conn, pkf_id)? {
        Some(member) => member,
        None => {
            eprintln!("❌ No member with id '{}'", pkf_id);
            std::process::exit(1);
        }
    };

    println!("{} - {} ({})", member.pkf_id, member.full_name, member.role);

    let resolver = EligibilityResolver::standard();
    let today = Local::now().date_naive();
    let eligibility = resolver.resolve_member(&member, today)?;

    if eligibility.is_empty() {
        println!("No eligible categories.");
        return Ok(());
    }

    if !eligibility.kumite.is_empty() {
        println!("Kumite: {}", eligibility.kumite_joined());
    }
    if !eligibility.kata.is_empty() {
        println!("Kata:   {}", eligibility.kata_joined());
    }

    Ok(())
}

fn run_alerts(days: i64) -> Result<()> {
    let conn = open_db()?;
    let today = Local::now().date_naive();

    println!("⏰ Expiring within {} days", days);

    let memberships = get_expiring_members(&conn, today, days)?;
    println!("\nMemberships ({}):", memberships.len());
    for m in &memberships {
        println!(
            "  {} {} - expires {}",
            m.pkf_id,
            m.full_name,
            m.expiry_date.as_deref().unwrap_or("?")
        );
    }

    let passports = get_expiring_passports(&conn, today, days)?;
    println!("\nPassports ({}):", passports.len());
    for m in &passports {
        println!(
            "  {} {} - expires {}",
            m.pkf_id,
            m.full_name,
            m.passport_expiry_date.as_deref().unwrap_or("?")
        );
    }

    let subscriptions = get_expiring_club_subscriptions(&conn, today, days)?;
    println!("\nClub subscriptions ({}):", subscriptions.len());
    for c in &subscriptions {
        println!(
            "  {} {} - expires {}",
            c.club_membership_id,
            c.name,
            c.subscription_expiry_date.as_deref().unwrap_or("?")
        );
    }

    Ok(())
}

fn run_duplicates() -> Result<()> {
    let conn = open_db()?;

    println!("🔍 Scanning for duplicate registrations...");
    let members = get_all_members(&conn)?;
    let matches = DeduplicationEngine::new().find_duplicates(&members);

    if matches.is_empty() {
        println!("✓ No likely duplicates found among {} members", members.len());
        return Ok(());
    }

    for m in &matches {
        println!(
            "  {:.0}% {} / {}: {}",
            m.confidence * 100.0,
            members[m.a].pkf_id,
            members[m.b].pkf_id,
            m.reason
        );
    }
    println!("✓ {} potential duplicates", matches.len());

    Ok(())
}
