// Expiry alerts - membership, passport, and club subscription windows

use crate::club::Club;
use crate::member::{parse_date, Member};
use chrono::NaiveDate;

/// Whether a YYYY-MM-DD expiry date falls inside `[today, today + days]`.
/// Already-expired items and unparseable dates are not "expiring" - the
/// first belong on a different report, the second on a validation one.
pub fn expires_within(expiry: &str, today: NaiveDate, days: i64) -> bool {
    match parse_date(expiry) {
        Some(date) => date >= today && date <= today + chrono::Duration::days(days),
        None => false,
    }
}

/// Members whose membership expires inside the window
pub fn expiring_memberships<'a>(
    members: &'a [Member],
    today: NaiveDate,
    days: i64,
) -> Vec<&'a Member> {
    members
        .iter()
        .filter(|m| {
            m.expiry_date
                .as_deref()
                .map_or(false, |d| expires_within(d, today, days))
        })
        .collect()
}

/// Members whose passport expires inside the window
pub fn expiring_passports<'a>(
    members: &'a [Member],
    today: NaiveDate,
    days: i64,
) -> Vec<&'a Member> {
    members
        .iter()
        .filter(|m| {
            m.passport_expiry_date
                .as_deref()
                .map_or(false, |d| expires_within(d, today, days))
        })
        .collect()
}

/// Clubs whose subscription expires inside the window
pub fn expiring_subscriptions<'a>(
    clubs: &'a [Club],
    today: NaiveDate,
    days: i64,
) -> Vec<&'a Club> {
    clubs
        .iter()
        .filter(|c| {
            c.subscription_expiry_date
                .as_deref()
                .map_or(false, |d| expires_within(d, today, days))
        })
        .collect()
}
