// 🔍 Duplicate Registration Detection
// Two strategies: exact identity (name + birth date) and similar name

use crate::member::Member;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// MATCH STRATEGY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// Same normalized name and same birth date
    ExactIdentity,

    /// Similar normalized name; birth date or club raise confidence
    SimilarName,
}

// ============================================================================
// DUPLICATE MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Index of first member in the scanned slice
    pub a: usize,

    /// Index of second member
    pub b: usize,

    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,

    pub strategy: MatchStrategy,

    /// Human-readable reason shown to the operator
    pub reason: String,
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Lowercase, strip punctuation, collapse whitespace. "Ahmad  Hassan." and
/// "ahmad hassan" normalize to the same string.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Idempotency hash over normalized name + birth date. Two registrations of
/// the same person collide here even when spacing or casing differ. None
/// when the member has no birth date on record.
pub fn identity_hash(member: &Member) -> Option<String> {
    let dob = member.dob.as_deref()?;

    let mut hasher = Sha256::new();
    hasher.update(normalize_name(&member.full_name));
    hasher.update("|");
    hasher.update(dob.trim());
    Some(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// DEDUPLICATION ENGINE
// ============================================================================

pub struct DeduplicationEngine {
    /// Token-overlap threshold for similar-name matches (default: 0.8)
    pub name_similarity_threshold: f64,

    /// Confidence bump when both records name the same club (default: 0.05)
    pub same_club_boost: f64,
}

impl DeduplicationEngine {
    pub fn new() -> Self {
        DeduplicationEngine {
            name_similarity_threshold: 0.8,
            same_club_boost: 0.05,
        }
    }

    /// Scan a member list for likely duplicate registrations. Members with
    /// the same pkf_id are the same record, not duplicates, and are skipped.
    pub fn find_duplicates(&self, members: &[Member]) -> Vec<DuplicateMatch> {
        let mut matches = Vec::new();

        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                let (a, b) = (&members[i], &members[j]);

                if a.pkf_id == b.pkf_id {
                    continue;
                }

                if let Some(m) = self.check_exact_identity(i, j, a, b) {
                    matches.push(m);
                    continue;
                }

                if let Some(m) = self.check_similar_name(i, j, a, b) {
                    matches.push(m);
                }
            }
        }

        matches
    }

    /// Strategy 1: identical identity hash (normalized name + birth date)
    fn check_exact_identity(
        &self,
        i: usize,
        j: usize,
        a: &Member,
        b: &Member,
    ) -> Option<DuplicateMatch> {
        let (ha, hb) = (identity_hash(a)?, identity_hash(b)?);
        if ha != hb {
            return None;
        }

        Some(DuplicateMatch {
            a: i,
            b: j,
            confidence: 0.97,
            strategy: MatchStrategy::ExactIdentity,
            reason: format!(
                "'{}' and '{}' share the same name and birth date",
                a.full_name, b.full_name
            ),
        })
    }

    /// Strategy 2: name token overlap above the threshold
    fn check_similar_name(
        &self,
        i: usize,
        j: usize,
        a: &Member,
        b: &Member,
    ) -> Option<DuplicateMatch> {
        let similarity = name_similarity(&a.full_name, &b.full_name);
        if similarity < self.name_similarity_threshold {
            return None;
        }

        let mut confidence = similarity * 0.85;
        let mut hints = Vec::new();

        if let (Some(da), Some(db)) = (&a.dob, &b.dob) {
            if da == db {
                confidence += 0.1;
                hints.push("same birth date");
            }
        }

        if let (Some(ca), Some(cb)) = (&a.club_name, &b.club_name) {
            if ca == cb {
                confidence += self.same_club_boost;
                hints.push("same club");
            }
        }

        let mut reason = format!(
            "'{}' and '{}' have {:.0}% name overlap",
            a.full_name,
            b.full_name,
            similarity * 100.0
        );
        if !hints.is_empty() {
            reason.push_str(&format!(" ({})", hints.join(", ")));
        }

        Some(DuplicateMatch {
            a: i,
            b: j,
            confidence: confidence.min(1.0),
            strategy: MatchStrategy::SimilarName,
            reason,
        })
    }
}

impl Default for DeduplicationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Jaccard overlap of normalized name tokens
fn name_similarity(a: &str, b: &str) -> f64 {
    let na = normalize_name(a);
    let nb = normalize_name(b);

    let ta: std::collections::HashSet<&str> = na.split(' ').filter(|t| !t.is_empty()).collect();
    let tb: std::collections::HashSet<&str> = nb.split(' ').filter(|t| !t.is_empty()).collect();

    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let intersection = ta.intersection(&tb).count() as f64;
    let union = ta.union(&tb).count() as f64;
    intersection / union
}

// ============================================================================
// TESTS
// ============================================================================
