// 🏷️ Competition Category Table - Rules as Data
// Age-bracket x gender tables for Kumite weight classes and Kata events

use crate::member::Gender;
use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// KUMITE CATEGORY
// ============================================================================

/// A weight class for point-sparring. Bounds are in kg on the federation's
/// 0.01 grid: `min_weight` is the first eligible weight (e.g. 52.01 for the
/// class directly above -52kg), `max_weight` the last, inclusive. The
/// lightest class in a group carries no lower bound and the heaviest no
/// upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KumiteCategory {
    pub label: String,

    #[serde(default)]
    pub min_weight: Option<f64>,

    #[serde(default)]
    pub max_weight: Option<f64>,
}

impl KumiteCategory {
    pub fn new(label: &str, min_weight: Option<f64>, max_weight: Option<f64>) -> Self {
        KumiteCategory {
            label: label.to_string(),
            min_weight,
            max_weight,
        }
    }

    /// Whether a weigh-in result falls in this class
    pub fn admits(&self, weight_kg: f64) -> bool {
        if let Some(min) = self.min_weight {
            if weight_kg < min {
                return false;
            }
        }
        if let Some(max) = self.max_weight {
            if weight_kg > max {
                return false;
            }
        }
        true
    }
}

// ============================================================================
// AGE BRACKET
// ============================================================================

/// One age bracket with its category tables per gender.
///
/// Brackets overlap on purpose: U21 covers 18-20 while Seniors is open-ended
/// from 18, so an 18-year-old competes in both. The resolver evaluates every
/// bracket independently rather than picking "the" bracket for an age.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBracket {
    /// Display name: "6-7", "Cadets", "Seniors", ...
    pub label: String,

    pub min_age: u32,

    /// None = no upper age limit
    #[serde(default)]
    pub max_age: Option<u32>,

    #[serde(default)]
    pub kumite_male: Vec<KumiteCategory>,

    #[serde(default)]
    pub kumite_female: Vec<KumiteCategory>,

    #[serde(default)]
    pub kata_male: Vec<String>,

    #[serde(default)]
    pub kata_female: Vec<String>,
}

impl AgeBracket {
    pub fn contains_age(&self, age: u32) -> bool {
        age >= self.min_age && self.max_age.map_or(true, |max| age <= max)
    }

    /// Kumite classes for a gender. Empty when the federation defines none
    /// for this (bracket, gender) pair; that is not an error.
    pub fn kumite_for(&self, gender: Gender) -> &[KumiteCategory] {
        match gender {
            Gender::Male => &self.kumite_male,
            Gender::Female => &self.kumite_female,
        }
    }

    pub fn kata_for(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Male => &self.kata_male,
            Gender::Female => &self.kata_female,
        }
    }
}

// ============================================================================
// CATEGORY TABLE
// ============================================================================

/// The authoritative bracket list. Built once (in code or from a JSON file)
/// and immutable afterwards; share it behind an `Arc` and swap the pointer
/// if a future rulebook revision ever needs a hot reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    brackets: Vec<AgeBracket>,
}

impl CategoryTable {
    pub fn from_brackets(brackets: Vec<AgeBracket>) -> Self {
        CategoryTable { brackets }
    }

    /// Load a bracket list from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read category file: {:?}", path.as_ref()))?;

        let brackets: Vec<AgeBracket> =
            serde_json::from_str(&content).context("Failed to parse category JSON")?;

        Ok(CategoryTable::from_brackets(brackets))
    }

    pub fn brackets(&self) -> &[AgeBracket] {
        &self.brackets
    }

    /// Every bracket whose range contains the age. Zero, one, or several.
    pub fn matching_brackets(&self, age: u32) -> Vec<&AgeBracket> {
        self.brackets
            .iter()
            .filter(|b| b.contains_age(age))
            .collect()
    }

    /// Check the table invariants, collecting every violation:
    /// - min_age <= max_age
    /// - within each (bracket, gender) group the weight classes partition
    ///   the axis: first open below, last open above, and each interior
    ///   bound exactly 0.01 kg above the previous upper bound
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        for bracket in &self.brackets {
            if let Some(max_age) = bracket.max_age {
                if bracket.min_age > max_age {
                    issues.push(format!(
                        "bracket '{}': min_age {} exceeds max_age {}",
                        bracket.label, bracket.min_age, max_age
                    ));
                }
            }

            for gender in [Gender::Male, Gender::Female] {
                Self::check_partition(bracket, gender, &mut issues);
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    fn check_partition(bracket: &AgeBracket, gender: Gender, issues: &mut Vec<String>) {
        let classes = bracket.kumite_for(gender);
        if classes.is_empty() {
            return;
        }

        let group = format!("{} {}", bracket.label, gender);

        if classes[0].min_weight.is_some() {
            issues.push(format!("{}: first class must have no lower bound", group));
        }
        if classes[classes.len() - 1].max_weight.is_some() {
            issues.push(format!("{}: last class must have no upper bound", group));
        }

        for pair in classes.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            match (prev.max_weight, next.min_weight) {
                (Some(max), Some(min)) => {
                    // Compare on the 0.01 grid to dodge float noise
                    if cents(min) != cents(max) + 1 {
                        issues.push(format!(
                            "{}: gap or overlap between '{}' (max {}) and '{}' (min {})",
                            group, prev.label, max, next.label, min
                        ));
                    }
                }
                _ => issues.push(format!(
                    "{}: interior bound missing between '{}' and '{}'",
                    group, prev.label, next.label
                )),
            }
        }
    }

    /// The standard federation table: Kumite weight classes and Kata events
    /// for both genders across all eight brackets of the current rulebook.
    pub fn standard() -> Self {
        let brackets = vec![
            AgeBracket {
                label: "6-7".to_string(),
                min_age: 6,
                max_age: Some(7),
                kumite_male: vec![
                    KumiteCategory::new("-22kg", None, Some(22.0)),
                    KumiteCategory::new("-28kg", Some(22.01), Some(28.0)),
                    KumiteCategory::new("-32kg", Some(28.01), Some(32.0)),
                    KumiteCategory::new("-34kg", Some(32.01), Some(34.0)),
                    KumiteCategory::new("+34kg", Some(34.01), None),
                ],
                kumite_female: vec![
                    KumiteCategory::new("-20kg", None, Some(20.0)),
                    KumiteCategory::new("-24kg", Some(20.01), Some(24.0)),
                    KumiteCategory::new("-28kg", Some(24.01), Some(28.0)),
                    KumiteCategory::new("-32kg", Some(28.01), Some(32.0)),
                    KumiteCategory::new("+32kg", Some(32.01), None),
                ],
                kata_male: vec!["Kata Individual (6-7 years)".to_string()],
                kata_female: vec!["Kata Individual (6-7 years)".to_string()],
            },
            AgeBracket {
                label: "8-9".to_string(),
                min_age: 8,
                max_age: Some(9),
                kumite_male: vec![
                    KumiteCategory::new("-28kg", None, Some(28.0)),
                    KumiteCategory::new("-32kg", Some(28.01), Some(32.0)),
                    KumiteCategory::new("-36kg", Some(32.01), Some(36.0)),
                    KumiteCategory::new("-40kg", Some(36.01), Some(40.0)),
                    KumiteCategory::new("-44kg", Some(40.01), Some(44.0)),
                    KumiteCategory::new("+44kg", Some(44.01), None),
                ],
                kumite_female: vec![
                    KumiteCategory::new("-26kg", None, Some(26.0)),
                    KumiteCategory::new("-30kg", Some(26.01), Some(30.0)),
                    KumiteCategory::new("-34kg", Some(30.01), Some(34.0)),
                    KumiteCategory::new("-38kg", Some(34.01), Some(38.0)),
                    KumiteCategory::new("-42kg", Some(38.01), Some(42.0)),
                    KumiteCategory::new("+42kg", Some(42.01), None),
                ],
                kata_male: vec!["Kata Individual (8-9 years)".to_string()],
                kata_female: vec!["Kata Individual (8-9 years)".to_string()],
            },
            AgeBracket {
                label: "10-11".to_string(),
                min_age: 10,
                max_age: Some(11),
                kumite_male: vec![
                    KumiteCategory::new("-37kg", None, Some(37.0)),
                    KumiteCategory::new("-42kg", Some(37.01), Some(42.0)),
                    KumiteCategory::new("-47kg", Some(42.01), Some(47.0)),
                    KumiteCategory::new("-52kg", Some(47.01), Some(52.0)),
                    KumiteCategory::new("+52kg", Some(52.01), None),
                ],
                kumite_female: vec![
                    KumiteCategory::new("-35kg", None, Some(35.0)),
                    KumiteCategory::new("-40kg", Some(35.01), Some(40.0)),
                    KumiteCategory::new("-45kg", Some(40.01), Some(45.0)),
                    KumiteCategory::new("-50kg", Some(45.01), Some(50.0)),
                    KumiteCategory::new("+50kg", Some(50.01), None),
                ],
                kata_male: vec!["Kata Individual (10-11 years)".to_string()],
                kata_female: vec!["Kata Individual (10-11 years)".to_string()],
            },
            AgeBracket {
                label: "12-13".to_string(),
                min_age: 12,
                max_age: Some(13),
                kumite_male: vec![
                    KumiteCategory::new("-40kg", None, Some(40.0)),
                    KumiteCategory::new("-45kg", Some(40.01), Some(45.0)),
                    KumiteCategory::new("-50kg", Some(45.01), Some(50.0)),
                    KumiteCategory::new("-55kg", Some(50.01), Some(55.0)),
                    KumiteCategory::new("+55kg", Some(55.01), None),
                ],
                kumite_female: vec![
                    KumiteCategory::new("-39kg", None, Some(39.0)),
                    KumiteCategory::new("-44kg", Some(39.01), Some(44.0)),
                    KumiteCategory::new("-49kg", Some(44.01), Some(49.0)),
                    KumiteCategory::new("-54kg", Some(49.01), Some(54.0)),
                    KumiteCategory::new("+54kg", Some(54.01), None),
                ],
                kata_male: vec!["Kata Individual (12-13 years)".to_string()],
                kata_female: vec!["Kata Individual (12-13 years)".to_string()],
            },
            AgeBracket {
                label: "Cadets".to_string(),
                min_age: 14,
                max_age: Some(15),
                kumite_male: vec![
                    KumiteCategory::new("-52kg", None, Some(52.0)),
                    KumiteCategory::new("-57kg", Some(52.01), Some(57.0)),
                    KumiteCategory::new("-63kg", Some(57.01), Some(63.0)),
                    KumiteCategory::new("-70kg", Some(63.01), Some(70.0)),
                    KumiteCategory::new("+70kg", Some(70.01), None),
                ],
                kumite_female: vec![
                    KumiteCategory::new("-47kg", None, Some(47.0)),
                    KumiteCategory::new("-54kg", Some(47.01), Some(54.0)),
                    KumiteCategory::new("+54kg", Some(54.01), None),
                ],
                kata_male: vec!["Kata Individual (Cadets)".to_string()],
                kata_female: vec!["Kata Individual (Cadets)".to_string()],
            },
            AgeBracket {
                label: "Juniors".to_string(),
                min_age: 16,
                max_age: Some(17),
                kumite_male: vec![
                    KumiteCategory::new("-55kg", None, Some(55.0)),
                    KumiteCategory::new("-61kg", Some(55.01), Some(61.0)),
                    KumiteCategory::new("-68kg", Some(61.01), Some(68.0)),
                    KumiteCategory::new("-76kg", Some(68.01), Some(76.0)),
                    KumiteCategory::new("+76kg", Some(76.01), None),
                ],
                kumite_female: vec![
                    KumiteCategory::new("-48kg", None, Some(48.0)),
                    KumiteCategory::new("-53kg", Some(48.01), Some(53.0)),
                    KumiteCategory::new("-59kg", Some(53.01), Some(59.0)),
                    KumiteCategory::new("-66kg", Some(59.01), Some(66.0)),
                    KumiteCategory::new("+66kg", Some(66.01), None),
                ],
                kata_male: vec!["Kata Individual (Juniors)".to_string()],
                kata_female: vec!["Kata Individual (Juniors)".to_string()],
            },
            AgeBracket {
                label: "U21".to_string(),
                min_age: 18,
                max_age: Some(20),
                kumite_male: vec![
                    KumiteCategory::new("-60kg", None, Some(60.0)),
                    KumiteCategory::new("-67kg", Some(60.01), Some(67.0)),
                    KumiteCategory::new("-75kg", Some(67.01), Some(75.0)),
                    KumiteCategory::new("-84kg", Some(75.01), Some(84.0)),
                    KumiteCategory::new("+84kg", Some(84.01), None),
                ],
                kumite_female: vec![
                    KumiteCategory::new("-50kg", None, Some(50.0)),
                    KumiteCategory::new("-55kg", Some(50.01), Some(55.0)),
                    KumiteCategory::new("-61kg", Some(55.01), Some(61.0)),
                    KumiteCategory::new("-68kg", Some(61.01), Some(68.0)),
                    KumiteCategory::new("+68kg", Some(68.01), None),
                ],
                kata_male: vec!["Kata Individual (U21)".to_string()],
                kata_female: vec!["Kata Individual (U21)".to_string()],
            },
            // Seniors overlaps U21: competitors may enter from 18
            AgeBracket {
                label: "Seniors".to_string(),
                min_age: 18,
                max_age: None,
                kumite_male: vec![
                    KumiteCategory::new("-60kg", None, Some(60.0)),
                    KumiteCategory::new("-67kg", Some(60.01), Some(67.0)),
                    KumiteCategory::new("-75kg", Some(67.01), Some(75.0)),
                    KumiteCategory::new("-84kg", Some(75.01), Some(84.0)),
                    KumiteCategory::new("+84kg", Some(84.01), None),
                ],
                kumite_female: vec![
                    KumiteCategory::new("-50kg", None, Some(50.0)),
                    KumiteCategory::new("-55kg", Some(50.01), Some(55.0)),
                    KumiteCategory::new("-61kg", Some(55.01), Some(61.0)),
                    KumiteCategory::new("-68kg", Some(61.01), Some(68.0)),
                    KumiteCategory::new("+68kg", Some(68.01), None),
                ],
                kata_male: vec!["Kata Individual (Seniors)".to_string()],
                kata_female: vec!["Kata Individual (Seniors)".to_string()],
            },
        ];

        CategoryTable { brackets }
    }
}

fn cents(weight: f64) -> i64 {
    (weight * 100.0).round() as i64
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        let table = CategoryTable::standard();
        if let Err(issues) = table.validate() {
            panic!("standard table has issues: {:?}", issues);
        }
    }

    #[test]
    fn test_admits_boundaries() {
        // Cadets male -57kg covers (52, 57]
        let class = KumiteCategory::new("-57kg", Some(52.01), Some(57.0));

        assert!(class.admits(57.0)); // upper bound inclusive
        assert!(!class.admits(57.01)); // next class starts here
        assert!(class.admits(52.01)); // first eligible weight
        assert!(!class.admits(52.0)); // belongs to -52kg
    }

    #[test]
    fn test_open_ended_classes() {
        let lightest = KumiteCategory::new("-22kg", None, Some(22.0));
        let heaviest = KumiteCategory::new("+84kg", Some(84.01), None);

        assert!(lightest.admits(3.2));
        assert!(!lightest.admits(22.01));
        assert!(heaviest.admits(140.0));
        assert!(!heaviest.admits(84.0));
    }

    #[test]
    fn test_bracket_age_containment() {
        let table = CategoryTable::standard();
        let cadets = table
            .brackets()
            .iter()
            .find(|b| b.label == "Cadets")
            .unwrap();

        assert!(cadets.contains_age(14));
        assert!(cadets.contains_age(15));
        assert!(!cadets.contains_age(13));
        assert!(!cadets.contains_age(16));
    }

    #[test]
    fn test_seniors_has_no_upper_age_limit() {
        let table = CategoryTable::standard();
        let seniors = table
            .brackets()
            .iter()
            .find(|b| b.label == "Seniors")
            .unwrap();

        assert!(seniors.contains_age(18));
        assert!(seniors.contains_age(73));
    }

    #[test]
    fn test_overlapping_brackets_at_18() {
        let table = CategoryTable::standard();
        let labels: Vec<&str> = table
            .matching_brackets(18)
            .iter()
            .map(|b| b.label.as_str())
            .collect();

        assert_eq!(labels, vec!["U21", "Seniors"]);
    }

    #[test]
    fn test_no_bracket_for_out_of_range_age() {
        let table = CategoryTable::standard();
        assert!(table.matching_brackets(5).is_empty());
    }

    #[test]
    fn test_missing_gender_group_is_empty_not_error() {
        let bracket = AgeBracket {
            label: "Veterans".to_string(),
            min_age: 40,
            max_age: None,
            kumite_male: vec![
                KumiteCategory::new("-75kg", None, Some(75.0)),
                KumiteCategory::new("+75kg", Some(75.01), None),
            ],
            kumite_female: Vec::new(),
            kata_male: Vec::new(),
            kata_female: Vec::new(),
        };

        assert!(bracket.kumite_for(Gender::Female).is_empty());
        // And the validator does not treat the empty group as broken
        let table = CategoryTable::from_brackets(vec![bracket]);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_catches_gap() {
        let broken = AgeBracket {
            label: "Broken".to_string(),
            min_age: 10,
            max_age: Some(11),
            kumite_male: vec![
                KumiteCategory::new("-30kg", None, Some(30.0)),
                // 30.01..=34.99 unreachable
                KumiteCategory::new("+35kg", Some(35.0), None),
            ],
            kumite_female: Vec::new(),
            kata_male: Vec::new(),
            kata_female: Vec::new(),
        };

        let table = CategoryTable::from_brackets(vec![broken]);
        let issues = table.validate().unwrap_err();
        assert!(issues.iter().any(|i| i.contains("gap or overlap")));
    }

    #[test]
    fn test_validate_catches_inverted_age_range() {
        let broken = AgeBracket {
            label: "Inverted".to_string(),
            min_age: 12,
            max_age: Some(10),
            kumite_male: Vec::new(),
            kumite_female: Vec::new(),
            kata_male: Vec::new(),
            kata_female: Vec::new(),
        };

        let table = CategoryTable::from_brackets(vec![broken]);
        let issues = table.validate().unwrap_err();
        assert!(issues.iter().any(|i| i.contains("min_age")));
    }
}
