//! Core domain types for the SMA screening toolkit.
//!
//! This module defines the records that flow in and out of the two engines:
//! - The clinician checklist and its demographic fields
//! - Finding categories in clinical section order
//! - Carrier statuses for the pair calculator
//! - Derived results (checklist result, pair outcome)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

// ============================================================================
// Demographics
// ============================================================================

/// Sex of the child
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Ok(Sex::Male),
            "f" | "female" => Ok(Sex::Female),
            other => Err(Error::InvalidInput(format!(
                "sex must be 'm' or 'f', got '{}'",
                other
            ))),
        }
    }
}

/// Whether the child was born at term
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gestation {
    Term,
    Preterm,
}

impl FromStr for Gestation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "term" => Ok(Gestation::Term),
            "preterm" => Ok(Gestation::Preterm),
            other => Err(Error::InvalidInput(format!(
                "gestation must be 'term' or 'preterm', got '{}'",
                other
            ))),
        }
    }
}

// ============================================================================
// Checklist
// ============================================================================

/// The clinician screening checklist.
///
/// Free-text demographic fields are echoed into the report as entered and are
/// never parsed. All boolean findings default to `false` except the two
/// neuro-preserved fields, which default to `true`. Unknown field names are
/// rejected so a misspelled finding cannot silently stay unmarked.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Checklist {
    // General patient data
    pub age_months: String,
    pub age_years: String,
    pub sex: Option<Sex>,
    pub gestation: Option<Gestation>,
    pub preterm_weeks: String,
    pub pregnancy_no_issues: Option<bool>,

    // Family history red flags
    pub fam_early_death: bool,
    pub fam_weakness: bool,
    pub fam_consanguinity: bool,
    pub fam_smn1_carrier: bool,

    // Motor development, 0-6 months
    pub m0_head: bool,
    pub m0_floppy_limbs: bool,
    pub m0_frog_pose: bool,
    pub m0_no_roll: bool,

    // Motor development, 6-12 months
    pub m6_no_sit: bool,
    pub m6_no_stand_support: bool,
    pub m6_regression: bool,

    // Motor development, over 12 months
    pub m12_no_walk: bool,
    pub m12_falls: bool,
    pub m12_hard_rise: bool,
    pub m12_progressive_weakness: bool,

    // Tone and reflexes
    pub tone_hypotonia: bool,
    pub tone_reflex_low: bool,
    pub tone_proximal_weak: bool,

    // Respiration and feeding
    pub resp_paradox: bool,
    pub resp_accessory: bool,
    pub resp_infections: bool,
    pub feed_fatigue: bool,
    pub feed_choke_weak_cry: bool,

    // Physical examination
    pub exam_atrophy: bool,
    pub exam_tongue_fascic: bool,
    pub exam_bell_chest: bool,
    pub exam_contractures: bool,

    // Intellect and sensation
    pub neuro_intellect_preserved: bool,
    pub neuro_sensation_preserved: bool,
}

impl Default for Checklist {
    fn default() -> Self {
        Self {
            age_months: String::new(),
            age_years: String::new(),
            sex: None,
            gestation: None,
            preterm_weeks: String::new(),
            pregnancy_no_issues: None,

            fam_early_death: false,
            fam_weakness: false,
            fam_consanguinity: false,
            fam_smn1_carrier: false,

            m0_head: false,
            m0_floppy_limbs: false,
            m0_frog_pose: false,
            m0_no_roll: false,

            m6_no_sit: false,
            m6_no_stand_support: false,
            m6_regression: false,

            m12_no_walk: false,
            m12_falls: false,
            m12_hard_rise: false,
            m12_progressive_weakness: false,

            tone_hypotonia: false,
            tone_reflex_low: false,
            tone_proximal_weak: false,

            resp_paradox: false,
            resp_accessory: false,
            resp_infections: false,
            feed_fatigue: false,
            feed_choke_weak_cry: false,

            exam_atrophy: false,
            exam_tongue_fascic: false,
            exam_bell_chest: false,
            exam_contractures: false,

            neuro_intellect_preserved: true,
            neuro_sensation_preserved: true,
        }
    }
}

impl Checklist {
    /// Discard everything entered so far and return to the defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Finding Categories
// ============================================================================

/// Semantic group of checklist findings, in clinical section order.
///
/// The derived `Ord` follows declaration order, so maps keyed by category
/// iterate in the order the sections appear on the form.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    FamilyHistory,
    MotorEarly,
    MotorMiddle,
    MotorLate,
    ToneReflexes,
    RespiratoryFeeding,
    PhysicalExam,
    NeuroPreserved,
}

impl FindingCategory {
    pub const ALL: [FindingCategory; 8] = [
        FindingCategory::FamilyHistory,
        FindingCategory::MotorEarly,
        FindingCategory::MotorMiddle,
        FindingCategory::MotorLate,
        FindingCategory::ToneReflexes,
        FindingCategory::RespiratoryFeeding,
        FindingCategory::PhysicalExam,
        FindingCategory::NeuroPreserved,
    ];

    /// Whether findings in this category contribute to the symptom tally.
    ///
    /// Family history and neuro-preserved findings are scored separately.
    pub fn counts_as_symptom(self) -> bool {
        !matches!(
            self,
            FindingCategory::FamilyHistory | FindingCategory::NeuroPreserved
        )
    }

    /// Display label for the category
    pub fn label(self) -> &'static str {
        match self {
            FindingCategory::FamilyHistory => "Family history (red flags)",
            FindingCategory::MotorEarly => "Motor development (0-6 months)",
            FindingCategory::MotorMiddle => "Motor development (6-12 months)",
            FindingCategory::MotorLate => "Motor development (>12 months)",
            FindingCategory::ToneReflexes => "Muscle tone and reflexes",
            FindingCategory::RespiratoryFeeding => "Respiration and feeding",
            FindingCategory::PhysicalExam => "Physical examination",
            FindingCategory::NeuroPreserved => "Intellect and sensation",
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Checklist Result
// ============================================================================

/// Coarse classification shown on the result badge
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Priority referral
    High,
    /// Low or undetermined probability; keep under observation
    Check,
}

/// Everything derived from a checklist. Never stored.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ChecklistResult {
    pub family_risk: bool,
    pub symptom_count: u32,
    pub severe_resp: bool,
    pub high_priority: bool,
    pub suspicion_index: u8,
    pub grouped_findings: BTreeMap<FindingCategory, Vec<&'static str>>,
}

impl ChecklistResult {
    pub fn risk_level(&self) -> RiskLevel {
        if self.high_priority {
            RiskLevel::High
        } else {
            RiskLevel::Check
        }
    }

    /// All marked findings flattened in section order
    pub fn all_findings(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.grouped_findings.values().flatten().copied()
    }
}

// ============================================================================
// Carrier Status
// ============================================================================

/// SMN1 status of one participant in the pair calculator
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Healthy,
    Carrier,
    Affected,
    Unknown,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Healthy,
        Status::Carrier,
        Status::Affected,
        Status::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Healthy => "healthy",
            Status::Carrier => "carrier",
            Status::Affected => "affected",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "healthy" => Ok(Status::Healthy),
            "carrier" => Ok(Status::Carrier),
            "affected" => Ok(Status::Affected),
            "unknown" => Ok(Status::Unknown),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

/// Inheritance category the pair outcome assigns a probability to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeCategory {
    Affected,
    Carrier,
    Healthy,
}

/// Result of the carrier pair calculator
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PairOutcome {
    pub affected_probability: u8,
    pub carrier_probability: u8,
    pub healthy_probability: u8,
    pub summary_key: &'static str,
    pub advice_keys: Vec<&'static str>,
}

impl PairOutcome {
    /// False for the unknown and fallback outcomes, which carry no probabilities
    pub fn is_informative(&self) -> bool {
        self.affected_probability > 0 || self.carrier_probability > 0 || self.healthy_probability > 0
    }

    /// Category with the highest probability.
    ///
    /// Ties resolve toward the more severe category. Returns `None` for
    /// outcomes without probabilities.
    pub fn dominant(&self) -> Option<OutcomeCategory> {
        if !self.is_informative() {
            return None;
        }

        let candidates = [
            (OutcomeCategory::Affected, self.affected_probability),
            (OutcomeCategory::Carrier, self.carrier_probability),
            (OutcomeCategory::Healthy, self.healthy_probability),
        ];

        candidates
            .iter()
            .fold(None, |best: Option<(OutcomeCategory, u8)>, &(cat, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((cat, p)),
            })
            .map(|(cat, _)| cat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_defaults() {
        let checklist = Checklist::default();
        assert!(!checklist.fam_early_death);
        assert!(!checklist.resp_paradox);
        assert!(checklist.neuro_intellect_preserved);
        assert!(checklist.neuro_sensation_preserved);
        assert_eq!(checklist.sex, None);
        assert_eq!(checklist.pregnancy_no_issues, None);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut checklist = Checklist {
            age_months: "5".into(),
            m0_head: true,
            neuro_intellect_preserved: false,
            ..Checklist::default()
        };

        checklist.reset();

        assert_eq!(checklist, Checklist::default());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let checklist: Checklist =
            serde_json::from_str(r#"{ "resp_paradox": true, "sex": "f" }"#).unwrap();

        assert!(checklist.resp_paradox);
        assert_eq!(checklist.sex, Some(Sex::Female));
        assert!(checklist.neuro_sensation_preserved);
        assert!(!checklist.m0_head);
    }

    #[test]
    fn test_misspelled_field_rejected() {
        let err = serde_json::from_str::<Checklist>(
            r#"{ "resp_paradx": true, "fam_smn1carrier": true }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("resp_paradx"), "{}", err);

        let err = toml::from_str::<Checklist>("fam_smn1carrier = true\n").unwrap_err();
        assert!(err.to_string().contains("fam_smn1carrier"), "{}", err);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Carrier".parse::<Status>().unwrap(), Status::Carrier);
        assert_eq!(" unknown ".parse::<Status>().unwrap(), Status::Unknown);
        assert!(matches!(
            "sick".parse::<Status>(),
            Err(Error::InvalidStatus(s)) if s == "sick"
        ));
    }

    #[test]
    fn test_category_order_matches_sections() {
        let mut sorted = FindingCategory::ALL;
        sorted.sort();
        assert_eq!(sorted, FindingCategory::ALL);
        assert!(!FindingCategory::FamilyHistory.counts_as_symptom());
        assert!(!FindingCategory::NeuroPreserved.counts_as_symptom());
        assert!(FindingCategory::RespiratoryFeeding.counts_as_symptom());
    }

    #[test]
    fn test_dominant_prefers_severe_on_tie() {
        let outcome = PairOutcome {
            affected_probability: 50,
            carrier_probability: 50,
            healthy_probability: 0,
            summary_key: "pair.summary.affected_carrier",
            advice_keys: vec![],
        };
        assert_eq!(outcome.dominant(), Some(OutcomeCategory::Affected));

        let empty = PairOutcome {
            affected_probability: 0,
            carrier_probability: 0,
            healthy_probability: 0,
            summary_key: "pair.summary.unknown",
            advice_keys: vec![],
        };
        assert!(!empty.is_informative());
        assert_eq!(empty.dominant(), None);
    }
}
