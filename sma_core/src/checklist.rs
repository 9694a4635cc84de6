//! Checklist risk engine.
//!
//! Turns a filled-in [`Checklist`] into a [`ChecklistResult`]:
//! - Symptom tally over the motor, tone, respiratory and exam sections
//! - Family-history and severe-respiratory flags
//! - High-priority referral decision
//! - 0-100 suspicion index for the result meter
//! - Marked findings grouped by section
//!
//! Every function here is pure and total.

use crate::catalog::Finding;
use crate::types::{Checklist, ChecklistResult, FindingCategory};
use std::collections::BTreeMap;

/// Cap on the symptom term of the suspicion index
const SYMPTOM_INDEX_CAP: u32 = 60;
const POINTS_PER_SYMPTOM: u32 = 10;
const FAMILY_RISK_BONUS: u32 = 25;
const SEVERE_RESP_BONUS: u32 = 15;

/// Symptom count at which referral becomes high priority on its own
const PRIORITY_SYMPTOM_THRESHOLD: u32 = 2;

/// Message keys of the clinician actions printed with every checklist result
pub const REFERRAL_ACTIONS: [&str; 4] = [
    "checklist.action.refer_neurologist",
    "checklist.action.smn1_testing",
    "checklist.action.no_delay",
    "checklist.action.inform_parents",
];

/// Evaluate a checklist
pub fn evaluate_checklist(checklist: &Checklist) -> ChecklistResult {
    let symptom_count = count_symptoms(checklist);
    let family_risk = family_risk(checklist);
    let severe_resp = severe_respiratory(checklist);
    let high_priority = priority_rule(family_risk, symptom_count, severe_resp);
    let suspicion_index = index_rule(family_risk, symptom_count, severe_resp);

    tracing::debug!(
        symptom_count,
        family_risk,
        severe_resp,
        high_priority,
        suspicion_index,
        "Evaluated checklist"
    );

    ChecklistResult {
        family_risk,
        symptom_count,
        severe_resp,
        high_priority,
        suspicion_index,
        grouped_findings: group_findings(checklist),
    }
}

/// Number of marked findings in the motor, tone, respiratory and exam sections
pub fn count_symptoms(checklist: &Checklist) -> u32 {
    Finding::ALL
        .iter()
        .filter(|f| f.category().counts_as_symptom() && f.is_set(checklist))
        .count() as u32
}

/// True when any family-history red flag is marked
pub fn family_risk(checklist: &Checklist) -> bool {
    Finding::in_category(FindingCategory::FamilyHistory).any(|f| f.is_set(checklist))
}

/// True when paradoxical breathing, accessory-muscle use or choking/weak cry is marked
pub fn severe_respiratory(checklist: &Checklist) -> bool {
    Finding::SEVERE_RESPIRATORY
        .iter()
        .any(|f| f.is_set(checklist))
}

/// Conservative referral rule: any one qualifying condition is enough
pub fn high_priority(checklist: &Checklist) -> bool {
    priority_rule(
        family_risk(checklist),
        count_symptoms(checklist),
        severe_respiratory(checklist),
    )
}

/// Fill level for the result meter. Not a clinical score.
pub fn suspicion_index(checklist: &Checklist) -> u8 {
    index_rule(
        family_risk(checklist),
        count_symptoms(checklist),
        severe_respiratory(checklist),
    )
}

/// Descriptions of marked findings for every section, in section order.
///
/// Sections with nothing marked are present with an empty list.
pub fn group_findings(checklist: &Checklist) -> BTreeMap<FindingCategory, Vec<&'static str>> {
    let mut groups: BTreeMap<FindingCategory, Vec<&'static str>> = FindingCategory::ALL
        .iter()
        .map(|c| (*c, Vec::new()))
        .collect();

    for finding in Finding::ALL.iter().filter(|f| f.is_set(checklist)) {
        groups
            .entry(finding.category())
            .or_default()
            .push(finding.description());
    }

    groups
}

/// Clinician actions shown alongside a checklist result
pub fn referral_actions(_result: &ChecklistResult) -> &'static [&'static str] {
    &REFERRAL_ACTIONS
}

fn priority_rule(family_risk: bool, symptom_count: u32, severe_resp: bool) -> bool {
    family_risk || symptom_count >= PRIORITY_SYMPTOM_THRESHOLD || severe_resp
}

fn index_rule(family_risk: bool, symptom_count: u32, severe_resp: bool) -> u8 {
    let mut score = (symptom_count * POINTS_PER_SYMPTOM).min(SYMPTOM_INDEX_CAP);
    if family_risk {
        score += FAMILY_RISK_BONUS;
    }
    if severe_resp {
        score += SEVERE_RESP_BONUS;
    }
    score.min(100) as u8
}
