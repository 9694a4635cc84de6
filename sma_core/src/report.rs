//! Printable result summaries.
//!
//! Renders checklist and pair results as plain text (with a text meter for
//! the visual risk indicator) or as serializable report records for JSON
//! export.

use crate::checklist::referral_actions;
use crate::messages::MessageCatalog;
use crate::types::{
    Checklist, ChecklistResult, Gestation, OutcomeCategory, PairOutcome, RiskLevel, Sex, Status,
};
use serde::Serialize;
use std::fmt::Write;

const DASH: &str = "—";

const LEVEL_HIGH: &str = "checklist.level.high";
const LEVEL_CHECK: &str = "checklist.level.check";
const HINT_FAMILY_RISK: &str = "checklist.hint.family_risk";
const HINT_NO_FAMILY_RISK: &str = "checklist.hint.no_family_risk";
const CRITERIA_NOTE: &str = "checklist.criteria.note";
const DISCLAIMER: &str = "common.disclaimer";

/// Fixed message keys the printable summaries resolve
pub const REPORT_KEYS: [&str; 6] = [
    LEVEL_HIGH,
    LEVEL_CHECK,
    HINT_FAMILY_RISK,
    HINT_NO_FAMILY_RISK,
    CRITERIA_NOTE,
    DISCLAIMER,
];

/// Demographic fields formatted for display, echoed as entered
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PatientLine {
    pub age: String,
    pub sex: String,
    pub gestation: String,
    pub pregnancy_no_issues: String,
}

impl PatientLine {
    pub fn from_checklist(checklist: &Checklist) -> Self {
        let months = checklist.age_months.trim();
        let years = checklist.age_years.trim();
        let age = match (months.is_empty(), years.is_empty()) {
            (true, true) => DASH.to_string(),
            (false, true) => format!("{} mo", months),
            (true, false) => format!("{} y", years),
            (false, false) => format!("{} mo / {} y", months, years),
        };

        let sex = match checklist.sex {
            Some(Sex::Male) => "M",
            Some(Sex::Female) => "F",
            None => DASH,
        }
        .to_string();

        let weeks = checklist.preterm_weeks.trim();
        let gestation = match checklist.gestation {
            Some(Gestation::Term) => "Term".to_string(),
            Some(Gestation::Preterm) if weeks.is_empty() => "Preterm".to_string(),
            Some(Gestation::Preterm) => format!("Preterm ({} wk)", weeks),
            None => DASH.to_string(),
        };

        let pregnancy_no_issues = match checklist.pregnancy_no_issues {
            Some(true) => "Yes",
            Some(false) => "No",
            None => DASH,
        }
        .to_string();

        Self {
            age,
            sex,
            gestation,
            pregnancy_no_issues,
        }
    }
}

/// Text gauge such as `[#####---------------]  25%`.
///
/// `value` is clamped to 0..=100.
pub fn render_meter(value: u8, width: usize) -> String {
    let value = value.min(100) as usize;
    let filled = (value * width + 50) / 100;
    format!(
        "[{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        value
    )
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

/// Serializable checklist report for JSON export
#[derive(Clone, Debug, Serialize)]
pub struct ChecklistReport<'a> {
    pub risk_level: RiskLevel,
    pub patient: PatientLine,
    #[serde(flatten)]
    pub result: &'a ChecklistResult,
    pub actions: Vec<String>,
}

impl<'a> ChecklistReport<'a> {
    pub fn new(
        checklist: &Checklist,
        result: &'a ChecklistResult,
        catalog: &dyn MessageCatalog,
    ) -> Self {
        Self {
            risk_level: result.risk_level(),
            patient: PatientLine::from_checklist(checklist),
            result,
            actions: referral_actions(result)
                .iter()
                .map(|key| catalog.text(key).to_string())
                .collect(),
        }
    }
}

/// Serializable pair report for JSON export
#[derive(Clone, Debug, Serialize)]
pub struct PairReport<'a> {
    pub me: Status,
    pub partner: Status,
    #[serde(flatten)]
    pub outcome: &'a PairOutcome,
    pub dominant: Option<OutcomeCategory>,
    pub summary: String,
    pub advice: Vec<String>,
}

impl<'a> PairReport<'a> {
    pub fn new(
        me: Status,
        partner: Status,
        outcome: &'a PairOutcome,
        catalog: &dyn MessageCatalog,
    ) -> Self {
        Self {
            me,
            partner,
            outcome,
            dominant: outcome.dominant(),
            summary: catalog.text(outcome.summary_key).to_string(),
            advice: outcome
                .advice_keys
                .iter()
                .map(|key| catalog.text(key).to_string())
                .collect(),
        }
    }
}

/// Plain-text printable summary of a checklist result
pub fn render_checklist(
    checklist: &Checklist,
    result: &ChecklistResult,
    catalog: &dyn MessageCatalog,
    meter_width: usize,
) -> String {
    let mut out = String::new();
    let patient = PatientLine::from_checklist(checklist);

    let (badge, title_key) = match result.risk_level() {
        RiskLevel::High => ("HIGH", LEVEL_HIGH),
        RiskLevel::Check => ("CHECK", LEVEL_CHECK),
    };
    let hint_key = if result.family_risk {
        HINT_FAMILY_RISK
    } else {
        HINT_NO_FAMILY_RISK
    };

    // Writing into a String cannot fail
    let _ = writeln!(out, "SMA SCREENING CHECKLIST  [{}]", badge);
    let _ = writeln!(out, "{}", catalog.text(title_key));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Suspicion index: {}",
        render_meter(result.suspicion_index, meter_width)
    );
    let _ = writeln!(out, "Symptoms (sections 3-6): {}", result.symptom_count);
    let _ = writeln!(
        out,
        "Family risk: {}",
        if result.family_risk { "present" } else { "absent" }
    );
    let _ = writeln!(
        out,
        "Priority: {}",
        if result.high_priority { "HIGH" } else { "observation" }
    );
    let _ = writeln!(out, "{}", catalog.text(hint_key));

    let _ = writeln!(out);
    let _ = writeln!(out, "Patient");
    let _ = writeln!(out, "  Age: {}", patient.age);
    let _ = writeln!(out, "  Sex: {}", patient.sex);
    let _ = writeln!(out, "  Gestation: {}", patient.gestation);
    let _ = writeln!(
        out,
        "  Uneventful pregnancy and birth: {}",
        patient.pregnancy_no_issues
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Risk criteria");
    let _ = writeln!(
        out,
        "  2 or more symptoms from sections 3-6: {}",
        yes_no(result.symptom_count >= 2)
    );
    let _ = writeln!(
        out,
        "  Family history red flags: {}",
        yes_no(result.family_risk)
    );
    let _ = writeln!(
        out,
        "  Severe respiratory or feeding signs: {}",
        yes_no(result.severe_resp)
    );
    let _ = writeln!(out, "  {}", catalog.text(CRITERIA_NOTE));

    let _ = writeln!(out);
    let _ = writeln!(out, "Recommended actions");
    for key in referral_actions(result) {
        let _ = writeln!(out, "  - {}", catalog.text(key));
    }

    let marked: Vec<_> = result
        .grouped_findings
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "Marked findings");
    if marked.is_empty() {
        let _ = writeln!(out, "  {}", DASH);
    }
    for (category, items) in marked {
        let _ = writeln!(out, "  {}", category.label());
        for item in items {
            let _ = writeln!(out, "    - {}", item);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", catalog.text(DISCLAIMER));
    out
}

/// Plain-text printable summary of a carrier pair outcome
pub fn render_pair(
    me: Status,
    partner: Status,
    outcome: &PairOutcome,
    catalog: &dyn MessageCatalog,
    meter_width: usize,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "SMA CARRIER CALCULATOR");
    let _ = writeln!(out, "Me: {}   Partner: {}", me, partner);
    let _ = writeln!(out);

    if outcome.is_informative() {
        let rows = [
            ("Affected", outcome.affected_probability),
            ("Carrier", outcome.carrier_probability),
            ("Healthy", outcome.healthy_probability),
        ];
        for (label, probability) in rows {
            let _ = writeln!(
                out,
                "  {:<9}{}",
                label,
                render_meter(probability, meter_width)
            );
        }
        if let Some(dominant) = outcome.dominant() {
            let _ = writeln!(out, "  Most likely: {:?}", dominant);
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", catalog.text(outcome.summary_key));
    let _ = writeln!(out);
    let _ = writeln!(out, "Advice");
    for key in &outcome.advice_keys {
        let _ = writeln!(out, "  - {}", catalog.text(key));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", catalog.text(DISCLAIMER));
    out
}
