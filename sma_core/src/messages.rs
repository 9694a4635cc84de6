//! Message catalog for result keys.
//!
//! The engines return opaque keys; the presentation layer resolves them
//! through a [`MessageCatalog`]. One built-in English catalog is provided.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Resolves result keys to display strings
pub trait MessageCatalog {
    fn resolve(&self, key: &str) -> Option<&str>;

    /// Resolve a key, falling back to the key itself when it is missing
    fn text<'a>(&'a self, key: &'a str) -> &'a str {
        match self.resolve(key) {
            Some(text) => text,
            None => {
                tracing::warn!("Missing message for key '{}'", key);
                key
            }
        }
    }
}

static ENGLISH: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Checklist actions
        (
            "checklist.action.refer_neurologist",
            "Refer urgently to a paediatric neurologist.",
        ),
        (
            "checklist.action.smn1_testing",
            "Order or recommend molecular genetic testing (SMN1).",
        ),
        (
            "checklist.action.no_delay",
            "Do not postpone the referral: every week matters.",
        ),
        (
            "checklist.action.inform_parents",
            "Inform the parents that an urgent work-up is needed.",
        ),
        // Checklist badge
        ("checklist.level.high", "SMA suspicion: HIGH priority"),
        (
            "checklist.level.check",
            "SMA suspicion: low or undetermined probability",
        ),
        (
            "checklist.hint.family_risk",
            "At least one family-history red flag is marked.",
        ),
        (
            "checklist.hint.no_family_risk",
            "No family-history red flags are marked.",
        ),
        (
            "checklist.criteria.note",
            "With 2 or more symptoms and/or family risk, treat as a priority referral.",
        ),
        // Pair summaries
        (
            "pair.summary.affected_affected",
            "Both parents are affected: every child is expected to be affected.",
        ),
        (
            "pair.summary.affected_carrier",
            "One parent affected, one carrier: each child has a 50% chance of being affected and 50% of being a carrier.",
        ),
        (
            "pair.summary.affected_healthy",
            "One parent affected, one non-carrier: every child is expected to be a carrier.",
        ),
        (
            "pair.summary.carrier_carrier",
            "Both parents are carriers: each child has a 25% chance of being affected, 50% of being a carrier and 25% of being unaffected.",
        ),
        (
            "pair.summary.carrier_healthy",
            "One parent carrier, one non-carrier: each child has a 50% chance of being a carrier.",
        ),
        (
            "pair.summary.healthy_healthy",
            "Neither parent carries the variant: children are not expected to be affected or carriers.",
        ),
        (
            "pair.summary.unknown",
            "Not enough information: the status of at least one parent is unknown.",
        ),
        (
            "pair.summary.fallback",
            "This combination cannot be assessed.",
        ),
        // Pair advice
        (
            "pair.advice.genetic_counseling",
            "Discuss the result with a medical geneticist.",
        ),
        (
            "pair.advice.prenatal_diagnosis",
            "Ask about prenatal or preimplantation genetic diagnosis when planning a pregnancy.",
        ),
        (
            "pair.advice.newborn_screening",
            "Make sure the newborn is screened for SMA right after birth.",
        ),
        (
            "pair.advice.relatives_testing",
            "Relatives may also be carriers and can be offered testing.",
        ),
        (
            "pair.advice.routine_care",
            "No additional measures are needed beyond routine newborn screening.",
        ),
        (
            "pair.advice.insufficient_information",
            "The risk cannot be estimated without both statuses.",
        ),
        (
            "pair.advice.carrier_testing",
            "An SMN1 carrier test can establish the unknown status.",
        ),
        // Common
        ("common.disclaimer", "Screening aid only; not a diagnosis."),
    ])
});

/// Built-in English catalog
#[derive(Clone, Copy, Debug, Default)]
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn resolve(&self, key: &str) -> Option<&str> {
        ENGLISH.get(key).copied()
    }
}

/// Keys known to the built-in catalog
pub fn known_keys() -> impl Iterator<Item = &'static str> {
    ENGLISH.keys().copied()
}
