//! Carrier pair risk engine.
//!
//! Maps the SMN1 status of two parents to the inheritance outcome for a
//! child. The outcome comes from a fixed table keyed by the unordered pair;
//! nothing is computed incrementally.

use crate::types::{PairOutcome, Status};

/// Unordered pair of known statuses, one variant per table row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairKey {
    AffectedAffected,
    AffectedCarrier,
    AffectedHealthy,
    CarrierCarrier,
    CarrierHealthy,
    HealthyHealthy,
}

impl PairKey {
    pub const ALL: [PairKey; 6] = [
        PairKey::AffectedAffected,
        PairKey::AffectedCarrier,
        PairKey::AffectedHealthy,
        PairKey::CarrierCarrier,
        PairKey::CarrierHealthy,
        PairKey::HealthyHealthy,
    ];

    /// Build the key for two statuses in either order.
    ///
    /// Returns `None` when either status is unknown.
    pub fn from_statuses(a: Status, b: Status) -> Option<Self> {
        use Status::*;
        let key = match sorted(a, b) {
            (Affected, Affected) => PairKey::AffectedAffected,
            (Affected, Carrier) => PairKey::AffectedCarrier,
            (Affected, Healthy) => PairKey::AffectedHealthy,
            (Carrier, Carrier) => PairKey::CarrierCarrier,
            (Carrier, Healthy) => PairKey::CarrierHealthy,
            (Healthy, Healthy) => PairKey::HealthyHealthy,
            (Unknown, _) | (_, Unknown) => return None,
            // sorted() never yields a lexically descending pair
            (Carrier, Affected) | (Healthy, Affected) | (Healthy, Carrier) => return None,
        };
        Some(key)
    }

    /// Parse the joined label form, e.g. `affected_carrier`
    pub fn from_label(label: &str) -> Option<Self> {
        PairKey::ALL.into_iter().find(|k| k.label() == label)
    }

    /// Sorted statuses joined with an underscore
    pub fn label(self) -> &'static str {
        match self {
            PairKey::AffectedAffected => "affected_affected",
            PairKey::AffectedCarrier => "affected_carrier",
            PairKey::AffectedHealthy => "affected_healthy",
            PairKey::CarrierCarrier => "carrier_carrier",
            PairKey::CarrierHealthy => "carrier_healthy",
            PairKey::HealthyHealthy => "healthy_healthy",
        }
    }

    /// Affected, carrier and healthy percentages for a child of this pair
    pub fn probabilities(self) -> (u8, u8, u8) {
        match self {
            PairKey::AffectedAffected => (100, 0, 0),
            PairKey::AffectedCarrier => (50, 50, 0),
            PairKey::AffectedHealthy => (0, 100, 0),
            PairKey::CarrierCarrier => (25, 50, 25),
            PairKey::CarrierHealthy => (0, 50, 50),
            PairKey::HealthyHealthy => (0, 0, 100),
        }
    }

    fn summary_key(self) -> &'static str {
        match self {
            PairKey::AffectedAffected => "pair.summary.affected_affected",
            PairKey::AffectedCarrier => "pair.summary.affected_carrier",
            PairKey::AffectedHealthy => "pair.summary.affected_healthy",
            PairKey::CarrierCarrier => "pair.summary.carrier_carrier",
            PairKey::CarrierHealthy => "pair.summary.carrier_healthy",
            PairKey::HealthyHealthy => "pair.summary.healthy_healthy",
        }
    }

    fn advice_keys(self) -> &'static [&'static str] {
        match self {
            PairKey::AffectedAffected | PairKey::AffectedCarrier => &[
                "pair.advice.genetic_counseling",
                "pair.advice.prenatal_diagnosis",
                "pair.advice.newborn_screening",
            ],
            PairKey::CarrierCarrier => &[
                "pair.advice.genetic_counseling",
                "pair.advice.prenatal_diagnosis",
                "pair.advice.newborn_screening",
                "pair.advice.relatives_testing",
            ],
            PairKey::AffectedHealthy | PairKey::CarrierHealthy => &[
                "pair.advice.genetic_counseling",
                "pair.advice.relatives_testing",
            ],
            PairKey::HealthyHealthy => &["pair.advice.routine_care"],
        }
    }
}

/// Evaluate the carrier calculator for two participants in any order
pub fn evaluate_pair(a: Status, b: Status) -> PairOutcome {
    let outcome = match PairKey::from_statuses(a, b) {
        Some(key) => lookup(key),
        None if a == Status::Unknown || b == Status::Unknown => unknown_outcome(),
        None => fallback_outcome(),
    };

    tracing::debug!(
        me = %a,
        partner = %b,
        summary = outcome.summary_key,
        "Evaluated carrier pair"
    );

    outcome
}

/// Evaluate by pair label.
///
/// Labels outside the table get the zero-probability fallback outcome.
pub fn evaluate_label(label: &str) -> PairOutcome {
    match PairKey::from_label(label) {
        Some(key) => lookup(key),
        None => {
            tracing::warn!("No risk table entry for pair '{}'", label);
            fallback_outcome()
        }
    }
}

/// Table row for a known pair
pub fn lookup(key: PairKey) -> PairOutcome {
    let (affected, carrier, healthy) = key.probabilities();
    PairOutcome {
        affected_probability: affected,
        carrier_probability: carrier,
        healthy_probability: healthy,
        summary_key: key.summary_key(),
        advice_keys: key.advice_keys().to_vec(),
    }
}

/// Outcome when at least one status is unknown
pub fn unknown_outcome() -> PairOutcome {
    PairOutcome {
        affected_probability: 0,
        carrier_probability: 0,
        healthy_probability: 0,
        summary_key: "pair.summary.unknown",
        advice_keys: vec![
            "pair.advice.insufficient_information",
            "pair.advice.carrier_testing",
            "pair.advice.genetic_counseling",
        ],
    }
}

fn fallback_outcome() -> PairOutcome {
    PairOutcome {
        affected_probability: 0,
        carrier_probability: 0,
        healthy_probability: 0,
        summary_key: "pair.summary.fallback",
        advice_keys: vec!["pair.advice.genetic_counseling"],
    }
}

fn sorted(a: Status, b: Status) -> (Status, Status) {
    if a.as_str() <= b.as_str() {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(outcome: &PairOutcome) -> (u8, u8, u8) {
        (
            outcome.affected_probability,
            outcome.carrier_probability,
            outcome.healthy_probability,
        )
    }

    #[test]
    fn test_table_rows() {
        use Status::*;
        assert_eq!(triple(&evaluate_pair(Healthy, Healthy)), (0, 0, 100));
        assert_eq!(triple(&evaluate_pair(Affected, Affected)), (100, 0, 0));
        assert_eq!(triple(&evaluate_pair(Carrier, Carrier)), (25, 50, 25));
        assert_eq!(triple(&evaluate_pair(Affected, Carrier)), (50, 50, 0));
        assert_eq!(triple(&evaluate_pair(Healthy, Affected)), (0, 100, 0));
        assert_eq!(triple(&evaluate_pair(Healthy, Carrier)), (0, 50, 50));
    }

    #[test]
    fn test_symmetric_over_all_pairs() {
        for a in Status::ALL {
            for b in Status::ALL {
                assert_eq!(evaluate_pair(a, b), evaluate_pair(b, a), "{} / {}", a, b);
            }
        }
    }

    #[test]
    fn test_unknown_dominates() {
        for x in Status::ALL {
            let outcome = evaluate_pair(x, Status::Unknown);
            assert_eq!(outcome, unknown_outcome(), "{}", x);
            assert_eq!(evaluate_pair(Status::Unknown, x), outcome);
            assert_eq!(triple(&outcome), (0, 0, 0));
        }
    }

    #[test]
    fn test_no_pair_reaches_fallback() {
        for a in Status::ALL {
            for b in Status::ALL {
                assert_ne!(evaluate_pair(a, b).summary_key, "pair.summary.fallback");
            }
        }
    }

    #[test]
    fn test_known_pairs_sum_to_100() {
        for key in PairKey::ALL {
            let (a, c, h) = key.probabilities();
            assert_eq!(a as u32 + c as u32 + h as u32, 100, "{}", key.label());
        }
    }

    #[test]
    fn test_key_label_is_sorted_join() {
        use Status::*;
        let known = [Healthy, Carrier, Affected];
        for a in known {
            for b in known {
                let key = PairKey::from_statuses(a, b).unwrap();
                let (lo, hi) = sorted(a, b);
                assert_eq!(key.label(), format!("{}_{}", lo, hi));
            }
        }
        assert_eq!(
            PairKey::from_statuses(Carrier, Affected).unwrap().label(),
            "affected_carrier"
        );
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(
            evaluate_label("carrier_carrier"),
            evaluate_pair(Status::Carrier, Status::Carrier)
        );

        let fallback = evaluate_label("carrier_affected");
        assert_eq!(fallback.summary_key, "pair.summary.fallback");
        assert_eq!(triple(&fallback), (0, 0, 0));
        assert!(!fallback.is_informative());
    }

    #[test]
    fn test_pair_is_idempotent() {
        let first = evaluate_pair(Status::Carrier, Status::Healthy);
        let second = evaluate_pair(Status::Carrier, Status::Healthy);
        assert_eq!(first, second);
    }
}
