//! Built-in catalog of checklist findings.
//!
//! Every boolean field of [`Checklist`] has a matching [`Finding`] variant that
//! carries its stable key, its section and the text printed on the report.

use crate::types::{Checklist, FindingCategory};
use crate::Error;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// One boolean item of the screening checklist
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finding {
    FamEarlyDeath,
    FamWeakness,
    FamConsanguinity,
    FamSmn1Carrier,

    M0Head,
    M0FloppyLimbs,
    M0FrogPose,
    M0NoRoll,

    M6NoSit,
    M6NoStandSupport,
    M6Regression,

    M12NoWalk,
    M12Falls,
    M12HardRise,
    M12ProgressiveWeakness,

    ToneHypotonia,
    ToneReflexLow,
    ToneProximalWeak,

    RespParadox,
    RespAccessory,
    RespInfections,
    FeedFatigue,
    FeedChokeWeakCry,

    ExamAtrophy,
    ExamTongueFascic,
    ExamBellChest,
    ExamContractures,

    NeuroIntellectPreserved,
    NeuroSensationPreserved,
}

/// Key lookup table - built once and reused for every parse
static BY_KEY: Lazy<HashMap<&'static str, Finding>> =
    Lazy::new(|| Finding::ALL.iter().map(|f| (f.key(), *f)).collect());

impl Finding {
    /// Every finding, in form order
    pub const ALL: [Finding; 29] = [
        Finding::FamEarlyDeath,
        Finding::FamWeakness,
        Finding::FamConsanguinity,
        Finding::FamSmn1Carrier,
        Finding::M0Head,
        Finding::M0FloppyLimbs,
        Finding::M0FrogPose,
        Finding::M0NoRoll,
        Finding::M6NoSit,
        Finding::M6NoStandSupport,
        Finding::M6Regression,
        Finding::M12NoWalk,
        Finding::M12Falls,
        Finding::M12HardRise,
        Finding::M12ProgressiveWeakness,
        Finding::ToneHypotonia,
        Finding::ToneReflexLow,
        Finding::ToneProximalWeak,
        Finding::RespParadox,
        Finding::RespAccessory,
        Finding::RespInfections,
        Finding::FeedFatigue,
        Finding::FeedChokeWeakCry,
        Finding::ExamAtrophy,
        Finding::ExamTongueFascic,
        Finding::ExamBellChest,
        Finding::ExamContractures,
        Finding::NeuroIntellectPreserved,
        Finding::NeuroSensationPreserved,
    ];

    /// Findings whose presence alone marks severe respiratory involvement
    pub const SEVERE_RESPIRATORY: [Finding; 3] = [
        Finding::RespParadox,
        Finding::RespAccessory,
        Finding::FeedChokeWeakCry,
    ];

    /// Stable key, identical to the checklist field name
    pub fn key(self) -> &'static str {
        match self {
            Finding::FamEarlyDeath => "fam_early_death",
            Finding::FamWeakness => "fam_weakness",
            Finding::FamConsanguinity => "fam_consanguinity",
            Finding::FamSmn1Carrier => "fam_smn1_carrier",
            Finding::M0Head => "m0_head",
            Finding::M0FloppyLimbs => "m0_floppy_limbs",
            Finding::M0FrogPose => "m0_frog_pose",
            Finding::M0NoRoll => "m0_no_roll",
            Finding::M6NoSit => "m6_no_sit",
            Finding::M6NoStandSupport => "m6_no_stand_support",
            Finding::M6Regression => "m6_regression",
            Finding::M12NoWalk => "m12_no_walk",
            Finding::M12Falls => "m12_falls",
            Finding::M12HardRise => "m12_hard_rise",
            Finding::M12ProgressiveWeakness => "m12_progressive_weakness",
            Finding::ToneHypotonia => "tone_hypotonia",
            Finding::ToneReflexLow => "tone_reflex_low",
            Finding::ToneProximalWeak => "tone_proximal_weak",
            Finding::RespParadox => "resp_paradox",
            Finding::RespAccessory => "resp_accessory",
            Finding::RespInfections => "resp_infections",
            Finding::FeedFatigue => "feed_fatigue",
            Finding::FeedChokeWeakCry => "feed_choke_weak_cry",
            Finding::ExamAtrophy => "exam_atrophy",
            Finding::ExamTongueFascic => "exam_tongue_fascic",
            Finding::ExamBellChest => "exam_bell_chest",
            Finding::ExamContractures => "exam_contractures",
            Finding::NeuroIntellectPreserved => "neuro_intellect_preserved",
            Finding::NeuroSensationPreserved => "neuro_sensation_preserved",
        }
    }

    pub fn category(self) -> FindingCategory {
        use Finding::*;
        match self {
            FamEarlyDeath | FamWeakness | FamConsanguinity | FamSmn1Carrier => {
                FindingCategory::FamilyHistory
            }
            M0Head | M0FloppyLimbs | M0FrogPose | M0NoRoll => FindingCategory::MotorEarly,
            M6NoSit | M6NoStandSupport | M6Regression => FindingCategory::MotorMiddle,
            M12NoWalk | M12Falls | M12HardRise | M12ProgressiveWeakness => {
                FindingCategory::MotorLate
            }
            ToneHypotonia | ToneReflexLow | ToneProximalWeak => FindingCategory::ToneReflexes,
            RespParadox | RespAccessory | RespInfections | FeedFatigue | FeedChokeWeakCry => {
                FindingCategory::RespiratoryFeeding
            }
            ExamAtrophy | ExamTongueFascic | ExamBellChest | ExamContractures => {
                FindingCategory::PhysicalExam
            }
            NeuroIntellectPreserved | NeuroSensationPreserved => FindingCategory::NeuroPreserved,
        }
    }

    /// Human-readable text used in finding lists and on the printed report
    pub fn description(self) -> &'static str {
        match self {
            Finding::FamEarlyDeath => "Early childhood deaths in the family (before age 2)",
            Finding::FamWeakness => "Relatives with muscle weakness of unclear origin",
            Finding::FamConsanguinity => "Consanguineous marriages",
            Finding::FamSmn1Carrier => "Known SMN1 carrier status in a parent",
            Finding::M0Head => "Does not hold head up by 3-4 months",
            Finding::M0FloppyLimbs => "Floppy limb movements",
            Finding::M0FrogPose => "Rarely moves legs (\"frog-leg\" posture)",
            Finding::M0NoRoll => "Does not roll over",
            Finding::M6NoSit => "Does not sit independently",
            Finding::M6NoStandSupport => "Does not pull to stand with support",
            Finding::M6Regression => "Loss of previously acquired skills",
            Finding::M12NoWalk => "Does not walk independently",
            Finding::M12Falls => "Falls frequently",
            Finding::M12HardRise => "Has difficulty getting up from the floor",
            Finding::M12ProgressiveWeakness => "Progressive muscle weakness",
            Finding::ToneHypotonia => "Marked muscular hypotonia",
            Finding::ToneReflexLow => "Reduced or absent tendon reflexes",
            Finding::ToneProximalWeak => "Predominantly proximal muscle weakness",
            Finding::RespParadox => "Shallow or paradoxical breathing",
            Finding::RespAccessory => "Use of accessory respiratory muscles",
            Finding::RespInfections => "Frequent respiratory infections",
            Finding::FeedFatigue => "Tires quickly during feeding",
            Finding::FeedChokeWeakCry => "Choking on feeds, weak cry",
            Finding::ExamAtrophy => "Muscle atrophy (especially shoulder and pelvic girdle)",
            Finding::ExamTongueFascic => "Tongue fasciculations",
            Finding::ExamBellChest => "Bell-shaped chest",
            Finding::ExamContractures => "Contractures / limited range of motion",
            Finding::NeuroIntellectPreserved => "Intellect preserved",
            Finding::NeuroSensationPreserved => "Sensation intact",
        }
    }

    /// Read this finding's value from a checklist
    pub fn is_set(self, checklist: &Checklist) -> bool {
        *self.field(checklist)
    }

    /// Write this finding's value into a checklist
    pub fn set(self, checklist: &mut Checklist, value: bool) {
        *self.field_mut(checklist) = value;
    }

    /// All findings belonging to one section, in form order
    pub fn in_category(category: FindingCategory) -> impl Iterator<Item = Finding> {
        Finding::ALL
            .into_iter()
            .filter(move |f| f.category() == category)
    }

    fn field(self, c: &Checklist) -> &bool {
        match self {
            Finding::FamEarlyDeath => &c.fam_early_death,
            Finding::FamWeakness => &c.fam_weakness,
            Finding::FamConsanguinity => &c.fam_consanguinity,
            Finding::FamSmn1Carrier => &c.fam_smn1_carrier,
            Finding::M0Head => &c.m0_head,
            Finding::M0FloppyLimbs => &c.m0_floppy_limbs,
            Finding::M0FrogPose => &c.m0_frog_pose,
            Finding::M0NoRoll => &c.m0_no_roll,
            Finding::M6NoSit => &c.m6_no_sit,
            Finding::M6NoStandSupport => &c.m6_no_stand_support,
            Finding::M6Regression => &c.m6_regression,
            Finding::M12NoWalk => &c.m12_no_walk,
            Finding::M12Falls => &c.m12_falls,
            Finding::M12HardRise => &c.m12_hard_rise,
            Finding::M12ProgressiveWeakness => &c.m12_progressive_weakness,
            Finding::ToneHypotonia => &c.tone_hypotonia,
            Finding::ToneReflexLow => &c.tone_reflex_low,
            Finding::ToneProximalWeak => &c.tone_proximal_weak,
            Finding::RespParadox => &c.resp_paradox,
            Finding::RespAccessory => &c.resp_accessory,
            Finding::RespInfections => &c.resp_infections,
            Finding::FeedFatigue => &c.feed_fatigue,
            Finding::FeedChokeWeakCry => &c.feed_choke_weak_cry,
            Finding::ExamAtrophy => &c.exam_atrophy,
            Finding::ExamTongueFascic => &c.exam_tongue_fascic,
            Finding::ExamBellChest => &c.exam_bell_chest,
            Finding::ExamContractures => &c.exam_contractures,
            Finding::NeuroIntellectPreserved => &c.neuro_intellect_preserved,
            Finding::NeuroSensationPreserved => &c.neuro_sensation_preserved,
        }
    }

    fn field_mut(self, c: &mut Checklist) -> &mut bool {
        match self {
            Finding::FamEarlyDeath => &mut c.fam_early_death,
            Finding::FamWeakness => &mut c.fam_weakness,
            Finding::FamConsanguinity => &mut c.fam_consanguinity,
            Finding::FamSmn1Carrier => &mut c.fam_smn1_carrier,
            Finding::M0Head => &mut c.m0_head,
            Finding::M0FloppyLimbs => &mut c.m0_floppy_limbs,
            Finding::M0FrogPose => &mut c.m0_frog_pose,
            Finding::M0NoRoll => &mut c.m0_no_roll,
            Finding::M6NoSit => &mut c.m6_no_sit,
            Finding::M6NoStandSupport => &mut c.m6_no_stand_support,
            Finding::M6Regression => &mut c.m6_regression,
            Finding::M12NoWalk => &mut c.m12_no_walk,
            Finding::M12Falls => &mut c.m12_falls,
            Finding::M12HardRise => &mut c.m12_hard_rise,
            Finding::M12ProgressiveWeakness => &mut c.m12_progressive_weakness,
            Finding::ToneHypotonia => &mut c.tone_hypotonia,
            Finding::ToneReflexLow => &mut c.tone_reflex_low,
            Finding::ToneProximalWeak => &mut c.tone_proximal_weak,
            Finding::RespParadox => &mut c.resp_paradox,
            Finding::RespAccessory => &mut c.resp_accessory,
            Finding::RespInfections => &mut c.resp_infections,
            Finding::FeedFatigue => &mut c.feed_fatigue,
            Finding::FeedChokeWeakCry => &mut c.feed_choke_weak_cry,
            Finding::ExamAtrophy => &mut c.exam_atrophy,
            Finding::ExamTongueFascic => &mut c.exam_tongue_fascic,
            Finding::ExamBellChest => &mut c.exam_bell_chest,
            Finding::ExamContractures => &mut c.exam_contractures,
            Finding::NeuroIntellectPreserved => &mut c.neuro_intellect_preserved,
            Finding::NeuroSensationPreserved => &mut c.neuro_sensation_preserved,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Finding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('-', "_");
        BY_KEY
            .get(key.as_str())
            .copied()
            .ok_or_else(|| Error::UnknownFinding(s.to_string()))
    }
}
