#![forbid(unsafe_code)]

//! Core domain model and risk logic for the SMA screening toolkit.
//!
//! This crate provides:
//! - Domain types (checklist, statuses, results)
//! - Finding catalog
//! - Checklist and carrier-pair risk engines
//! - Message catalog and printable reports
//! - Usage counter store

pub mod types;
pub mod error;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod checklist;
pub mod pair;
pub mod messages;
pub mod report;
pub mod usage;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::Finding;
pub use config::Config;
pub use checklist::evaluate_checklist;
pub use pair::{evaluate_pair, PairKey};
pub use messages::{EnglishCatalog, MessageCatalog};
pub use usage::{FileUsageStore, Session, Subscription, UsageStore};
