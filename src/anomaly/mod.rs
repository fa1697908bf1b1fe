// src/anomaly/mod.rs

//! Anomaly classification.
//!
//! - [`classifier`] defines the [`AnomalyClassifier`] call contract.
//! - [`rules`] provides the configurable bound-checking classifier.
//! - [`scan`] runs a classifier over an event sequence and logs hits.

pub mod classifier;
pub mod rules;
pub mod scan;

pub use classifier::{AnomalyClassifier, ClassifierError};
pub use rules::{ClassifierRule, RuleClassifier};
pub use scan::{scan_events, ScanSummary};
