//! Validation and interpretation pipeline for a remote breast-mass classifier.
//!
//! The crate collects the 30 cell-morphology measurements of the Wisconsin
//! diagnostic feature set, gates submission behind completeness and range
//! checks, posts the numeric vector to an external prediction service, and
//! turns the raw response into a ranked, labeled diagnosis report. Screen
//! rendering and navigation stay outside; the bundled CLI is the only
//! front-end shipped here.

pub mod config;
pub mod error;
pub mod predictor;
pub mod screening;
pub mod telemetry;
