//! Measurement intake, validation, submission, and result interpretation.
//!
//! The pipeline runs leaf-first: a [`features::FeatureVector`] holds raw user
//! input, [`validation::ValidationPolicy`] supplies the per-field range rules,
//! [`submission::SubmissionController`] gates and dispatches the request, and
//! [`interpret`] turns the classifier response into a [`interpret::Diagnosis`].

pub mod features;
pub mod import;
pub mod interpret;
pub mod submission;
pub mod validation;

pub use features::{ExamplePreset, FeatureVector, FEATURE_NAMES};
pub use interpret::{interpret, Diagnosis, Narrative, RankedFeature};
pub use submission::{SubmissionController, SubmissionError, SubmissionState, SubmitOutcome};
pub use validation::ValidationPolicy;
