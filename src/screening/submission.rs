use tracing::{info, warn};

use crate::predictor::{PredictionError, PredictionService};
use crate::screening::features::{FeatureVector, FEATURE_NAMES};
use crate::screening::interpret::{interpret, Diagnosis};
use crate::screening::validation::ValidationPolicy;

/// Tagged submission state. Only the states that survive across calls are
/// stored; transient evaluation states resolve into a [`SubmitOutcome`]
/// within a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    /// Out-of-range fields were found; the next step is explicit user
    /// consent or cancellation. Consent is one-shot.
    ConfirmingOverride { out_of_range: Vec<&'static str> },
    /// A request is in flight; further submit triggers are ignored.
    Submitting,
}

/// Terminal result of one submission attempt. Every variant returns the
/// controller to `Idle` except `ConfirmationRequired`, which parks it in
/// `ConfirmingOverride` until the user decides.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Required fields are empty; nothing was sent.
    Blocked { missing: Vec<&'static str> },
    /// All fields are filled but some fall outside their advisory range;
    /// the caller must confirm or cancel before anything is sent.
    ConfirmationRequired { out_of_range: Vec<&'static str> },
    /// A submission is already in flight; this trigger was a no-op.
    Busy,
    /// The classifier answered and the response was interpreted.
    Completed(Diagnosis),
    /// The attempt failed; entered data is preserved for correction.
    Failed(SubmissionError),
}

/// Recoverable submission failures. None of these are fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("required fields are empty or non-numeric: {}", fields.join(", "))]
    IncompleteInput { fields: Vec<&'static str> },
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Orchestrates validation, optional override confirmation, dispatch, and
/// result interpretation for one form session.
///
/// Generic over the prediction seam so tests can record dispatches without a
/// network.
pub struct SubmissionController<S> {
    service: S,
    policy: ValidationPolicy,
    state: SubmissionState,
}

impl<S: PredictionService> SubmissionController<S> {
    pub fn new(service: S) -> Self {
        Self::with_policy(service, ValidationPolicy::standard())
    }

    pub fn with_policy(service: S, policy: ValidationPolicy) -> Self {
        Self {
            service,
            policy,
            state: SubmissionState::Idle,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Run a submission attempt from scratch: completeness gate, then range
    /// gate, then dispatch. A pending override from an earlier attempt is
    /// discarded before the gates run.
    pub async fn submit(&mut self, vector: &FeatureVector) -> SubmitOutcome {
        if self.is_busy() {
            warn!("submit ignored: a request is already in flight");
            return SubmitOutcome::Busy;
        }
        self.state = SubmissionState::Idle;

        let missing = vector.missing_fields();
        if !missing.is_empty() {
            info!(count = missing.len(), "submission blocked on empty fields");
            return SubmitOutcome::Blocked { missing };
        }

        let out_of_range: Vec<&'static str> = FEATURE_NAMES
            .iter()
            .filter(|name| {
                let raw = vector.field(name).unwrap_or("");
                !self.policy.is_in_range(name, raw)
            })
            .copied()
            .collect();
        if !out_of_range.is_empty() {
            info!(
                count = out_of_range.len(),
                "out-of-range values need confirmation"
            );
            self.state = SubmissionState::ConfirmingOverride {
                out_of_range: out_of_range.clone(),
            };
            return SubmitOutcome::ConfirmationRequired { out_of_range };
        }

        self.dispatch(vector).await
    }

    /// Proceed past a pending range-gate confirmation. With nothing pending
    /// this degrades to a fresh [`submit`](Self::submit), so the gates always
    /// re-run; consent is never remembered across attempts.
    pub async fn confirm_override(&mut self, vector: &FeatureVector) -> SubmitOutcome {
        match self.state {
            SubmissionState::Submitting => SubmitOutcome::Busy,
            SubmissionState::ConfirmingOverride { .. } => {
                info!("user accepted out-of-range values");
                self.state = SubmissionState::Idle;
                self.dispatch(vector).await
            }
            SubmissionState::Idle => self.submit(vector).await,
        }
    }

    /// Abandon a pending confirmation and return to `Idle`. No request is
    /// sent and the entered data is untouched.
    pub fn cancel_override(&mut self) {
        if matches!(self.state, SubmissionState::ConfirmingOverride { .. }) {
            info!("user cancelled the out-of-range override");
            self.state = SubmissionState::Idle;
        }
    }

    async fn dispatch(&mut self, vector: &FeatureVector) -> SubmitOutcome {
        // The gates guarantee this succeeds, but a bypassed ordering must
        // still fail as incomplete input rather than panic.
        let features = match vector.to_numeric_map() {
            Ok(map) => map,
            Err(err) => {
                return SubmitOutcome::Failed(SubmissionError::IncompleteInput {
                    fields: err.fields,
                })
            }
        };

        self.state = SubmissionState::Submitting;
        let guard = InFlightGuard {
            state: &mut self.state,
        };
        let result = self.service.predict(&features).await;
        drop(guard);

        match result {
            Ok(response) => {
                info!(
                    prediction = %response.prediction,
                    probability = response.probability,
                    "classifier responded"
                );
                SubmitOutcome::Completed(interpret(&response))
            }
            Err(err) => {
                warn!(error = %err, "prediction request failed");
                SubmitOutcome::Failed(SubmissionError::Prediction(err))
            }
        }
    }
}

/// Restores `Idle` when dropped. Dropping the dispatch future mid-await
/// (caller-side cancellation or a timeout wrapper) must not leave the
/// controller stuck in `Submitting` with nothing in flight.
struct InFlightGuard<'a> {
    state: &'a mut SubmissionState,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        *self.state = SubmissionState::Idle;
    }
}
