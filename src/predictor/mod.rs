//! Outbound port for the remote classifier.

mod http;

pub use http::HttpPredictionService;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Wire label the classifier reports for a malignant mass.
pub const MALIGNANT_LABEL: &str = "Maligno";

/// Wire label the classifier reports for a benign mass.
pub const BENIGN_LABEL: &str = "Benigno";

/// Successful classifier response.
///
/// `probability` is the model's confidence in `prediction`, not a fixed-class
/// probability. `feature_importances` is optional and keyed by canonical
/// field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importances: Option<BTreeMap<String, f64>>,
}

/// Failures reaching or talking to the prediction service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    /// Network unreachable, timed out, or failed before the server answered.
    #[error("could not reach the prediction service: {0}")]
    Transport(String),
    /// The service answered with a structured `{message}` error payload.
    #[error("{0}")]
    Server(String),
    /// The body was neither a prediction nor a structured error.
    #[error("unreadable response from the prediction service: {0}")]
    MalformedResponse(String),
}

/// Seam between the submission controller and the network.
///
/// The controller is generic over this trait so tests can substitute a
/// recording double for the HTTP adapter.
#[allow(async_fn_in_trait)]
pub trait PredictionService {
    async fn predict(
        &self,
        features: &BTreeMap<&'static str, f64>,
    ) -> Result<PredictionResponse, PredictionError>;
}
