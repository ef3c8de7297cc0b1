use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use super::{PredictionError, PredictionResponse, PredictionService};
use crate::config::PredictorConfig;

/// Fallback surfaced when the transport fails before reaching the server.
const CONNECTIVITY_MESSAGE: &str = "could not connect to the prediction server";

/// A 2xx body is either a prediction or an explicit error payload; anything
/// else is malformed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WirePayload {
    Prediction(PredictionResponse),
    Error { message: String },
}

/// Structured body carried by non-2xx responses.
#[derive(Debug, Deserialize)]
struct WireError {
    message: String,
}

/// reqwest-backed adapter posting the 30-key numeric map as JSON.
pub struct HttpPredictionService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictionService {
    /// Build a client with the configured endpoint and request timeout.
    /// A call that never resolves is bounded by the timeout and surfaces as
    /// a transport failure.
    pub fn new(config: &PredictorConfig) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| PredictionError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        features: &BTreeMap<&'static str, f64>,
    ) -> Result<PredictionResponse, PredictionError> {
        debug!(endpoint = %self.endpoint, "dispatching prediction request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(features)
            .send()
            .await
            .map_err(|_| PredictionError::Transport(CONNECTIVITY_MESSAGE.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|_| PredictionError::Transport(CONNECTIVITY_MESSAGE.to_string()))?;

        if !status.is_success() {
            return match serde_json::from_slice::<WireError>(&body) {
                Ok(err) => Err(PredictionError::Server(err.message)),
                Err(_) => Err(PredictionError::Server(format!(
                    "prediction service returned status {status}"
                ))),
            };
        }

        match serde_json::from_slice::<WirePayload>(&body) {
            Ok(WirePayload::Prediction(prediction)) => Ok(prediction),
            Ok(WirePayload::Error { message }) => Err(PredictionError::Server(message)),
            Err(err) => Err(PredictionError::MalformedResponse(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_payload_decodes_with_optional_importances() {
        let body = r#"{"prediction":"Maligno","probability":0.82}"#;
        match serde_json::from_str::<WirePayload>(body).expect("decodes") {
            WirePayload::Prediction(prediction) => {
                assert_eq!(prediction.prediction, "Maligno");
                assert_eq!(prediction.probability, 0.82);
                assert!(prediction.feature_importances.is_none());
            }
            WirePayload::Error { .. } => panic!("expected a prediction payload"),
        }
    }

    #[test]
    fn success_shaped_error_payload_is_recognized() {
        let body = r#"{"message":"model not loaded"}"#;
        match serde_json::from_str::<WirePayload>(body).expect("decodes") {
            WirePayload::Error { message } => assert_eq!(message, "model not loaded"),
            WirePayload::Prediction(_) => panic!("expected an error payload"),
        }
    }

    #[test]
    fn importances_decode_keyed_by_field_name() {
        let body = r#"{
            "prediction": "Benigno",
            "probability": 0.95,
            "feature_importances": {"radius_mean": 0.25, "concavity_worst": 0.3}
        }"#;
        match serde_json::from_str::<WirePayload>(body).expect("decodes") {
            WirePayload::Prediction(prediction) => {
                let importances = prediction.feature_importances.expect("present");
                assert_eq!(importances["concavity_worst"], 0.3);
            }
            WirePayload::Error { .. } => panic!("expected a prediction payload"),
        }
    }
}
