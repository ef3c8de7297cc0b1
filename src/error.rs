use crate::config::ConfigError;
use crate::predictor::PredictionError;
use crate::screening::features::UnknownFieldError;
use crate::screening::import::MeasurementImportError;
use crate::screening::submission::SubmissionError;
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    InvalidArgument(String),
    Import(MeasurementImportError),
    Field(UnknownFieldError),
    Prediction(PredictionError),
    Submission(SubmissionError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::InvalidArgument(message) => write!(f, "invalid argument: {}", message),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Field(err) => write!(f, "input error: {}", err),
            AppError::Prediction(err) => write!(f, "prediction error: {}", err),
            AppError::Submission(err) => write!(f, "submission error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::InvalidArgument(_) => None,
            AppError::Import(err) => Some(err),
            AppError::Field(err) => Some(err),
            AppError::Prediction(err) => Some(err),
            AppError::Submission(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MeasurementImportError> for AppError {
    fn from(value: MeasurementImportError) -> Self {
        Self::Import(value)
    }
}

impl From<UnknownFieldError> for AppError {
    fn from(value: UnknownFieldError) -> Self {
        Self::Field(value)
    }
}

impl From<PredictionError> for AppError {
    fn from(value: PredictionError) -> Self {
        Self::Prediction(value)
    }
}

impl From<SubmissionError> for AppError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value)
    }
}
