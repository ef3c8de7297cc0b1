//! CSV import for measurement exports.
//!
//! Accepts two-column `feature,value` files such as the exports produced by
//! lab spreadsheet templates. Rows populate a fresh [`FeatureVector`]; fields
//! without a row stay empty so the completeness gate reports them normally.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::screening::features::{FeatureVector, UnknownFieldError};

#[derive(Debug, thiserror::Error)]
pub enum MeasurementImportError {
    #[error("failed to read measurement export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid measurement CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    UnknownField(#[from] UnknownFieldError),
}

#[derive(Debug, Deserialize)]
struct MeasurementRow {
    feature: String,
    value: String,
}

/// Build a vector from a `feature,value` CSV stream.
pub fn vector_from_reader<R: Read>(reader: R) -> Result<FeatureVector, MeasurementImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut vector = FeatureVector::new();
    for record in csv_reader.deserialize::<MeasurementRow>() {
        let row = record?;
        vector.set_field(&row.feature, row.value)?;
    }

    Ok(vector)
}

/// Build a vector from a CSV file on disk.
pub fn vector_from_path(path: impl AsRef<Path>) -> Result<FeatureVector, MeasurementImportError> {
    let file = std::fs::File::open(path)?;
    vector_from_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rows_populate_named_fields() {
        let csv = "feature,value\nradius_mean,13.54\ntexture_mean, 14.36 \n";
        let vector = vector_from_reader(Cursor::new(csv)).expect("valid export");

        assert_eq!(vector.field("radius_mean"), Some("13.54"));
        // ReaderBuilder trims cell whitespace before it reaches the vector.
        assert_eq!(vector.field("texture_mean"), Some("14.36"));
        assert_eq!(vector.missing_fields().len(), 28);
    }

    #[test]
    fn unknown_feature_names_fail_the_import() {
        let csv = "feature,value\nradius_median,13.54\n";
        let err = vector_from_reader(Cursor::new(csv)).expect_err("bad field name");
        assert!(matches!(err, MeasurementImportError::UnknownField(_)));
    }

    #[test]
    fn malformed_rows_surface_as_csv_errors() {
        let csv = "feature,value\nradius_mean\n";
        let err = vector_from_reader(Cursor::new(csv)).expect_err("short row");
        assert!(matches!(err, MeasurementImportError::Csv(_)));
    }
}
