use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Statistical group every morphological property is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureGroup {
    Mean,
    StandardError,
    Worst,
}

impl FeatureGroup {
    /// Field-name suffix for the group, underscore included.
    pub fn suffix(&self) -> &'static str {
        match self {
            FeatureGroup::Mean => "_mean",
            FeatureGroup::StandardError => "_se",
            FeatureGroup::Worst => "_worst",
        }
    }

    pub const ALL: [FeatureGroup; 3] = [
        FeatureGroup::Mean,
        FeatureGroup::StandardError,
        FeatureGroup::Worst,
    ];
}

/// Canonical field order: the ten morphological properties under `mean`,
/// then `se`, then `worst`. Field identity is stable; the prediction wire
/// format keys on these exact names.
pub const FEATURE_NAMES: [&str; 30] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave_points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave_points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave_points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

/// Hardcoded example vectors used for demonstrations and manual testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamplePreset {
    Benign,
    Malignant,
}

impl ExamplePreset {
    /// Literal raw-text values, aligned with [`FEATURE_NAMES`].
    pub fn values(&self) -> [&'static str; 30] {
        match self {
            ExamplePreset::Benign => [
                "13.54", "14.36", "87.46", "566.3", "0.09779", "0.08129", "0.06664", "0.04781",
                "0.1885", "0.05766", "0.2699", "0.7886", "2.058", "23.56", "0.008462", "0.0146",
                "0.02387", "0.01315", "0.0198", "0.0023", "15.11", "19.26", "99.7", "711.2",
                "0.144", "0.1773", "0.239", "0.1288", "0.2977", "0.07259",
            ],
            ExamplePreset::Malignant => [
                "17.99", "10.38", "122.8", "1001", "0.1184", "0.2776", "0.3001", "0.1471",
                "0.2419", "0.07871", "1.095", "0.9053", "8.589", "153.4", "0.006399", "0.04904",
                "0.05373", "0.01587", "0.03003", "0.006193", "25.38", "17.33", "184.6", "2019",
                "0.1622", "0.6656", "0.7119", "0.2654", "0.4601", "0.1189",
            ],
        }
    }
}

/// A field name that is not one of the 30 canonical measurements.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown measurement field '{0}'")]
pub struct UnknownFieldError(pub String);

/// Raised by [`FeatureVector::to_numeric_map`] with the complete list of
/// offending fields, never just the first one encountered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fields empty or non-numeric: {}", fields.join(", "))]
pub struct FeatureParseError {
    pub fields: Vec<&'static str>,
}

/// Raw-text store for one screening form session.
///
/// Values stay as entered so partial or malformed input survives editing;
/// conversion to numbers happens only at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    values: Vec<String>,
    dirty: bool,
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureVector {
    /// Fresh vector with every field empty.
    pub fn new() -> Self {
        Self {
            values: vec![String::new(); FEATURE_NAMES.len()],
            dirty: false,
        }
    }

    fn index_of(name: &str) -> Option<usize> {
        FEATURE_NAMES.iter().position(|field| *field == name)
    }

    /// Replace a single field's raw text. No validation happens here.
    pub fn set_field(
        &mut self,
        name: &str,
        raw: impl Into<String>,
    ) -> Result<(), UnknownFieldError> {
        let index = Self::index_of(name).ok_or_else(|| UnknownFieldError(name.to_string()))?;
        self.values[index] = raw.into();
        self.dirty = true;
        Ok(())
    }

    /// Raw text for a field, or `None` for an unknown name.
    pub fn field(&self, name: &str) -> Option<&str> {
        Self::index_of(name).map(|index| self.values[index].as_str())
    }

    /// Atomically replace all 30 fields with an example vector.
    pub fn load_preset(&mut self, preset: ExamplePreset) {
        for (slot, value) in self.values.iter_mut().zip(preset.values()) {
            *slot = value.to_string();
        }
        self.dirty = true;
    }

    /// Clear every field back to the fresh state.
    pub fn reset(&mut self) {
        for slot in &mut self.values {
            slot.clear();
        }
        self.dirty = false;
    }

    /// True once any field has been edited since creation or reset.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Names of fields whose raw text is exactly the empty string.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        FEATURE_NAMES
            .iter()
            .zip(&self.values)
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Parse every field to a float, keyed by canonical name.
    ///
    /// A field is missing iff its raw text equals the empty string; all other
    /// text goes to the float parser untrimmed. Every empty or unparsable
    /// field is collected before failing.
    pub fn to_numeric_map(&self) -> Result<BTreeMap<&'static str, f64>, FeatureParseError> {
        let mut parsed = BTreeMap::new();
        let mut invalid = Vec::new();

        for (name, raw) in FEATURE_NAMES.iter().zip(&self.values) {
            if raw.is_empty() {
                invalid.push(*name);
                continue;
            }
            match raw.parse::<f64>() {
                Ok(value) => {
                    parsed.insert(*name, value);
                }
                Err(_) => invalid.push(*name),
            }
        }

        if invalid.is_empty() {
            Ok(parsed)
        } else {
            Err(FeatureParseError { fields: invalid })
        }
    }
}
