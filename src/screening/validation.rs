use std::collections::BTreeMap;

/// Advisory message returned for raw text that does not parse as a number.
const INVALID_NUMBER_MESSAGE: &str = "Not a valid numeric value";

/// Fallback description for fields without a configured entry.
const GENERIC_DESCRIPTION: &str = "Numeric cell-morphology measurement";

/// Static rule for one constrained field: a closed range plus the advisory
/// text shown alongside it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRule {
    pub range: (f64, f64),
    pub description: &'static str,
}

/// Range rules and advisory descriptions for the diagnostically salient
/// fields. Pure configuration lookup: no I/O, no mutation.
///
/// Fields absent from the table are unconstrained; any parseable number
/// passes. Descriptions never block submission by themselves.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    rules: BTreeMap<&'static str, FieldRule>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl ValidationPolicy {
    /// The standard rule set: twelve constrained fields with ranges drawn
    /// from the Wisconsin diagnostic dataset value spans.
    pub fn standard() -> Self {
        let entries: [(&'static str, FieldRule); 12] = [
            (
                "radius_mean",
                FieldRule {
                    range: (5.0, 30.0),
                    description: "Mean nucleus radius in micrometers, typically 5-30",
                },
            ),
            (
                "texture_mean",
                FieldRule {
                    range: (9.0, 40.0),
                    description: "Mean gray-scale texture variation, typically 9-40",
                },
            ),
            (
                "perimeter_mean",
                FieldRule {
                    range: (40.0, 190.0),
                    description: "Mean nucleus perimeter in micrometers, typically 40-190",
                },
            ),
            (
                "smoothness_mean",
                FieldRule {
                    range: (0.05, 0.17),
                    description: "Mean local radius variation, typically 0.05-0.17",
                },
            ),
            (
                "compactness_mean",
                FieldRule {
                    range: (0.01, 0.4),
                    description: "Mean perimeter^2/area - 1, typically 0.01-0.4",
                },
            ),
            (
                "concavity_mean",
                FieldRule {
                    range: (0.0, 0.45),
                    description: "Mean severity of contour concavities, typically up to 0.45",
                },
            ),
            (
                "concave_points_mean",
                FieldRule {
                    range: (0.0, 0.21),
                    description: "Mean count of concave contour points, typically up to 0.21",
                },
            ),
            (
                "radius_worst",
                FieldRule {
                    range: (7.0, 40.0),
                    description: "Largest nucleus radius observed, typically 7-40",
                },
            ),
            (
                "perimeter_worst",
                FieldRule {
                    range: (50.0, 260.0),
                    description: "Largest nucleus perimeter observed, typically 50-260",
                },
            ),
            (
                "area_worst",
                FieldRule {
                    range: (180.0, 4500.0),
                    description: "Largest nucleus area observed, typically 180-4500",
                },
            ),
            (
                "concavity_worst",
                FieldRule {
                    range: (0.0, 1.3),
                    description: "Worst contour concavity severity, typically up to 1.3",
                },
            ),
            (
                "concave_points_worst",
                FieldRule {
                    range: (0.0, 0.3),
                    description: "Worst concave contour point count, typically up to 0.3",
                },
            ),
        ];

        let rules: BTreeMap<_, _> = entries.into_iter().collect();
        for (name, rule) in &rules {
            assert!(rule.range.0 <= rule.range.1, "{name} range bounds reversed");
        }

        Self { rules }
    }

    /// Configured rule for a field, if it has one.
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    /// True iff `raw` parses as a number and either the field has no
    /// configured range or the value falls inside it, bounds inclusive.
    pub fn is_in_range(&self, name: &str, raw: &str) -> bool {
        let Ok(value) = raw.parse::<f64>() else {
            return false;
        };
        match self.rules.get(name) {
            Some(rule) => value >= rule.range.0 && value <= rule.range.1,
            None => true,
        }
    }

    /// Advisory text for a field given its current raw text.
    ///
    /// Unparsable input gets a fixed invalid-number message; otherwise the
    /// configured description, degrading to a generic fallback for
    /// unconstrained fields. Never errors.
    pub fn describe(&self, name: &str, raw: &str) -> &'static str {
        if raw.parse::<f64>().is_err() {
            return INVALID_NUMBER_MESSAGE;
        }
        self.rules
            .get(name)
            .map(|rule| rule.description)
            .unwrap_or(GENERIC_DESCRIPTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::features::{ExamplePreset, FeatureVector, FEATURE_NAMES};

    #[test]
    fn radius_mean_range_is_inclusive() {
        let policy = ValidationPolicy::standard();
        assert!(policy.is_in_range("radius_mean", "15"));
        assert!(policy.is_in_range("radius_mean", "5"));
        assert!(policy.is_in_range("radius_mean", "30"));
        assert!(!policy.is_in_range("radius_mean", "100"));
        assert!(!policy.is_in_range("radius_mean", "4.99"));
        assert!(!policy.is_in_range("radius_mean", "abc"));
    }

    #[test]
    fn unconstrained_fields_pass_any_parseable_number() {
        let policy = ValidationPolicy::standard();
        assert!(policy.is_in_range("area_mean", "566.3"));
        assert!(policy.is_in_range("area_mean", "-1000000"));
        assert!(!policy.is_in_range("area_mean", "not-a-number"));
    }

    #[test]
    fn describe_degrades_rather_than_erroring() {
        let policy = ValidationPolicy::standard();
        assert_eq!(policy.describe("radius_mean", "abc"), INVALID_NUMBER_MESSAGE);
        assert_eq!(
            policy.describe("radius_mean", "15"),
            "Mean nucleus radius in micrometers, typically 5-30"
        );
        assert_eq!(policy.describe("area_mean", "566.3"), GENERIC_DESCRIPTION);
        assert_eq!(policy.describe("not_a_field", "1.0"), GENERIC_DESCRIPTION);
    }

    #[test]
    fn lookups_are_idempotent() {
        let policy = ValidationPolicy::standard();
        assert_eq!(
            policy.is_in_range("radius_mean", "15"),
            policy.is_in_range("radius_mean", "15")
        );
        assert_eq!(
            policy.describe("texture_se", "0.78"),
            policy.describe("texture_se", "0.78")
        );
    }

    #[test]
    fn every_constrained_field_is_a_canonical_field() {
        let policy = ValidationPolicy::standard();
        assert_eq!(policy.rules.len(), 12);
        for name in policy.rules.keys() {
            assert!(FEATURE_NAMES.contains(name), "unknown rule key {name}");
        }
    }

    #[test]
    fn every_range_has_ordered_bounds() {
        let policy = ValidationPolicy::standard();
        for (name, rule) in &policy.rules {
            assert!(rule.range.0 <= rule.range.1, "{name}");
        }
    }

    #[test]
    fn both_presets_pass_every_range_rule() {
        let policy = ValidationPolicy::standard();
        for preset in [ExamplePreset::Benign, ExamplePreset::Malignant] {
            let mut vector = FeatureVector::new();
            vector.load_preset(preset);
            for name in FEATURE_NAMES {
                let raw = vector.field(name).expect("canonical field");
                assert!(policy.is_in_range(name, raw), "{preset:?} {name} out of range");
            }
        }
    }
}
