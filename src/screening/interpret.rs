use serde::Serialize;
use std::collections::BTreeMap;

use crate::predictor::{PredictionResponse, MALIGNANT_LABEL};
use crate::screening::features::FeatureGroup;

/// Number of ranked features surfaced in the report.
const TOP_FEATURE_COUNT: usize = 5;

/// Confidence above which the precision note stops hedging.
const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.9;

/// One entry of the ranked feature-importance list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFeature {
    /// Field name with the group suffix and underscores stripped.
    pub display_name: String,
    /// Importance scaled to a percentage.
    pub importance_percent: f64,
}

/// Fixed recommendation bundle selected per class and confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Narrative {
    pub headline: &'static str,
    pub recommendations: &'static [&'static str],
    pub precision_note: &'static str,
}

/// Interpreted diagnosis handed to the presentation layer. Field names and
/// shapes are a stable contract; consumers destructure them by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub predicted_class: String,
    pub is_malignant: bool,
    pub benign_probability: f64,
    pub malignant_probability: f64,
    pub top_features: Vec<RankedFeature>,
    pub narrative: Narrative,
}

/// Split the single reported confidence into both class probabilities.
///
/// The server reports confidence in the predicted class; the other class
/// always gets the arithmetic complement, so the two sides sum to one.
pub fn class_probabilities(predicted_class: &str, probability: f64) -> (f64, f64) {
    let is_malignant = predicted_class == MALIGNANT_LABEL;
    let malignant = if is_malignant {
        probability
    } else {
        1.0 - probability
    };
    (1.0 - malignant, malignant)
}

/// Display label for a feature: the group suffix goes, remaining underscores
/// become spaces.
fn display_label(name: &str) -> String {
    let stem = FeatureGroup::ALL
        .iter()
        .find_map(|group| name.strip_suffix(group.suffix()))
        .unwrap_or(name);
    stem.replace('_', " ")
}

/// Rank importances descending and keep the top five.
///
/// Ties keep alphabetical order by raw feature name: the map iterates
/// alphabetically and the sort is stable on the value alone.
pub fn rank_importances(importances: &BTreeMap<String, f64>) -> Vec<RankedFeature> {
    let mut entries: Vec<(&str, f64)> = importances
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.truncate(TOP_FEATURE_COUNT);

    entries
        .into_iter()
        .map(|(name, value)| RankedFeature {
            display_name: display_label(name),
            importance_percent: value * 100.0,
        })
        .collect()
}

/// Select the fixed recommendation bundle for the reported class and
/// confidence.
pub fn narrative(is_malignant: bool, probability: f64) -> Narrative {
    let precision_note = if probability > HIGH_CONFIDENCE_THRESHOLD {
        "The model reports high confidence in this classification."
    } else {
        "The model reports moderate confidence; consider repeating the test."
    };

    if is_malignant {
        Narrative {
            headline: "A malignant classification indicates a high likelihood of cancer.",
            recommendations: &[
                "Contact an oncologist immediately",
                "Schedule additional diagnostic tests",
                "Do not panic: many cancers respond well to treatment",
            ],
            precision_note,
        }
    } else {
        Narrative {
            headline: "A benign classification indicates a low likelihood of cancer.",
            recommendations: &[
                "Keep up regular medical follow-ups",
                "Perform monthly self-examinations",
                "Schedule an annual mammogram if over 40",
            ],
            precision_note,
        }
    }
}

/// Normalize a raw classifier response into the interpreted diagnosis.
pub fn interpret(response: &PredictionResponse) -> Diagnosis {
    let is_malignant = response.prediction == MALIGNANT_LABEL;
    let (benign_probability, malignant_probability) =
        class_probabilities(&response.prediction, response.probability);

    let top_features = response
        .feature_importances
        .as_ref()
        .map(rank_importances)
        .unwrap_or_default();

    Diagnosis {
        predicted_class: response.prediction.clone(),
        is_malignant,
        benign_probability,
        malignant_probability,
        top_features,
        narrative: narrative(is_malignant, response.probability),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::BENIGN_LABEL;

    #[test]
    fn malignant_confidence_maps_directly() {
        let (benign, malignant) = class_probabilities(MALIGNANT_LABEL, 0.82);
        assert_eq!(malignant, 0.82);
        assert!((benign - 0.18).abs() < 1e-12);
        assert_eq!(benign + malignant, 1.0);
    }

    #[test]
    fn benign_confidence_is_complemented() {
        let (benign, malignant) = class_probabilities(BENIGN_LABEL, 0.75);
        assert_eq!(benign, 0.75);
        assert_eq!(malignant, 0.25);
    }

    #[test]
    fn unknown_class_is_treated_as_benign() {
        let (benign, _) = class_probabilities("", 0.6);
        assert_eq!(benign, 0.6);
    }

    #[test]
    fn labels_drop_group_suffix_and_underscores() {
        assert_eq!(display_label("concavity_worst"), "concavity");
        assert_eq!(display_label("concave_points_mean"), "concave points");
        assert_eq!(display_label("texture_se"), "texture");
        assert_eq!(display_label("radius"), "radius");
    }

    #[test]
    fn ranking_orders_descending_and_scales_to_percent() {
        let importances: BTreeMap<String, f64> = [
            ("concavity_worst", 0.30),
            ("radius_mean", 0.25),
            ("texture_se", 0.05),
            ("area_worst", 0.15),
            ("smoothness_mean", 0.10),
            ("symmetry_worst", 0.08),
            ("perimeter_mean", 0.07),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        let ranked = rank_importances(&importances);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].display_name, "concavity");
        assert_eq!(ranked[0].importance_percent, 30.0);
        assert_eq!(ranked[1].display_name, "radius");
        assert_eq!(ranked[4].display_name, "symmetry");
    }

    #[test]
    fn importance_ties_break_alphabetically() {
        let importances: BTreeMap<String, f64> = [
            ("texture_mean", 0.2),
            ("radius_mean", 0.2),
            ("area_mean", 0.2),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        let ranked = rank_importances(&importances);
        let names: Vec<_> = ranked.iter().map(|f| f.display_name.as_str()).collect();
        assert_eq!(names, vec!["area", "radius", "texture"]);
    }

    #[test]
    fn precision_note_switches_above_point_nine() {
        let confident = narrative(true, 0.95);
        assert!(confident.precision_note.contains("high confidence"));

        let hedged = narrative(true, 0.9);
        assert!(hedged.precision_note.contains("moderate confidence"));
    }

    #[test]
    fn interpret_assembles_the_full_diagnosis() {
        let response = PredictionResponse {
            prediction: MALIGNANT_LABEL.to_string(),
            probability: 0.82,
            feature_importances: Some(
                [("concavity_worst".to_string(), 0.30)].into_iter().collect(),
            ),
        };

        let diagnosis = interpret(&response);
        assert!(diagnosis.is_malignant);
        assert_eq!(diagnosis.malignant_probability, 0.82);
        assert!((diagnosis.benign_probability - 0.18).abs() < 1e-12);
        assert_eq!(diagnosis.top_features[0].display_name, "concavity");
        assert!(diagnosis.narrative.headline.contains("malignant"));
    }

    #[test]
    fn missing_importances_yield_an_empty_ranking() {
        let response = PredictionResponse {
            prediction: BENIGN_LABEL.to_string(),
            probability: 0.93,
            feature_importances: None,
        };

        let diagnosis = interpret(&response);
        assert!(diagnosis.top_features.is_empty());
        assert!(!diagnosis.is_malignant);
    }
}
