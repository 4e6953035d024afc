// src/utils/report.rs
use std::collections::BTreeMap;

use crate::core::{Saliency, Value};

const WIDTH: usize = 37;
const LABEL_WIDTH: usize = 24;

fn render_value(value: &Value) -> String {
    match value {
        Value::Number(v) => format!("{:.3}", v),
        other => other.to_string(),
    }
}

/// Renders one titled table per output, in map order, separated by newlines.
pub fn lime_results_to_string(saliencies: &BTreeMap<String, Saliency>) -> String {
    saliencies
        .iter()
        .map(|(name, saliency)| saliency_table(name, saliency))
        .collect::<Vec<_>>()
        .join("\n")
}

fn saliency_table(name: &str, saliency: &Saliency) -> String {
    let rule = "-".repeat(WIDTH);
    let mut lines = Vec::with_capacity(saliency.per_feature_importance().len() + 6);
    lines.push(format!("{:=<width$}", format!("=== {} LIME Scores ", name), width = WIDTH));
    lines.push("      Feature      Value |  Saliency ".to_string());
    lines.push(rule.clone());
    for importance in saliency.per_feature_importance() {
        let feature_name = importance.feature.name();
        let value_width = LABEL_WIDTH.saturating_sub(feature_name.len() + 4);
        lines.push(format!(
            " {} = {:>vw$} | {:>10.3}",
            feature_name,
            render_value(importance.feature.value()),
            importance.score,
            vw = value_width
        ));
    }
    lines.push(rule);
    lines.push(format!(
        "{:>lw$} | {:>10}",
        "Prediction",
        render_value(saliency.output().value()),
        lw = LABEL_WIDTH
    ));
    lines.push("=".repeat(WIDTH));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Feature, FeatureDomain, FeatureImportance, Output};
    use pretty_assertions::assert_eq;

    fn saliency(prediction: f64, scores: [f64; 3]) -> Saliency {
        let features = vec![
            Feature::numerical("Feature 0", 0.0),
            Feature::categorical("Feature 1", "A", FeatureDomain::categorical(["A", "B"])),
            Feature::numerical("Feature 2", 2.0),
        ];
        Saliency::new(
            Output::number("out", prediction),
            features
                .into_iter()
                .zip(scores)
                .map(|(f, s)| FeatureImportance::new(f, s))
                .collect(),
        )
    }

    #[test]
    fn renders_blocks_in_map_order() {
        let mut map = BTreeMap::new();
        map.insert("Semi-Categorical".to_string(), saliency(-2.0, [-2.03, -2.7456, 1.4039]));
        map.insert("Semi-Categorical*2".to_string(), saliency(-4.0, [-3.964, -5.363, 2.887]));

        let expected = "=== Semi-Categorical LIME Scores ====\n\
                        \x20     Feature      Value |  Saliency \n\
                        -------------------------------------\n\
                        \x20Feature 0 =       0.000 |     -2.030\n\
                        \x20Feature 1 =           A |     -2.746\n\
                        \x20Feature 2 =       2.000 |      1.404\n\
                        -------------------------------------\n\
                        \x20             Prediction |     -2.000\n\
                        =====================================\n\
                        === Semi-Categorical*2 LIME Scores ==\n\
                        \x20     Feature      Value |  Saliency \n\
                        -------------------------------------\n\
                        \x20Feature 0 =       0.000 |     -3.964\n\
                        \x20Feature 1 =           A |     -5.363\n\
                        \x20Feature 2 =       2.000 |      2.887\n\
                        -------------------------------------\n\
                        \x20             Prediction |     -4.000\n\
                        =====================================";
        assert_eq!(lime_results_to_string(&map), expected);
    }

    #[test]
    fn every_line_has_fixed_width() {
        let mut map = BTreeMap::new();
        map.insert("y".to_string(), saliency(1.5, [0.1, 0.2, 0.3]));
        for line in lime_results_to_string(&map).lines() {
            assert_eq!(line.len(), WIDTH, "{:?}", line);
        }
    }
}
