//! Variable-importance averaging over PMML model documents
//!
//! A document may describe several models (a battery run), each as a
//! `MiningModel`, `TreeModel` or `RegressionModel` element. Importances
//! live on the active `MiningField` entries of each model's
//! `MiningSchema` and are averaged across all eligible models. Purely
//! linear/logistic algorithms report no importances and are excluded.

use indexmap::IndexMap;
use log::warn;

use crate::doc::xml::{elements, ModelDoc};

/// Model element names a PMML document may carry.
const MODEL_ELEMENTS: [&str; 3] = ["MiningModel", "TreeModel", "RegressionModel"];

/// Algorithms with no meaningful variable importances.
const EXCLUDED_ALGORITHMS: [&str; 3] = ["Logit", "Regress", "2SLS"];

/// Average variable importance per predictor across all eligible models,
/// on a 0..100 scale, in first-seen predictor order.
///
/// An active field missing its `importance` attribute contributes a flat
/// 100: the upstream tool omits the attribute on the top-ranked
/// predictor, and this compensation keeps battery averages comparable.
/// Returns an empty map when the document holds no eligible model.
pub fn importances(doc: &ModelDoc) -> IndexMap<String, f64> {
    let Ok(pmml) = doc.root_named("PMML") else {
        return IndexMap::new();
    };

    let mut sums: IndexMap<String, f64> = IndexMap::new();
    let mut eligible = 0usize;
    for tag in MODEL_ELEMENTS {
        for model in elements(pmml, tag) {
            let algorithm = model.attribute("algorithmName").unwrap_or("");
            if EXCLUDED_ALGORITHMS.contains(&algorithm) {
                continue;
            }
            eligible += 1;
            for schema in elements(model, "MiningSchema") {
                for field in elements(schema, "MiningField") {
                    accumulate_field(field, &mut sums);
                }
            }
        }
    }

    if eligible == 0 {
        return IndexMap::new();
    }
    for sum in sums.values_mut() {
        *sum /= eligible as f64;
    }
    sums
}

fn accumulate_field(field: roxmltree::Node<'_, '_>, sums: &mut IndexMap<String, f64>) {
    let Some(name) = field.attribute("name") else {
        warn!("MiningField without a name attribute; skipped");
        return;
    };
    if field.attribute("usageType") != Some("active") {
        return;
    }
    let contribution = match field.attribute("importance") {
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) => 100.0 * value,
            Err(_) => {
                warn!("unparseable importance {:?} on field {}; skipped", raw, name);
                return;
            }
        },
        None => 100.0,
    };
    *sums.entry(name.to_string()).or_insert(0.0) += contribution;
}

/// Predictors ranked by ascending average importance, the order a
/// horizontal bar chart stacks them in.
pub fn ranked(importances: &IndexMap<String, f64>) -> Vec<(String, f64)> {
    let mut pairs: Vec<(String, f64)> = importances
        .iter()
        .map(|(name, &score)| (name.clone(), score))
        .collect();
    pairs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    pairs
}
