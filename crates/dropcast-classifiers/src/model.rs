//! Model trait and schema checks

use dropcast_core::{Error, FeatureFrame, Result};

/// Trait for all tabular classifiers.
///
/// A model is immutable once loaded; `predict_proba` and `predict` take
/// `&self`, so one instance can serve concurrent callers without locking.
pub trait Model: Send + Sync {
    /// Get the model name
    fn name(&self) -> &str;

    /// Feature names in trained column order
    fn feature_names(&self) -> &[String];

    /// Class labels, indexed the same way as the probability columns
    fn classes(&self) -> &[i64];

    /// Training objective, e.g. "multiclass"
    fn objective_name(&self) -> &str {
        "unknown"
    }

    /// Number of fitted estimators for ensembles
    fn num_estimators(&self) -> Option<usize> {
        None
    }

    /// Class probabilities, one vector per frame row
    fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<Vec<f64>>>;

    /// Most probable class label for every frame row
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>> {
        let classes = self.classes();
        self.predict_proba(frame)?
            .iter()
            .map(|row| {
                argmax(row)
                    .and_then(|idx| classes.get(idx).copied())
                    .ok_or_else(|| {
                        Error::inference(format!(
                            "model '{}' returned {} probabilities for {} classes",
                            self.name(),
                            row.len(),
                            classes.len()
                        ))
                    })
            })
            .collect()
    }
}

/// Index of the largest value; the first one wins ties
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, &value)| match best {
            Some((_, top)) if top >= value => best,
            _ => Some((idx, value)),
        })
        .map(|(idx, _)| idx)
}

/// Verify frame columns equal the trained feature names, order included
pub fn check_schema(expected: &[String], columns: &[String]) -> Result<()> {
    if expected == columns {
        return Ok(());
    }

    let missing: Vec<&str> = expected
        .iter()
        .filter(|name| !columns.contains(name))
        .map(String::as_str)
        .collect();
    let extra: Vec<&str> = columns
        .iter()
        .filter(|name| !expected.contains(name))
        .map(String::as_str)
        .collect();

    let detail = if missing.is_empty() && extra.is_empty() {
        if expected.len() == columns.len() {
            "columns are not in trained order".to_string()
        } else {
            "duplicate columns".to_string()
        }
    } else {
        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(format!("missing [{}]", missing.join(", ")));
        }
        if !extra.is_empty() {
            parts.push(format!("unexpected [{}]", extra.join(", ")));
        }
        parts.join("; ")
    };

    Err(Error::inference(format!(
        "feature names do not match the trained schema: {}",
        detail
    )))
}
