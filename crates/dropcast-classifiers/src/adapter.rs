//! Inference adapter: one record in, one class label out

use dropcast_core::{Error, FeatureFrame, ModelInput, Result};
use std::collections::HashMap;
use tracing::debug;

use crate::model::Model;

/// Build the frame the model will score.
///
/// Tables pass through untouched. Sequences are zipped against the model's
/// feature names. Mappings are laid out in trained order when their keys are
/// exactly the schema; otherwise they keep their own (sorted) keys and the
/// model reports the mismatch.
pub fn to_frame(data: ModelInput, model: &dyn Model) -> Result<FeatureFrame> {
    match data {
        ModelInput::Table(frame) => Ok(frame),
        ModelInput::Sequence(values) => {
            if values.len() != model.feature_names().len() {
                return Err(Error::inference(format!(
                    "sequence has {} values but the model expects {} features",
                    values.len(),
                    model.feature_names().len()
                )));
            }
            FeatureFrame::from_values(model.feature_names(), values)
        }
        ModelInput::Mapping(mapping) => Ok(mapping_to_frame(mapping, model.feature_names())),
    }
}

fn mapping_to_frame(mut mapping: HashMap<String, f64>, schema: &[String]) -> FeatureFrame {
    let complete =
        mapping.len() == schema.len() && schema.iter().all(|name| mapping.contains_key(name));

    if complete {
        return FeatureFrame::from_pairs(
            schema
                .iter()
                .filter_map(|name| mapping.remove(name).map(|value| (name.clone(), value))),
        );
    }

    let mut entries: Vec<(String, f64)> = mapping.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    FeatureFrame::from_pairs(entries)
}

/// Predict the class label of a single record.
///
/// Errors from the model (schema mismatch or internal failure) propagate
/// unchanged. A label outside `model.classes()` is reported as an inference
/// error instead of being passed on.
pub fn predict(data: ModelInput, model: &dyn Model) -> Result<i64> {
    let shape = data.shape();
    let frame = to_frame(data, model)?;

    let label = first_label(&frame, model)?;
    debug!(shape, label, model = model.name(), "Predicted label");
    Ok(label)
}

/// Label plus the class probabilities behind it
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: i64,
    /// `(class, probability)` pairs in class order
    pub probabilities: Vec<(i64, f64)>,
}

/// Like [`predict`], but also returns the probabilities for the first row
pub fn predict_detailed(data: ModelInput, model: &dyn Model) -> Result<Prediction> {
    let frame = to_frame(data, model)?;
    let label = first_label(&frame, model)?;

    let row = model
        .predict_proba(&frame)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::inference("model returned no probabilities"))?;

    let classes = model.classes();
    if row.len() != classes.len() {
        return Err(Error::inference(format!(
            "model returned {} probabilities for {} classes",
            row.len(),
            classes.len()
        )));
    }

    Ok(Prediction {
        label,
        probabilities: classes.iter().copied().zip(row).collect(),
    })
}

/// First label the model predicts for `frame`, checked against its classes
fn first_label(frame: &FeatureFrame, model: &dyn Model) -> Result<i64> {
    let label = model
        .predict(frame)?
        .first()
        .copied()
        .ok_or_else(|| Error::inference("model returned no predictions"))?;

    ensure_known_class(label, model)?;
    Ok(label)
}

fn ensure_known_class(label: i64, model: &dyn Model) -> Result<()> {
    if model.classes().contains(&label) {
        Ok(())
    } else {
        Err(Error::inference(format!(
            "model '{}' predicted label {} outside its classes {:?}",
            model.name(),
            label,
            model.classes()
        )))
    }
}
