//! Gradient-boosted tree classifiers saved in LightGBM's text format.
//!
//! The file written by `Booster.save_model()` (or `LGBMClassifier.booster_.save_model()`)
//! carries the trained feature names, the objective and every tree, so it is
//! all that is needed to reproduce the classifier's predictions.
//!
//! Per-class raw scores are the sums of the trees assigned to each class
//! (tree `t` belongs to class `t % num_tree_per_iteration`), turned into
//! probabilities by the objective's link function.

mod parser;
mod tree;

pub use parser::{parse_model, ParseError, ParsedModel, SUPPORTED_VERSIONS};
pub use tree::{DecisionType, MissingType, SplitNode, Tree};

use dropcast_core::{Error, FeatureFrame, Result};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::model::{check_schema, Model};

/// Link function applied to raw scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Objective {
    /// One tree per iteration, sigmoid of the score is P(class 1)
    Binary { sigmoid: f64 },
    /// Softmax across per-class scores
    Multiclass,
    /// Independent sigmoid per class
    MulticlassOva { sigmoid: f64 },
}

impl Objective {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binary { .. } => "binary",
            Self::Multiclass => "multiclass",
            Self::MulticlassOva { .. } => "multiclassova",
        }
    }
}

/// A LightGBM tree ensemble classifier
#[derive(Debug, Clone)]
pub struct LightGbmModel {
    name: String,
    version: String,
    objective: Objective,
    num_tree_per_iteration: usize,
    feature_names: Vec<String>,
    classes: Vec<i64>,
    trees: Vec<Tree>,
    average_output: bool,
}

impl LightGbmModel {
    /// Read and parse a model file. Every failure is a model load error naming the path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::model_load(path, format!("cannot read artifact: {}", e)))?;

        let mut model: Self = text
            .parse()
            .map_err(|e: ParseError| Error::model_load(path, e.to_string()))?;

        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            model.name = stem.to_string();
        }

        info!(
            path = %path.display(),
            version = %model.version,
            objective = model.objective.name(),
            trees = model.trees.len(),
            classes = model.classes.len(),
            features = model.feature_names.len(),
            "Loaded LightGBM model"
        );

        Ok(model)
    }

    /// Assemble a model from parsed parts
    pub fn from_parsed(parsed: ParsedModel) -> Self {
        let num_classes = match parsed.objective {
            Objective::Binary { .. } => 2,
            _ => parsed.num_class,
        };

        Self {
            name: "lightgbm".to_string(),
            version: parsed.version,
            objective: parsed.objective,
            num_tree_per_iteration: parsed.num_tree_per_iteration,
            feature_names: parsed.feature_names,
            classes: (0..num_classes as i64).collect(),
            trees: parsed.trees,
            average_output: parsed.average_output,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn num_iterations(&self) -> usize {
        self.trees.len() / self.num_tree_per_iteration
    }

    /// Per-class raw scores (before the link function) for one row
    pub fn raw_scores(&self, row: &[f64]) -> Vec<f64> {
        let mut scores = vec![0.0; self.num_tree_per_iteration];
        for (idx, tree) in self.trees.iter().enumerate() {
            scores[idx % self.num_tree_per_iteration] += tree.predict(row);
        }

        if self.average_output {
            let iterations = self.num_iterations() as f64;
            for score in &mut scores {
                *score /= iterations;
            }
        }

        scores
    }

    fn probabilities(&self, row: &[f64]) -> Vec<f64> {
        let scores = self.raw_scores(row);
        match self.objective {
            Objective::Binary { sigmoid } => {
                let positive = logistic(sigmoid * scores[0]);
                vec![1.0 - positive, positive]
            }
            Objective::Multiclass => softmax(&scores),
            Objective::MulticlassOva { sigmoid } => {
                scores.iter().map(|score| logistic(sigmoid * score)).collect()
            }
        }
    }
}

impl FromStr for LightGbmModel {
    type Err = ParseError;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        parse_model(text).map(Self::from_parsed)
    }
}

impl Model for LightGbmModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn objective_name(&self) -> &str {
        self.objective.name()
    }

    fn num_estimators(&self) -> Option<usize> {
        Some(self.trees.len())
    }

    fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<Vec<f64>>> {
        check_schema(self.feature_names(), frame.columns())?;

        let probabilities: Vec<Vec<f64>> =
            frame.rows().iter().map(|row| self.probabilities(row)).collect();

        debug!(rows = frame.num_rows(), model = %self.name, "Scored frame");
        Ok(probabilities)
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|score| (score - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
