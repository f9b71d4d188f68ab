use dropcast_classifiers::Prediction;
use dropcast_core::{FieldSpec, Outcome};
use serde::{Deserialize, Serialize};

/// Result of one prediction, with the outcome's display text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Raw class label from the model
    pub label: i64,
    pub outcome: Outcome,
    /// Display name, e.g. "Graduate"
    pub title: String,
    pub description: String,
    pub advice: Option<String>,
    pub recommendations: Vec<String>,
    pub probabilities: Vec<ClassProbability>,
    /// Time spent normalizing and scoring, in microseconds
    pub latency_us: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    pub label: i64,
    pub outcome: Outcome,
    pub probability: f64,
}

impl PredictionResponse {
    pub fn new(prediction: Prediction, latency_us: u64) -> Self {
        let outcome = Outcome::from_label(prediction.label);

        Self {
            label: prediction.label,
            outcome,
            title: outcome.name().to_string(),
            description: outcome.description().to_string(),
            advice: outcome.advice().map(str::to_string),
            recommendations: outcome
                .recommendations()
                .iter()
                .map(|r| r.to_string())
                .collect(),
            probabilities: prediction
                .probabilities
                .into_iter()
                .map(|(label, probability)| ClassProbability {
                    label,
                    outcome: Outcome::from_label(label),
                    probability,
                })
                .collect(),
            latency_us,
        }
    }

    /// Plain-text rendering for the terminal
    pub fn render_text(&self) -> String {
        let mut out = format!("{}: {}\n", self.title, self.description);

        if let Some(advice) = &self.advice {
            out.push_str(&format!("\n{}\n", advice));
        }

        if !self.recommendations.is_empty() {
            out.push_str("\nRecommendations:\n");
            for recommendation in &self.recommendations {
                out.push_str(&format!("  - {}\n", recommendation));
            }
        }

        if !self.probabilities.is_empty() {
            out.push_str("\nProbabilities:\n");
            for class in &self.probabilities {
                out.push_str(&format!(
                    "  {:<9} {:>6.2}%\n",
                    class.outcome.name(),
                    class.probability * 100.0
                ));
            }
        }

        out
    }
}

/// Loaded model description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    pub objective: String,
    /// Tree count for ensembles
    pub trees: Option<usize>,
}

/// Form section with its fields
#[derive(Debug, Clone, Serialize)]
pub struct SchemaGroup {
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}
