//! Dropcast Classifiers
//!
//! Tabular classifiers for predicting student outcomes.
//!
//! - [`lightgbm`]: tree ensembles read from LightGBM's text model format
//! - [`model_loader`]: loads the trained artifact once and shares it
//! - [`adapter`]: turns one record, in any accepted shape, into one class label
//!
//! Models are immutable after loading and are shared as `Arc<dyn Model>`.

pub mod adapter;
pub mod lightgbm;
pub mod model;
pub mod model_loader;

pub use adapter::{predict, predict_detailed, to_frame, Prediction};
pub use lightgbm::{LightGbmModel, Objective, ParseError};
pub use model::{check_schema, Model};
pub use model_loader::{default_model_path, ModelLoader, MODEL_FILE_NAME};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::adapter::{predict, predict_detailed};
    pub use crate::lightgbm::LightGbmModel;
    pub use crate::model::Model;
    pub use crate::model_loader::ModelLoader;
    pub use dropcast_core::{FeatureRecord, ModelInput, Outcome};
}
