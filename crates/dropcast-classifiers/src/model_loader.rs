//! Loading the trained classifier artifact

use dropcast_core::{Error, Result};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info};

use crate::lightgbm::LightGbmModel;
use crate::model::Model;

/// File name of the artifact shipped next to the executable
pub const MODEL_FILE_NAME: &str = "model_lgb.txt";

/// Artifact path beside the running executable, independent of the working directory
pub fn default_model_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| {
        Error::model_load(MODEL_FILE_NAME, format!("cannot locate executable: {}", e))
    })?;

    let dir = exe.parent().ok_or_else(|| {
        Error::model_load(MODEL_FILE_NAME, "executable has no parent directory")
    })?;

    Ok(dir.join(MODEL_FILE_NAME))
}

/// Loads a model from a fixed path at most once.
///
/// The first successful `load_model` call reads and parses the artifact;
/// every later call hands back the same `Arc`. A failed load caches nothing,
/// so no partial model is ever observed.
pub struct ModelLoader {
    path: PathBuf,
    cached: OnceLock<Arc<LightGbmModel>>,
    init: Mutex<()>,
}

impl ModelLoader {
    /// Create a loader for an explicit artifact path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    /// Create a loader for the artifact shipped beside the executable
    pub fn beside_executable() -> Result<Self> {
        Ok(Self::new(default_model_path()?))
    }

    /// Artifact path this loader reads
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the model has been loaded
    pub fn is_loaded(&self) -> bool {
        self.cached.get().is_some()
    }

    /// Get the model, reading the artifact on first use
    pub fn load_model(&self) -> Result<Arc<LightGbmModel>> {
        if let Some(model) = self.cached.get() {
            return Ok(Arc::clone(model));
        }

        let _guard = self.init.lock();
        if let Some(model) = self.cached.get() {
            debug!("Model loaded by a concurrent caller");
            return Ok(Arc::clone(model));
        }

        info!("Loading model from {}", self.path.display());
        let model = match LightGbmModel::from_file(&self.path) {
            Ok(model) => Arc::new(model),
            Err(e) => {
                error!("Model load failed: {}", e);
                return Err(e);
            }
        };

        let _ = self.cached.set(Arc::clone(&model));
        Ok(model)
    }

    /// Same as [`load_model`](Self::load_model), erased to the `Model` trait for injection
    pub fn load_shared(&self) -> Result<Arc<dyn Model>> {
        let model: Arc<dyn Model> = self.load_model()?;
        Ok(model)
    }
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
