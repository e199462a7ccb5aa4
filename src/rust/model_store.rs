use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::classifier::{ClassifierError, TicketClassifier};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("Hash mismatch for {name}: expected {expected}, got {actual}")]
    HashMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}

/// Stores trained classifiers as `<name>.bin` blobs next to a
/// `<name>.sha256` digest that is checked on every load.
#[derive(Debug, Clone)]
pub struct ModelStore {
    models_dir: PathBuf,
}

impl ModelStore {
    /// Creates a new ModelStore with the default models directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("TRIAGE_HOME") {
            return PathBuf::from(path).join("models");
        }

        // 2. Use platform-specific cache directory
        if let Some(cache_dir) = dirs::cache_dir() {
            return cache_dir.join("triage").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".cache").join("triage").join("models");
        }

        env::temp_dir().join("triage").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> io::Result<Self> {
        let models_dir = models_dir.as_ref().to_path_buf();
        fs::create_dir_all(&models_dir)?;
        Ok(Self { models_dir })
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(format!("{}.bin", name))
    }

    pub fn get_checksum_path(&self, name: &str) -> PathBuf {
        self.models_dir.join(format!("{}.sha256", name))
    }

    pub fn is_model_saved(&self, name: &str) -> bool {
        let model_path = self.get_model_path(name);
        let checksum_path = self.get_checksum_path(name);
        log::debug!("Checking if model '{}' is saved:", name);
        log::debug!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        log::debug!("  Checksum path: {:?} (exists: {})", checksum_path, checksum_path.exists());
        model_path.exists() && checksum_path.exists()
    }

    /// Writes the classifier and its digest, replacing any previous version.
    pub fn save(&self, name: &str, classifier: &TicketClassifier) -> Result<PathBuf, ModelError> {
        let bytes = classifier.to_bytes()?;
        let hash = sha256_hex(&bytes);

        let model_path = self.get_model_path(name);
        log::info!("Writing {} bytes to {:?}", bytes.len(), model_path);
        fs::write(&model_path, &bytes)?;
        fs::write(self.get_checksum_path(name), &hash)?;

        log::info!("Model '{}' saved (sha256 {})", name, hash);
        Ok(model_path)
    }

    /// Loads a classifier after checking it against its stored digest.
    pub fn load(&self, name: &str) -> Result<TicketClassifier, ModelError> {
        if !self.is_model_saved(name) {
            return Err(ModelError::NotFound(name.to_string()));
        }

        let bytes = fs::read(self.get_model_path(name))?;
        let expected = fs::read_to_string(self.get_checksum_path(name))?.trim().to_string();
        let actual = sha256_hex(&bytes);
        if actual != expected {
            log::error!("Model '{}' hash mismatch: expected {}, got {}", name, expected, actual);
            return Err(ModelError::HashMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }

        log::info!("Loaded model '{}' ({} bytes)", name, bytes.len());
        Ok(TicketClassifier::from_bytes(&bytes)?)
    }

    /// Returns `false` if the model is missing or its digest does not match.
    pub fn verify_model(&self, name: &str) -> Result<bool, ModelError> {
        if !self.is_model_saved(name) {
            log::info!("Model '{}' is not saved", name);
            return Ok(false);
        }
        let bytes = fs::read(self.get_model_path(name))?;
        let expected = fs::read_to_string(self.get_checksum_path(name))?;
        Ok(sha256_hex(&bytes) == expected.trim())
    }

    pub fn remove_model(&self, name: &str) -> Result<(), ModelError> {
        let model_path = self.get_model_path(name);
        let checksum_path = self.get_checksum_path(name);

        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        if checksum_path.exists() {
            fs::remove_file(&checksum_path)?;
        }
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
