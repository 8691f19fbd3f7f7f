//! RNNoise model resolution for the voice isolation filter.
//!
//! The arnndn filter needs a trained noise model that is not shipped with
//! this project (unclear license). The pipeline depends on the
//! [`NoiseModelSource`] capability; the production implementation caches a
//! one-time download under the per-user cache directory, and a static path
//! implementation keeps everything testable without network access.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Published rnnoise model tuned for voice.
pub const NOISE_MODEL_URL: &str = "https://raw.githubusercontent.com/GregorR/\
     rnnoise-models/master/somnolent-hogwash-2018-09-01/sh.rnnn";

/// File name the cached model is stored under.
const MODEL_FILE_NAME: &str = "voice.rnnn";

/// Error types for noise model resolution.
#[derive(Debug, thiserror::Error)]
pub enum NoiseModelError {
    /// The platform exposes no per-user cache directory.
    #[error("no cache directory available on this platform")]
    NoCacheDir,

    /// The model server answered with a failure status.
    #[error("failed to download noise model: HTTP {0}")]
    Download(String),

    /// Network-level failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Cache directory or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for noise model resolution results.
pub type NoiseModelResult<T> = Result<T, NoiseModelError>;

/// Capability to resolve the noise model file the filter graph references.
pub trait NoiseModelSource {
    /// Return the path of a readable model file.
    fn resolve(&self) -> NoiseModelResult<PathBuf>;
}

/// A model file already present on disk. Useful for tests and for users
/// who bring their own model.
pub struct PathModel(pub PathBuf);

impl NoiseModelSource for PathModel {
    fn resolve(&self) -> NoiseModelResult<PathBuf> {
        Ok(self.0.clone())
    }
}

/// Downloads the published model once and caches it under the per-user
/// cache directory.
pub struct CachedNoiseModel {
    url: String,
}

impl CachedNoiseModel {
    /// Resolver for the default published model.
    pub fn new() -> Self {
        Self {
            url: NOISE_MODEL_URL.to_string(),
        }
    }

    /// Resolver fetching from a custom URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn cache_path() -> NoiseModelResult<PathBuf> {
        let dirs =
            ProjectDirs::from("", "", "opusbook").ok_or(NoiseModelError::NoCacheDir)?;
        Ok(dirs.cache_dir().join(MODEL_FILE_NAME))
    }

    fn download(&self, target: &Path) -> NoiseModelResult<()> {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!("downloading voice/noise model from {}", self.url);
        let response = reqwest::blocking::get(&self.url)?;
        if !response.status().is_success() {
            return Err(NoiseModelError::Download(response.status().to_string()));
        }

        let bytes = response.bytes()?;
        std::fs::write(target, &bytes)?;
        Ok(())
    }
}

impl Default for CachedNoiseModel {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseModelSource for CachedNoiseModel {
    fn resolve(&self) -> NoiseModelResult<PathBuf> {
        let path = Self::cache_path()?;
        tracing::debug!("noise model path = {}", path.display());

        if !path.exists() {
            self.download(&path)?;
        }

        Ok(path)
    }
}
