use crate::error::AppError;
use crate::model::TrainedModel;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Bumped whenever the serialized layout of [`TrainedModel`] changes.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// On-disk home of the trained model. The file is a `u32` format version
/// followed by the bincode-encoded model.
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ModelStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes to a temporary file next to the target and renames it into
    /// place, so readers see either the old model or the new one.
    pub fn save(&self, model: &TrainedModel) -> Result<(), AppError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| {
            AppError::IoError(format!("Failed to create {}: {}", parent.display(), e))
        })?;

        let temp_file = NamedTempFile::new_in(parent)
            .map_err(|e| AppError::IoError(format!("Failed to create temp file: {}", e)))?;

        {
            let mut writer = BufWriter::new(temp_file.as_file());
            bincode::serialize_into(&mut writer, &ARTIFACT_FORMAT_VERSION)
                .and_then(|_| bincode::serialize_into(&mut writer, model))
                .map_err(|e| {
                    AppError::SerializationError(format!("Failed to serialize model: {}", e))
                })?;
            writer
                .flush()
                .map_err(|e| AppError::IoError(format!("Failed to write model: {}", e)))?;
        }

        temp_file.persist(&self.path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to move model into {}: {}",
                self.path.display(),
                e
            ))
        })?;

        log::info!("Saved model to {}", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<TrainedModel, AppError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::ModelNotFound(self.path.clone()))
            }
            Err(e) => {
                return Err(AppError::IoError(format!(
                    "Failed to open {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let mut reader = BufReader::new(file);

        let version: u32 = bincode::deserialize_from(&mut reader).map_err(|e| {
            AppError::SerializationError(format!("Failed to read model header: {}", e))
        })?;
        if version != ARTIFACT_FORMAT_VERSION {
            return Err(AppError::IncompatibleModel {
                found: version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }

        let model: TrainedModel = bincode::deserialize_from(&mut reader).map_err(|e| {
            AppError::SerializationError(format!("Failed to parse model: {}", e))
        })?;
        log::debug!(
            "Loaded model trained at {} from {}",
            model.metadata().trained_at,
            self.path.display()
        );
        Ok(model)
    }
}
