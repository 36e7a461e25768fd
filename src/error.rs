use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Hero '{0}' not recognized. Please check the name or use the hero ID.")]
    UnrecognizedHero(String),

    #[error("Model not found at {}. Please run with --train first to train the model.", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Model artifact format v{found} is not supported (expected v{expected}). Please retrain with --train.")]
    IncompatibleModel { found: u32, expected: u32 },

    #[error("Dataset error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}
