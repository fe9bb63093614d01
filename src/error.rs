use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while setting up or resetting the simulation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("grid {width}x{height} is too small: width and height must both be at least 3")]
    InvalidConfiguration { width: usize, height: usize },
    #[error("burn chance {0} is out of range (0-100)")]
    InvalidBurnChance(u8),
}

/// Errors from reading or writing the JSON config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Errors from writing rendered frames to disk
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to encode gif: {0}")]
    Gif(#[from] gif::EncodingError),
    #[error("i/o error during export: {0}")]
    Io(#[from] std::io::Error),
    #[error("nothing has been rendered yet")]
    NothingRendered,
    #[error("surface is too large for a gif frame")]
    SurfaceTooLarge,
    #[error("recording already finished")]
    Finished,
}
