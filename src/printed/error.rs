use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintedError {
    #[error("{} does not exist, and no default provided.", .0.display())]
    MissingFile(PathBuf),

    #[error("Could not parse {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Invalid content in {}: {message}", path.display())]
    SchemaValidation { path: PathBuf, message: String },

    #[error("Could not encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error("{kind} '{name}' already exists.")]
    NameCollision { kind: &'static str, name: String },

    #[error("{kind} '{name}' not found from: {available}.")]
    NotFound {
        kind: &'static str,
        name: String,
        available: String,
    },

    #[error("Invalid material '{name}', existing materials include: {available}.")]
    UnknownMaterial { name: String, available: String },

    #[error("No {kind} #{index}, {len} recorded.")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Web server error: {0}")]
    Server(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PrintedError>;
