//! # Content Codec
//!
//! Reads and writes one typed value per TOML file.
//!
//! Every persisted entity implements [`Document`]: a plain serde `Record` type
//! mirrors the file layout, and `decode`/`encode` convert between that record
//! and the domain type field by field. Text formats for durations and
//! timestamps come from [`crate::format`] so they round-trip exactly.
//!
//! Failure modes are kept apart:
//! - a missing file with no default is [`PrintedError::MissingFile`]
//! - bytes that are not UTF-8 TOML are [`PrintedError::Decode`]
//! - TOML of the wrong shape is [`PrintedError::SchemaValidation`]
//!
//! Both [`load`] and [`save`] create the parent directory when it is absent.

use crate::error::{PrintedError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

pub trait Document: Sized {
    type Record: Serialize + DeserializeOwned;

    /// Builds the domain value from a record read at `path`.
    fn decode(record: Self::Record, path: &Path) -> std::result::Result<Self, String>;

    fn encode(&self) -> Self::Record;
}

pub fn load<D: Document>(path: &Path, default: Option<D>) -> Result<D> {
    ensure_parent(path)?;

    if !path.exists() {
        return match default {
            Some(value) => {
                trace!(path = %path.display(), "file missing, using default");
                Ok(value)
            }
            None => Err(PrintedError::MissingFile(path.to_path_buf())),
        };
    }

    debug!(path = %path.display(), "reading");
    let decode_error = |message: String| PrintedError::Decode {
        path: path.to_path_buf(),
        message,
    };
    let content = String::from_utf8(fs::read(path)?).map_err(|e| decode_error(e.to_string()))?;
    let table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| decode_error(e.message().to_string()))?;

    let schema_error = |message: String| PrintedError::SchemaValidation {
        path: path.to_path_buf(),
        message,
    };
    let record: D::Record = toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| schema_error(e.message().to_string()))?;

    D::decode(record, path).map_err(schema_error)
}

pub fn save<D: Document>(path: &Path, value: &D) -> Result<()> {
    ensure_parent(path)?;

    let content =
        toml::to_string_pretty(&value.encode()).map_err(|e| PrintedError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(path = %path.display(), "writing");
    fs::write(path, content)?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
