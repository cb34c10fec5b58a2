//! Loading mapping documents and input data from disk.
//!
//! The format is chosen from the file extension: `.json`, or `.yaml`/`.yml`.

use std::fs;
use std::path::Path;

use fieldmap_model::{DocumentError, MappingDocument};
use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Parse a mapping document from text.
pub fn parse_document(raw: &str, format: DocumentFormat) -> Result<MappingDocument, DocumentError> {
    match format {
        DocumentFormat::Json => MappingDocument::from_json_str(raw),
        DocumentFormat::Yaml => MappingDocument::from_yaml_str(raw),
    }
}

/// Parse nested input data from text.
pub fn parse_input(raw: &str, format: DocumentFormat) -> Result<Value, DocumentError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(raw)?),
        DocumentFormat::Yaml => Ok(serde_yaml::from_str(raw)?),
    }
}

/// Load a mapping document from a file.
pub fn load_document(path: &Path) -> Result<MappingDocument, ConfigError> {
    let format = DocumentFormat::from_path(path)?;
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    let document = parse_document(&raw, format).map_err(|source| ConfigError::InvalidFile {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), nodes = document.len(), "loaded mapping document");
    Ok(document)
}

/// Load input data from a file.
pub fn load_input(path: &Path) -> Result<Value, ConfigError> {
    let format = DocumentFormat::from_path(path)?;
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::io(path, source))?;
    parse_input(&raw, format).map_err(|source| ConfigError::InvalidFile {
        path: path.to_path_buf(),
        source,
    })
}
