use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Maps logical property names to the keys actually stored in a system.
///
/// Different file formats store the same logical property under different
/// key names. Every read or write of molecule/system state is indirected
/// through this map; an unset field falls back to the logical name itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropertyMap {
    coordinates: Option<String>,
    charge: Option<String>,
    space: Option<String>,
    fileformat: Option<String>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coordinates(mut self, key: impl Into<String>) -> Self {
        self.coordinates = Some(key.into());
        self
    }

    pub fn with_charge(mut self, key: impl Into<String>) -> Self {
        self.charge = Some(key.into());
        self
    }

    pub fn with_space(mut self, key: impl Into<String>) -> Self {
        self.space = Some(key.into());
        self
    }

    pub fn with_fileformat(mut self, key: impl Into<String>) -> Self {
        self.fileformat = Some(key.into());
        self
    }

    /// The stored key for the coordinates property.
    pub fn coordinates(&self) -> &str {
        self.coordinates.as_deref().unwrap_or("coordinates")
    }

    /// The coordinates override, if the caller set one.
    pub fn coordinates_override(&self) -> Option<&str> {
        self.coordinates.as_deref()
    }

    /// The stored key for the charge property.
    pub fn charge(&self) -> &str {
        self.charge.as_deref().unwrap_or("charge")
    }

    /// The stored key for the box-geometry property.
    pub fn space(&self) -> &str {
        self.space.as_deref().unwrap_or("space")
    }

    /// The stored key for the file-format tag.
    pub fn fileformat(&self) -> &str {
        self.fileformat.as_deref().unwrap_or("fileformat")
    }

    /// Loads a property map from a TOML file.
    pub fn load(path: &Path) -> Result<Self, PropertyMapLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| PropertyMapLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| PropertyMapLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }
}

/// The per-endpoint key for a merged molecule's divergent property.
///
/// Merged dual-topology molecules store endpoint data under the logical
/// name suffixed with `0` (lambda = 0) or `1` (lambda = 1).
pub fn endpoint_key(logical: &str, lambda1: bool) -> String {
    format!("{}{}", logical, if lambda1 { 1 } else { 0 })
}

#[derive(Debug, Error)]
pub enum PropertyMapLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}
