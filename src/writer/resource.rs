//! External resource bytes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where the bytes of an image or font file come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceSource {
    /// File on disk, read during embedding
    Path {
        /// File path
        path: PathBuf,
    },
    /// Bytes supplied by the caller
    Bytes {
        /// Raw file contents
        bytes: Vec<u8>,
    },
}

impl ResourceSource {
    /// Source backed by a file.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        ResourceSource::Path { path: path.into() }
    }

    /// Source backed by memory.
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ResourceSource::Bytes {
            bytes: bytes.into(),
        }
    }

    /// Load the raw bytes. A file that cannot be read is an error.
    pub fn load(&self) -> Result<Vec<u8>> {
        match self {
            ResourceSource::Path { path } => std::fs::read(path).map_err(|source| Error::Resource {
                path: path.clone(),
                source,
            }),
            ResourceSource::Bytes { bytes } => Ok(bytes.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bytes() {
        let source = ResourceSource::bytes(vec![1, 2, 3]);
        assert_eq!(source.load().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let source = ResourceSource::path("/nonexistent/dir/logo.jpg");
        match source.load() {
            Err(Error::Resource { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/dir/logo.jpg"))
            },
            other => panic!("expected resource error, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_variants() {
        let source: ResourceSource = serde_json::from_str(r#"{"path":"fonts/a.ttf"}"#).unwrap();
        assert_eq!(source, ResourceSource::path("fonts/a.ttf"));
        let source: ResourceSource = serde_json::from_str(r#"{"bytes":[255,216]}"#).unwrap();
        assert_eq!(source, ResourceSource::bytes(vec![255, 216]));
    }
}
