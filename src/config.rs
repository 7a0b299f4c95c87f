//! Configuration for document publishing.

use serde::{Deserialize, Serialize};

/// PDF version written to the file header.
pub const PDF_VERSION: &str = "1.4";

/// Comment line after the header. The four high-bit bytes mark the file as
/// binary for tools that sniff the first lines.
pub const BINARY_MARKER: &[u8] = b"%\xE2\xE3\xCF\xD3\n";

/// Publishing configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Deflate-compress content and font streams.
    #[serde(default)]
    pub compress: bool,
}

impl PublishConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable stream compression.
    ///
    /// Compressed streams carry `/Filter /FlateDecode`. Image streams keep
    /// their own encoding and are never compressed again.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_uncompressed() {
        assert!(!PublishConfig::default().compress);
        assert!(PublishConfig::new().with_compress(true).compress);
    }

    #[test]
    fn test_binary_marker_has_high_bytes() {
        let high = BINARY_MARKER.iter().filter(|&&b| b >= 0x80).count();
        assert_eq!(high, 4);
    }
}
