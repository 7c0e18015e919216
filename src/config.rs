//! Link configuration.
//!
//! Configuration is a plain struct with defaults for every field, so a JSON
//! document only needs to name what it changes:
//!
//! ```
//! use cmdlink::config::{LinkConfig, TrailingBytes};
//!
//! let config = LinkConfig::from_json_str(r#"{ "trailing": "drop", "framing": { "max_content_len": 64 } }"#).unwrap();
//!
//! assert_eq!(config.trailing, TrailingBytes::Drop);
//! assert_eq!(config.framing.max_content_len, 64);
//! assert_eq!(config.framing.start, b'#');
//! ```

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{CmdlinkError, Result};
use crate::protocol::FramingConfig;

/// Default number of bytes requested per read from the link.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 256;

/// Largest configurable read size (64 KB).
pub const MAX_READ_BUFFER_SIZE: usize = 64 * 1024;

/// What to do with bytes that follow a stop byte in the same chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingBytes {
    /// Drop them; at most one frame per chunk.
    Drop,
    /// Scan them for further frames.
    #[default]
    Rescan,
}

/// Configuration for a [`CommandLink`](crate::link::CommandLink).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Delimiters and capacity.
    pub framing: FramingConfig,
    /// Trailing-byte policy.
    pub trailing: TrailingBytes,
    /// Bytes requested per read.
    pub read_buffer_size: usize,
}

impl LinkConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns a JSON error for malformed input, or a config error if the
    /// values are invalid.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration from a reader.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check framing and buffer sizes.
    pub fn validate(&self) -> Result<()> {
        self.framing.validate()?;

        if self.read_buffer_size == 0 {
            return Err(CmdlinkError::Config(
                "read_buffer_size must be greater than zero".to_string(),
            ));
        }

        if self.read_buffer_size > MAX_READ_BUFFER_SIZE {
            return Err(CmdlinkError::Config(format!(
                "read_buffer_size {} exceeds maximum {}",
                self.read_buffer_size, MAX_READ_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            framing: FramingConfig::default(),
            trailing: TrailingBytes::default(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = LinkConfig::from_json_str("{}").unwrap();
        assert_eq!(config, LinkConfig::default());
        assert_eq!(config.trailing, TrailingBytes::Rescan);
        assert_eq!(config.read_buffer_size, DEFAULT_READ_BUFFER_SIZE);
    }

    #[test]
    fn test_partial_framing() {
        let config =
            LinkConfig::from_json_str(r#"{"framing": {"start": 60, "stop": 62}}"#).unwrap();

        assert_eq!(config.framing.start, b'<');
        assert_eq!(config.framing.stop, b'>');
        assert_eq!(config.framing.delimiter, b',');
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = LinkConfig::from_json_str(r#"{"read_buffer_size": 0}"#).unwrap_err();
        assert!(matches!(err, CmdlinkError::Config(_)));

        let err = LinkConfig::from_json_str(r#"{"framing": {"stop": 35}}"#).unwrap_err();
        assert!(matches!(err, CmdlinkError::Config(_)));
    }

    #[test]
    fn test_oversized_values_rejected() {
        let err = LinkConfig::from_json_str(r#"{"framing": {"max_content_len": 18446744073709551615}}"#)
            .unwrap_err();
        assert!(matches!(err, CmdlinkError::Config(_)));
        assert!(err.to_string().contains("max_content_len"));

        let err = LinkConfig::from_json_str(r#"{"read_buffer_size": 18446744073709551615}"#)
            .unwrap_err();
        assert!(matches!(err, CmdlinkError::Config(_)));
        assert!(err.to_string().contains("read_buffer_size"));

        let config = LinkConfig {
            read_buffer_size: MAX_READ_BUFFER_SIZE,
            ..LinkConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = LinkConfig::from_json_str(r#"{"trailing": "sometimes"}"#).unwrap_err();
        assert!(matches!(err, CmdlinkError::Json(_)));
    }

    #[test]
    fn test_from_reader_and_back() {
        let config = LinkConfig {
            trailing: TrailingBytes::Drop,
            read_buffer_size: 32,
            ..LinkConfig::default()
        };
        let json = config.to_json_string().unwrap();
        assert!(json.contains(r#""trailing":"drop""#));

        let parsed = LinkConfig::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(parsed, config);
    }
}
