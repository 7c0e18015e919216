//! Wire format constants and framing configuration.
//!
//! A command travels on the link as:
//! ```text
//! ┌───────┬──────────────┬───────┬──────────────────┬──────┐
//! │ Start │ Name         │ Delim │ Arguments        │ Stop │
//! │ '#'   │ ASCII text   │ ','   │ text, may have , │ '$'  │
//! └───────┴──────────────┴───────┴──────────────────┴──────┘
//! ```
//!
//! Everything between start and stop is the frame *content*, bounded by
//! [`DEFAULT_MAX_CONTENT_LEN`] unless configured otherwise.

use serde::{Deserialize, Serialize};

use crate::error::{CmdlinkError, Result};

/// Start of frame: `#`.
pub const START_BYTE: u8 = b'#';

/// End of frame: `$`.
pub const STOP_BYTE: u8 = b'$';

/// Separates the command name from its arguments: `,`.
pub const FIELD_DELIMITER: u8 = b',';

/// Default maximum frame content length in bytes (delimiters excluded).
pub const DEFAULT_MAX_CONTENT_LEN: usize = 30;

/// Largest configurable frame content length (64 KB).
pub const ABSOLUTE_MAX_CONTENT_LEN: usize = 64 * 1024;

/// Bytes and bounds that define the framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingConfig {
    /// Byte that opens a frame.
    pub start: u8,
    /// Byte that closes a frame.
    pub stop: u8,
    /// Byte that splits name from arguments.
    pub delimiter: u8,
    /// Maximum number of content bytes buffered for one frame.
    pub max_content_len: usize,
}

impl FramingConfig {
    /// Create a config with the default delimiters and a custom capacity.
    pub fn with_max_content_len(max_content_len: usize) -> Self {
        Self {
            max_content_len,
            ..Self::default()
        }
    }

    /// Check that the delimiters are distinct and the capacity within
    /// `1..=ABSOLUTE_MAX_CONTENT_LEN`.
    ///
    /// # Example
    ///
    /// ```
    /// use cmdlink::protocol::FramingConfig;
    ///
    /// let mut config = FramingConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.stop = config.start;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.start == self.stop
            || self.start == self.delimiter
            || self.stop == self.delimiter
        {
            return Err(CmdlinkError::Config(format!(
                "Framing bytes must be distinct (start={:#04x}, stop={:#04x}, delimiter={:#04x})",
                self.start, self.stop, self.delimiter
            )));
        }

        if self.max_content_len == 0 {
            return Err(CmdlinkError::Config(
                "max_content_len must be greater than zero".to_string(),
            ));
        }

        if self.max_content_len > ABSOLUTE_MAX_CONTENT_LEN {
            return Err(CmdlinkError::Config(format!(
                "max_content_len {} exceeds maximum {}",
                self.max_content_len, ABSOLUTE_MAX_CONTENT_LEN
            )));
        }

        Ok(())
    }
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            start: START_BYTE,
            stop: STOP_BYTE,
            delimiter: FIELD_DELIMITER,
            max_content_len: DEFAULT_MAX_CONTENT_LEN,
        }
    }
}
