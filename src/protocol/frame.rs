//! Frame struct and content parsing.
//!
//! A frame is the content between a start and a stop byte, split at the
//! first field delimiter into a command name and an argument string.
//!
//! # Example
//!
//! ```
//! use cmdlink::protocol::{parse_content, FIELD_DELIMITER};
//!
//! let frame = parse_content(b"MOVE,10,20,30", FIELD_DELIMITER).unwrap();
//! assert_eq!(frame.name(), "MOVE");
//! assert_eq!(frame.arguments(), "10,20,30");
//! ```

use tracing::trace;

use super::wire_format::FramingConfig;

/// A complete command frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command name (text before the first delimiter).
    pub name: String,
    /// Argument string (text after the first delimiter, commas kept).
    pub arguments: String,
}

impl Frame {
    /// Create a new frame from name and arguments.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the argument string.
    #[inline]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Encode back to wire bytes using the given framing.
    ///
    /// # Example
    ///
    /// ```
    /// use cmdlink::protocol::{Frame, FramingConfig};
    ///
    /// let bytes = Frame::new("MOVE", "10,20,30").encode(&FramingConfig::default());
    /// assert_eq!(bytes, b"#MOVE,10,20,30$");
    /// ```
    pub fn encode(&self, config: &FramingConfig) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.name.len() + self.arguments.len() + 3);
        buf.push(config.start);
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(config.delimiter);
        buf.extend_from_slice(self.arguments.as_bytes());
        buf.push(config.stop);
        buf
    }
}

/// Split frame content into a [`Frame`].
///
/// Returns `None` when the content has no delimiter or is not UTF-8.
/// Names and arguments are kept byte-exact: no trimming, no case folding.
pub fn parse_content(content: &[u8], delimiter: u8) -> Option<Frame> {
    let Some(split) = content.iter().position(|&b| b == delimiter) else {
        trace!(len = content.len(), "frame content has no field delimiter");
        return None;
    };

    let (name, rest) = content.split_at(split);
    let (Ok(name), Ok(arguments)) = (std::str::from_utf8(name), std::str::from_utf8(&rest[1..]))
    else {
        trace!(len = content.len(), "frame content is not valid UTF-8");
        return None;
    };

    Some(Frame::new(name, arguments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::FIELD_DELIMITER;

    #[test]
    fn test_parse_move_command() {
        let frame = parse_content(b"MOVE,10,20,30", FIELD_DELIMITER).unwrap();

        assert_eq!(frame.name(), "MOVE");
        assert_eq!(frame.arguments(), "10,20,30");
    }

    #[test]
    fn test_parse_without_delimiter() {
        assert!(parse_content(b"HEARTBEAT", FIELD_DELIMITER).is_none());
        assert!(parse_content(b"", FIELD_DELIMITER).is_none());
    }

    #[test]
    fn test_parse_empty_parts() {
        let frame = parse_content(b",", FIELD_DELIMITER).unwrap();
        assert_eq!(frame.name(), "");
        assert_eq!(frame.arguments(), "");

        let frame = parse_content(b"HB,", FIELD_DELIMITER).unwrap();
        assert_eq!(frame.name(), "HB");
        assert_eq!(frame.arguments(), "");
    }

    #[test]
    fn test_parse_keeps_whitespace_and_case() {
        let frame = parse_content(b" move , 1", FIELD_DELIMITER).unwrap();

        assert_eq!(frame.name(), " move ");
        assert_eq!(frame.arguments(), " 1");
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        assert!(parse_content(&[0xFF, b',', b'1'], FIELD_DELIMITER).is_none());
        assert!(parse_content(&[b'A', b',', 0xC0], FIELD_DELIMITER).is_none());
    }

    #[test]
    fn test_parse_custom_delimiter() {
        let frame = parse_content(b"SET;a,b", b';').unwrap();

        assert_eq!(frame.name(), "SET");
        assert_eq!(frame.arguments(), "a,b");
    }

    #[test]
    fn test_encode() {
        let frame = Frame::new("MOVE", "10,20,30");
        let bytes = frame.encode(&FramingConfig::default());

        assert_eq!(bytes, b"#MOVE,10,20,30$");
        let content = &bytes[1..bytes.len() - 1];
        assert_eq!(parse_content(content, FIELD_DELIMITER), Some(frame));
    }

    #[test]
    fn test_encode_custom_framing() {
        let config = FramingConfig {
            start: b'<',
            stop: b'>',
            delimiter: b':',
            max_content_len: 16,
        };

        assert_eq!(Frame::new("SET", "1,2").encode(&config), b"<SET:1,2>");
    }
}
