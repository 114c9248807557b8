use bytes::Bytes;
use std::fmt::{Display, Formatter};

/// Closing tag that terminates every message in a BGPmon stream.
pub const MESSAGE_DELIMITER: &[u8] = b"</BGP_MONITOR_MESSAGE>";

/// # RawFrame
///
/// One complete `<BGP_MONITOR_MESSAGE>...</BGP_MONITOR_MESSAGE>` unit, including the
/// closing tag, exactly as it was cut out of the stream. The content may still be
/// malformed; it is only guaranteed to end with [MESSAGE_DELIMITER].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    bytes: Bytes,
}

impl RawFrame {
    pub fn new(bytes: Bytes) -> Self {
        RawFrame { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the frame content as text; XML documents must be UTF-8 here.
    pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl From<&str> for RawFrame {
    fn from(value: &str) -> Self {
        RawFrame::new(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl Display for RawFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}
