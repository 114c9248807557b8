/*!
error module defines the error types used in bgpmon-parser.
*/
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    /// The feed could not be reached.
    ///
    /// ## Occurs during:
    ///  - Resolving or connecting to the BGPmon host
    #[error("failed to connect to BGPmon at {addr}: {source}")]
    ConnectionError {
        addr: String,
        #[source]
        source: io::Error,
    },
    /// A frame is not well-formed XML.
    ///
    /// ## Occurs during:
    ///  - Interpreting a frame
    ///  - Pretty-printing a frame in XML output mode
    #[error("cannot parse XML: {0}")]
    StructuralParseError(#[from] roxmltree::Error),
    /// A frame is not valid UTF-8 and therefore cannot be XML.
    #[error("frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// A well-formed frame lacks an element required to build an event.
    ///
    /// ## Occurs during:
    ///  - Interpreting a frame without a `SOURCE`, `ADDRESS`, `ASN2`/`ASN4` or `UPDATE` element
    #[error("invalid BGPmon message: missing {0} element")]
    SemanticIncompleteError(&'static str),
    /// The ASN filter file is missing, unreadable, or yields no ASNs.
    #[error("cannot load ASN filter from {path}: {reason}")]
    FilterLoadError { path: String, reason: String },
    /// Rendering an event or frame for output failed.
    #[error("output formatting failed: {0}")]
    FormatError(String),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl From<serde_json::Error> for ParserError {
    fn from(value: serde_json::Error) -> Self {
        ParserError::FormatError(value.to_string())
    }
}

impl From<quick_xml::Error> for ParserError {
    fn from(value: quick_xml::Error) -> Self {
        ParserError::FormatError(value.to_string())
    }
}
