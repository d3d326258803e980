//! Frame parsing errors.

use thiserror::Error;

/// Errors which abort decoding of a whole frame.
///
/// Every variant means a fixed-width region ran past the end of the frame.
/// Those regions have no safe partial interpretation, so no partial report is produced.
#[derive(Error, Copy, Clone, PartialEq, Eq, Debug)]
pub enum ParseError {
    #[error("Received data is too short for the packet header")]
    TruncatedHeader,

    #[error("Received data is too short for the hash and context region")]
    TruncatedBody,

    #[error("Received data is too short for the announce payload")]
    TruncatedAnnounce,
}
