use thiserror::Error;

/// Errors of the announce application data decoder.
///
/// These never invalidate the announce itself: the fixed announce fields are still reported.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum AppDataError {
    #[error("Unrecognized application data record marker 0x{0:02x}")]
    Unrecognized(u8),

    #[error("Application data ends in the middle of a record")]
    Truncated,

    #[error("Expected marker 0x{expected:02x}, found 0x{found:02x}")]
    UnexpectedMarker { expected: u8, found: u8 },

    #[error("Announced name is not valid UTF-8")]
    InvalidName,

    #[error("Malformed record: {0}")]
    Malformed(&'static str),
}

impl From<rns_bytes::ReaderError> for AppDataError {
    fn from(_: rns_bytes::ReaderError) -> Self {
        AppDataError::Truncated
    }
}
