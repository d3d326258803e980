//! Library for parsing Reticulum announce payloads.
//!
//! An announce carries the identity of a destination. Its payload has a fixed layout, optionally followed by
//! application data in a compact MessagePack encoding.
//!
//! # Payload
//!
//! ```md
//!   offset  size  field
//!   ------  ----  -----
//!        0    64  Public key (encryption key followed by signing key)
//!       64    10  Name hash
//!       74    10  Random hash
//!       84    64  Signature
//!      148    32  Ratchet, only if the header context bit of the announce is set
//!  148/180     -  Application data, up to the end of the payload
//! ```
//!
//! Signatures are not verified.
//!
//! # Application data
//!
//! Two record layouts are recognized, see [AppData](enum.AppData.html). Failing to decode application data does not
//! fail the announce, the error is returned next to the sliced record.
//!
//! # Example
//! ```rust
//! use rns_ann::{AnnounceRecord, AppData, AnnouncedName};
//!
//! let mut payload = vec![0; 148];
//! payload.extend_from_slice(&hex::decode("92c403616263c0").expect("invalid hex string"));
//!
//! let record = AnnounceRecord::parse(&payload, 0).expect("invalid announce size");
//! assert!(record.ratchet.is_none());
//! assert_eq!(
//!     record.decode_app_data(),
//!     Some(Ok(AppData::AnnouncedName(AnnouncedName { name: "abc".to_string(), ticket: None })))
//! );
//! ```

pub use announce::{AnnounceRecord, ANNOUNCE_MIN_SIZE, RATCHET_SIZE};
pub use app_data::{decode_record, AnnouncedName, AppData, MaxSize, MicroValue, NodeState, PropagationNode, Warning};
pub use errors::AppDataError;

mod announce;
mod app_data;
mod errors;

/// Slices an announce payload, see [AnnounceRecord::parse](struct.AnnounceRecord.html#method.parse).
pub fn decode_announce(payload: &[u8], header_context_flag: u8) -> Result<AnnounceRecord<'_>, rns_bytes::ParseError> {
    AnnounceRecord::parse(payload, header_context_flag)
}
