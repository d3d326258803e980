//! Library for parsing Reticulum packet headers. This includes:
//! * [PacketHeader](struct.PacketHeader.html) - The flags byte and the hop count.
//! * [PacketBody](struct.PacketBody.html) - One or two 16 byte hashes, depending on the header type, the context byte and the payload.
//! * [Context](enum.Context.html) - Context code enum.
//! * Bit-field enums of the flags byte, each with the label used in packet dumps.
//!
//! Header fields are derived from the flags byte only. Whether a second hash is present is decided by
//! [HeaderType](enum.HeaderType.html), so the body has to be parsed with the header it follows.
//!
//! # Example
//! ```rust
//! # use hex::decode;
//! use rns_hdr::{PacketBody, PacketHeader, PacketType, HeaderType, Context};
//! # let hex_to_bytes = |s: &str| -> Vec<u8> { decode(s).expect("invalid hex string") };
//!
//! let bytes = hex_to_bytes("0001a1a2a3a4a5a6a7a8a9aaabacadaeafb000cafe");
//! let (header, consumed) = PacketHeader::parse(&bytes).expect("invalid header bytes");
//! assert_eq!(header.packet_type, PacketType::Data);
//! assert_eq!(header.header_type, HeaderType::Type1);
//! assert_eq!(header.hops, 1);
//!
//! let (body, _) = PacketBody::parse(&bytes[consumed..], &header).expect("invalid body bytes");
//! assert_eq!(body.context_type(), Context::None);
//! assert_eq!(body.payload, &[0xca, 0xfe]);
//! ```

pub use rns_bytes::ParseError;
pub use context::{context_label, Context};
pub use fields::{
    announce_header_context_label, generic_header_context_label, DestinationType, HeaderType, IfacFlag, PacketType, PropagationType,
    RATCHET_CODE,
};
pub use packet_body::{Hash, PacketBody, HASH_SIZE};
pub use packet_header::PacketHeader;

mod context;
mod fields;
mod packet_body;
mod packet_header;

/// Decodes the header at the start of `data`, returning it with the consumed length.
pub fn decode_header(data: &[u8]) -> Result<(PacketHeader, usize), ParseError> {
    PacketHeader::parse(data)
}

/// Slices the hash and context region of `data`, which must start right after the header.
pub fn slice_body<'a>(data: &'a [u8], header: &PacketHeader) -> Result<(PacketBody<'a>, usize), ParseError> {
    PacketBody::parse(data, header)
}
