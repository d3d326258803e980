//! Hash and context region following the packet header.

use rns_bytes::{ParseError, Reader};

use crate::context::{context_label, Context};
use crate::fields::HeaderType;
use crate::packet_header::PacketHeader;

type Result<T> = std::result::Result<T, ParseError>;

pub const HASH_SIZE: usize = 16;
const CONTEXT_SIZE: usize = 1;

/// Truncated destination or transport hash.
pub type Hash = [u8; HASH_SIZE];

/// Region between the header and the payload, plus the payload itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketBody<'a> {
    pub hash1: Hash,
    /// Second hash, present for type 2 headers only.
    pub hash2: Option<Hash>,
    /// Raw context byte, see [Context](enum.Context.html).
    pub context: u8,
    pub payload: &'a [u8],
}

impl<'a> PacketBody<'a> {
    /// Length of the hash and context region for the given header type.
    pub fn region_size(header_type: HeaderType) -> usize {
        header_type.hash_count() * HASH_SIZE + CONTEXT_SIZE
    }

    /// Slices hashes, context and payload out of `data`, which must start right after the header.
    ///
    /// Returns the body and the number of bytes consumed before the payload: 17 for type 1 headers, 33 for type 2.
    pub fn parse(data: &'a [u8], header: &PacketHeader) -> Result<(Self, usize)> {
        if data.len() < Self::region_size(header.header_type) {
            return Err(ParseError::TruncatedBody);
        }
        let mut reader = Reader::new(data);
        let hash1 = reader.read_array::<HASH_SIZE>().expect("invalid body data size");
        let hash2 = match header.header_type {
            HeaderType::Type1 => None,
            HeaderType::Type2 => Some(reader.read_array::<HASH_SIZE>().expect("invalid body data size")),
        };
        let context = reader.read_u8().expect("invalid body data size");
        let consumed = reader.position();
        let payload = reader.read_remainder();
        Ok((PacketBody { hash1, hash2, context, payload }, consumed))
    }

    pub fn context_type(&self) -> Context {
        Context::from(self.context)
    }

    pub fn context_label(&self) -> String {
        context_label(self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(flags: u8) -> PacketHeader {
        PacketHeader::parse(&[flags, 0]).expect("invalid header data length").0
    }

    #[test]
    fn test_type1_body_parse() {
        let test_data = hex::decode("00112233445566778899aabbccddeeff0bcafe").expect("invalid hex string");
        let (body, consumed) = PacketBody::parse(&test_data, &header(0x00)).expect("invalid body data length");
        assert_eq!(consumed, 17);
        assert_eq!(hex::encode(body.hash1), "00112233445566778899aabbccddeeff");
        assert_eq!(body.hash2, None);
        assert_eq!(body.context_type(), Context::PathResponse);
        assert_eq!(body.context_label(), "Path Response");
        assert_eq!(body.payload, &[0xca, 0xfe]);
    }

    #[test]
    fn test_type2_body_parse() {
        let test_data = hex::decode("00112233445566778899aabbccddeeffffeeddccbbaa99887766554433221100ab").expect("invalid hex string");
        let (body, consumed) = PacketBody::parse(&test_data, &header(0x40)).expect("invalid body data length");
        assert_eq!(consumed, 33);
        assert_eq!(hex::encode(body.hash2.expect("type 2 header")), "ffeeddccbbaa99887766554433221100");
        assert_eq!(body.context_type(), Context::Unknown);
        assert_eq!(body.context_label(), "Undefined - 0xab");
        assert!(body.payload.is_empty());
    }

    #[test]
    fn test_truncated_body() {
        let test_data = vec![0; 32];
        assert_eq!(PacketBody::parse(&test_data[..16], &header(0x00)), Err(ParseError::TruncatedBody));
        assert!(PacketBody::parse(&test_data[..17], &header(0x00)).is_ok());
        assert_eq!(PacketBody::parse(&test_data, &header(0x40)), Err(ParseError::TruncatedBody));
    }
}
