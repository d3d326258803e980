//! Logic for Reticulum packet header parsing

use rns_bytes::{ParseError, Reader};

use crate::fields::{
    self, DestinationType, HeaderType, IfacFlag, PacketType, PropagationType, HEADER_CONTEXT_MASK, HEADER_CONTEXT_SHIFT, RATCHET_CODE,
};

type Result<T> = std::result::Result<T, ParseError>;

/// Reticulum packet header: a flags byte followed by the hop count.
///
/// Flags byte layout:
/// ```md
///    7   6   5   4   3   2   1   0
///  +---+---+---+---+---+---+---+---+
///  | I | H | C | P |  dest |  type |
///  +---+---+---+---+---+---+---+---+
/// ```
/// * **I**: IFAC flag
/// * **H**: header type
/// * **C**: header context flag, for announces it tells whether a ratchet is present
/// * **P**: propagation type
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    pub ifac_flag: IfacFlag,
    pub header_type: HeaderType,
    /// Raw header context bit. Its meaning depends on `packet_type`, see [ratchet_flag](#method.ratchet_flag).
    pub header_context_flag: u8,
    pub propagation_type: PropagationType,
    pub destination_type: DestinationType,
    pub packet_type: PacketType,
    pub hops: u8,
}

impl PacketHeader {
    pub const SIZE: usize = 2;

    /// Parses the first two bytes of `data` into a header.
    ///
    /// Returns the header and the number of consumed bytes, which is always `SIZE`.
    /// Results in error if fewer than 2 bytes are given; trailing bytes are ignored.
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        let mut reader = Reader::new(data);
        let flags = reader.read_u8().map_err(|_| ParseError::TruncatedHeader)?;
        let hops = reader.read_u8().map_err(|_| ParseError::TruncatedHeader)?;
        let header = PacketHeader {
            ifac_flag: fields::extract(flags, IfacFlag::MASK, IfacFlag::SHIFT),
            header_type: fields::extract(flags, HeaderType::MASK, HeaderType::SHIFT),
            header_context_flag: (flags & HEADER_CONTEXT_MASK) >> HEADER_CONTEXT_SHIFT,
            propagation_type: fields::extract(flags, PropagationType::MASK, PropagationType::SHIFT),
            destination_type: fields::extract(flags, DestinationType::MASK, DestinationType::SHIFT),
            packet_type: fields::extract(flags, PacketType::MASK, PacketType::SHIFT),
            hops,
        };
        Ok((header, reader.position()))
    }

    /// Reassembles the flags byte using the same masks the parser reads with.
    pub fn flags_byte(&self) -> u8 {
        let pack = |value: u8, mask: u8, shift: u8| (value << shift) & mask;
        pack(self.ifac_flag.into(), IfacFlag::MASK, IfacFlag::SHIFT)
            | pack(self.header_type.into(), HeaderType::MASK, HeaderType::SHIFT)
            | pack(self.header_context_flag, HEADER_CONTEXT_MASK, HEADER_CONTEXT_SHIFT)
            | pack(self.propagation_type.into(), PropagationType::MASK, PropagationType::SHIFT)
            | pack(self.destination_type.into(), DestinationType::MASK, DestinationType::SHIFT)
            | pack(self.packet_type.into(), PacketType::MASK, PacketType::SHIFT)
    }

    pub fn is_announce(&self) -> bool {
        self.packet_type == PacketType::Announce
    }

    /// Whether an announce payload carries a ratchet.
    ///
    /// The header context bit only means "ratchet present" for announces, `None` is returned for other packet types.
    pub fn ratchet_flag(&self) -> Option<bool> {
        if self.is_announce() {
            Some(self.header_context_flag == RATCHET_CODE)
        } else {
            None
        }
    }

    /// Label of the header context bit, picked from the announce table for announces.
    pub fn header_context_label(&self) -> &'static str {
        if self.is_announce() {
            fields::announce_header_context_label(self.header_context_flag)
        } else {
            fields::generic_header_context_label(self.header_context_flag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_header_parse() {
        let test_data = hex::decode("5d07ff").expect("invalid hex string");
        let (parsed_header, consumed) = PacketHeader::parse(&test_data).expect("invalid header data length");
        assert_eq!(consumed, 2);
        assert_eq!(
            parsed_header,
            PacketHeader {
                ifac_flag: IfacFlag::Disabled,
                header_type: HeaderType::Type2,
                header_context_flag: 0,
                propagation_type: PropagationType::Transport,
                destination_type: DestinationType::Link,
                packet_type: PacketType::Announce,
                hops: 7,
            }
        );
        assert_eq!(parsed_header.ratchet_flag(), Some(false));
        assert_eq!(parsed_header.header_context_label(), "No Ratchet    (0)");
    }

    #[test]
    fn test_all_flag_bytes() {
        for flags in 0..=u8::MAX {
            let (header, _) = PacketHeader::parse(&[flags, 3]).expect("invalid header data length");
            assert!(header.header_context_flag <= 1);
            assert!(u8::from(header.propagation_type) <= 1);
            assert!(u8::from(header.destination_type) <= 3);
            assert!(u8::from(header.packet_type) <= 3);
            assert_eq!(header.hops, 3);
            assert_eq!(header.flags_byte(), flags);
        }
    }

    #[test]
    fn test_ratchet_flag_only_for_announces() {
        let (data_header, _) = PacketHeader::parse(&[0b0010_0000, 0]).expect("invalid header data length");
        assert_eq!(data_header.header_context_flag, 1);
        assert_eq!(data_header.ratchet_flag(), None);
        assert_eq!(data_header.header_context_label(), "Unknown       (1)");

        let (announce_header, _) = PacketHeader::parse(&[0b0010_0001, 0]).expect("invalid header data length");
        assert_eq!(announce_header.ratchet_flag(), Some(true));
        assert_eq!(announce_header.header_context_label(), "Ratchet       (1)");
    }

    #[test]
    fn test_truncated_header() {
        assert_eq!(PacketHeader::parse(&[]), Err(ParseError::TruncatedHeader));
        assert_eq!(PacketHeader::parse(&[0x01]), Err(ParseError::TruncatedHeader));
    }
}
