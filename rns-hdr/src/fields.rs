//! Bit-field enums of the packet header flags byte and their report labels.
//!
//! Every field is a closed enum covering its whole bit range, so any flags byte maps onto a labelled value.

use std::convert::TryFrom;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Interface Access Code flag, bit 7.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum IfacFlag {
    Disabled = 0,
    Authenticated = 1,
}

impl IfacFlag {
    pub(crate) const MASK: u8 = 0b1000_0000;
    pub(crate) const SHIFT: u8 = 7;

    pub fn label(self) -> &'static str {
        match self {
            IfacFlag::Disabled => "Disabled      (0)",
            IfacFlag::Authenticated => "Authenticated (1)",
        }
    }
}

/// Header type, bit 6. Type 2 headers carry a second (transport) hash.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum HeaderType {
    Type1 = 0,
    Type2 = 1,
}

impl HeaderType {
    pub(crate) const MASK: u8 = 0b0100_0000;
    pub(crate) const SHIFT: u8 = 6;

    pub fn label(self) -> &'static str {
        match self {
            HeaderType::Type1 => "Type 1        (0)",
            HeaderType::Type2 => "Type 2        (1)",
        }
    }

    /// Number of 16 byte hashes following the header.
    pub fn hash_count(self) -> usize {
        match self {
            HeaderType::Type1 => 1,
            HeaderType::Type2 => 2,
        }
    }
}

/// Propagation type.
///
/// The flags byte only spends bit 4 on it, so the reserved values are never decoded from the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PropagationType {
    Broadcast = 0,
    Transport = 1,
    Reserved2 = 2,
    Reserved3 = 3,
}

impl PropagationType {
    pub(crate) const MASK: u8 = 0b0001_0000;
    pub(crate) const SHIFT: u8 = 4;

    pub fn label(self) -> &'static str {
        match self {
            PropagationType::Broadcast => "Broadcast    (00)",
            PropagationType::Transport => "Transport    (01)",
            PropagationType::Reserved2 => "Reserved     (10)",
            PropagationType::Reserved3 => "Reserved     (11)",
        }
    }
}

/// Destination type, bits 3-2.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum DestinationType {
    Single = 0,
    Group = 1,
    Plain = 2,
    Link = 3,
}

impl DestinationType {
    pub(crate) const MASK: u8 = 0b0000_1100;
    pub(crate) const SHIFT: u8 = 2;

    pub fn label(self) -> &'static str {
        match self {
            DestinationType::Single => "Single       (00)",
            DestinationType::Group => "Group        (01)",
            DestinationType::Plain => "Plain        (10)",
            DestinationType::Link => "Link         (11)",
        }
    }
}

/// Packet type, bits 1-0.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum PacketType {
    Data = 0,
    Announce = 1,
    LinkRequest = 2,
    Proof = 3,
}

impl PacketType {
    pub(crate) const MASK: u8 = 0b0000_0011;
    pub(crate) const SHIFT: u8 = 0;

    pub fn label(self) -> &'static str {
        match self {
            PacketType::Data => "Data         (00)",
            PacketType::Announce => "Announce     (01)",
            PacketType::LinkRequest => "Link Request (10)",
            PacketType::Proof => "Proof        (11)",
        }
    }
}

/// Header context bit, bit 5.
pub(crate) const HEADER_CONTEXT_MASK: u8 = 0b0010_0000;
pub(crate) const HEADER_CONTEXT_SHIFT: u8 = 5;

/// Value of the header context bit announcing a ratchet in an announce payload.
pub const RATCHET_CODE: u8 = 0x01;

/// Label of the header context bit when nothing is known about its meaning.
pub fn generic_header_context_label(bit: u8) -> &'static str {
    if bit == 0 {
        "Unknown       (0)"
    } else {
        "Unknown       (1)"
    }
}

/// Label of the header context bit of an announce packet.
pub fn announce_header_context_label(bit: u8) -> &'static str {
    if bit == RATCHET_CODE {
        "Ratchet       (1)"
    } else {
        "No Ratchet    (0)"
    }
}

/// Extracts a field from the flags byte. The masked value always fits the enum.
pub(crate) fn extract<T>(flags: u8, mask: u8, shift: u8) -> T
where
    T: TryFrom<u8>,
    T::Error: std::fmt::Debug,
{
    T::try_from((flags & mask) >> shift).expect("masked value is out of enum range")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_exhaustive() {
        for code in 0..4u8 {
            assert!(!PropagationType::try_from(code).expect("2 bit value").label().is_empty());
            assert!(!DestinationType::try_from(code).expect("2 bit value").label().is_empty());
            assert!(!PacketType::try_from(code).expect("2 bit value").label().is_empty());
        }
        for code in 0..2u8 {
            assert!(!IfacFlag::try_from(code).expect("1 bit value").label().is_empty());
            assert!(!HeaderType::try_from(code).expect("1 bit value").label().is_empty());
        }
        assert!(PacketType::try_from(4).is_err());
    }

    #[test]
    fn test_extract() {
        let flags = 0b1101_1110;
        assert_eq!(extract::<IfacFlag>(flags, IfacFlag::MASK, IfacFlag::SHIFT), IfacFlag::Authenticated);
        assert_eq!(extract::<HeaderType>(flags, HeaderType::MASK, HeaderType::SHIFT), HeaderType::Type2);
        assert_eq!(extract::<PropagationType>(flags, PropagationType::MASK, PropagationType::SHIFT), PropagationType::Transport);
        assert_eq!(extract::<DestinationType>(flags, DestinationType::MASK, DestinationType::SHIFT), DestinationType::Link);
        assert_eq!(extract::<PacketType>(flags, PacketType::MASK, PacketType::SHIFT), PacketType::LinkRequest);
    }

    #[test]
    fn test_header_context_labels() {
        assert_eq!(announce_header_context_label(0), "No Ratchet    (0)");
        assert_eq!(announce_header_context_label(RATCHET_CODE), "Ratchet       (1)");
        assert_eq!(generic_header_context_label(1), "Unknown       (1)");
    }
}
