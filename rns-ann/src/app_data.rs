//! Decoder of the application data carried by announces.
//!
//! Application data is a small MessagePack encoded array. Only two record layouts are known and decoded,
//! the rest is reported as unrecognized:
//! * `0x93` - propagation node: `[active, timebase, max size]`
//! * `0x92` - announced name: `[name, ticket]`
//!
//! Decoding runs in two steps: [decode_record](fn.decode_record.html) reads the bytes into a
//! [MicroValue](enum.MicroValue.html) array, then [AppData](enum.AppData.html) interprets its elements.

use log::warn;
use rns_bytes::Reader;

use crate::errors::AppDataError;

type Result<T> = std::result::Result<T, AppDataError>;

const PROPAGATION_NODE_MARKER: u8 = 0x93;
const ANNOUNCED_NAME_MARKER: u8 = 0x92;

const NIL_MARKER: u8 = 0xc0;
const FALSE_MARKER: u8 = 0xc2;
const TRUE_MARKER: u8 = 0xc3;
const STR_MARKER: u8 = 0xc4;
const FLOAT64_MARKER: u8 = 0xcb;
const UINT16_MARKER: u8 = 0xcd;

/// Single decoded application data value.
#[derive(Debug, Clone, PartialEq)]
pub enum MicroValue {
    /// Element count and elements of a record.
    Array(u8, Vec<MicroValue>),
    Nil,
    Bool(bool),
    UInt16(u16),
    UInt32(u32),
    Float64(f64),
    /// Length prefix and raw bytes.
    Str(u8, Vec<u8>),
    /// Byte which is kept as is, either an untyped value or an unrecognized marker.
    RawByte(u8),
}

/// Interpreted application data record.
#[derive(Debug, Clone, PartialEq)]
pub enum AppData {
    PropagationNode(PropagationNode),
    AnnouncedName(AnnouncedName),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropagationNode {
    pub state: NodeState,
    pub time: u32,
    /// Maximum accepted transfer size in kilobytes, `None` if the size tag is neither uint16 nor float64.
    pub max_size: Option<MaxSize>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeState {
    Active,
    Inactive,
    /// Neither boolean marker, the raw byte is kept.
    Unrecognized(u8),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MaxSize {
    UInt16(u16),
    /// Some nodes announce the size as a float64 instead of uint16.
    Float64(f64),
}

impl MaxSize {
    pub fn is_zero(&self) -> bool {
        match *self {
            MaxSize::UInt16(size) => size == 0,
            MaxSize::Float64(size) => size == 0.0,
        }
    }
}

/// Non-fatal irregularity met while decoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The max size was encoded as float64 instead of uint16. Reported, never normalized.
    Float64MaxSize,
}

impl Warning {
    pub fn message(&self) -> &'static str {
        match self {
            Warning::Float64MaxSize => "Using float64, not uint16!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncedName {
    pub name: String,
    /// `None` when the ticket is encoded as nil.
    pub ticket: Option<u8>,
}

impl AppData {
    /// Decodes application data bytes.
    ///
    /// Trailing bytes after a known record are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let record = decode_record(data)?;
        Self::from_record(record)
    }

    /// Interprets a record produced by [decode_record](fn.decode_record.html).
    pub fn from_record(record: MicroValue) -> Result<Self> {
        match record {
            MicroValue::Array(3, elements) => PropagationNode::from_elements(elements).map(AppData::PropagationNode),
            MicroValue::Array(2, elements) => AnnouncedName::from_elements(elements).map(AppData::AnnouncedName),
            _ => Err(AppDataError::Malformed("unknown record layout")),
        }
    }
}

impl PropagationNode {
    fn from_elements(elements: Vec<MicroValue>) -> Result<Self> {
        match elements.as_slice() {
            [state, MicroValue::UInt32(time), size] => {
                let state = match *state {
                    MicroValue::Bool(true) => NodeState::Active,
                    MicroValue::Bool(false) => NodeState::Inactive,
                    MicroValue::RawByte(byte) => NodeState::Unrecognized(byte),
                    _ => return Err(AppDataError::Malformed("invalid node state")),
                };
                let mut warnings = Vec::new();
                let max_size = match *size {
                    MicroValue::UInt16(size) => Some(MaxSize::UInt16(size)),
                    MicroValue::Float64(size) => {
                        warn!("propagation node announces max size as float64 ({})", size);
                        warnings.push(Warning::Float64MaxSize);
                        Some(MaxSize::Float64(size))
                    }
                    _ => None,
                };
                Ok(PropagationNode { state, time: *time, max_size, warnings })
            }
            _ => Err(AppDataError::Malformed("invalid propagation node record")),
        }
    }
}

impl AnnouncedName {
    fn from_elements(elements: Vec<MicroValue>) -> Result<Self> {
        let mut elements = elements.into_iter();
        match (elements.next(), elements.next()) {
            (Some(MicroValue::Str(_, bytes)), Some(ticket)) => {
                let name = String::from_utf8(bytes).map_err(|_| AppDataError::InvalidName)?;
                let ticket = match ticket {
                    MicroValue::Nil => None,
                    MicroValue::RawByte(ticket) => Some(ticket),
                    _ => return Err(AppDataError::Malformed("invalid ticket")),
                };
                Ok(AnnouncedName { name, ticket })
            }
            _ => Err(AppDataError::Malformed("invalid announced name record")),
        }
    }
}

/// Reads one of the two known records into a `MicroValue::Array`.
///
/// This is not a general MessagePack decoder: the element layout is fixed by the leading marker.
pub fn decode_record(data: &[u8]) -> Result<MicroValue> {
    let mut reader = Reader::new(data);
    let marker = reader.read_u8()?;
    match marker {
        PROPAGATION_NODE_MARKER => {
            let state = read_bool_like(&mut reader)?;
            // uint32 type tag, the timebase is always read as 4 bytes
            let _tag = reader.read_u8()?;
            let time = MicroValue::UInt32(reader.read_u32_be()?);
            let size = read_size(&mut reader)?;
            Ok(MicroValue::Array(3, vec![state, time, size]))
        }
        ANNOUNCED_NAME_MARKER => {
            let name = read_str(&mut reader)?;
            let ticket = match reader.read_u8()? {
                NIL_MARKER => MicroValue::Nil,
                byte => MicroValue::RawByte(byte),
            };
            Ok(MicroValue::Array(2, vec![name, ticket]))
        }
        other => Err(AppDataError::Unrecognized(other)),
    }
}

fn read_bool_like(reader: &mut Reader) -> Result<MicroValue> {
    let value = match reader.read_u8()? {
        TRUE_MARKER => MicroValue::Bool(true),
        FALSE_MARKER => MicroValue::Bool(false),
        byte => MicroValue::RawByte(byte),
    };
    Ok(value)
}

fn read_size(reader: &mut Reader) -> Result<MicroValue> {
    let value = match reader.read_u8()? {
        UINT16_MARKER => MicroValue::UInt16(reader.read_u16_be()?),
        FLOAT64_MARKER => MicroValue::Float64(reader.read_f64_be()?),
        tag => MicroValue::RawByte(tag),
    };
    Ok(value)
}

fn read_str(reader: &mut Reader) -> Result<MicroValue> {
    let marker = reader.read_u8()?;
    if marker != STR_MARKER {
        return Err(AppDataError::UnexpectedMarker { expected: STR_MARKER, found: marker });
    }
    let len = reader.read_u8()?;
    let bytes = reader.read_bytes(len as usize)?;
    Ok(MicroValue::Str(len, bytes.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_hex(hex: &str) -> Vec<u8> {
        hex::decode(hex).expect("invalid hex string")
    }

    #[test]
    fn test_announced_name() {
        let data = decode_hex("92c403616263c0");
        assert_eq!(
            decode_record(&data),
            Ok(MicroValue::Array(2, vec![MicroValue::Str(3, b"abc".to_vec()), MicroValue::Nil]))
        );
        assert_eq!(
            AppData::parse(&data),
            Ok(AppData::AnnouncedName(AnnouncedName {
                name: "abc".to_string(),
                ticket: None
            }))
        );

        let with_ticket = decode_hex("92c4046e6f64650e");
        assert_eq!(
            AppData::parse(&with_ticket),
            Ok(AppData::AnnouncedName(AnnouncedName {
                name: "node".to_string(),
                ticket: Some(14)
            }))
        );
    }

    #[test]
    fn test_propagation_node() {
        let data = decode_hex("93c3ce0000000acd0005");
        assert_eq!(
            AppData::parse(&data),
            Ok(AppData::PropagationNode(PropagationNode {
                state: NodeState::Active,
                time: 10,
                max_size: Some(MaxSize::UInt16(5)),
                warnings: vec![],
            }))
        );
    }

    #[test]
    fn test_propagation_node_float_size() {
        let data = decode_hex("93c2ce6553f100cb4070000000000000");
        assert_eq!(
            AppData::parse(&data),
            Ok(AppData::PropagationNode(PropagationNode {
                state: NodeState::Inactive,
                time: 0x6553f100,
                max_size: Some(MaxSize::Float64(256.0)),
                warnings: vec![Warning::Float64MaxSize],
            }))
        );
    }

    #[test]
    fn test_propagation_node_unknown_markers() {
        let data = decode_hex("93a1ce0000000ac0");
        assert_eq!(
            AppData::parse(&data),
            Ok(AppData::PropagationNode(PropagationNode {
                state: NodeState::Unrecognized(0xa1),
                time: 10,
                max_size: None,
                warnings: vec![],
            }))
        );
    }

    #[test]
    fn test_unrecognized_record() {
        assert_eq!(AppData::parse(&decode_hex("81a16101")), Err(AppDataError::Unrecognized(0x81)));
        assert_eq!(AppData::parse(b"hello"), Err(AppDataError::Unrecognized(b'h')));
        assert_eq!(AppData::parse(&[]), Err(AppDataError::Truncated));
    }

    #[test]
    fn test_malformed_records() {
        assert_eq!(AppData::parse(&decode_hex("93c3ce00")), Err(AppDataError::Truncated));
        assert_eq!(AppData::parse(&decode_hex("93c3ce0000000acd00")), Err(AppDataError::Truncated));
        assert_eq!(AppData::parse(&decode_hex("92c4056162")), Err(AppDataError::Truncated));
        assert_eq!(AppData::parse(&decode_hex("92c403616263")), Err(AppDataError::Truncated));
        assert_eq!(
            AppData::parse(&decode_hex("92a3616263c0")),
            Err(AppDataError::UnexpectedMarker { expected: 0xc4, found: 0xa3 })
        );
        assert_eq!(AppData::parse(&decode_hex("92c401ffc0")), Err(AppDataError::InvalidName));
        assert_eq!(
            AppData::from_record(MicroValue::Array(1, vec![MicroValue::Nil])),
            Err(AppDataError::Malformed("unknown record layout"))
        );
    }

    #[test]
    fn test_zero_max_size() {
        assert!(MaxSize::UInt16(0).is_zero());
        assert!(MaxSize::Float64(0.0).is_zero());
        assert!(!MaxSize::UInt16(5).is_zero());
    }
}
