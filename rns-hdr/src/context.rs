//! Packet context enum.

use num_enum::{FromPrimitive, IntoPrimitive};

/// Packet context codes, carried in the byte following the last header hash.
///
/// Unlike the header flags this table is open: protocol extensions add new codes,
/// so an unrecognized code is a normal case and is parsed as `Unknown`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum Context {
    None = 0x00,
    Resource = 0x01,
    ResourceAdvertisement = 0x02,
    ResourcePartRequest = 0x03,
    ResourceHashmapUpdate = 0x04,
    ResourceProof = 0x05,
    ResourceInitiatorCancel = 0x06,
    ResourceReceiverCancel = 0x07,
    CacheRequest = 0x08,
    Request = 0x09,
    Response = 0x0a,
    PathResponse = 0x0b,
    Command = 0x0c,
    CommandStatus = 0x0d,
    Channel = 0x0e,
    Keepalive = 0xfa,
    LinkIdentify = 0xfb,
    LinkClose = 0xfc,
    LinkProof = 0xfd,
    LinkRtt = 0xfe,
    LinkRequestProof = 0xff,

    /// Unrecognized context code.
    ///
    /// The raw byte is not kept here, keep it elsewhere to render or forward the packet.
    #[num_enum(default)]
    Unknown = 0x0f,
}

impl Context {
    /// Human readable label, `None` for unrecognized codes.
    pub fn label(self) -> Option<&'static str> {
        let label = match self {
            Context::None => "None",
            Context::Resource => "Resource",
            Context::ResourceAdvertisement => "Resource Advertisement",
            Context::ResourcePartRequest => "Resource Part Request",
            Context::ResourceHashmapUpdate => "Resource Hashmap Update",
            Context::ResourceProof => "Resource Proof",
            Context::ResourceInitiatorCancel => "Resource Initiator Cancel",
            Context::ResourceReceiverCancel => "Resource Receiver Cancel",
            Context::CacheRequest => "Cache Request",
            Context::Request => "Request",
            Context::Response => "Response",
            Context::PathResponse => "Path Response",
            Context::Command => "Command",
            Context::CommandStatus => "Command Status",
            Context::Channel => "Channel",
            Context::Keepalive => "Keepalive",
            Context::LinkIdentify => "Link Peer Identification Proof",
            Context::LinkClose => "Link Close",
            Context::LinkProof => "Link Proof",
            Context::LinkRtt => "Link Request Time Measurement",
            Context::LinkRequestProof => "Link Request Proof",
            Context::Unknown => return None,
        };
        Some(label)
    }
}

/// Renders a raw context byte, falling back to `Undefined - 0x..` for codes outside the table.
pub fn context_label(code: u8) -> String {
    match Context::from_primitive(code).label() {
        Some(label) => label.to_string(),
        None => format!("Undefined - {:#x}", code),
    }
}

#[test]
fn test_context_conversion() {
    let unknown_codes = [0x0f, 0x10, 0x20, 0x7f, 0x80, 0xf9];
    for &code in &unknown_codes {
        assert_eq!(Context::from_primitive(code), Context::Unknown);
    }
    assert_eq!(Context::from_primitive(0x0b), Context::PathResponse);
    assert_eq!(Context::from_primitive(0xfa), Context::Keepalive);
}

#[test]
fn test_context_label() {
    assert_eq!(context_label(0x00), "None");
    assert_eq!(context_label(0xfe), "Link Request Time Measurement");
    assert_eq!(context_label(0x0f), "Undefined - 0xf");
    assert_eq!(context_label(0x42), "Undefined - 0x42");
}
