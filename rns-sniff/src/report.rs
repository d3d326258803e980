//! Human readable and JSON renderings of decoded packets.

use std::fmt;

use serde_json::{json, Value};

use rns_ann::{AppData, AppDataError, MaxSize, NodeState};

use crate::{AnnounceView, Packet, PayloadView};

/// Number of leading frame bytes dumped above the header block.
pub const HEADER_DUMP_SIZE: usize = 19;

/// Text dump of a decoded packet.
///
/// Field order and labels follow the classic Reticulum packet decoder output.
pub struct Report<'p, 'a>(pub &'p Packet<'a>);

impl fmt::Display for Report<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let packet = self.0;
        let header = &packet.header;
        let body = &packet.body;

        writeln!(f)?;
        writeln!(f, "##################")?;
        writeln!(f, "### NEW PACKET ###")?;
        writeln!(f, "##################")?;
        writeln!(f)?;
        writeln!(f, "Shift Along")?;
        let dump_len = packet.frame.len().min(HEADER_DUMP_SIZE);
        writeln!(f, "{}", hex_bytes(&packet.frame[..dump_len]))?;
        writeln!(f)?;
        writeln!(f, "{}", hex_bytes(packet.frame))?;

        writeln!(f, "### Header ###")?;
        writeln!(f, "IFAC:             {}", header.ifac_flag.label())?;
        writeln!(f, "Header Type:      {}", header.header_type.label())?;
        writeln!(f, "Header Context:   {}", header.header_context_label())?;
        writeln!(f, "Propagation Type: {}", header.propagation_type.label())?;
        writeln!(f, "Destination Type: {}", header.destination_type.label())?;
        writeln!(f, "Packet Type:      {}", header.packet_type.label())?;
        writeln!(f, "Hops:             {}", header.hops)?;
        writeln!(f)?;

        writeln!(f, "### Hash(es) ###")?;
        writeln!(f, "Hash1: {}", hex::encode(body.hash1))?;
        match body.hash2 {
            Some(hash2) => writeln!(f, "Hash2: {}", hex::encode(hash2))?,
            None => writeln!(f, "Hash2: N/A")?,
        }
        writeln!(f)?;

        writeln!(f, "### Context ###")?;
        writeln!(f, "Context: {}", body.context_label())?;
        writeln!(f)?;

        match &packet.payload {
            PayloadView::Announce(announce) => write_announce(f, announce),
            PayloadView::Encrypted(_) => {
                writeln!(f, "### Link data is encrypted ###")?;
                writeln!(f)
            }
            PayloadView::Raw(data) => {
                writeln!(f, "### Raw Data ###")?;
                writeln!(f, "Length: {}", data.len())?;
                writeln!(f, "Bytes: ")?;
                writeln!(f, "{}", hex::encode(data))?;
                writeln!(f, " ")?;
                writeln!(f, "UTF-8: ")?;
                writeln!(f, "{}", String::from_utf8_lossy(data))
            }
        }
    }
}

fn write_announce(f: &mut fmt::Formatter<'_>, announce: &AnnounceView<'_>) -> fmt::Result {
    let record = &announce.record;
    writeln!(f, "### Announce Data ###")?;
    writeln!(f, "Public Key:  {}", hex::encode(record.public_key))?;
    writeln!(f, "Name Hash:   {}", hex::encode(record.name_hash))?;
    writeln!(f, "Random Hash: {}", hex::encode(record.random_hash))?;
    writeln!(f, "Signature:   {}", hex::encode(record.signature))?;
    if let Some(ratchet) = record.ratchet {
        writeln!(f, "Ratchet:     {}", hex::encode(ratchet))?;
    }
    writeln!(f, "Raw AppData: {}", hex::encode(record.app_data))?;
    writeln!(f, "      UTF-8: {}", utf8_ignoring_errors(record.app_data))?;
    writeln!(f)?;

    match &announce.app_data {
        None => Ok(()),
        Some(Ok(AppData::PropagationNode(node))) => {
            writeln!(f, "Propagation node:")?;
            match node.state {
                NodeState::Active => writeln!(f, "    Active")?,
                NodeState::Inactive => writeln!(f, "    Inactive")?,
                NodeState::Unrecognized(_) => {}
            }
            writeln!(f, "    Time:     {}", node.time)?;
            for warning in &node.warnings {
                writeln!(f, "    WARNING: {}", warning.message())?;
            }
            match node.max_size {
                Some(size) if !size.is_zero() => writeln!(f, "    Max Size: {} KB", max_size_str(size)),
                _ => Ok(()),
            }
        }
        Some(Ok(AppData::AnnouncedName(name))) => {
            writeln!(f, "Announced Name: {}", name.name)?;
            match name.ticket {
                Some(ticket) => writeln!(f, "Ticket:         {}", ticket),
                None => writeln!(f, "Ticket:          None"),
            }
        }
        Some(Err(AppDataError::Unrecognized(marker))) => writeln!(f, "AppData:        undecoded (marker {:#x})", marker),
        Some(Err(err)) => writeln!(f, "AppData error:  {}", err),
    }
}

/// JSON rendering of a decoded packet.
pub fn to_json(packet: &Packet<'_>) -> Value {
    let header = &packet.header;
    let body = &packet.body;
    let payload = match &packet.payload {
        PayloadView::Announce(announce) => announce_json(announce),
        PayloadView::Encrypted(data) => json!({ "kind": "encrypted", "length": data.len() }),
        PayloadView::Raw(data) => json!({
            "kind": "raw",
            "length": data.len(),
            "hex": hex::encode(data),
            "utf8": String::from_utf8_lossy(data),
        }),
    };
    json!({
        "frame": hex::encode(packet.frame),
        "header": {
            "ifac": header.ifac_flag.label(),
            "headerType": header.header_type.label(),
            "headerContext": header.header_context_label(),
            "headerContextFlag": header.header_context_flag,
            "propagationType": header.propagation_type.label(),
            "destinationType": header.destination_type.label(),
            "packetType": header.packet_type.label(),
            "hops": header.hops,
        },
        "hash1": hex::encode(body.hash1),
        "hash2": body.hash2.map(hex::encode),
        "context": body.context_label(),
        "payload": payload,
    })
}

fn announce_json(announce: &AnnounceView<'_>) -> Value {
    let record = &announce.record;
    let app_data = match &announce.app_data {
        None => Value::Null,
        Some(Ok(AppData::PropagationNode(node))) => {
            let active = match node.state {
                NodeState::Active => Some(true),
                NodeState::Inactive => Some(false),
                NodeState::Unrecognized(_) => None,
            };
            json!({
                "kind": "propagationNode",
                "active": active,
                "time": node.time,
                "maxSizeKb": node.max_size.map(max_size_str),
                "warnings": node.warnings.iter().map(|w| w.message()).collect::<Vec<_>>(),
            })
        }
        Some(Ok(AppData::AnnouncedName(name))) => json!({
            "kind": "announcedName",
            "name": name.name,
            "ticket": name.ticket,
        }),
        Some(Err(err)) => json!({ "error": err.to_string() }),
    };
    json!({
        "kind": "announce",
        "publicKey": hex::encode(record.public_key),
        "nameHash": hex::encode(record.name_hash),
        "randomHash": hex::encode(record.random_hash),
        "signature": hex::encode(record.signature),
        "ratchet": record.ratchet.map(hex::encode),
        "appData": hex::encode(record.app_data),
        "decodedAppData": app_data,
    })
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:#x}", b)).collect::<Vec<_>>().join(" ")
}

fn utf8_ignoring_errors(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).chars().filter(|&c| c != char::REPLACEMENT_CHARACTER).collect()
}

fn max_size_str(size: MaxSize) -> String {
    match size {
        MaxSize::UInt16(size) => size.to_string(),
        MaxSize::Float64(size) => format!("{:?}", size),
    }
}
