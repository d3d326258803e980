//! Library for dumping Reticulum traffic received over LoRa.
//!
//! Frames come from a [RadioSource](source/struct.RadioSource.html), are decoded with [parse_packet](fn.parse_packet.html)
//! and rendered with [Report](report/struct.Report.html). Decoding is pure: each frame is decoded on its own and
//! a bad frame never affects the next one.

use log::debug;

pub use rns_ann::{AnnounceRecord, AppData, AppDataError};
use rns_hdr::{DestinationType, PacketBody, PacketHeader};
pub use rns_hdr::ParseError;

pub mod config;
pub mod report;
pub mod source;

/// Framing byte in front of every frame handed over by the radio, it is not part of the packet.
pub const FRAME_PREFIX_SIZE: usize = 1;

/// Fully decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet<'a> {
    /// Frame bytes without the framing prefix.
    pub frame: &'a [u8],
    pub header: PacketHeader,
    pub body: PacketBody<'a>,
    pub payload: PayloadView<'a>,
}

/// Interpretation of the packet payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadView<'a> {
    Announce(AnnounceView<'a>),
    /// Link traffic, not decodable without the link keys.
    Encrypted(&'a [u8]),
    Raw(&'a [u8]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnounceView<'a> {
    pub record: AnnounceRecord<'a>,
    /// Decoded application data, `None` when the announce has none.
    pub app_data: Option<Result<AppData, AppDataError>>,
}

/// Decodes a frame as received from the radio, including the framing prefix byte.
///
/// Results in error if the header, the hash region or a fixed announce region is truncated;
/// no partially decoded packet is returned in that case.
pub fn parse_packet(raw: &[u8]) -> Result<Packet<'_>, ParseError> {
    let frame = raw.get(FRAME_PREFIX_SIZE..).ok_or(ParseError::TruncatedHeader)?;
    let (header, header_size) = PacketHeader::parse(frame)?;
    let (body, _) = PacketBody::parse(&frame[header_size..], &header)?;
    let payload = dispatch(&header, body.payload)?;
    debug!(
        "decoded {:?} packet to {}, {} hops, {} payload bytes",
        header.packet_type,
        hex::encode(body.hash1),
        header.hops,
        body.payload.len()
    );
    Ok(Packet { frame, header, body, payload })
}

/// Picks the payload interpretation from the header.
pub fn dispatch<'a>(header: &PacketHeader, payload: &'a [u8]) -> Result<PayloadView<'a>, ParseError> {
    if header.is_announce() {
        let record = AnnounceRecord::parse(payload, header.header_context_flag)?;
        let app_data = record.decode_app_data();
        return Ok(PayloadView::Announce(AnnounceView { record, app_data }));
    }
    if header.destination_type == DestinationType::Link {
        return Ok(PayloadView::Encrypted(payload));
    }
    Ok(PayloadView::Raw(payload))
}

#[cfg(test)]
mod tests {
    use rns_ann::AnnouncedName;
    use rns_hdr::{HeaderType, PacketType};

    use super::*;

    pub(crate) fn frame(flags: u8, hops: u8, hashes: usize, context: u8, payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![0xff, flags, hops];
        for i in 0..hashes {
            frame.extend_from_slice(&[0x11 * (i as u8 + 1); 16]);
        }
        frame.push(context);
        frame.extend_from_slice(payload);
        frame
    }

    #[test]
    fn test_parse_data_packet() {
        let raw = frame(0x00, 2, 1, 0x00, b"hello");
        let packet = parse_packet(&raw).expect("invalid frame");
        assert_eq!(packet.frame, &raw[1..]);
        assert_eq!(packet.header.packet_type, PacketType::Data);
        assert_eq!(packet.header.hops, 2);
        assert_eq!(packet.body.hash1, [0x11; 16]);
        assert_eq!(packet.body.hash2, None);
        assert_eq!(packet.payload, PayloadView::Raw(b"hello"));
    }

    #[test]
    fn test_parse_link_packet() {
        let raw = frame(0x4c, 0, 2, 0xfa, &[1, 2, 3]);
        let packet = parse_packet(&raw).expect("invalid frame");
        assert_eq!(packet.header.header_type, HeaderType::Type2);
        assert_eq!(packet.body.hash2, Some([0x22; 16]));
        assert_eq!(packet.payload, PayloadView::Encrypted(&[1, 2, 3]));
    }

    #[test]
    fn test_parse_announce_packet() {
        let mut payload = vec![0xab; 148];
        payload.extend_from_slice(&hex::decode("92c403616263c0").expect("invalid hex string"));
        // link destination bits are ignored for announces
        let raw = frame(0x0d, 1, 1, 0x00, &payload);
        let packet = parse_packet(&raw).expect("invalid frame");
        match packet.payload {
            PayloadView::Announce(announce) => {
                assert_eq!(announce.record.signature, &payload[84..148]);
                assert_eq!(
                    announce.app_data,
                    Some(Ok(AppData::AnnouncedName(AnnouncedName {
                        name: "abc".to_string(),
                        ticket: None
                    })))
                );
            }
            other => panic!("expected announce, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_frames() {
        assert_eq!(parse_packet(&[]), Err(ParseError::TruncatedHeader));
        assert_eq!(parse_packet(&[0xff, 0x00]), Err(ParseError::TruncatedHeader));
        assert_eq!(parse_packet(&[0xff, 0x00, 0x00]), Err(ParseError::TruncatedBody));
        let type2_short = frame(0x40, 0, 1, 0x00, &[]);
        assert_eq!(parse_packet(&type2_short), Err(ParseError::TruncatedBody));
        let short_announce = frame(0x01, 0, 1, 0x00, &[0; 100]);
        assert_eq!(parse_packet(&short_announce), Err(ParseError::TruncatedAnnounce));
    }

    #[test]
    fn test_broken_app_data_keeps_announce() {
        let mut payload = vec![0; 148];
        payload.push(0x42);
        let raw = frame(0x01, 0, 1, 0x00, &payload);
        let packet = parse_packet(&raw).expect("invalid frame");
        match packet.payload {
            PayloadView::Announce(announce) => assert_eq!(announce.app_data, Some(Err(AppDataError::Unrecognized(0x42)))),
            other => panic!("expected announce, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = frame(0x08, 5, 1, 0x0b, b"payload");
        assert_eq!(parse_packet(&raw), parse_packet(&raw));
    }
}
