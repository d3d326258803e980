//! Fixed layout of an announce payload.

use log::debug;
use rns_bytes::{ParseError, Reader};
use rns_hdr::RATCHET_CODE;

use crate::app_data::AppData;
use crate::errors::AppDataError;

type Result<T> = std::result::Result<T, ParseError>;

pub const PUBLIC_KEY_SIZE: usize = 64;
pub const NAME_HASH_SIZE: usize = 10;
pub const RANDOM_HASH_SIZE: usize = 10;
pub const SIGNATURE_SIZE: usize = 64;
pub const RATCHET_SIZE: usize = 32;

/// Smallest announce payload: public key, name hash, random hash and signature.
pub const ANNOUNCE_MIN_SIZE: usize = PUBLIC_KEY_SIZE + NAME_HASH_SIZE + RANDOM_HASH_SIZE + SIGNATURE_SIZE;

/// Announce payload sliced into its regions.
///
/// All regions borrow from the payload, no bytes are copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceRecord<'a> {
    pub public_key: &'a [u8],
    pub name_hash: &'a [u8],
    pub random_hash: &'a [u8],
    pub signature: &'a [u8],
    /// Present only if the header context bit of the announce is set.
    pub ratchet: Option<&'a [u8]>,
    pub app_data: &'a [u8],
}

impl<'a> AnnounceRecord<'a> {
    /// Slices an announce payload.
    ///
    /// `header_context_flag` is the raw header context bit of the announce packet: `1` means a 32 byte ratchet
    /// follows the signature and shifts the application data.
    ///
    /// Results in error if the payload is shorter than 148 bytes, or shorter than 180 bytes when a ratchet is announced.
    pub fn parse(payload: &'a [u8], header_context_flag: u8) -> Result<Self> {
        if payload.len() < ANNOUNCE_MIN_SIZE {
            return Err(ParseError::TruncatedAnnounce);
        }
        let mut reader = Reader::new(payload);
        let public_key = reader.read_bytes(PUBLIC_KEY_SIZE).expect("invalid announce data size");
        let name_hash = reader.read_bytes(NAME_HASH_SIZE).expect("invalid announce data size");
        let random_hash = reader.read_bytes(RANDOM_HASH_SIZE).expect("invalid announce data size");
        let signature = reader.read_bytes(SIGNATURE_SIZE).expect("invalid announce data size");
        let ratchet = if header_context_flag == RATCHET_CODE {
            Some(reader.read_bytes(RATCHET_SIZE).map_err(|_| ParseError::TruncatedAnnounce)?)
        } else {
            None
        };
        let app_data = reader.read_remainder();
        Ok(AnnounceRecord {
            public_key,
            name_hash,
            random_hash,
            signature,
            ratchet,
            app_data,
        })
    }

    /// Decodes the application data, `None` if there is none.
    pub fn decode_app_data(&self) -> Option<std::result::Result<AppData, AppDataError>> {
        if self.app_data.is_empty() {
            return None;
        }
        let decoded = AppData::parse(self.app_data);
        if let Err(ref err) = decoded {
            debug!("can't decode announce app data {}: {}", hex::encode(self.app_data), err);
        }
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_data::AnnouncedName;

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    #[test]
    fn test_announce_creation() {
        for payload_length in 0..200 {
            let payload_data = vec![0; payload_length];
            let record = AnnounceRecord::parse(&payload_data, 0);
            if payload_length >= ANNOUNCE_MIN_SIZE {
                assert!(record.is_ok());
            } else {
                assert_eq!(record, Err(ParseError::TruncatedAnnounce));
            }
        }
    }

    #[test]
    fn test_announce_without_ratchet() {
        let payload_data = payload(ANNOUNCE_MIN_SIZE);
        let record = AnnounceRecord::parse(&payload_data, 0).expect("invalid announce data size");
        assert_eq!(record.public_key, &payload_data[..64]);
        assert_eq!(record.name_hash, &payload_data[64..74]);
        assert_eq!(record.random_hash, &payload_data[74..84]);
        assert_eq!(record.signature, &payload_data[84..148]);
        assert_eq!(record.ratchet, None);
        assert!(record.app_data.is_empty());
        assert_eq!(record.decode_app_data(), None);
    }

    #[test]
    fn test_announce_with_ratchet() {
        let exact = payload(180);
        let record = AnnounceRecord::parse(&exact, 1).expect("invalid announce data size");
        assert_eq!(record.ratchet, Some(&exact[148..180]));
        assert!(record.app_data.is_empty());

        let payload_data = payload(190);
        let record = AnnounceRecord::parse(&payload_data, 1).expect("invalid announce data size");
        assert_eq!(record.ratchet, Some(&payload_data[148..180]));
        assert_eq!(record.app_data, &payload_data[180..]);

        let without_ratchet = AnnounceRecord::parse(&payload_data, 0).expect("invalid announce data size");
        assert_eq!(without_ratchet.app_data, &payload_data[148..]);
    }

    #[test]
    fn test_truncated_ratchet() {
        let payload_data = payload(170);
        assert_eq!(AnnounceRecord::parse(&payload_data, 1), Err(ParseError::TruncatedAnnounce));
        assert!(AnnounceRecord::parse(&payload_data, 0).is_ok());
    }

    #[test]
    fn test_app_data_failure_is_isolated() {
        let mut payload_data = vec![0; ANNOUNCE_MIN_SIZE];
        payload_data.extend_from_slice(&hex::decode("92c403616263c0").expect("invalid hex string"));
        let record = AnnounceRecord::parse(&payload_data, 0).expect("invalid announce data size");
        assert_eq!(
            record.decode_app_data(),
            Some(Ok(AppData::AnnouncedName(AnnouncedName {
                name: "abc".to_string(),
                ticket: None
            })))
        );

        let mut broken = vec![0; ANNOUNCE_MIN_SIZE];
        broken.extend_from_slice(&[0x93, 0xc3]);
        let record = AnnounceRecord::parse(&broken, 0).expect("invalid announce data size");
        assert_eq!(record.signature, &broken[84..148]);
        assert_eq!(record.decode_app_data(), Some(Err(AppDataError::Truncated)));
    }
}
