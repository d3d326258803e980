//! Sources of raw LoRa frames.
//!
//! The radio itself is driven by other software: a gateway forwarding received frames over UDP,
//! or a capture of hex encoded frames, one per line, read from a file or stdin.

use std::io;

use log::{debug, info};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::net::UdpSocket;

use crate::config::SourceOptions;

/// Largest datagram accepted from a gateway. LoRa frames are at most 255 bytes.
const MAX_DATAGRAM_SIZE: usize = 1500;

type LineReader = Lines<BufReader<Box<dyn AsyncRead + Unpin + Send>>>;

pub struct RadioSource {
    inner: Inner,
    min_frame_len: usize,
}

enum Inner {
    Lines { lines: LineReader, line_no: usize },
    Udp(UdpSocket),
}

impl RadioSource {
    pub async fn open(opts: &SourceOptions, min_frame_len: usize) -> Result<Self, SourceError> {
        let source = match opts {
            SourceOptions::Stdin => {
                info!("Reading frames from stdin");
                Self::from_reader(tokio::io::stdin(), min_frame_len)
            }
            SourceOptions::File(path) => {
                info!("Reading frames from [{}]", path.display());
                let file = File::open(path).await.map_err(|e| SourceError::OpenError(e))?;
                Self::from_reader(file, min_frame_len)
            }
            SourceOptions::Udp(addr) => {
                let socket = UdpSocket::bind(addr).await.map_err(|e| SourceError::OpenError(e))?;
                info!("Receiving frames on UDP [{}]", addr);
                RadioSource { inner: Inner::Udp(socket), min_frame_len }
            }
        };
        Ok(source)
    }

    /// Reads hex encoded frames, one per line. Empty lines and lines starting with `#` are skipped.
    pub fn from_reader<R: AsyncRead + Unpin + Send + 'static>(reader: R, min_frame_len: usize) -> Self {
        let reader: Box<dyn AsyncRead + Unpin + Send> = Box::new(reader);
        let lines = BufReader::new(reader).lines();
        RadioSource {
            inner: Inner::Lines { lines, line_no: 0 },
            min_frame_len,
        }
    }

    /// Receives the next frame long enough to be decoded. `None` means the source is exhausted.
    pub async fn receive(&mut self) -> Result<Option<Vec<u8>>, ReceiveError> {
        loop {
            let frame = match self.receive_any().await? {
                Some(frame) => frame,
                None => return Ok(None),
            };
            if frame.len() > self.min_frame_len {
                return Ok(Some(frame));
            }
            debug!("Skipping {} byte frame: {}", frame.len(), hex::encode(&frame));
        }
    }

    async fn receive_any(&mut self) -> Result<Option<Vec<u8>>, ReceiveError> {
        match &mut self.inner {
            Inner::Lines { lines, line_no } => loop {
                let line = match lines.next_line().await.map_err(|e| ReceiveError::SourceError(e))? {
                    Some(line) => line,
                    None => return Ok(None),
                };
                *line_no += 1;
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                let hex_str = line.split_whitespace().collect::<String>();
                let frame = hex::decode(&hex_str).map_err(|e| ReceiveError::BadFrame(*line_no, e))?;
                return Ok(Some(frame));
            },
            Inner::Udp(socket) => {
                let mut buf = [0; MAX_DATAGRAM_SIZE];
                let (size, from) = socket.recv_from(&mut buf).await.map_err(|e| ReceiveError::SourceError(e))?;
                debug!("Received {} bytes from {}", size, from);
                Ok(Some(buf[..size].to_vec()))
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open frame source: {0}")]
    OpenError(#[source] io::Error),
}

#[derive(Error, Debug)]
pub enum ReceiveError {
    #[error("Failed to read from frame source: {0}")]
    SourceError(#[source] io::Error),

    /// Not fatal, the next frame can still be received.
    #[error("Bad hex frame on line {0}: {1}")]
    BadFrame(usize, #[source] hex::FromHexError),
}
