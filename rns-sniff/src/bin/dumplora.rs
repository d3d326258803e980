//! Tool to dump Reticulum packets received over LoRa.

use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;
use log::{info, warn};
use tokio::{select, signal};

use rns_sniff::config::{Opts, SourceKind};
use rns_sniff::report::{self, Report};
use rns_sniff::source::{RadioSource, ReceiveError};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}

async fn run() -> Result<(), Error> {
    let args: Args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let opts = Opts::load(args.config.as_deref()).await?.merge(args.opts());
    let radio = &opts.radio;
    info!(
        "Radio: {} MHz, {} Hz bandwidth, SF{}, CR 4/{}, {} dBm, preamble {}, CRC {}",
        radio.frequency,
        radio.bandwidth,
        radio.spreading_factor,
        radio.coding_rate,
        radio.tx_power,
        radio.preamble_length,
        if radio.enable_crc { "on" } else { "off" }
    );

    let mut source = RadioSource::open(&opts.source_options()?, opts.min_frame_len()).await?;

    loop {
        select! {
            res = source.receive() => match res {
                Ok(Some(frame)) => dump_frame(&frame, args.json)?,
                Ok(None) => break,
                Err(err @ ReceiveError::BadFrame(..)) => warn!("{}", err),
                Err(err) => return Err(err.into()),
            },
            _ = signal::ctrl_c() => break,
        }
    }

    info!("Done.");
    Ok(())
}

fn dump_frame(frame: &[u8], json: bool) -> Result<(), Error> {
    match rns_sniff::parse_packet(frame) {
        Ok(packet) if json => println!("{}", serde_json::to_string(&report::to_json(&packet))?),
        Ok(packet) => print!("{}", Report(&packet)),
        Err(err) => println!("Bad frame received:\n{}\n{}", hex::encode(frame), err),
    }
    Ok(())
}

/// Dump Reticulum packets received over LoRa.
#[derive(Parser)]
#[clap(version = "0.1.0", author = "The Reticulum LoRa tools developers")]
struct Args {
    /// Config file path (default `~/.rnsdump`)
    #[clap(long = "config")]
    config: Option<PathBuf>,

    /// Frame source: stdin, file or udp
    #[clap(long = "source", value_parser = parse_source_kind)]
    source: Option<SourceKind>,

    /// Capture file with one hex encoded frame per line
    #[clap(long = "path")]
    path: Option<String>,

    /// Local UDP address to receive gateway frames on (default `0.0.0.0:4242`)
    #[clap(long = "bind")]
    bind: Option<String>,

    /// Skip frames with this many bytes or fewer (default 10)
    #[clap(long = "min-frame-len")]
    min_frame_len: Option<usize>,

    /// Print one JSON object per packet instead of the text report
    #[clap(long = "json")]
    json: bool,

    /// Enable debug logging
    #[clap(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn opts(&self) -> Opts {
        Opts {
            source: self.source,
            path: self.path.clone(),
            bind: self.bind.clone(),
            min_frame_len: self.min_frame_len,
            ..Opts::default()
        }
    }
}

fn parse_source_kind(s: &str) -> Result<SourceKind, String> {
    match s {
        "stdin" => Ok(SourceKind::Stdin),
        "file" => Ok(SourceKind::File),
        "udp" => Ok(SourceKind::Udp),
        _ => Err(format!("unknown source '{}', expected stdin, file or udp", s)),
    }
}
