//! Configuration options.

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:4242";
const DEFAULT_CONFIG_FILE_NAME: &'static str = ".rnsdump";

/// Frames not longer than this are radio noise and are not decoded.
pub const DEFAULT_MIN_FRAME_LEN: usize = 10;

/// Dump options. Can be loaded from a JSON config file.
#[derive(Clone, Default, PartialEq, Debug, Deserialize)]
pub struct Opts {
    /// Where frames come from. Defaults to `file` if `path` is set, `stdin` otherwise.
    pub source: Option<SourceKind>,

    /// Capture file with one hex encoded frame per line.
    pub path: Option<String>,

    /// Local address of the UDP socket the LoRa gateway forwards frames to.
    pub bind: Option<String>,

    /// Frames with length less than or equal to this are skipped.
    #[serde(rename = "minFrameLen")]
    pub min_frame_len: Option<usize>,

    /// Radio settings, passed through to the log only.
    #[serde(default)]
    pub radio: RadioOpts,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Stdin,
    File,
    Udp,
}

/// LoRa modem settings of the receiving radio.
///
/// Frames are decoded the same way whatever these are, they are kept so dumps can be matched to a radio setup.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default)]
pub struct RadioOpts {
    /// Carrier frequency in MHz.
    pub frequency: f64,
    #[serde(rename = "txPower")]
    pub tx_power: i8,
    /// Signal bandwidth in Hz.
    pub bandwidth: u32,
    #[serde(rename = "codingRate")]
    pub coding_rate: u8,
    #[serde(rename = "spreadingFactor")]
    pub spreading_factor: u8,
    #[serde(rename = "enableCrc")]
    pub enable_crc: bool,
    #[serde(rename = "preambleLength")]
    pub preamble_length: u16,
}

impl Default for RadioOpts {
    fn default() -> Self {
        RadioOpts {
            frequency: 867.2,
            tx_power: 7,
            bandwidth: 125_000,
            coding_rate: 5,
            spreading_factor: 8,
            enable_crc: false,
            preamble_length: 18,
        }
    }
}

/// Resolved frame source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SourceOptions {
    Stdin,
    File(PathBuf),
    Udp(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Can't read config file: {0}")]
    ConfigFileRead(#[source] io::Error),

    #[error("Bad config file: {0}")]
    BadConfigFile(#[source] serde_json::Error),

    #[error("File source requires a capture file path")]
    MissingPath,
}

impl Opts {
    /// Loads options from `config_file`, or from `~/.rnsdump` if no file is given.
    ///
    /// A missing default config file is not an error, default options are used instead.
    pub async fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(config_file) = config_file {
            return Self::read_config_file(config_file).await;
        }
        if let Some(config_file) = Self::default_config_file_location() {
            if let Some(opts) = Self::read_optional_config_file(&config_file).await? {
                debug!("Using config file [{}]", config_file.display());
                return Ok(opts);
            }
        }
        Ok(Opts::default())
    }

    /// Overrides file options with the ones given explicitly, e.g. on the command line.
    pub fn merge(self, other: Opts) -> Self {
        Opts {
            source: other.source.or(self.source),
            path: other.path.or(self.path),
            bind: other.bind.or(self.bind),
            min_frame_len: other.min_frame_len.or(self.min_frame_len),
            radio: self.radio,
        }
    }

    pub fn min_frame_len(&self) -> usize {
        self.min_frame_len.unwrap_or(DEFAULT_MIN_FRAME_LEN)
    }

    pub fn source_options(&self) -> Result<SourceOptions, ConfigError> {
        let kind = match (self.source, &self.path) {
            (Some(kind), _) => kind,
            (None, Some(_)) => SourceKind::File,
            (None, None) => SourceKind::Stdin,
        };
        match kind {
            SourceKind::Stdin => Ok(SourceOptions::Stdin),
            SourceKind::File => {
                let path = self.path.as_ref().ok_or(ConfigError::MissingPath)?;
                Ok(SourceOptions::File(PathBuf::from(path)))
            }
            SourceKind::Udp => Ok(SourceOptions::Udp(self.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR).to_string())),
        }
    }

    fn default_config_file_location() -> Option<PathBuf> {
        let mut path = dirs::home_dir()?;
        path.push(DEFAULT_CONFIG_FILE_NAME);
        Some(path)
    }

    fn parse_config(json: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(json).map_err(|e| ConfigError::BadConfigFile(e))
    }

    async fn read_config_file(file_path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read(file_path).await.map_err(|e| ConfigError::ConfigFileRead(e))?;
        Self::parse_config(&json)
    }

    async fn read_optional_config_file(file_path: &Path) -> Result<Option<Self>, ConfigError> {
        match Self::read_config_file(file_path).await {
            Ok(conf) => Ok(Some(conf)),
            Err(ConfigError::ConfigFileRead(err)) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[test]
fn test_parse_config() {
    let s = |s: &str| -> Option<String> { Some(s.to_string()) };
    let c = |json: &str| -> Opts { Opts::parse_config(json.as_bytes()).expect("bad test config") };

    assert_eq!(c(r#"{}"#), Opts::default());

    assert_eq!(c(r#"{ "unknown": "foo" }"#), Opts::default());

    assert_eq!(
        c(r#"{ "source": "udp", "bind": "127.0.0.1:5000" }"#),
        Opts {
            source: Some(SourceKind::Udp),
            bind: s("127.0.0.1:5000"),
            ..Opts::default()
        }
    );
    assert_eq!(
        c(r#"{ "path": "capture.txt", "minFrameLen": 4 }"#),
        Opts {
            path: s("capture.txt"),
            min_frame_len: Some(4),
            ..Opts::default()
        }
    );
    assert_eq!(
        c(r#"{ "radio": { "frequency": 868.1, "spreadingFactor": 9 } }"#),
        Opts {
            radio: RadioOpts {
                frequency: 868.1,
                spreading_factor: 9,
                ..RadioOpts::default()
            },
            ..Opts::default()
        }
    );

    assert!(Opts::parse_config(br#"{ "source": "serial" }"#).is_err());
}

#[test]
fn test_source_options() {
    let s = |s: &str| -> Option<String> { Some(s.to_string()) };

    assert_eq!(Opts::default().source_options().expect("valid options"), SourceOptions::Stdin);
    assert_eq!(Opts::default().min_frame_len(), DEFAULT_MIN_FRAME_LEN);

    assert_eq!(
        Opts { path: s("capture.txt"), ..Opts::default() }.source_options().expect("valid options"),
        SourceOptions::File(PathBuf::from("capture.txt"))
    );
    assert_eq!(
        Opts { source: Some(SourceKind::Udp), ..Opts::default() }.source_options().expect("valid options"),
        SourceOptions::Udp("0.0.0.0:4242".to_string())
    );
    assert!(matches!(
        Opts { source: Some(SourceKind::File), ..Opts::default() }.source_options(),
        Err(ConfigError::MissingPath)
    ));
}

#[test]
fn test_merge() {
    let file = Opts {
        source: Some(SourceKind::Udp),
        bind: Some("127.0.0.1:5000".to_string()),
        min_frame_len: Some(4),
        ..Opts::default()
    };
    let cli = Opts {
        min_frame_len: Some(0),
        ..Opts::default()
    };
    let merged = file.merge(cli);
    assert_eq!(merged.source, Some(SourceKind::Udp));
    assert_eq!(merged.bind.as_deref(), Some("127.0.0.1:5000"));
    assert_eq!(merged.min_frame_len(), 0);
}
