use std::{fs::read_to_string, path::Path, str::FromStr};

use anyhow::{Result, anyhow};
use codec::srtp::AUTH_TAG_LENGTH_80;
use serde::Deserialize;

use crate::options::PacketOptions;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => return Err(format!("unknown log level: {value}")),
        })
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl LogLevel {
    pub fn as_level(&self) -> log::Level {
        match *self {
            Self::Error => log::Level::Error,
            Self::Debug => log::Level::Debug,
            Self::Trace => log::Level::Trace,
            Self::Warn => log::Level::Warn,
            Self::Info => log::Level::Info,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Log {
    ///
    /// log level
    ///
    /// An enum representing the available verbosity levels of the logger.
    ///
    #[serde(default)]
    pub level: LogLevel,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Capture {
    ///
    /// Capture the rtp headers of received packets once a dump callback is
    /// installed.
    ///
    #[serde(default)]
    pub incoming: bool,
    ///
    /// Capture the rtp headers of sent packets once a dump callback is
    /// installed.
    ///
    #[serde(default)]
    pub outgoing: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Sender {
    ///
    /// abs-send-time extension id
    ///
    /// The id negotiated for the abs-send-time header extension. When it is
    /// not set, outgoing packets are not timestamped.
    ///
    #[serde(default)]
    pub abs_send_time_extension_id: Option<u8>,
    ///
    /// auth tag length
    ///
    /// Number of bytes reserved at the end of every outgoing rtp packet for
    /// the authentication tag, 10 for HMAC-SHA1-80 and 4 for HMAC-SHA1-32.
    ///
    #[serde(default = "Sender::auth_tag_length")]
    pub auth_tag_length: usize,
}

impl Sender {
    fn auth_tag_length() -> usize {
        AUTH_TAG_LENGTH_80
    }
}

impl Default for Sender {
    fn default() -> Self {
        Self {
            abs_send_time_extension_id: None,
            auth_tag_length: Self::auth_tag_length(),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub capture: Capture,
    #[serde(default)]
    pub sender: Sender,
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let config = serde_json5::from_str::<Self>(value)?;
        config.check()?;
        Ok(config)
    }
}

impl Config {
    ///
    /// Load configure from a json5 file.
    ///
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_to_string(path)?.parse()
    }

    fn check(&self) -> Result<()> {
        if let Some(id) = self.sender.abs_send_time_extension_id {
            if !(1..=14).contains(&id) {
                return Err(anyhow!("abs-send-time extension id out of range: {id}"));
            }
        }

        if !(4..=20).contains(&self.sender.auth_tag_length) {
            return Err(anyhow!(
                "auth tag length out of range: {}",
                self.sender.auth_tag_length
            ));
        }

        Ok(())
    }

    /// The options every send starts from, before a key or an explicit
    /// timestamp is attached.
    pub fn packet_options(&self) -> PacketOptions {
        PacketOptions {
            rtp_extension_id: self.sender.abs_send_time_extension_id,
            auth_tag_length: self.sender.auth_tag_length,
            ..Default::default()
        }
    }
}
