//! The send and capture side of a media relay socket.
//!
//! [`options::apply_packet_options`] stamps and signs outgoing rtp packets
//! in place, whatever TURN framing they travel in, and [`dump::RtpDumpRelay`]
//! hands copies of rtp headers to a diagnostic callback. The framing and
//! parsing primitives both are built on live in the [`codec`] crate.

pub mod config;
pub mod dump;
pub mod logger;
pub mod options;

pub use codec;

pub mod prelude {
    pub use super::codec::{
        Error,
        channel_data::ChannelData,
        demux::*,
        frame::*,
        framing::*,
        rtp::{OneByteExtensions, RtpHeaderInfo, abs_send_time, rewrite_abs_send_time, validate},
        srtp::{AUTH_TAG_LENGTH_32, AUTH_TAG_LENGTH_80, sign},
        stun::{StunHeader, classify, is_request_or_response, methods::*},
    };

    pub use super::{
        config::Config,
        dump::*,
        options::*,
    };
}
