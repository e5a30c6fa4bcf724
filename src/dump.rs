use std::sync::Arc;

use codec::{
    demux::{is_dtls_packet, is_rtcp_packet},
    frame::locate,
    rtp,
};

use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::config::Capture;

/// Receives `(header_bytes, header_length, packet_length, incoming)` for
/// every captured rtp packet.
pub type DumpCallback = Arc<dyn Fn(Vec<u8>, usize, usize, bool) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    pub fn is_incoming(&self) -> bool {
        *self == Self::Incoming
    }
}

#[derive(Default)]
struct State {
    incoming: bool,
    outgoing: bool,
    callback: Option<DumpCallback>,
}

impl State {
    fn is_enabled(&self, direction: Direction) -> bool {
        match direction {
            Direction::Incoming => self.incoming,
            Direction::Outgoing => self.outgoing,
        }
    }
}

/// Copies the rtp headers passing through a socket to a diagnostic
/// callback.
///
/// Capture is switched per direction from a control thread while the
/// packet I/O threads call [`RtpDumpRelay::record`]. The callback runs as a
/// task on the runtime behind `handle`, never on the thread that recorded
/// the packet.
pub struct RtpDumpRelay {
    state: Mutex<State>,
    handle: Handle,
}

impl RtpDumpRelay {
    pub fn new(handle: Handle) -> Self {
        Self {
            state: Mutex::new(State::default()),
            handle,
        }
    }

    /// Enables capture for the given directions.
    ///
    /// `callback` is installed only if none is registered yet; a running
    /// capture keeps its callback.
    pub fn start_capture(&self, incoming: bool, outgoing: bool, callback: DumpCallback) {
        let mut state = self.state.lock();

        state.incoming |= incoming;
        state.outgoing |= outgoing;
        if (state.incoming || state.outgoing) && state.callback.is_none() {
            state.callback = Some(callback);
        }

        log::info!(
            "rtp dump started: incoming={}, outgoing={}",
            state.incoming,
            state.outgoing
        );
    }

    /// Disables capture for the given directions, dropping the callback once
    /// both are off.
    pub fn stop_capture(&self, incoming: bool, outgoing: bool) {
        let mut state = self.state.lock();

        if incoming {
            state.incoming = false;
        }

        if outgoing {
            state.outgoing = false;
        }

        if !state.incoming && !state.outgoing {
            state.callback = None;
        }

        log::info!(
            "rtp dump stopped: incoming={}, outgoing={}",
            state.incoming,
            state.outgoing
        );
    }

    /// Starts capturing the directions enabled in `capture`, if any.
    pub fn start_from_config(&self, capture: &Capture, callback: DumpCallback) {
        if capture.incoming || capture.outgoing {
            self.start_capture(capture.incoming, capture.outgoing, callback);
        }
    }

    pub fn is_capturing(&self, direction: Direction) -> bool {
        self.state.lock().is_enabled(direction)
    }

    /// Captures the rtp header of `packet` if `direction` is enabled.
    ///
    /// Anything that is not rtp, DTLS and RTCP included, is skipped. Returns
    /// whether a header was handed off for delivery.
    pub fn record(&self, packet: &[u8], direction: Direction) -> bool {
        let callback = {
            let state = self.state.lock();
            if !state.is_enabled(direction) {
                return false;
            }

            match &state.callback {
                Some(callback) => callback.clone(),
                None => return false,
            }
        };

        if is_dtls_packet(packet) {
            return false;
        }

        let Ok(location) = locate(packet) else {
            return false;
        };

        let rtp = &packet[location.range()];
        if is_rtcp_packet(rtp) {
            return false;
        }

        let Ok(header) = rtp::validate(rtp) else {
            return false;
        };

        let header_length = header.header_length();
        let bytes = rtp[..header_length].to_vec();
        let packet_length = location.length;
        let incoming = direction.is_incoming();

        // dropped without running if the runtime is already gone.
        self.handle.spawn(async move {
            callback(bytes, header_length, packet_length, incoming);
        });

        true
    }
}
