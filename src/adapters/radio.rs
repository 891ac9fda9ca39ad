//! Radio adapter — implements [`RadioPort`] over a byte [`Transport`].
//!
//! Publishes are queued in a bounded outbox and flushed on housekeeping
//! ([`RadioPort::poll`]).  Each message is postcard-encoded and
//! COBS-framed, so the receiver can resynchronise on the zero delimiter
//! after a dropped byte.  Delivery is best-effort: a message that fails
//! to encode or write is counted and discarded.
//!
//! When the outbox is full the *oldest* message is discarded; a fresh
//! hold time is worth more than a stale one.

use heapless::Deque;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::RadioPort;
use crate::error::RadioError;

use super::transport::Transport;

/// Messages held for transmission.
pub const OUTBOX_CAPACITY: usize = 8;

/// Largest encoded frame (COBS overhead included).
pub const MAX_FRAME_LEN: usize = 64;

/// Longest topic carried on the wire.
pub const MAX_TOPIC_LEN: usize = 24;

/// One over-the-air payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RadioMessage {
    /// Announce the node to the gateway.
    PairingRequest {
        name: heapless::String<32>,
        version: heapless::String<16>,
    },
    /// A float value under a named topic.
    Float {
        topic: heapless::String<MAX_TOPIC_LEN>,
        value: f32,
    },
    /// Battery voltage on the gateway's battery-status topic.
    Battery { voltage: f32 },
}

/// Copy as much of `s` as fits, on a char boundary.
fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            warn!("RADIO: '{}' truncated to {} bytes", s, N);
            break;
        }
    }
    out
}

/// Encode one message into a zero-terminated COBS frame.
pub fn encode_frame<'b>(
    msg: &RadioMessage,
    buf: &'b mut [u8; MAX_FRAME_LEN],
) -> Result<&'b mut [u8], RadioError> {
    postcard::to_slice_cobs(msg, buf).map_err(|_| RadioError::EncodeFailed)
}

pub struct RadioAdapter<T: Transport> {
    transport: T,
    outbox: Deque<RadioMessage, OUTBOX_CAPACITY>,
    sent: u32,
    failed: u32,
    evicted: u32,
}

impl<T: Transport> RadioAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            outbox: Deque::new(),
            sent: 0,
            failed: 0,
            evicted: 0,
        }
    }

    /// Queue a message.  The message is always queued; `Err(OutboxFull)`
    /// reports that the oldest pending message was discarded for it.
    pub fn enqueue(&mut self, msg: RadioMessage) -> Result<(), RadioError> {
        let mut result = Ok(());
        if self.outbox.is_full() {
            if let Some(old) = self.outbox.pop_front() {
                warn!("RADIO: outbox full, dropping {:?}", old);
            }
            self.evicted = self.evicted.saturating_add(1);
            result = Err(RadioError::OutboxFull);
        }
        // Cannot fail: there is at least one free slot here.
        let _ = self.outbox.push_back(msg);
        result
    }

    /// Encode and write one message.
    pub fn send(&mut self, msg: &RadioMessage) -> Result<(), RadioError> {
        let mut buf = [0u8; MAX_FRAME_LEN];
        let frame = encode_frame(msg, &mut buf)?;
        match self.transport.write(frame) {
            Ok(n) if n == frame.len() => Ok(()),
            Ok(n) => {
                warn!("RADIO: short write ({}/{} bytes)", n, frame.len());
                Err(RadioError::TransportFailed)
            }
            Err(e) => {
                warn!("RADIO: transport error {:?}", e);
                Err(RadioError::TransportFailed)
            }
        }
    }

    /// Transmit everything queued.  Returns the number of messages sent.
    pub fn flush(&mut self) -> usize {
        let mut sent = 0;
        while let Some(msg) = self.outbox.pop_front() {
            match self.send(&msg) {
                Ok(()) => sent += 1,
                Err(e) => {
                    self.failed = self.failed.saturating_add(1);
                    warn!("RADIO: {} ({:?})", e, msg);
                }
            }
        }
        if sent > 0 {
            if let Err(e) = self.transport.flush() {
                warn!("RADIO: flush failed {:?}", e);
            }
            debug!("RADIO: flushed {} message(s)", sent);
        }
        self.sent = self.sent.saturating_add(sent as u32);
        sent
    }

    pub fn pending(&self) -> usize {
        self.outbox.len()
    }

    pub fn sent(&self) -> u32 {
        self.sent
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn evicted(&self) -> u32 {
        self.evicted
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn queue(&mut self, msg: RadioMessage) {
        if let Err(e) = self.enqueue(msg) {
            debug!("RADIO: {}", e);
        }
    }
}

impl<T: Transport> RadioPort for RadioAdapter<T> {
    fn pairing_request(&mut self, name: &str, version: &str) {
        info!("RADIO: pairing request '{}' v{}", name, version);
        self.queue(RadioMessage::PairingRequest {
            name: bounded(name),
            version: bounded(version),
        });
        // Pairing goes out immediately rather than waiting for housekeeping.
        self.flush();
    }

    fn publish_float(&mut self, topic: &str, value: f32) {
        info!("RADIO: publish {} = {:.3}", topic, value);
        self.queue(RadioMessage::Float {
            topic: bounded(topic),
            value,
        });
    }

    fn publish_battery(&mut self, voltage: f32) {
        self.queue(RadioMessage::Battery { voltage });
    }

    fn poll(&mut self) {
        self.flush();
    }
}
