//! Fixed-size frames for sending commands between peers.
//!
//! A frame is the bincode encoding of a [`Payload`] (fixed-width integers,
//! little endian) padded with zeroes to [`FRAME_SIZE`]. Every command kind
//! fits, so peers can read frames off a stream without a length prefix.

use crate::input::Payload;
use crate::state::WorldState;
use bincode::Options;
use thiserror::Error;

pub const FRAME_SIZE: usize = 32;

pub type Frame = [u8; FRAME_SIZE];

#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to encode payload: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode frame: {0}")]
    Decode(#[source] bincode::Error),
    #[error("payload encodes to {len} bytes, frame holds {max}", max = FRAME_SIZE)]
    Oversized { len: usize },
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

pub fn encode(payload: &Payload) -> Result<Frame, WireError> {
    let bytes = options().serialize(payload).map_err(WireError::Encode)?;
    if bytes.len() > FRAME_SIZE {
        return Err(WireError::Oversized { len: bytes.len() });
    }
    let mut frame = [0u8; FRAME_SIZE];
    frame[..bytes.len()].copy_from_slice(&bytes);
    Ok(frame)
}

/// Decodes a frame. Padding after the payload is ignored.
pub fn decode(frame: &Frame) -> Result<Payload, WireError> {
    options()
        .deserialize(&frame[..])
        .map_err(WireError::Decode)
}

/// Decodes a frame received from a peer and queues it for the next tick.
///
/// Returns `Ok(false)` if the frame was valid but the queue was full.
pub fn receive(state: &WorldState, frame: &Frame) -> Result<bool, WireError> {
    let payload = decode(frame)?;
    Ok(state.incoming_commands.enqueue(payload))
}
