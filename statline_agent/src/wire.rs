//! Wire format shared with the statline client.
//! Keep this module minimal and stable — it defines the wire format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every frame is the JSON object followed by exactly one of these.
pub const FRAME_DELIMITER: u8 = b'\n';

/// Reported as `gpu_usage` when the host has no usable accelerator. Distinct
/// from a measured 0%.
pub const GPU_UNAVAILABLE: f32 = -1.0;

/// One reading of the host, taken per sampling tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Overall processor load, 0..100.
    pub cpu_usage: f32,
    /// Memory occupancy as a percentage of total, 0..100.
    pub memory_usage: f32,
    /// Accelerator load, 0..100, or [`GPU_UNAVAILABLE`].
    pub gpu_usage: f32,
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Serialize a sample and append the delimiter. The payload is numeric-only,
/// so the delimiter can never occur inside it.
pub fn encode_frame(sample: &Sample) -> Vec<u8> {
    let mut frame = serde_json::to_vec(sample).expect("three plain floats always serialize");
    frame.push(FRAME_DELIMITER);
    frame
}

/// Parse one frame payload (without its delimiter). Any missing, mistyped,
/// or unparsable field yields `FrameError::Malformed`.
pub fn decode_frame(payload: &[u8]) -> Result<Sample, FrameError> {
    Ok(serde_json::from_slice(payload)?)
}
