//! Bridge Frame Codec
//!
//! A message is split into frames no larger than the transport's maximum
//! frame size. Every frame carries a 20-byte header:
//!
//! ```text
//! +----------------------+-------------+-------------+-----------+
//! | correlation id (16)  | index (u16) | total (u16) | payload   |
//! +----------------------+-------------+-------------+-----------+
//! ```
//!
//! Integers are big-endian. `index` counts from zero and `total` is at least
//! one.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use pctx_domain::error::{Error, Result};

use crate::constants::{BRIDGE_FRAME_HEADER_LEN, BRIDGE_MAX_PARTIAL_MESSAGES};

/// One chunk of a bridge message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Correlation id shared by every frame of one message
    pub correlation_id: Uuid,
    /// Position of this frame in the message
    pub index: u16,
    /// Number of frames in the message
    pub total: u16,
    /// Chunk of the message body
    pub payload: Vec<u8>,
}

impl Frame {
    /// Serialize header and payload
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BRIDGE_FRAME_HEADER_LEN + self.payload.len());
        out.extend_from_slice(self.correlation_id.as_bytes());
        out.extend_from_slice(&self.index.to_be_bytes());
        out.extend_from_slice(&self.total.to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse a frame received from the transport
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < BRIDGE_FRAME_HEADER_LEN {
            return Err(Error::invalid_response(format!(
                "bridge frame too short: {} bytes",
                bytes.len()
            )));
        }
        let (id, rest) = bytes.split_at(16);
        let correlation_id = Uuid::from_slice(id)
            .map_err(|e| Error::invalid_response(format!("bad correlation id: {e}")))?;
        let index = u16::from_be_bytes([rest[0], rest[1]]);
        let total = u16::from_be_bytes([rest[2], rest[3]]);
        if total == 0 || index >= total {
            return Err(Error::invalid_response(format!(
                "bridge frame index {index} out of range for total {total}"
            )));
        }
        Ok(Self {
            correlation_id,
            index,
            total,
            payload: rest[4..].to_vec(),
        })
    }
}

/// Split `message` into frames of at most `max_frame_size` bytes
pub fn split_message(
    correlation_id: Uuid,
    message: &[u8],
    max_frame_size: usize,
) -> Result<Vec<Frame>> {
    if max_frame_size <= BRIDGE_FRAME_HEADER_LEN {
        return Err(Error::invalid_argument(format!(
            "bridge frame size {max_frame_size} leaves no room for payload"
        )));
    }
    let chunk_size = max_frame_size - BRIDGE_FRAME_HEADER_LEN;
    let chunk_count = message.len().div_ceil(chunk_size).max(1);
    let total = u16::try_from(chunk_count).map_err(|_| {
        Error::invalid_argument(format!(
            "bridge message of {} bytes needs more than {} frames",
            message.len(),
            u16::MAX
        ))
    })?;

    let chunks: Vec<&[u8]> = if message.is_empty() {
        vec![message]
    } else {
        message.chunks(chunk_size).collect()
    };
    Ok(chunks
        .into_iter()
        .zip(0..total)
        .map(|(chunk, index)| Frame {
            correlation_id,
            index,
            total,
            payload: chunk.to_vec(),
        })
        .collect())
}

#[derive(Debug)]
struct Partial {
    chunks: Vec<Option<Vec<u8>>>,
    received: usize,
    seq: u64,
}

/// Reassembles frames into complete messages
///
/// Frames of different messages may interleave. A duplicate frame replaces
/// the earlier copy. At most `limit` messages are held partially received;
/// starting another one evicts the oldest.
#[derive(Debug)]
pub struct FrameAssembler {
    partial: HashMap<Uuid, Partial>,
    limit: usize,
    next_seq: u64,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::with_limit(BRIDGE_MAX_PARTIAL_MESSAGES)
    }
}

impl FrameAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty assembler holding at most `limit` partial messages
    pub fn with_limit(limit: usize) -> Self {
        Self {
            partial: HashMap::new(),
            limit: limit.max(1),
            next_seq: 0,
        }
    }

    /// Add a frame; returns the full message once its last frame arrives
    pub fn push(&mut self, frame: Frame) -> Result<Option<(Uuid, Vec<u8>)>> {
        if frame.total == 0 || frame.index >= frame.total {
            return Err(Error::invalid_response(format!(
                "bridge frame index {} out of range for total {}",
                frame.index, frame.total
            )));
        }
        if frame.total == 1 {
            return Ok(Some((frame.correlation_id, frame.payload)));
        }

        if !self.partial.contains_key(&frame.correlation_id) && self.partial.len() >= self.limit {
            self.evict_oldest();
        }
        let total = usize::from(frame.total);
        let entry = self
            .partial
            .entry(frame.correlation_id)
            .or_insert_with(|| Partial {
                chunks: vec![None; total],
                received: 0,
                seq: self.next_seq,
            });
        self.next_seq += 1;
        if entry.chunks.len() != total {
            self.partial.remove(&frame.correlation_id);
            return Err(Error::invalid_response(format!(
                "bridge message {} changed its frame count",
                frame.correlation_id
            )));
        }

        let slot = &mut entry.chunks[usize::from(frame.index)];
        if slot.is_none() {
            entry.received += 1;
        }
        *slot = Some(frame.payload);

        if entry.received < total {
            return Ok(None);
        }
        let Some(done) = self.partial.remove(&frame.correlation_id) else {
            return Ok(None);
        };
        let message = done.chunks.into_iter().flatten().flatten().collect();
        Ok(Some((frame.correlation_id, message)))
    }

    /// Number of messages still waiting for frames
    pub fn pending(&self) -> usize {
        self.partial.len()
    }

    /// Keep only the partial messages whose id satisfies `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&Uuid) -> bool) {
        self.partial.retain(|id, _| keep(id));
    }

    /// Drop every partially received message
    pub fn clear(&mut self) {
        self.partial.clear();
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .partial
            .iter()
            .min_by_key(|(_, partial)| partial.seq)
            .map(|(id, _)| *id);
        if let Some(id) = oldest {
            debug!(correlation_id = %id, "evicting stale partial bridge message");
            self.partial.remove(&id);
        }
    }
}
