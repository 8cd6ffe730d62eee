//! Bridge Transport
//!
//! The bridge only needs to push frames to the paired device; inbound frames
//! arrive on a channel handed to [`BridgeContextProvider::connect`].
//!
//! [`BridgeContextProvider::connect`]: super::BridgeContextProvider::connect

use async_trait::async_trait;
use tokio::sync::mpsc;

use pctx_domain::error::{Error, Result};

/// Outbound side of a short-range link
#[async_trait]
pub trait BridgeTransport: Send + Sync {
    /// Send one encoded frame
    async fn send_frame(&self, frame: Vec<u8>) -> Result<()>;

    /// Largest frame the link accepts, header included
    fn max_frame_size(&self) -> usize;
}

/// Transport over an in-process channel
///
/// Useful to connect the bridge to a simulated device or to a link driver
/// running on another task.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    outbound: mpsc::Sender<Vec<u8>>,
    max_frame_size: usize,
}

impl ChannelTransport {
    /// Create a transport and the receiver the device side reads frames from
    pub fn pair(max_frame_size: usize, buffer: usize) -> (Self, mpsc::Receiver<Vec<u8>>) {
        let (outbound, device_rx) = mpsc::channel(buffer.max(1));
        (
            Self {
                outbound,
                max_frame_size,
            },
            device_rx,
        )
    }
}

#[async_trait]
impl BridgeTransport for ChannelTransport {
    async fn send_frame(&self, frame: Vec<u8>) -> Result<()> {
        self.outbound
            .send(frame)
            .await
            .map_err(|_| Error::network("bridge link closed"))
    }

    fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}
