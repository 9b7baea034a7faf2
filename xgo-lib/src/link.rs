//! Frame transport: writes encoded frames to the serial stream, paces them with
//! the settle delay and reads back fixed-size replies.

use crate::config::RiderConfig;
use crate::constants::{REPLY_FRAME_SIZE, SETTLE_DELAY};
use crate::error::XgoError;
use crate::frame::{Frame, Reply};
use bytes::BytesMut;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{sleep, timeout};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

/// Optional robustness settings. The settle delay after each frame is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkOptions {
    /// `None` waits for a reply indefinitely
    pub read_timeout: Option<Duration>,
    /// Check reply markers and checksum before trusting the data byte
    pub verify_replies: bool,
}

impl From<&RiderConfig> for LinkOptions {
    fn from(config: &RiderConfig) -> Self {
        Self {
            read_timeout: config.read_timeout(),
            verify_replies: config.verify_replies,
        }
    }
}

pub struct Link<S> {
    stream: S,
    options: LinkOptions,
    /// Bytes received but not yet consumed as part of a reply
    rx: BytesMut,
    /// Bytes at the front of `rx` (or still in flight) that belong to replies
    /// whose read timed out; skipped before the next reply is taken
    stale: usize,
}

impl Link<SerialStream> {
    /// Open the UART the robot controller is attached to.
    pub fn open(port: &str, baud_rate: u32, options: LinkOptions) -> Result<Self, XgoError> {
        info!("Opening serial port {} at {} baud...", port, baud_rate);
        let stream = tokio_serial::new(port, baud_rate).open_native_async()?;
        info!("Serial port opened.");
        Ok(Self::new(stream, options))
    }
}

impl<S> Link<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, options: LinkOptions) -> Self {
        Self {
            stream,
            options,
            rx: BytesMut::with_capacity(64),
            stale: 0,
        }
    }

    pub fn options(&self) -> &LinkOptions {
        &self.options
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Write `frame` and wait out the settle delay. Returns once the device may
    /// accept the next frame.
    pub async fn transmit(&mut self, frame: &Frame) -> Result<(), XgoError> {
        let bytes = frame.to_bytes();
        debug!(bytes = hex::encode(&bytes), register = ?frame.register(), "Serial Write");
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        sleep(SETTLE_DELAY).await;
        Ok(())
    }

    /// Wait for one 9-byte reply and return its data byte.
    ///
    /// A reply whose read timed out is still owed by the device. Its bytes are
    /// skipped when they arrive, so later replies stay aligned.
    pub async fn receive_one(&mut self) -> Result<u8, XgoError> {
        let wanted = self.stale + REPLY_FRAME_SIZE;
        match self.options.read_timeout {
            Some(limit) => match timeout(limit, self.fill(wanted)).await {
                Ok(filled) => filled?,
                Err(elapsed) => {
                    warn!(
                        buffered = self.rx.len(),
                        "Reply timed out, its bytes will be skipped when they arrive"
                    );
                    self.stale = wanted;
                    return Err(elapsed.into());
                }
            },
            None => self.fill(wanted).await?,
        }

        if self.stale > 0 {
            let skipped = self.rx.split_to(self.stale);
            debug!(bytes = hex::encode(&skipped), "Skipped late reply");
            self.stale = 0;
        }
        let buf = self.rx.split_to(REPLY_FRAME_SIZE);
        debug!(bytes = hex::encode(&buf), "Serial Read");

        let reply = Reply::from_slice(&buf)?;
        if self.options.verify_replies {
            if let Err(e) = reply.verify() {
                warn!("Rejecting reply {}: {}", hex::encode(&buf), e);
                return Err(e);
            }
        }
        Ok(reply.data)
    }

    /// Send a read request and return the data byte of the reply.
    pub async fn request(&mut self, frame: &Frame) -> Result<u8, XgoError> {
        self.transmit(frame).await?;
        self.receive_one().await
    }

    /// Read until at least `wanted` bytes are buffered. Cancel-safe: bytes read
    /// before a timeout stay in `rx`.
    async fn fill(&mut self, wanted: usize) -> Result<(), XgoError> {
        while self.rx.len() < wanted {
            if self.stream.read_buf(&mut self.rx).await? == 0 {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
        }
        Ok(())
    }
}
