use std::io::{self, Write};
use thiserror::Error;
use zoo_simulation::FrameSnapshot;

// --- Error Type ---
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to serialize frame: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to send frame: {0}")]
    Io(#[from] io::Error),
}

// --- Traits ---
/// Turns a frame into its wire representation.
pub trait Serializer: Send + Sync {
    fn serialize(&self, frame: &FrameSnapshot) -> Result<String, TransportError>;
}

/// Sends serialized data to a destination.
pub trait Sender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

// --- Implementations ---

/// One JSON object per frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize(&self, frame: &FrameSnapshot) -> Result<String, TransportError> {
        Ok(serde_json::to_string(frame)?)
    }
}

/// Writes each frame to standard output, one per line.
pub struct StdioSender {
    stdout: io::Stdout,
}

impl StdioSender {
    pub fn new() -> Self {
        StdioSender { stdout: io::stdout() }
    }
}

impl Sender for StdioSender {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut out = self.stdout.lock();
        out.write_all(data)?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

impl Default for StdioSender {
    fn default() -> Self {
        Self::new()
    }
}

/// Discards frames, counting them. Used for headless runs.
#[derive(Debug, Default)]
pub struct NullSender {
    sent: u64,
}

impl NullSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }
}

impl Sender for NullSender {
    fn send(&mut self, _data: &[u8]) -> Result<(), TransportError> {
        self.sent += 1;
        Ok(())
    }
}

/// Serializes `frame` and hands it to `sender`.
pub fn publish(
    serializer: &dyn Serializer,
    sender: &mut dyn Sender,
    frame: &FrameSnapshot,
) -> Result<(), TransportError> {
    let data = serializer.serialize(frame)?;
    sender.send(data.as_bytes())
}
