use std::io;
use thiserror::Error;

/// The primary error type for the `xgo-rs` library.
#[derive(Error, Debug)]
pub enum XgoError {
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Timeout waiting for device reply: {0}")]
    Timeout(#[from] tokio::time::error::Elapsed),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Insufficient data: expected {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    #[error("Invalid colour: {0}")]
    InvalidColor(String),
}
