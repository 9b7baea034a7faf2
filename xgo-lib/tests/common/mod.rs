//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use std::time::Duration;
#[allow(unused_imports)]
pub use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
#[allow(unused_imports)]
pub use tokio::time::Instant;
#[allow(unused_imports)]
pub use xgo_lib::XgoRider;
#[allow(unused_imports)]
pub use xgo_lib::config::RiderConfig;
#[allow(unused_imports)]
pub use xgo_lib::error::XgoError;
#[allow(unused_imports)]
pub use xgo_lib::frame::{Frame, FrameType, Register, Reply, checksum};
#[allow(unused_imports)]
pub use xgo_lib::types::{Led, LedMask, MoveDirection, Rgb, RotateDirection};

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data.replace(' ', "")).expect("Failed to decode hex"))
}

/// A rider wired to an in-memory fake device. The second half plays the robot.
#[allow(dead_code)]
pub fn connected_rider() -> (XgoRider<DuplexStream>, DuplexStream) {
    let (host, device) = tokio::io::duplex(4096);
    (XgoRider::new(host), device)
}

/// A 9-byte reply carrying `data` at offset 5, as the device sends it.
#[allow(dead_code)]
pub fn status_reply(data: u8) -> Bytes {
    Frame::read(Register::Status, data).to_bytes()
}

/// Close the host side and collect everything it wrote, split into frames.
#[allow(dead_code)]
pub async fn sent_frames(rider: XgoRider<DuplexStream>, mut device: DuplexStream) -> Vec<Bytes> {
    drop(rider.into_inner());
    let mut buf = Vec::new();
    device.read_to_end(&mut buf).await.expect("Failed to drain fake device");
    split_frames(Bytes::from(buf))
}

/// Split a byte stream into frames using each frame's length field.
#[allow(dead_code)]
pub fn split_frames(mut bytes: Bytes) -> Vec<Bytes> {
    let mut frames = Vec::new();
    while !bytes.is_empty() {
        assert!(bytes.len() >= 3, "Truncated frame: {:02x?}", bytes.as_ref());
        let len = bytes[2] as usize;
        assert!(bytes.len() >= len, "Truncated frame: {:02x?}", bytes.as_ref());
        frames.push(bytes.split_to(len));
    }
    frames
}

/// Decode a captured frame, failing the test if it is malformed.
#[allow(dead_code)]
pub fn decode(bytes: &Bytes) -> Frame {
    Frame::try_from(bytes.clone()).expect("Host sent a malformed frame")
}

/// Assert that `start.elapsed()` equals `expected_ms`, allowing timer tick rounding.
#[allow(dead_code)]
pub fn assert_elapsed(start: Instant, expected_ms: u64) {
    let elapsed = start.elapsed();
    let expected = Duration::from_millis(expected_ms);
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(10),
        "Expected about {:?} to pass, got {:?}",
        expected,
        elapsed
    );
}
