//! Tests for the startup handshake and status reads

mod common;

use common::*;

#[tokio::test(start_paused = true)]
async fn test_initialize_skips_trigger_when_device_active() {
    let (mut rider, mut device) = connected_rider();
    device.write_all(&status_reply(0x00)).await.unwrap();

    let start = Instant::now();
    let triggered = rider.initialize().await.unwrap();
    assert!(!triggered);
    assert_elapsed(start, 100);

    let frames = sent_frames(rider, device).await;
    assert_eq!(frames, vec![hex_to_bytes("5500 09 02 02 01 f1 00AA")]);
}

#[tokio::test(start_paused = true)]
async fn test_initialize_triggers_when_device_inactive() {
    let (mut rider, mut device) = connected_rider();
    device.write_all(&status_reply(0x01)).await.unwrap();

    let start = Instant::now();
    let triggered = rider.initialize().await.unwrap();
    assert!(triggered);
    // read settle + trigger settle + init delay
    assert_elapsed(start, 1200);

    let frames = sent_frames(rider, device).await;
    assert_eq!(frames.len(), 2);
    let read = decode(&frames[0]);
    assert_eq!(read.frame_type(), FrameType::Read);
    assert_eq!(read.register(), Register::Status);
    assert_eq!(frames[1], hex_to_bytes("5500 09 00 3e ff b9 00AA"));
}

#[tokio::test(start_paused = true)]
async fn test_initialize_uses_configured_delay() {
    let (host, mut device) = tokio::io::duplex(4096);
    let config = RiderConfig {
        init_delay_ms: 250,
        ..RiderConfig::default()
    };
    let mut rider = XgoRider::with_config(host, &config);
    device.write_all(&status_reply(0xFF)).await.unwrap();

    let start = Instant::now();
    assert!(rider.initialize().await.unwrap());
    assert_elapsed(start, 450);
}

#[tokio::test(start_paused = true)]
async fn test_status_ignores_reply_envelope() {
    let (mut rider, mut device) = connected_rider();
    // Garbage markers and checksum: only offset 5 is consulted
    device
        .write_all(&hex_to_bytes("0000 00 00 00 2a 00 0000"))
        .await
        .unwrap();

    assert_eq!(rider.status().await.unwrap(), 0x2a);
}

#[tokio::test(start_paused = true)]
async fn test_status_waits_for_full_reply() {
    let (mut rider, mut device) = connected_rider();
    let reply = status_reply(0x05);
    device.write_all(&reply[..4]).await.unwrap();

    let feeder = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        device.write_all(&reply[4..]).await.unwrap();
        device
    });

    let start = Instant::now();
    assert_eq!(rider.status().await.unwrap(), 0x05);
    assert_elapsed(start, 500);

    let device = feeder.await.unwrap();
    let frames = sent_frames(rider, device).await;
    assert_eq!(frames.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_initialize_fails_when_device_hangs_up() {
    let (mut rider, device) = connected_rider();
    drop(device);

    match rider.initialize().await {
        Err(XgoError::Io(_)) => {}
        other => panic!("Expected I/O error, got {:?}", other),
    }
}
