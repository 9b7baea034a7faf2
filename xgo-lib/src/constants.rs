// Protocol constants for the XGO Rider serial link

use std::time::Duration;

/// 16-bit start-of-frame marker, sent high byte first
pub const HEADER: u16 = 0x5500;

/// 16-bit end-of-frame marker, sent high byte first
pub const TAIL: u16 = 0x00AA;

/// Header, length, type, address, checksum and tail (8 bytes)
pub const FRAME_OVERHEAD: usize = 8;

/// Size of a frame carrying one data byte (9 bytes)
pub const SINGLE_FRAME_SIZE: usize = FRAME_OVERHEAD + 1;

/// Size of a frame carrying an RGB triple (11 bytes)
pub const MULTI_FRAME_SIZE: usize = FRAME_OVERHEAD + 3;

/// Every reply the device sends back is a single-data frame
pub const REPLY_FRAME_SIZE: usize = SINGLE_FRAME_SIZE;

/// Offset of the data/status byte within a reply
pub const REPLY_DATA_OFFSET: usize = 5;

/// Status byte reported by an already-initialized device
pub const STATUS_READY: u8 = 0x00;

/// Data byte written to the init register to trigger initialization
pub const INIT_TRIGGER: u8 = 0xFF;

/// Pause after every transmitted frame
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Extra pause after height, lean and move commands
pub const MOTION_PAUSE: Duration = Duration::from_millis(100);

/// Pause after triggering device initialization
pub const INIT_DELAY: Duration = Duration::from_millis(1000);

/// Default UART speed of the robot controller
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default cruise speed percentage
pub const DEFAULT_CRUISE_SPEED: u8 = 50;

/// Height range in millimetres
pub const HEIGHT_RANGE: (f64, f64) = (-20.0, 20.0);

/// Lean range (device units, twice the user-facing angle)
pub const LEAN_RANGE: (f64, f64) = (-100.0, 100.0);

/// Signed speed range for translation and rotation
pub const SPEED_RANGE: (f64, f64) = (-100.0, 100.0);

/// Range of every data byte on the wire
pub const DEVICE_RANGE: (f64, f64) = (0.0, 255.0);

/// User-facing stretch/shrink limit in millimetres
pub const MAX_STRETCH_MM: i32 = 20;

/// User-facing lean limit in degrees
pub const MAX_LEAN_DEG: i32 = 45;

/// Upper bound of any speed percentage
pub const MAX_SPEED_PERCENT: i32 = 100;
