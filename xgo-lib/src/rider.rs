use crate::config::RiderConfig;
use crate::constants::{
    DEFAULT_CRUISE_SPEED, HEIGHT_RANGE, INIT_DELAY, INIT_TRIGGER, LEAN_RANGE, MAX_LEAN_DEG, MAX_SPEED_PERCENT,
    MAX_STRETCH_MM, MOTION_PAUSE, SPEED_RANGE, STATUS_READY,
};
use crate::error::XgoError;
use crate::frame::{Frame, Register};
use crate::link::{Link, LinkOptions};
use crate::remap::to_device_byte;
use crate::types::{LedMask, MoveDirection, Rgb, RotateDirection};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::sleep;
use tokio_serial::SerialStream;
use tracing::{debug, info};

/// Represents a connection to an XGO Rider robot controller.
///
/// One instance per physical device. The instance owns the cruise speed used
/// by [`XgoRider::ride`] and [`XgoRider::turn`].
pub struct XgoRider<S> {
    link: Link<S>,
    cruise_speed: u8,
    motion_pause: Duration,
    init_delay: Duration,
}

impl XgoRider<SerialStream> {
    /// Open the configured serial port. Does not run the initialization handshake.
    pub fn connect(config: &RiderConfig) -> Result<Self, XgoError> {
        let link = Link::open(&config.port, config.baud_rate, LinkOptions::from(config))?;
        Ok(Self::from_link(link, config))
    }
}

impl<S> XgoRider<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Drive a device over `stream` with the default timings.
    pub fn new(stream: S) -> Self {
        Self {
            link: Link::new(stream, LinkOptions::default()),
            cruise_speed: DEFAULT_CRUISE_SPEED,
            motion_pause: MOTION_PAUSE,
            init_delay: INIT_DELAY,
        }
    }

    pub fn with_config(stream: S, config: &RiderConfig) -> Self {
        Self::from_link(Link::new(stream, LinkOptions::from(config)), config)
    }

    fn from_link(link: Link<S>, config: &RiderConfig) -> Self {
        let mut rider = Self {
            link,
            cruise_speed: DEFAULT_CRUISE_SPEED,
            motion_pause: config.motion_pause(),
            init_delay: config.init_delay(),
        };
        rider.set_cruise_speed(config.cruise_speed as i32);
        rider
    }

    pub fn cruise_speed(&self) -> u8 {
        self.cruise_speed
    }

    pub fn into_inner(self) -> S {
        self.link.into_inner()
    }

    /// Query the initialization status byte; `0x00` means the device is active.
    pub async fn status(&mut self) -> Result<u8, XgoError> {
        let status = self.link.request(&Frame::read(Register::Status, 1)).await?;
        debug!(status, "Device status");
        Ok(status)
    }

    /// Startup handshake. Triggers device initialization unless the device
    /// already reports itself active. Returns whether a trigger was sent.
    pub async fn initialize(&mut self) -> Result<bool, XgoError> {
        info!("--- Starting Initialization Handshake ---");
        let status = self.status().await?;
        if status == STATUS_READY {
            info!("Device already active.");
            return Ok(false);
        }

        info!("Device reported status {:#04x}, triggering initialization...", status);
        self.link.transmit(&Frame::write(Register::Init, INIT_TRIGGER)).await?;
        sleep(self.init_delay).await;
        info!("Device initialized.");
        Ok(true)
    }

    /// Raise (positive) or lower (negative) the body, `height` in `[-20, 20]` mm.
    pub async fn set_height(&mut self, height: i32) -> Result<(), XgoError> {
        let data = to_device_byte(height as f64, HEIGHT_RANGE);
        debug!(height, data, "Set height");
        self.write_motion(Register::Height, data).await
    }

    /// Roll the body, `angle` in `[-100, 100]` device units (twice the degrees).
    pub async fn set_lean_angle(&mut self, angle: i32) -> Result<(), XgoError> {
        let data = to_device_byte(angle as f64, LEAN_RANGE);
        debug!(angle, data, "Set lean angle");
        self.write_motion(Register::Lean, data).await
    }

    /// Translate at `speed` percent.
    ///
    /// The device expects tuned values: forward speed is sent as
    /// `-round(sqrt(speed))`, backward speed as `speed ^ 2` capped at 100.
    pub async fn move_at(&mut self, direction: MoveDirection, speed: i32) -> Result<(), XgoError> {
        let signed = match direction {
            MoveDirection::Forward => -(speed as f64).sqrt().round(),
            MoveDirection::Backward => (speed ^ 2).min(MAX_SPEED_PERCENT) as f64,
        };
        let data = to_device_byte(signed, SPEED_RANGE);
        debug!(%direction, speed, data, "Move");
        self.write_motion(Register::Speed, data).await
    }

    /// Rotate at `speed` percent in `[-100, 100]`.
    pub async fn rotate(&mut self, direction: RotateDirection, speed: i32) -> Result<(), XgoError> {
        let signed = match direction {
            RotateDirection::Clockwise => -speed,
            RotateDirection::AntiClockwise => speed,
        };
        let data = to_device_byte(signed as f64, SPEED_RANGE);
        debug!(%direction, speed, data, "Rotate");
        self.link.transmit(&Frame::write(Register::Rotation, data)).await
    }

    /// Cancel translation, then rotation.
    pub async fn stop(&mut self) -> Result<(), XgoError> {
        let data = to_device_byte(0.0, SPEED_RANGE);
        debug!(data, "Stop");
        self.link.transmit(&Frame::write(Register::Speed, data)).await?;
        self.link.transmit(&Frame::write(Register::Rotation, data)).await
    }

    /// Send `color` to every quadrant selected in `leds`, one frame each.
    pub async fn set_led_color(&mut self, leds: impl Into<LedMask>, color: Rgb) -> Result<(), XgoError> {
        let leds = leds.into();
        let data = color.to_bytes();
        debug!(%color, ?leds, "Set LED colour");
        for register in leds.registers() {
            self.link.transmit(&Frame::write_multi(register, data)).await?;
        }
        Ok(())
    }

    /// Store the speed used by `ride` and `turn`, clamped to `[0, 100]`.
    pub fn set_cruise_speed(&mut self, percent: i32) {
        self.cruise_speed = percent.clamp(0, MAX_SPEED_PERCENT) as u8;
        debug!(cruise_speed = self.cruise_speed, "Cruise speed set");
    }

    /// Raise the body by `mm` in `[0, 20]`.
    pub async fn stretch(&mut self, mm: i32) -> Result<(), XgoError> {
        self.set_height(mm.clamp(0, MAX_STRETCH_MM)).await
    }

    /// Lower the body by `mm` in `[0, 20]`.
    pub async fn shrink(&mut self, mm: i32) -> Result<(), XgoError> {
        self.set_height(-mm.clamp(0, MAX_STRETCH_MM)).await
    }

    /// Lean left by `degrees` in `[0, 45]`.
    pub async fn lean_left(&mut self, degrees: i32) -> Result<(), XgoError> {
        self.set_lean_angle(-2 * degrees.clamp(0, MAX_LEAN_DEG)).await
    }

    /// Lean right by `degrees` in `[0, 45]`.
    pub async fn lean_right(&mut self, degrees: i32) -> Result<(), XgoError> {
        self.set_lean_angle(2 * degrees.clamp(0, MAX_LEAN_DEG)).await
    }

    /// Halt translation, then spin at the cruise speed.
    pub async fn turn(&mut self, direction: RotateDirection) -> Result<(), XgoError> {
        self.move_at(MoveDirection::Forward, 0).await?;
        self.rotate(direction, self.cruise_speed as i32).await
    }

    /// Halt rotation, then drive at the cruise speed.
    pub async fn ride(&mut self, direction: MoveDirection) -> Result<(), XgoError> {
        self.turn_stop().await?;
        self.move_at(direction, self.cruise_speed as i32).await
    }

    pub async fn turn_stop(&mut self) -> Result<(), XgoError> {
        self.rotate(RotateDirection::Clockwise, 0).await
    }

    async fn write_motion(&mut self, register: Register, data: u8) -> Result<(), XgoError> {
        self.link.transmit(&Frame::write(register, data)).await?;
        sleep(self.motion_pause).await;
        Ok(())
    }
}
