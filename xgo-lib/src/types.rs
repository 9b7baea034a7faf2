//! Domain types for the command surface: directions, LED quadrants and colours.

use crate::error::XgoError;
use crate::frame::Register;
use modular_bitfield::prelude::*;
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Translation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum MoveDirection {
    Forward,
    Backward,
}

/// Rotation direction, seen from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RotateDirection {
    Clockwise,
    AntiClockwise,
}

/// One bit per LED quadrant. Bits are independent; several may be set at once.
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedMask {
    pub front_left: bool,
    pub rear_left: bool,
    pub front_right: bool,
    pub rear_right: bool,
    #[skip]
    unused: B4,
}

impl LedMask {
    /// Registers of the selected quadrants, in the order frames are sent:
    /// front-left, rear-left, rear-right, front-right.
    pub fn registers(&self) -> Vec<Register> {
        [
            (self.front_left(), Register::LedFrontLeft),
            (self.rear_left(), Register::LedRearLeft),
            (self.rear_right(), Register::LedRearRight),
            (self.front_right(), Register::LedFrontRight),
        ]
        .into_iter()
        .filter_map(|(selected, register)| selected.then_some(register))
        .collect()
    }
}

/// Named LED selections offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[repr(u8)]
pub enum Led {
    FrontLeft = 1,
    RearLeft = 2,
    FrontRight = 4,
    RearRight = 8,
    Left = 3,
    Right = 12,
    All = 15,
}

impl From<Led> for LedMask {
    fn from(led: Led) -> Self {
        LedMask::from_bytes([led as u8])
    }
}

/// A 24-bit RGB colour, stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb(u32);

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Build from a packed value; bits above 24 are ignored.
    pub const fn from_u32(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Red, green, blue; most significant byte first.
    pub fn to_bytes(&self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }
}

impl From<u32> for Rgb {
    fn from(value: u32) -> Self {
        Rgb::from_u32(value)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl FromStr for Rgb {
    type Err = XgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        let digits = digits
            .strip_prefix('#')
            .or_else(|| digits.strip_prefix("0x"))
            .unwrap_or(digits);
        if digits.len() != 6 {
            return Err(XgoError::InvalidColor(format!("expected 6 hex digits, got {:?}", s)));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::from_u32)
            .map_err(|e| XgoError::InvalidColor(format!("{:?}: {}", s, e)))
    }
}
