//! # XGO Rider serial frame format
//!
//! Every command exchanged with the robot controller is a self-delimited frame:
//!
//! ```text
//! +------+------+--------+------+---------+-----------+----------+------+------+
//! | 0x55 | 0x00 | length | type | address | payload.. | checksum | 0x00 | 0xAA |
//! +------+------+--------+------+---------+-----------+----------+------+------+
//! ```
//!
//! - `length` counts every byte of the frame, markers included.
//! - `type` is `0x00` for a write and `0x02` for a read. A read carries one
//!   payload byte: the number of data bytes expected back.
//! - `checksum` is the one's complement of `length + type + address + payload`,
//!   truncated to a byte.
//!
//! The device answers a read with a 9-byte frame whose single data byte sits
//! at offset 5 (see [`Reply`]).

use crate::constants::{FRAME_OVERHEAD, HEADER, REPLY_FRAME_SIZE, TAIL};
use crate::error::XgoError;
use bytes::{BufMut, Bytes, BytesMut};
use num_enum::{FromPrimitive, IntoPrimitive};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum FrameType {
    Write = 0x00,
    Read = 0x02,

    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Device registers addressed by the command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, FromPrimitive)]
#[repr(u8)]
pub enum Register {
    /// Read-only initialization status, `0x00` once the device is active
    Status = 0x02,
    /// Signed translation speed
    Speed = 0x30,
    /// Signed rotation speed
    Rotation = 0x32,
    /// Body height
    Height = 0x35,
    /// Body roll
    Lean = 0x36,
    /// Writing `0xFF` starts device initialization
    Init = 0x3E,
    LedFrontLeft = 0x69,
    LedRearLeft = 0x6A,
    LedRearRight = 0x6B,
    LedFrontRight = 0x6C,

    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Sum `length + type + address + payload` and take the one's complement.
pub fn checksum(length: u8, frame_type: u8, address: u8, payload: &[u8]) -> u8 {
    let sum = payload
        .iter()
        .fold(length.wrapping_add(frame_type).wrapping_add(address), |acc, &b| {
            acc.wrapping_add(b)
        });
    !sum
}

/// A single command frame. Built fresh for every transmission, either by the
/// encoders below or by decoding received bytes, so the length field always fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    frame_type: FrameType,
    register: Register,
    payload: Bytes,
}

impl Frame {
    /// Write one data byte to `register` (9 bytes on the wire).
    pub fn write(register: Register, data: u8) -> Self {
        Self {
            frame_type: FrameType::Write,
            register,
            payload: Bytes::copy_from_slice(&[data]),
        }
    }

    /// Write three data bytes to `register` (11 bytes on the wire).
    pub fn write_multi(register: Register, data: [u8; 3]) -> Self {
        Self {
            frame_type: FrameType::Write,
            register,
            payload: Bytes::copy_from_slice(&data),
        }
    }

    /// Ask `register` for `reply_len` data bytes (9 bytes on the wire).
    pub fn read(register: Register, reply_len: u8) -> Self {
        Self {
            frame_type: FrameType::Read,
            register,
            payload: Bytes::copy_from_slice(&[reply_len]),
        }
    }

    pub fn frame_type(&self) -> FrameType {
        self.frame_type
    }

    pub fn register(&self) -> Register {
        self.register
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Value of the length field: the total size of the encoded frame.
    pub fn length(&self) -> u8 {
        (FRAME_OVERHEAD + self.payload.len()) as u8
    }

    pub fn checksum(&self) -> u8 {
        checksum(
            self.length(),
            self.frame_type.into(),
            self.register.into(),
            self.payload.as_ref(),
        )
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.length() as usize);
        buf.put_u16(HEADER);
        buf.put_u8(self.length());
        buf.put_u8(self.frame_type.into());
        buf.put_u8(self.register.into());
        buf.put_slice(self.payload.as_ref());
        buf.put_u8(self.checksum());
        buf.put_u16(TAIL);
        buf.freeze()
    }
}

impl From<Frame> for Bytes {
    fn from(frame: Frame) -> Self {
        frame.to_bytes()
    }
}

impl TryFrom<Bytes> for Frame {
    type Error = XgoError;

    /// Decode and fully validate one frame: markers, length field and checksum.
    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        if bytes.len() < FRAME_OVERHEAD {
            return Err(XgoError::InsufficientData {
                expected: FRAME_OVERHEAD,
                actual: bytes.len(),
            });
        }
        let header = u16::from_be_bytes([bytes[0], bytes[1]]);
        if header != HEADER {
            return Err(XgoError::InvalidFrame(format!("bad header {:#06x}", header)));
        }
        let length = bytes[2] as usize;
        if length != bytes.len() {
            return Err(XgoError::InvalidFrame(format!(
                "length field {} does not match frame size {}",
                length,
                bytes.len()
            )));
        }
        let tail = u16::from_be_bytes([bytes[length - 2], bytes[length - 1]]);
        if tail != TAIL {
            return Err(XgoError::InvalidFrame(format!("bad tail {:#06x}", tail)));
        }

        let frame = Frame {
            frame_type: FrameType::from_primitive(bytes[3]),
            register: Register::from_primitive(bytes[4]),
            payload: bytes.slice(5..length - 3),
        };
        let actual = bytes[length - 3];
        let expected = frame.checksum();
        if actual != expected {
            return Err(XgoError::ChecksumMismatch { expected, actual });
        }
        Ok(frame)
    }
}

/// Fixed 9-byte reply to a read request.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct Reply {
    pub header: [u8; 2],
    pub length: u8,
    pub frame_type: u8,
    pub address: u8,
    /// Status or data byte
    pub data: u8,
    pub checksum: u8,
    pub tail: [u8; 2],
}

impl Reply {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, XgoError> {
        Reply::read_from_bytes(bytes).map_err(|_| XgoError::InsufficientData {
            expected: REPLY_FRAME_SIZE,
            actual: bytes.len(),
        })
    }

    /// Check markers, length and checksum. Replies are not verified unless asked.
    pub fn verify(&self) -> Result<(), XgoError> {
        if u16::from_be_bytes(self.header) != HEADER || u16::from_be_bytes(self.tail) != TAIL {
            return Err(XgoError::InvalidFrame(format!(
                "bad reply markers {}",
                hex::encode(self.as_bytes())
            )));
        }
        if self.length as usize != REPLY_FRAME_SIZE {
            return Err(XgoError::InvalidFrame(format!("reply length field {}", self.length)));
        }
        let expected = checksum(self.length, self.frame_type, self.address, &[self.data]);
        if expected != self.checksum {
            return Err(XgoError::ChecksumMismatch {
                expected,
                actual: self.checksum,
            });
        }
        Ok(())
    }
}
