//! Fixed-width payload encodings of the profile.
//!
//! Every numeric value travels little-endian. Text travels as raw ASCII with
//! no terminator: its length is the frame DLC.
use crate::core::MAX_TEXT_LEN;
use crate::error::PayloadError;

/// Width of an encoded `f32` sample.
pub const FLOAT_LEN: usize = 4;
/// Width of an encoded `i32` value.
pub const INT_LEN: usize = 4;

//==================================================================================PROFILE_TEXT
/// Bounded text decoded from a Ping/Pong payload.
///
/// Holds at most [`MAX_TEXT_LEN`] bytes and always stores valid UTF-8.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ProfileText {
    len: usize,
    data: [u8; MAX_TEXT_LEN],
}

impl Default for ProfileText {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileText {
    /// Create an empty text.
    pub const fn new() -> Self {
        Self {
            len: 0,
            data: [0; MAX_TEXT_LEN],
        }
    }

    /// Decode up to [`MAX_TEXT_LEN`] bytes. Input past the capacity is
    /// dropped, and a trailing invalid UTF-8 sequence is cut off.
    pub fn decode(payload: &[u8]) -> Self {
        let clamped = &payload[..payload.len().min(MAX_TEXT_LEN)];
        let valid = match core::str::from_utf8(clamped) {
            Ok(text) => text.len(),
            Err(err) => err.valid_up_to(),
        };

        let mut text = Self::new();
        text.data[..valid].copy_from_slice(&clamped[..valid]);
        text.len = valid;
        text
    }

    /// Number of stored bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        // `decode` only ever stores a valid prefix.
        core::str::from_utf8(&self.data[..self.len]).unwrap_or("")
    }
}

impl core::fmt::Debug for ProfileText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("ProfileText").field(&self.as_str()).finish()
    }
}

//==================================================================================READERS
/// Read a little-endian `f32` from the first four bytes.
pub fn read_f32(payload: &[u8]) -> Result<f32, PayloadError> {
    Ok(f32::from_le_bytes(fixed::<FLOAT_LEN>(payload)?))
}

/// Read a little-endian `i32` from the first four bytes.
pub fn read_i32(payload: &[u8]) -> Result<i32, PayloadError> {
    Ok(i32::from_le_bytes(fixed::<INT_LEN>(payload)?))
}

fn fixed<const N: usize>(payload: &[u8]) -> Result<[u8; N], PayloadError> {
    let mut bytes = [0u8; N];
    let head = payload.get(..N).ok_or(PayloadError::TooShort {
        expected: N,
        available: payload.len(),
    })?;
    bytes.copy_from_slice(head);
    Ok(bytes)
}

//==================================================================================WRITERS
/// Write `value` little-endian; returns the number of bytes written.
pub fn write_f32(value: f32, buffer: &mut [u8]) -> Result<usize, PayloadError> {
    write_fixed(&value.to_le_bytes(), buffer)
}

/// Write `value` little-endian; returns the number of bytes written.
pub fn write_i32(value: i32, buffer: &mut [u8]) -> Result<usize, PayloadError> {
    write_fixed(&value.to_le_bytes(), buffer)
}

/// Copy as much of `text` as fits into `buffer`, never splitting a character.
/// Returns the number of bytes written.
pub fn write_text(text: &str, buffer: &mut [u8]) -> usize {
    let mut end = text.len().min(buffer.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    buffer[..end].copy_from_slice(&text.as_bytes()[..end]);
    end
}

fn write_fixed(bytes: &[u8], buffer: &mut [u8]) -> Result<usize, PayloadError> {
    let available = buffer.len();
    let target = buffer
        .get_mut(..bytes.len())
        .ok_or(PayloadError::BufferTooSmall {
            needed: bytes.len(),
            available,
        })?;
    target.copy_from_slice(bytes);
    Ok(bytes.len())
}
