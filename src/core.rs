//! Defines the message profile shared by every participant on the bus:
//! device identity, message kinds, and their 8-bit wire codes.
//!
//! A single profile definition is enough on both sides of the bus; nothing in
//! this module depends on the transport or on the application.

/// Largest text accepted from a Ping/Pong payload.
pub const MAX_TEXT_LEN: usize = 16;

/// Classic CAN payload capacity.
pub const MAX_FRAME_DATA: usize = 8;

/// Integer every device answers with when its value is remotely requested.
/// A peer reading anything else uses a different byte order.
pub const INT_REPLY_VALUE: i32 = 1234;

/// 8-bit identity of a bus participant for the current session.
///
/// Chosen at start-up (usually at random). Two devices may collide; the
/// profile tolerates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(pub u8);

impl DeviceId {
    /// Raw 8-bit value.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl From<u8> for DeviceId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

/// Every message kind of the profile.
///
/// `IntRequest` and `IntValue` share wire code `4`: the transport remote
/// flag tells them apart (remote frame = request, data frame = value).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKind {
    /// Text frame answered with a Pong.
    Ping,
    /// Text frame answered with a Ping.
    Pong,
    /// Little-endian IEEE-754 single-precision sample.
    FloatSample,
    /// Remote frame asking a peer for its integer value.
    IntRequest,
    /// Data frame carrying a little-endian `i32`.
    IntValue,
}

impl MessageKind {
    /// Wire code of a Ping.
    pub const PING_CODE: u8 = 1;
    /// Wire code of a Pong.
    pub const PONG_CODE: u8 = 2;
    /// Wire code of a float sample.
    pub const FLOAT_CODE: u8 = 3;
    /// Wire code shared by the integer request and its reply.
    pub const REMOTE_INT_CODE: u8 = 4;

    /// 8-bit code placed in the low byte of the compound identifier.
    pub const fn code(self) -> u8 {
        match self {
            MessageKind::Ping => Self::PING_CODE,
            MessageKind::Pong => Self::PONG_CODE,
            MessageKind::FloatSample => Self::FLOAT_CODE,
            MessageKind::IntRequest | MessageKind::IntValue => Self::REMOTE_INT_CODE,
        }
    }

    /// Maps a wire code back to a kind. Code `4` yields `IntRequest`; use
    /// [`MessageKind::from_code_and_frame_type`] when the remote flag is known.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            Self::PING_CODE => Some(MessageKind::Ping),
            Self::PONG_CODE => Some(MessageKind::Pong),
            Self::FLOAT_CODE => Some(MessageKind::FloatSample),
            Self::REMOTE_INT_CODE => Some(MessageKind::IntRequest),
            _ => None,
        }
    }

    /// Resolves the shared integer code with the transport frame type.
    pub const fn from_code_and_frame_type(code: u8, remote: bool) -> Option<Self> {
        match Self::from_code(code) {
            Some(MessageKind::IntRequest) if !remote => Some(MessageKind::IntValue),
            other => other,
        }
    }

    /// Whether frames of this kind travel as remote-request frames.
    pub const fn is_remote(self) -> bool {
        matches!(self, MessageKind::IntRequest)
    }
}
