//! Error definitions shared across library modules.
//! None of them is fatal: the engine logs, skips the offending frame or
//! action, and carries on with the next cycle.
use crate::core::MessageKind;
use thiserror_no_std::Error;

//==================================================================================DISPATCH_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reasons a received frame was dropped by the dispatcher.
pub enum DispatchError {
    /// The low byte of the identifier is not a code of this profile.
    /// Covers foreign traffic and malformed identifiers alike.
    #[error("Unrecognized message kind: id {id:#06x}, dlc {len}")]
    UnknownKind { id: u16, len: usize },
    /// The payload is too short for the fixed-width value of its kind.
    #[error("Invalid data length for {kind:?}: expected {expected}, got {actual}")]
    InvalidDataLen {
        kind: MessageKind,
        expected: usize,
        actual: usize,
    },
    /// A remote frame carrying a code that only travels in data frames.
    /// Only the integer request is ever sent as a remote frame.
    #[error("Unexpected remote frame for {kind:?}: id {id:#06x}")]
    UnexpectedRemote { kind: MessageKind, id: u16 },
}

//==================================================================================SEND_ERROR
#[derive(Error, Debug)]
/// Errors encountered when sending a profile message (encode + transmit).
pub enum SendError<E: core::fmt::Debug> {
    /// CAN layer refused or failed to send the frame.
    #[error("CAN bus send error: {0:?}")]
    Bus(E),
    /// Value could not be encoded.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// Frame could not be built.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

//==================================================================================CONFIG_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Engine configuration rejected by the builder.
pub enum ConfigError {
    /// `jitter_min_ms` is greater than `jitter_max_ms`.
    #[error("Jitter range is inverted: {min} > {max}")]
    InvertedJitterRange { min: i32, max: i32 },
    /// The float bound must be finite and strictly positive.
    #[error("Float bound must be finite and positive")]
    InvalidFloatBound,
}

//==================================================================================FRAME_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Raw CAN frames that cannot be represented as profile frames.
pub enum FrameError {
    /// Identifier does not fit in the 16-bit compound identifier.
    #[error("Identifier {raw:#x} exceeds 16 bits")]
    IdOutOfRange { raw: u32 },
    /// More than eight data bytes were supplied.
    #[error("Invalid data length: {len}")]
    InvalidDataLen { len: usize },
}

//==================================================================================PAYLOAD_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures of the fixed-width payload readers and writers.
pub enum PayloadError {
    /// Fewer bytes than the value requires.
    #[error("Payload too short -> expected: {expected}, available: {available}")]
    TooShort { expected: usize, available: usize },
    /// Destination buffer cannot hold the encoded value.
    #[error("Buffer too small -> needed: {needed}, available: {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

//==================================================================================EMBEDDED_CAN_ERROR
#[derive(Error, Debug)]
/// Failures of the `embedded-can` adapter.
pub enum EmbeddedCanError<E: core::fmt::Debug> {
    /// Every transmit mailbox is busy; the frame was not queued.
    #[error("Transmit mailboxes full")]
    WouldBlock,
    /// The driver refused the frame.
    #[error("CAN driver error: {0:?}")]
    Driver(E),
    /// The driver frame type cannot represent the frame.
    #[error("Frame rejected by the driver frame type")]
    FrameRejected,
}
