//! In-memory representation of a profile CAN frame.
//!
//! `CanFrame` implements [`embedded_can::Frame`], so any `embedded-can`
//! driver can transmit it directly. The compound identifier always goes out
//! as an extended (29-bit) identifier; the 16-bit layout does not fit an
//! 11-bit standard one.
use embedded_can::{ExtendedId, Frame, Id};

use crate::core::{MessageKind, MAX_FRAME_DATA};
use crate::error::FrameError;
use crate::protocol::transport::can_id::CompoundId;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Frame header plus payload, as handed over by the transport.
pub struct CanFrame {
    /// Compound identifier (sender identity and kind code).
    pub id: CompoundId,
    /// Payload buffer. Classic CAN frames carry at most eight bytes.
    pub data: [u8; MAX_FRAME_DATA],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
    /// Remote-request frame: no payload, the peer is asked for a value.
    pub remote: bool,
}

impl CanFrame {
    /// Build a data frame. Fails when `payload` exceeds eight bytes.
    pub fn new_data(id: CompoundId, payload: &[u8]) -> Result<Self, FrameError> {
        if payload.len() > MAX_FRAME_DATA {
            return Err(FrameError::InvalidDataLen { len: payload.len() });
        }
        let mut data = [0u8; MAX_FRAME_DATA];
        data[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            id,
            data,
            len: payload.len(),
            remote: false,
        })
    }

    /// Build a zero-length remote-request frame.
    pub const fn new_request(id: CompoundId) -> Self {
        Self {
            id,
            data: [0; MAX_FRAME_DATA],
            len: 0,
            remote: true,
        }
    }

    /// Message kind, resolving the shared integer code with the frame type.
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_code_and_frame_type(self.id.code(), self.remote)
    }

    /// Valid payload bytes. Never reads past the DLC; empty for a remote
    /// frame, whose DLC only states the requested length.
    pub fn payload(&self) -> &[u8] {
        if self.remote {
            return &[];
        }
        &self.data[..self.len.min(MAX_FRAME_DATA)]
    }

    /// Convert any `embedded-can` frame. Identifiers wider than 16 bits are
    /// foreign to the profile and rejected.
    pub fn from_frame<F: Frame>(frame: &F) -> Result<Self, FrameError> {
        let raw = raw_id(frame.id());
        let id = u16::try_from(raw).map_err(|_| FrameError::IdOutOfRange { raw })?;

        if frame.is_remote_frame() {
            let mut request = Self::new_request(CompoundId(id));
            request.len = frame.dlc().min(MAX_FRAME_DATA);
            Ok(request)
        } else {
            Self::new_data(CompoundId(id), frame.data())
        }
    }
}

fn raw_id(id: Id) -> u32 {
    match id {
        Id::Standard(id) => id.as_raw() as u32,
        Id::Extended(id) => id.as_raw(),
    }
}

fn compound_id(id: Id) -> Option<CompoundId> {
    u16::try_from(raw_id(id)).ok().map(CompoundId)
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let id = compound_id(id.into())?;
        Self::new_data(id, data).ok()
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_FRAME_DATA {
            return None;
        }
        let mut frame = Self::new_request(compound_id(id.into())?);
        frame.len = dlc;
        Some(frame)
    }

    fn is_extended(&self) -> bool {
        true
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        // A 16-bit value is always a valid 29-bit identifier.
        Id::Extended(ExtendedId::new(self.id.0 as u32).unwrap_or(ExtendedId::ZERO))
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            self.payload()
        }
    }
}
