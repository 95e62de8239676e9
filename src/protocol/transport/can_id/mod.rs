//! Creation and extraction of the 16-bit compound identifiers used by the
//! profile.
//!
//! Layout: `(device:8 << 8) | kind:8`. Folding the sender identity into the
//! identifier keeps two devices from entering arbitration with the same ID
//! for the same message kind.
use crate::core::{DeviceId, MessageKind};

//==================================================================================COMPOUND_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Encapsulates a compound identifier and exposes accessors for the sender
/// identity and the message kind.
pub struct CompoundId(pub u16);

impl CompoundId {
    /// Pack a sender identity and a message kind.
    pub const fn new(device: DeviceId, kind: MessageKind) -> Self {
        Self(((device.0 as u16) << 8) | kind.code() as u16)
    }

    /// Sender identity stored in the high byte.
    pub const fn device(&self) -> DeviceId {
        DeviceId((self.0 >> 8) as u8)
    }

    /// Raw kind code stored in the low byte.
    pub const fn code(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Message kind carried in the low byte, `None` for foreign codes.
    ///
    /// The shared integer code resolves to [`MessageKind::IntRequest`]; the
    /// frame type is needed to tell a value apart
    /// (see [`CanFrame::kind`](crate::protocol::transport::can_frame::CanFrame::kind)).
    pub const fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_code(self.code())
    }

    /// Raw value as carried in the CAN arbitration field.
    pub const fn raw(&self) -> u16 {
        self.0
    }
}

impl From<CompoundId> for u32 {
    fn from(id: CompoundId) -> Self {
        id.0 as u32
    }
}
