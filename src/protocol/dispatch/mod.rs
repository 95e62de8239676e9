//! Profile device: decodes received frames and routes them to a
//! [`Notifications`] implementation, and encodes the outgoing profile
//! messages with this device's identity.
//!
//! The device holds no application state. Every mutation happens in the
//! notification sink passed to [`AppDevice::handle_frame`].
use core::fmt::Debug;

use crate::core::{DeviceId, MessageKind, MAX_FRAME_DATA};
use crate::error::{DispatchError, SendError};
use crate::infra::codec::payload::{self, ProfileText, FLOAT_LEN, INT_LEN};
use crate::protocol::notifications::Notifications;
use crate::protocol::transport::{
    can_frame::CanFrame,
    can_id::CompoundId,
    traits::can_bus::{BusStatus, CanBus},
};

/// Outcome of draining the receive queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollSummary {
    /// Frames routed to a notification.
    pub dispatched: usize,
    /// Frames dropped (unknown kind or malformed payload).
    pub dropped: usize,
}

/// Decode `frame` and invoke the matching notification.
///
/// Unknown kinds, short numeric payloads, and remote frames for any kind but
/// the integer request are reported as errors and no notification is invoked. Text payloads are bounded, never rejected.
pub fn dispatch<N: Notifications + ?Sized>(
    frame: &CanFrame,
    sink: &mut N,
) -> Result<MessageKind, DispatchError> {
    let kind = frame.kind().ok_or(DispatchError::UnknownKind {
        id: frame.id.raw(),
        len: frame.len,
    })?;

    if frame.remote && kind != MessageKind::IntRequest {
        return Err(DispatchError::UnexpectedRemote {
            kind,
            id: frame.id.raw(),
        });
    }

    match kind {
        MessageKind::Ping => sink.on_ping(ProfileText::decode(frame.payload()).as_str()),
        MessageKind::Pong => sink.on_pong(ProfileText::decode(frame.payload()).as_str()),
        MessageKind::FloatSample => {
            let value = payload::read_f32(frame.payload()).map_err(|_| {
                DispatchError::InvalidDataLen {
                    kind,
                    expected: FLOAT_LEN,
                    actual: frame.len,
                }
            })?;
            sink.on_float_sample(value)
        }
        // Decided by the frame type, never by the payload.
        MessageKind::IntRequest => sink.on_remote_int_requested(),
        MessageKind::IntValue => {
            let value = payload::read_i32(frame.payload()).map_err(|_| {
                DispatchError::InvalidDataLen {
                    kind,
                    expected: INT_LEN,
                    actual: frame.len,
                }
            })?;
            sink.on_int_value(value)
        }
    }

    Ok(kind)
}

/// Profile endpoint bound to a CAN bus and a device identity.
pub struct AppDevice<C: CanBus> {
    /// CAN bus implementation used to send/receive frames.
    can_bus: C,
    /// Identity folded into every outgoing identifier.
    device_id: DeviceId,
}

impl<C: CanBus> AppDevice<C>
where
    C::Error: Debug,
{
    pub fn new(can_bus: C, device_id: DeviceId) -> Self {
        Self { can_bus, device_id }
    }

    /// Identity used for outgoing frames.
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// Change the identity, e.g. after picking a new random one.
    pub fn set_device_id(&mut self, device_id: DeviceId) {
        self.device_id = device_id;
    }

    /// Borrow the underlying bus.
    pub fn bus_mut(&mut self) -> &mut C {
        &mut self.can_bus
    }

    /// Give the bus back.
    pub fn into_inner(self) -> C {
        self.can_bus
    }

    /// Decode one frame into `sink`. See [`dispatch`].
    pub fn handle_frame<N: Notifications + ?Sized>(
        &self,
        frame: &CanFrame,
        sink: &mut N,
    ) -> Result<MessageKind, DispatchError> {
        dispatch(frame, sink)
    }

    /// Drain every queued frame in delivery order, dispatching each once.
    pub fn poll<N: Notifications + ?Sized>(&mut self, sink: &mut N) -> PollSummary {
        let mut summary = PollSummary::default();
        while let Some(frame) = self.can_bus.poll_recv() {
            match dispatch(&frame, sink) {
                Ok(_kind) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("Dispatched {} from {}", _kind, frame.id.device());
                    summary.dispatched += 1;
                }
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Dropped frame: {}", _err);
                    summary.dropped += 1;
                }
            }
        }
        summary
    }

    /// Read the transport status and error counters.
    pub fn bus_status(&mut self) -> BusStatus {
        self.can_bus.bus_status()
    }

    /// Ask `device` for its integer value with a zero-length remote frame.
    pub fn request_remote_int(&mut self, device: DeviceId) -> Result<(), SendError<C::Error>> {
        let frame = CanFrame::new_request(CompoundId::new(device, MessageKind::IntRequest));
        self.transmit(&frame)
    }

    /// Send a Ping carrying `text`, truncated to the frame capacity.
    pub fn send_ping(&mut self, text: &str) -> Result<(), SendError<C::Error>> {
        self.send_text(MessageKind::Ping, text)
    }

    /// Send a Pong carrying `text`, truncated to the frame capacity.
    pub fn send_pong(&mut self, text: &str) -> Result<(), SendError<C::Error>> {
        self.send_text(MessageKind::Pong, text)
    }

    /// Broadcast a float sample.
    pub fn send_float(&mut self, value: f32) -> Result<(), SendError<C::Error>> {
        let mut buffer = [0u8; MAX_FRAME_DATA];
        let len = payload::write_f32(value, &mut buffer)?;
        self.send_data(MessageKind::FloatSample, &buffer[..len])
    }

    /// Send an integer value (the answer to a remote request).
    pub fn send_int(&mut self, value: i32) -> Result<(), SendError<C::Error>> {
        let mut buffer = [0u8; MAX_FRAME_DATA];
        let len = payload::write_i32(value, &mut buffer)?;
        self.send_data(MessageKind::IntValue, &buffer[..len])
    }

    fn send_text(&mut self, kind: MessageKind, text: &str) -> Result<(), SendError<C::Error>> {
        let mut buffer = [0u8; MAX_FRAME_DATA];
        let len = payload::write_text(text, &mut buffer);
        self.send_data(kind, &buffer[..len])
    }

    fn send_data(&mut self, kind: MessageKind, data: &[u8]) -> Result<(), SendError<C::Error>> {
        let frame = CanFrame::new_data(CompoundId::new(self.device_id, kind), data)?;
        self.transmit(&frame)
    }

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), SendError<C::Error>> {
        self.can_bus.send(frame).map_err(SendError::Bus)
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
