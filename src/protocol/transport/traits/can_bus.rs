//! Minimal abstraction for a non-blocking CAN bus. Lets the library plug into
//! various implementations (embedded HAL, interrupt-fed queue, test double).
use crate::protocol::transport::can_frame::CanFrame;

/// Controller state and error counters as reported by the transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStatus {
    /// Driver-specific status code (`0` when healthy).
    pub code: u32,
    pub tx_errors: u32,
    pub rx_errors: u32,
    pub other_errors: u32,
}

/// Contract to send and receive CAN frames without ever blocking.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Enqueue a frame for transmission.
    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error>;
    /// Next received frame, if any is queued. Frames come out in delivery order.
    fn poll_recv(&mut self) -> Option<CanFrame>;
    /// Current controller status and error counters.
    fn bus_status(&mut self) -> BusStatus;
}
