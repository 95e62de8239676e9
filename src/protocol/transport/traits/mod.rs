//! Abstraction traits used by the transport layer (CAN bus, clock, timer).
pub mod can_bus;
pub mod clock;
pub mod korri_timer;
