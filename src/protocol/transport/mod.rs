//! CAN transport layer: frame representation, compound identifier codec,
//! `embedded-can` adapter, and the bus/clock/timer abstraction traits.
//!
//! Every profile frame travels with a 29-bit extended identifier whose low
//! 16 bits hold the compound identifier; the upper bits are always zero.

pub mod can_frame;
pub mod can_id;
pub mod embedded;
pub mod traits;
