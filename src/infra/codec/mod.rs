//! Payload codec: byte-order aware readers and writers for the values carried
//! by profile frames.
pub mod payload;
