//! `korri-pingpong` library: a small CAN bus interoperability profile for
//! `no_std` targets. Devices exchange Ping/Pong texts, float samples and
//! remote-requested integers to check that every participant agrees on
//! framing, byte order, and floating-point representation.
//!
//! The crate exposes the payload codec, the compound identifier and frame
//! types, the dispatch layer with its notification interface, and the
//! cooperative engine that decides what to transmit next.
#![no_std]
//==================================================================================
/// Profile data types: device identity and message kinds.
pub mod core;
/// Dispatch, send, and configuration errors.
pub mod error;
/// Byte-level payload codec.
pub mod infra;
/// Profile implementation: transport, dispatch, broker, engine, bus health.
pub mod protocol;
//==================================================================================
