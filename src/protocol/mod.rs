//! Ping-pong profile: notification interface, frame dispatch, event broker,
//! cooperative engine, bus health, and the CAN transport underneath.
pub mod broker;
pub mod dispatch;
pub mod engine;
pub mod health;
pub mod notifications;
pub mod transport;
