//! Asynchronous timer abstraction pacing the engine runner between cycles.

/// Delay source for [`Engine::drive`](crate::protocol::engine::Engine::drive).
///
/// The runner races each delay against its stop signal and drops the delay
/// future when the stop wins, so implementations must be cancel-safe.
pub trait KorriTimer {
    /// Wait `millis` milliseconds: the pause between two engine cycles.
    fn delay_ms<'a>(&'a mut self, millis: u32) -> impl core::future::Future<Output = ()> + 'a;
}
