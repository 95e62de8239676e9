//! Notification interface: one callback per message kind an application may
//! care about.
//!
//! The dispatcher decodes frames and calls into this trait; what happens next
//! is the implementor's business, so the same trait serves every device on
//! the bus.

/// Callbacks invoked synchronously while frames are decoded.
///
/// Implementations must return promptly and never block: the remaining
/// queued frames are processed in the same cycle.
pub trait Notifications {
    fn on_ping(&mut self, text: &str);
    fn on_pong(&mut self, text: &str);
    fn on_float_sample(&mut self, value: f32);
    /// A peer asked for this device's integer value (remote frame).
    fn on_remote_int_requested(&mut self);
    fn on_int_value(&mut self, value: i32);
}

impl<N: Notifications + ?Sized> Notifications for &mut N {
    fn on_ping(&mut self, text: &str) {
        (**self).on_ping(text)
    }

    fn on_pong(&mut self, text: &str) {
        (**self).on_pong(text)
    }

    fn on_float_sample(&mut self, value: f32) {
        (**self).on_float_sample(value)
    }

    fn on_remote_int_requested(&mut self) {
        (**self).on_remote_int_requested()
    }

    fn on_int_value(&mut self, value: i32) {
        (**self).on_int_value(value)
    }
}
