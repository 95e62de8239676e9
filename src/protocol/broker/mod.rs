//! Broker: the [`Notifications`] implementation that records the latest
//! received event instead of acting on it.
//!
//! Reactions are deferred to the engine, which reads the record through
//! [`EventStore`] and clears what it consumed. Keeping callbacks to plain
//! field writes keeps them non-blocking and independent of the send side.
//!
//! The record is a single slot: when two reaction-worthy messages arrive
//! between two engine cycles, only the last one is acted upon.
use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

use crate::core::MessageKind;
use crate::protocol::notifications::Notifications;

/// Float reported before any sample is received.
pub const INITIAL_FLOAT: f32 = 1.0;

//==================================================================================RECEIVED_EVENT
/// Latest received event, as seen by the engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceivedEvent {
    /// Kind of the last received message, cleared once acted upon.
    pub last_kind: Option<MessageKind>,
    /// A peer is waiting for this device's integer value.
    pub pending_remote_request: bool,
    /// Last received float sample.
    pub last_float: f32,
    /// Last integer value received from a peer.
    pub last_int: Option<i32>,
}

impl Default for ReceivedEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceivedEvent {
    pub const fn new() -> Self {
        Self {
            last_kind: None,
            pending_remote_request: false,
            last_float: INITIAL_FLOAT,
            last_int: None,
        }
    }

    // Payload fields are written before the kind so that a reader never sees
    // a kind without its payload.

    fn record_text(&mut self, kind: MessageKind) {
        self.last_kind = Some(kind);
    }

    fn record_float(&mut self, value: f32) {
        self.last_float = value;
        self.last_kind = Some(MessageKind::FloatSample);
    }

    fn record_remote_request(&mut self) {
        self.pending_remote_request = true;
        self.last_kind = Some(MessageKind::IntRequest);
    }

    fn record_int(&mut self, value: i32) {
        self.last_int = Some(value);
        self.last_kind = Some(MessageKind::IntValue);
    }

    fn clear_kind(&mut self, observed: MessageKind) {
        if self.last_kind == Some(observed) {
            self.last_kind = None;
        }
    }
}

//==================================================================================EVENT_STORE
/// Consumer side of the broker, used by the engine.
pub trait EventStore {
    /// Copy of the current record.
    fn snapshot(&self) -> ReceivedEvent;
    /// Clear `last_kind`, but only if it still holds `observed`: an event
    /// recorded after the snapshot survives.
    fn clear_kind(&mut self, observed: MessageKind);
    /// Clear the pending remote request flag.
    fn clear_remote_request(&mut self);
}

//==================================================================================BROKER
/// Single-context broker: the dispatcher and the engine run in the same
/// execution context.
#[derive(Debug, Default)]
pub struct Broker {
    event: ReceivedEvent,
}

impl Broker {
    pub const fn new() -> Self {
        Self {
            event: ReceivedEvent::new(),
        }
    }

    /// Borrow the current record.
    pub fn event(&self) -> &ReceivedEvent {
        &self.event
    }
}

impl Notifications for Broker {
    fn on_ping(&mut self, _text: &str) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received: {}", _text);
        self.event.record_text(MessageKind::Ping);
    }

    fn on_pong(&mut self, _text: &str) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received: {}", _text);
        self.event.record_text(MessageKind::Pong);
    }

    fn on_float_sample(&mut self, value: f32) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received float: {}", value);
        self.event.record_float(value);
    }

    fn on_remote_int_requested(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received: remote int request");
        self.event.record_remote_request();
    }

    fn on_int_value(&mut self, value: i32) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received int: {}", value);
        self.event.record_int(value);
    }
}

impl EventStore for Broker {
    fn snapshot(&self) -> ReceivedEvent {
        self.event
    }

    fn clear_kind(&mut self, observed: MessageKind) {
        self.event.clear_kind(observed);
    }

    fn clear_remote_request(&mut self) {
        self.event.pending_remote_request = false;
    }
}

//==================================================================================SHARED_BROKER
/// Broker shared between a receive context (interrupt, separate task) and the
/// engine. Every access runs under the raw mutex `M`, so a record is always
/// seen whole.
///
/// Use `CriticalSectionRawMutex` when frames are delivered from an interrupt,
/// `NoopRawMutex` when everything runs in one context. Both sides hold a
/// `&SharedBroker`, which implements [`Notifications`] and [`EventStore`].
pub struct SharedBroker<M: RawMutex> {
    inner: Mutex<M, RefCell<ReceivedEvent>>,
}

impl<M: RawMutex> Default for SharedBroker<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex> SharedBroker<M> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(ReceivedEvent::new())),
        }
    }

    /// Copy of the current record.
    pub fn event(&self) -> ReceivedEvent {
        self.inner.lock(|event| *event.borrow())
    }

    fn update<R>(&self, f: impl FnOnce(&mut ReceivedEvent) -> R) -> R {
        self.inner.lock(|event| f(&mut event.borrow_mut()))
    }
}

impl<M: RawMutex> Notifications for &SharedBroker<M> {
    fn on_ping(&mut self, _text: &str) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received: {}", _text);
        self.update(|event| event.record_text(MessageKind::Ping));
    }

    fn on_pong(&mut self, _text: &str) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received: {}", _text);
        self.update(|event| event.record_text(MessageKind::Pong));
    }

    fn on_float_sample(&mut self, value: f32) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received float: {}", value);
        self.update(|event| event.record_float(value));
    }

    fn on_remote_int_requested(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received: remote int request");
        self.update(|event| event.record_remote_request());
    }

    fn on_int_value(&mut self, value: i32) {
        #[cfg(feature = "defmt")]
        defmt::info!("Received int: {}", value);
        self.update(|event| event.record_int(value));
    }
}

impl<M: RawMutex> EventStore for &SharedBroker<M> {
    fn snapshot(&self) -> ReceivedEvent {
        self.event()
    }

    fn clear_kind(&mut self, observed: MessageKind) {
        self.update(|event| event.clear_kind(observed));
    }

    fn clear_remote_request(&mut self) {
        self.update(|event| event.pending_remote_request = false);
    }
}
