//! Cooperative protocol engine.
//!
//! [`Engine::cycle`] is called repeatedly by the firmware main loop (or by
//! [`Engine::drive`]). Each call inspects the broker record and the elapsed
//! time of its timers, decides what to transmit, transmits it, clears what it
//! consumed, re-arms the timers, and finally drains the receive queue. Frames
//! drained in one cycle are therefore acted upon in the next one.
//!
//! `cycle` never blocks and never allocates. Timers live in [`EngineState`];
//! time and randomness are injected.
use core::fmt::Debug;

use embassy_time::Duration;
use rand::{Rng, RngCore};

use crate::core::{DeviceId, MessageKind};
use crate::error::SendError;
use crate::protocol::broker::{EventStore, ReceivedEvent};
use crate::protocol::dispatch::{AppDevice, PollSummary};
use crate::protocol::health::BusHealthMonitor;
use crate::protocol::notifications::Notifications;
use crate::protocol::transport::traits::{
    can_bus::{BusStatus, CanBus},
    clock::Clock,
};

pub mod config;
mod runner;

pub use config::{EngineConfig, EngineConfigBuilder};

/// Broadcast value used when the transform collapses to zero, is not a
/// number, or falls below the negative bound.
pub const FLOAT_RESET: f32 = 1.0;
/// Broadcast value used when the transform exceeds the positive bound.
pub const FLOAT_OVERFLOW: f32 = -1.0;

//==================================================================================TIMERS
/// Last-action timestamp of one scheduled behavior, with the jitter that
/// applies until it fires again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActionTimer {
    last_ms: u32,
    jitter_ms: i32,
}

impl ActionTimer {
    pub const fn new(now_ms: u32, jitter_ms: i32) -> Self {
        Self {
            last_ms: now_ms,
            jitter_ms,
        }
    }

    /// Milliseconds since the last action. Wrapping, so a counter rollover
    /// between the two timestamps is harmless.
    pub fn elapsed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_ms)
    }

    /// `interval` has elapsed, jitter not applied.
    pub fn reached(&self, now_ms: u32, interval: Duration) -> bool {
        self.elapsed(now_ms) >= threshold(interval, 0)
    }

    /// `interval` plus the current jitter has elapsed.
    pub fn reached_jittered(&self, now_ms: u32, interval: Duration) -> bool {
        self.elapsed(now_ms) >= threshold(interval, self.jitter_ms)
    }

    /// Restart from `now_ms` with a fresh jitter.
    pub fn rearm(&mut self, now_ms: u32, jitter_ms: i32) {
        self.last_ms = now_ms;
        self.jitter_ms = jitter_ms;
    }

    pub fn last_ms(&self) -> u32 {
        self.last_ms
    }

    pub fn jitter_ms(&self) -> i32 {
        self.jitter_ms
    }
}

fn threshold(interval: Duration, jitter_ms: i32) -> u32 {
    let total = interval.as_millis() as i64 + jitter_ms as i64;
    total.clamp(0, u32::MAX as i64) as u32
}

/// Every timer of the engine. Each is reset only when its own action fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineState {
    /// Reactive branch (Pong, Ping, integer reply).
    pub reactive: ActionTimer,
    /// Periodic float broadcast.
    pub float: ActionTimer,
    /// Periodic remote integer request.
    pub probe: ActionTimer,
}

//==================================================================================REPORT
/// Reactive branch outcome; at most one per cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reaction {
    /// Answer to a Ping, or the liveness probe after a long silence.
    Pong,
    /// Answer to a Pong.
    Ping,
    /// Answer to a remote integer request.
    IntReply,
}

/// What one cycle did. Actions are reported once fired, whether or not the
/// transport accepted the frame; rejected frames are counted in
/// `send_failures`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    pub reaction: Option<Reaction>,
    /// Float value broadcast this cycle.
    pub float_sent: Option<f32>,
    /// Device whose integer was requested this cycle.
    pub probe_sent: Option<DeviceId>,
    /// Bus status, present only when it changed since the previous cycle.
    pub bus_status: Option<BusStatus>,
    /// Frames drained at the end of the cycle.
    pub received: PollSummary,
    pub send_failures: u8,
}

/// Next float to broadcast, derived from the last received one.
///
/// Keeps the exchanged value away from zero and from unbounded growth:
/// zero or non-finite → [`FLOAT_RESET`], above `bound` → [`FLOAT_OVERFLOW`],
/// below `-bound` → [`FLOAT_RESET`].
pub fn next_float_sample(last: f32, scale: f32, bound: f32) -> f32 {
    let value = last * scale;
    if value.is_nan() || value == 0.0 {
        FLOAT_RESET
    } else if value > bound {
        FLOAT_OVERFLOW
    } else if value < -bound {
        FLOAT_RESET
    } else {
        value
    }
}

fn draw_jitter<R: RngCore>(rng: &mut R, config: &EngineConfig) -> i32 {
    if config.jitter_min_ms >= config.jitter_max_ms {
        config.jitter_min_ms
    } else {
        rng.gen_range(config.jitter_min_ms..config.jitter_max_ms)
    }
}

//==================================================================================ENGINE
/// State/timer-driven decision loop of one device.
pub struct Engine<C, S, K, R>
where
    C: CanBus,
    S: EventStore + Notifications,
    K: Clock,
    R: RngCore,
{
    device: AppDevice<C>,
    store: S,
    clock: K,
    rng: R,
    config: EngineConfig,
    state: EngineState,
    health: BusHealthMonitor,
}

impl<C, S, K, R> Engine<C, S, K, R>
where
    C: CanBus,
    C::Error: Debug,
    S: EventStore + Notifications,
    K: Clock,
    R: RngCore,
{
    /// Assemble an engine. Every timer starts at the current clock reading.
    pub fn new(device: AppDevice<C>, store: S, mut clock: K, mut rng: R, config: EngineConfig) -> Self {
        let now = clock.now_ms();
        let state = EngineState {
            reactive: ActionTimer::new(now, draw_jitter(&mut rng, &config)),
            float: ActionTimer::new(now, draw_jitter(&mut rng, &config)),
            probe: ActionTimer::new(now, draw_jitter(&mut rng, &config)),
        };

        Self {
            device,
            store,
            clock,
            rng,
            config,
            state,
            health: BusHealthMonitor::new(),
        }
    }

    /// Run one cooperative cycle.
    pub fn cycle(&mut self) -> CycleReport {
        let now = self.clock.now_ms();
        let event = self.store.snapshot();
        let mut report = CycleReport::default();

        // 1. Reactive branch
        report.reaction = self.react(now, &event, &mut report.send_failures);

        // 2. Periodic float broadcast
        if self.state.float.reached_jittered(now, self.config.float_interval) {
            let value = next_float_sample(
                event.last_float,
                self.config.float_scale,
                self.config.float_bound,
            );
            #[cfg(feature = "defmt")]
            defmt::info!("Sending: {}", value);
            let result = self.device.send_float(value);
            Self::account(&result, &mut report.send_failures);
            self.state.float.rearm(now, draw_jitter(&mut self.rng, &self.config));
            report.float_sent = Some(value);
        }

        // 3. Periodic remote integer request
        if self.state.probe.reached_jittered(now, self.config.probe_interval) {
            let target = self
                .config
                .probe_target
                .unwrap_or_else(|| self.device.device_id());
            #[cfg(feature = "defmt")]
            defmt::info!("Request int from {}", target);
            let result = self.device.request_remote_int(target);
            Self::account(&result, &mut report.send_failures);
            self.state.probe.rearm(now, draw_jitter(&mut self.rng, &self.config));
            report.probe_sent = Some(target);
        }

        // 4. Bus health
        let status = self.device.bus_status();
        report.bus_status = self.health.observe(status);

        // 5. Drain the receive queue; results are acted upon next cycle.
        report.received = self.device.poll(&mut self.store);

        report
    }

    fn react(&mut self, now: u32, event: &ReceivedEvent, failures: &mut u8) -> Option<Reaction> {
        let timer = &self.state.reactive;
        let reaction = if (event.last_kind == Some(MessageKind::Ping)
            && timer.reached(now, self.config.reply_interval))
            || timer.reached_jittered(now, self.config.idle_interval)
        {
            Reaction::Pong
        } else if event.last_kind == Some(MessageKind::Pong)
            && timer.reached_jittered(now, self.config.ping_interval)
        {
            Reaction::Ping
        } else if event.pending_remote_request {
            Reaction::IntReply
        } else {
            return None;
        };

        #[cfg(feature = "defmt")]
        defmt::info!("Reacting with {}", reaction);

        let result = match reaction {
            Reaction::Pong => self.device.send_pong(self.config.pong_text),
            Reaction::Ping => self.device.send_ping(self.config.ping_text),
            Reaction::IntReply => {
                self.store.clear_remote_request();
                self.device.send_int(self.config.reply_value)
            }
        };
        Self::account(&result, failures);

        // Never react twice to the same message.
        if let Some(kind) = event.last_kind {
            self.store.clear_kind(kind);
        }
        self.state
            .reactive
            .rearm(now, draw_jitter(&mut self.rng, &self.config));

        Some(reaction)
    }

    fn account(result: &Result<(), SendError<C::Error>>, failures: &mut u8) {
        if let Err(_err) = result {
            #[cfg(feature = "defmt")]
            defmt::warn!("Send failed: {}", defmt::Debug2Format(_err));
            *failures = failures.saturating_add(1);
        }
    }

    /// Current timers.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn device(&self) -> &AppDevice<C> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut AppDevice<C> {
        &mut self.device
    }

    /// Broker the engine reads from.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the broker, e.g. to feed it frames decoded elsewhere.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Take the engine apart.
    pub fn into_parts(self) -> (AppDevice<C>, S, K, R) {
        (self.device, self.store, self.clock, self.rng)
    }
}
