//! Engine configuration: reaction delays, periodic intervals, jitter range,
//! float transform, and the integer reply.
use embassy_time::Duration;

use crate::core::{DeviceId, INT_REPLY_VALUE};
use crate::error::ConfigError;

/// Timing and value parameters of the engine.
///
/// Defaults: Pong answers a Ping after 1 s, a spontaneous Pong goes out after
/// 5 s of silence, a float sample every 3 s and a remote integer request every
/// 5 s. Each periodic delay is shifted by a jitter drawn from `[-500, 1000)` ms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Minimum delay between two reactions when answering a Ping.
    pub reply_interval: Duration,
    /// Silence after which a Pong is sent spontaneously (plus jitter).
    pub idle_interval: Duration,
    /// Delay before answering a Pong with a Ping (plus jitter).
    pub ping_interval: Duration,
    /// Float broadcast period (plus jitter).
    pub float_interval: Duration,
    /// Remote integer request period (plus jitter).
    pub probe_interval: Duration,
    /// Inclusive lower bound of the jitter, in milliseconds.
    pub jitter_min_ms: i32,
    /// Exclusive upper bound of the jitter. Equal bounds mean a fixed jitter.
    pub jitter_max_ms: i32,
    /// Factor applied to the last received float before broadcasting.
    pub float_scale: f32,
    /// Magnitude above which the broadcast value is reset.
    pub float_bound: f32,
    /// Value sent in answer to a remote request.
    pub reply_value: i32,
    /// Device asked for its integer; `None` targets this device's own identity.
    pub probe_target: Option<DeviceId>,
    pub ping_text: &'static str,
    pub pong_text: &'static str,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reply_interval: Duration::from_millis(1000),
            idle_interval: Duration::from_millis(5000),
            ping_interval: Duration::from_millis(1000),
            float_interval: Duration::from_millis(3000),
            probe_interval: Duration::from_millis(5000),
            jitter_min_ms: -500,
            jitter_max_ms: 1000,
            float_scale: 2.5,
            float_bound: 1_000_000.0,
            reply_value: INT_REPLY_VALUE,
            probe_target: None,
            ping_text: "Ping",
            pong_text: "Pong",
        }
    }
}

impl EngineConfig {
    /// Start from the defaults.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }
}

/// Fluent builder validating the jitter range and float bound.
#[derive(Debug)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn reply_interval(mut self, interval: Duration) -> Self {
        self.config.reply_interval = interval;
        self
    }

    pub fn idle_interval(mut self, interval: Duration) -> Self {
        self.config.idle_interval = interval;
        self
    }

    pub fn ping_interval(mut self, interval: Duration) -> Self {
        self.config.ping_interval = interval;
        self
    }

    pub fn float_interval(mut self, interval: Duration) -> Self {
        self.config.float_interval = interval;
        self
    }

    pub fn probe_interval(mut self, interval: Duration) -> Self {
        self.config.probe_interval = interval;
        self
    }

    /// Jitter drawn from `[min_ms, max_ms)`; `min_ms == max_ms` fixes it.
    pub fn jitter(mut self, min_ms: i32, max_ms: i32) -> Self {
        self.config.jitter_min_ms = min_ms;
        self.config.jitter_max_ms = max_ms;
        self
    }

    /// Disable jitter entirely.
    pub fn without_jitter(self) -> Self {
        self.jitter(0, 0)
    }

    pub fn float_scale(mut self, scale: f32) -> Self {
        self.config.float_scale = scale;
        self
    }

    pub fn float_bound(mut self, bound: f32) -> Self {
        self.config.float_bound = bound;
        self
    }

    pub fn reply_value(mut self, value: i32) -> Self {
        self.config.reply_value = value;
        self
    }

    /// Ask `target` instead of this device for its integer.
    pub fn probe_target(mut self, target: DeviceId) -> Self {
        self.config.probe_target = Some(target);
        self
    }

    pub fn texts(mut self, ping: &'static str, pong: &'static str) -> Self {
        self.config.ping_text = ping;
        self.config.pong_text = pong;
        self
    }

    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let config = self.config;
        if config.jitter_min_ms > config.jitter_max_ms {
            return Err(ConfigError::InvertedJitterRange {
                min: config.jitter_min_ms,
                max: config.jitter_max_ms,
            });
        }
        if !(config.float_bound.is_finite() && config.float_bound > 0.0) {
            return Err(ConfigError::InvalidFloatBound);
        }
        Ok(config)
    }
}
