//! Monotonic time source consumed by the engine.

/// Millisecond counter. Implementations may wrap at `u32::MAX`: the engine
/// only ever compares timestamps through wrapping subtraction.
pub trait Clock {
    fn now_ms(&mut self) -> u32;
}

impl<K: Clock + ?Sized> Clock for &mut K {
    fn now_ms(&mut self) -> u32 {
        (**self).now_ms()
    }
}

/// Clock backed by the embassy time driver.
#[cfg(feature = "embassy-clock")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-clock")]
impl Clock for EmbassyClock {
    #[inline]
    fn now_ms(&mut self) -> u32 {
        // Truncation is the intended wrap.
        embassy_time::Instant::now().as_millis() as u32
    }
}
