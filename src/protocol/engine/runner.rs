//! Async driver: repeats [`Engine::cycle`] with a fixed pause until a stop
//! signal fires.
use core::fmt::Debug;

use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embassy_time::Duration;
use futures_util::future::{select, Either};
use futures_util::pin_mut;
use rand::RngCore;

use super::Engine;
use crate::protocol::broker::EventStore;
use crate::protocol::notifications::Notifications;
use crate::protocol::transport::traits::{
    can_bus::CanBus, clock::Clock, korri_timer::KorriTimer,
};

impl<C, S, K, R> Engine<C, S, K, R>
where
    C: CanBus,
    C::Error: Debug,
    S: EventStore + Notifications,
    K: Clock,
    R: RngCore,
{
    /// Run cycles separated by `period` until `stop` is signaled.
    ///
    /// At least one cycle runs. The pause is interrupted as soon as `stop`
    /// fires. Returns the number of cycles executed.
    pub async fn drive<T, M>(&mut self, timer: &mut T, period: Duration, stop: &Signal<M, ()>) -> u32
    where
        T: KorriTimer,
        M: RawMutex,
    {
        let pause_ms = period.as_millis().min(u32::MAX as u64) as u32;
        let mut cycles: u32 = 0;

        loop {
            let _report = self.cycle();
            cycles = cycles.wrapping_add(1);

            #[cfg(feature = "defmt")]
            if _report.send_failures > 0 {
                defmt::warn!("Cycle {}: {} send failure(s)", cycles, _report.send_failures);
            }

            let stopped = stop.wait();
            let pause = timer.delay_ms(pause_ms);
            pin_mut!(stopped);
            pin_mut!(pause);

            // Whichever completes first: the stop request or the pause.
            match select(stopped, pause).await {
                Either::Left(((), _)) => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Engine stopped after {} cycles", cycles);
                    return cycles;
                }
                Either::Right(((), _)) => {}
            }
        }
    }
}
