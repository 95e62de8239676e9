/// Test doubles to simulate the CAN bus, the clock, and the timer during
/// integration tests.
use korri_pingpong::protocol::transport::{
    can_frame::CanFrame,
    traits::{
        can_bus::{BusStatus, CanBus},
        clock::Clock,
        korri_timer::KorriTimer,
    },
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: mpsc::UnboundedReceiver<CanFrame>,
    pub status: BusStatus,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses: what one side sends, the
    /// other receives.
    pub fn create_pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();

        let a = Self {
            tx: a_tx,
            rx: a_rx,
            status: BusStatus::default(),
        };

        let b = Self {
            tx: b_tx,
            rx: b_rx,
            status: BusStatus::default(),
        };

        (a, b)
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        self.tx.send(frame.clone()).map_err(|_| ())
    }

    fn poll_recv(&mut self) -> Option<CanFrame> {
        self.rx.try_recv().ok()
    }

    fn bus_status(&mut self) -> BusStatus {
        self.status
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Millisecond clock shared between engines and moved by the test body.
pub struct FakeClock(Arc<AtomicU32>);

#[allow(dead_code)]
impl FakeClock {
    pub fn set(&self, ms: u32) {
        self.0.store(ms, Ordering::Relaxed);
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Clock for FakeClock {
    fn now_ms(&mut self) -> u32 {
        self.get()
    }
}

#[allow(dead_code)]
/// Timer based on `tokio::time::sleep` to drive delays in tests.
pub struct MockTimer;

impl KorriTimer for MockTimer {
    async fn delay_ms(&mut self, millis: u32) {
        sleep(Duration::from_millis(millis as u64)).await;
    }
}
