//! Bus health monitor: compares the transport status and error counters with
//! the previous poll and reports only what changed.
use crate::protocol::transport::traits::can_bus::BusStatus;

/// Keeps the last-seen [`BusStatus`]; starts from an all-zero snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusHealthMonitor {
    last: BusStatus,
}

impl BusHealthMonitor {
    pub const fn new() -> Self {
        Self {
            last: BusStatus {
                code: 0,
                tx_errors: 0,
                rx_errors: 0,
                other_errors: 0,
            },
        }
    }

    /// Record `status`. Returns it when any field differs from the previous
    /// snapshot, `None` on an unchanged poll.
    pub fn observe(&mut self, status: BusStatus) -> Option<BusStatus> {
        let changed = status != self.last;
        self.last = status;

        if changed {
            #[cfg(feature = "defmt")]
            defmt::info!(
                "New status={}, tx_errors={}, rx_errors={}, other={}",
                status.code,
                status.tx_errors,
                status.rx_errors,
                status.other_errors
            );
            Some(status)
        } else {
            None
        }
    }

    /// Last recorded snapshot.
    pub fn last(&self) -> BusStatus {
        self.last
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
