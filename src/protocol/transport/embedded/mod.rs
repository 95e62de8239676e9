//! [`CanBus`] implementation over any non-blocking `embedded-can` driver.
//!
//! `embedded-can` exposes no controller counters, so the adapter keeps its
//! own: transmit failures feed `tx_errors`, receive failures `rx_errors`,
//! overruns `other_errors`, and `code` holds the last error kind seen.
use core::fmt::Debug;

use embedded_can::{nb::Can, Error as _, ErrorKind, Frame};

use crate::error::EmbeddedCanError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_bus::{BusStatus, CanBus};

/// Adapter turning an `embedded_can::nb::Can` driver into a [`CanBus`].
pub struct EmbeddedCanBus<T> {
    can: T,
    status: BusStatus,
}

impl<T: Can> EmbeddedCanBus<T> {
    pub fn new(can: T) -> Self {
        Self {
            can,
            status: BusStatus::default(),
        }
    }

    /// Give the driver back.
    pub fn into_inner(self) -> T {
        self.can
    }

    fn record_tx_error(&mut self, kind: ErrorKind) {
        self.status.tx_errors = self.status.tx_errors.wrapping_add(1);
        self.record_kind(kind);
    }

    fn record_rx_error(&mut self, kind: ErrorKind) {
        self.status.rx_errors = self.status.rx_errors.wrapping_add(1);
        self.record_kind(kind);
    }

    fn record_kind(&mut self, kind: ErrorKind) {
        if kind == ErrorKind::Overrun {
            self.status.other_errors = self.status.other_errors.wrapping_add(1);
        }
        self.status.code = error_code(kind);
    }
}

/// Stable numeric code for an `embedded-can` error kind (`0` = no error).
pub fn error_code(kind: ErrorKind) -> u32 {
    match kind {
        ErrorKind::Overrun => 1,
        ErrorKind::Bit => 2,
        ErrorKind::Stuff => 3,
        ErrorKind::Crc => 4,
        ErrorKind::Form => 5,
        ErrorKind::Acknowledge => 6,
        _ => 0xFF,
    }
}

impl<T> CanBus for EmbeddedCanBus<T>
where
    T: Can,
    T::Error: Debug,
{
    type Error = EmbeddedCanError<T::Error>;

    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        let driver_frame = if frame.remote {
            T::Frame::new_remote(frame.id(), frame.len)
        } else {
            T::Frame::new(frame.id(), frame.payload())
        }
        .ok_or(EmbeddedCanError::FrameRejected)?;

        match self.can.transmit(&driver_frame) {
            Ok(None) => Ok(()),
            Ok(Some(_displaced)) => {
                // A lower-priority pending frame was pushed out of its mailbox.
                #[cfg(feature = "defmt")]
                defmt::debug!("Pending frame displaced by {}", frame.id);
                Ok(())
            }
            Err(nb::Error::WouldBlock) => Err(EmbeddedCanError::WouldBlock),
            Err(nb::Error::Other(err)) => {
                self.record_tx_error(err.kind());
                Err(EmbeddedCanError::Driver(err))
            }
        }
    }

    fn poll_recv(&mut self) -> Option<CanFrame> {
        loop {
            match self.can.receive() {
                Ok(frame) => match CanFrame::from_frame(&frame) {
                    Ok(frame) => return Some(frame),
                    // Identifiers wider than 16 bits belong to other protocols.
                    Err(_err) => {
                        #[cfg(feature = "defmt")]
                        defmt::trace!("Skipping foreign frame: {}", _err);
                        continue;
                    }
                },
                Err(nb::Error::WouldBlock) => return None,
                Err(nb::Error::Other(err)) => {
                    self.record_rx_error(err.kind());
                    return None;
                }
            }
        }
    }

    fn bus_status(&mut self) -> BusStatus {
        self.status
    }
}
