//! Frame views over caller-owned PSDU storage.

use core::fmt;

/// Largest PSDU an IEEE 802.15.4 PHY frame can carry.
pub const MAX_PSDU_LEN: usize = 127;

/// A transmit or receive frame backed by storage supplied at
/// [`Radio::new`](crate::Radio::new).
///
/// The payload bytes live in the caller's buffer for the lifetime of the
/// adaptation layer; length and radio metadata are rewritten on every
/// transmit or receive cycle.
pub struct Frame<'a> {
    psdu: &'a mut [u8],
    /// Number of valid payload bytes in the PSDU storage.
    pub length: u16,
    /// Channel the frame was, or is to be, transferred on.
    pub channel: u8,
    /// Transmit power in dBm.
    pub power: i16,
    /// Received signal strength in dBm; meaningful on receive frames only.
    pub rssi: i8,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(psdu: &'a mut [u8]) -> Self {
        Frame { psdu, length: 0, channel: 0, power: 0, rssi: 0 }
    }

    /// Capacity of the backing storage.
    pub fn capacity(&self) -> usize {
        self.psdu.len()
    }

    /// Payload bytes up to `length`, clamped to the backing storage.
    pub fn payload(&self) -> &[u8] {
        &self.psdu[..usize::from(self.length).min(self.psdu.len())]
    }

    /// Mutable access to the full PSDU storage. The writer is expected to set
    /// [`length`](Frame::length) to the number of bytes it filled in.
    pub fn psdu_mut(&mut self) -> &mut [u8] {
        self.psdu
    }
}

impl fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("length", &self.length)
            .field("channel", &self.channel)
            .field("power", &self.power)
            .field("rssi", &self.rssi)
            .finish()
    }
}

#[cfg(feature = "defmt-03")]
impl defmt::Format for Frame<'_> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Frame {{ length: {}, channel: {}, power: {}, rssi: {}, psdu: ",
            self.length,
            self.channel,
            self.power,
            self.rssi,
        );
        for byte in self.payload() {
            defmt::write!(f, "{:02x}", byte);
        }
        defmt::write!(f, " }}")
    }
}
