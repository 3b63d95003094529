//! Contract of an event-driven IEEE 802.15.4 netdev driver.
//!
//! A driver exposes a synchronous get/set property interface, a one-shot
//! asynchronous [`send`](Driver::send) and a two-phase
//! [`recv`](Driver::recv). Transfer completions are reported out of band as
//! [`Event`]s by whatever loop owns the driver's interrupt dispatch.

use core::fmt;

/// Length of an IEEE 802.15.4 extended (long) address.
pub const LONG_ADDRESS_LEN: usize = 8;

/// Driver configuration and status properties.
///
/// Multi-byte property values cross the get/set calls least significant byte
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Property {
    /// Radio channel, 16 bits wide on the wire.
    Channel,
    /// Transmit power in dBm, signed 16 bits.
    TxPower,
    /// Network (PAN) identifier.
    Nid,
    /// Extended address in the driver's storage order, least significant
    /// byte first.
    LongAddress,
    /// Short address.
    ShortAddress,
    /// Promiscuous mode, a [`Toggle`] byte.
    Promiscuous,
    /// Operational state, an [`OpState`] byte.
    State,
    /// IPv6 interface identifier derived from the device EUI-64.
    Ipv6Iid,
}

/// Operational states a driver reports through [`Property::State`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum OpState {
    /// Powered down.
    Off = 0,
    /// Low-power state, radio not listening.
    Sleep = 1,
    /// Powered and listening.
    Idle = 2,
    /// A frame is currently being received.
    Rx = 3,
    /// A frame is currently being transmitted.
    Tx = 4,
}

impl OpState {
    /// Decode a [`Property::State`] byte.
    pub fn from_byte(byte: u8) -> Option<OpState> {
        Some(match byte {
            0 => OpState::Off,
            1 => OpState::Sleep,
            2 => OpState::Idle,
            3 => OpState::Rx,
            4 => OpState::Tx,
            _ => return None,
        })
    }
}

/// Two-valued payload of boolean properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Toggle {
    /// Option is off.
    Disabled = 0,
    /// Option is on.
    Enabled = 1,
}

impl From<bool> for Toggle {
    fn from(on: bool) -> Toggle {
        if on {
            Toggle::Enabled
        } else {
            Toggle::Disabled
        }
    }
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> bool {
        matches!(toggle, Toggle::Enabled)
    }
}

/// Signal metadata the driver captured for the frame a length query refers
/// to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct RxInfo {
    /// Received signal strength in dBm.
    pub rssi: i8,
    /// Link quality indicator.
    pub lqi: u8,
}

/// Asynchronous events a driver delivers to the adaptation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Event {
    /// A frame arrived and can be fetched with [`Driver::recv`].
    RxComplete,
    /// The pending transmission went out.
    TxComplete,
    /// The pending transmission went out and the acknowledgement carried a
    /// frame-pending bit.
    TxCompleteDataPending,
    /// No acknowledgement arrived for the pending transmission.
    TxNoAck,
    /// Channel access failed and nothing was transmitted.
    TxMediumBusy,
    /// Link-layer up notification; not a transfer completion.
    LinkUp,
    /// A frame arrived with a bad checksum and was dropped by the driver.
    CrcError,
}

/// An event-driven IEEE 802.15.4 network device.
///
/// The error type carries the driver's raw status. The adaptation layer hands
/// it through to its caller untranslated and never retries on its own.
pub trait Driver {
    /// Raw driver status for failed operations.
    type Error: fmt::Debug;

    /// Read a property value into `value`, returning the number of bytes
    /// written.
    fn get(&mut self, property: Property, value: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write a property value.
    fn set(&mut self, property: Property, value: &[u8]) -> Result<(), Self::Error>;

    /// Hand one contiguous frame to the driver for transmission.
    ///
    /// Returns as soon as the driver has accepted the buffer; the outcome
    /// arrives later as one of the transmit [`Event`]s.
    fn send(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Fetch a received frame.
    ///
    /// Called twice per frame: first with no buffer to learn the frame length
    /// and capture [`RxInfo`], then with the real buffer to copy the payload
    /// out. The two calls are distinct operations of the contract; collapsing
    /// them into one read would lose the signal-metadata side channel.
    fn recv(&mut self, buf: Option<&mut [u8]>, info: Option<&mut RxInfo>)
        -> Result<usize, Self::Error>;
}
