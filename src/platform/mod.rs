//! The radio platform adaptation: synchronous commands in, completion
//! responses out.
//!
//! [`Radio`] binds one driver instance to the two caller-supplied frame
//! storages at construction and is never recreated. Commands translate into
//! driver property operations; the completion side lives in [`state`] and is
//! driven through [`Radio::handle_event`].

use crate::frame::Frame;
use crate::netdev::{Driver, OpState, Property, Toggle, LONG_ADDRESS_LEN};
use crate::{Caps, Eui64};

pub(crate) mod state;
pub use state::{Outcome, Response};
use state::Machine;

#[cfg(test)]
mod test;

/// Errors surfaced directly by platform commands.
#[derive(Debug)]
pub enum Error<E> {
    /// The requested enable/disable transition is already in effect.
    InvalidState,
    /// The operation is not provided by this layer.
    NotImplemented,
    /// Raw driver status, handed through untranslated.
    Driver(E),
}

impl<E> From<E> for Error<E> {
    fn from(status: E) -> Error<E> {
        Error::Driver(status)
    }
}

/// Composite radio state as the mesh stack models it.
///
/// Only the enabled flag is stored by this layer. Everything else is derived
/// from the completion machine and a live driver query, so the answer tracks
/// the hardware even when it changed behind this layer's back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum RadioState {
    /// The stack has disabled the radio.
    Disabled,
    /// Low-power state, not listening.
    Sleep,
    /// Powered, neither listening nor transferring.
    Idle,
    /// Listening on the given channel.
    Listening(u8),
    /// A frame is being received or fetched from the driver.
    Receiving,
    /// A transmission is outstanding.
    Transmitting,
}

/// The adaptation layer instance. One per radio.
pub struct Radio<'a, D: Driver> {
    dev: D,
    enabled: bool,
    tx: Frame<'a>,
    rx: Frame<'a>,
    rssi: i8,
    machine: Machine,
}

impl<'a, D: Driver> Radio<'a, D> {
    /// Bind the adaptation layer to a driver and its two frame storages.
    ///
    /// `tx_storage` backs the frame handed out by
    /// [`transmit_frame`](Radio::transmit_frame); `rx_storage` backs delivered
    /// receive frames. Both are used for the instance's whole lifetime and
    /// never reallocated. The radio starts out enabled.
    pub fn new(dev: D, tx_storage: &'a mut [u8], rx_storage: &'a mut [u8]) -> Self {
        Radio {
            dev,
            enabled: true,
            tx: Frame::new(tx_storage),
            rx: Frame::new(rx_storage),
            rssi: 0,
            machine: Machine::Idle,
        }
    }

    /// Borrow the underlying driver.
    pub fn driver(&self) -> &D {
        &self.dev
    }

    /// Mutably borrow the underlying driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.dev
    }

    /// Mark the radio enabled.
    ///
    /// Rejected with [`Error::InvalidState`] when the radio already is; a
    /// transition is accepted only if it changes the flag.
    pub fn enable(&mut self) -> Result<(), Error<D::Error>> {
        debug!("radio: enable");
        if self.enabled {
            return Err(Error::InvalidState);
        }
        self.enabled = true;
        Ok(())
    }

    /// Mark the radio disabled. Symmetric to [`enable`](Radio::enable).
    pub fn disable(&mut self) -> Result<(), Error<D::Error>> {
        debug!("radio: disable");
        if !self.enabled {
            return Err(Error::InvalidState);
        }
        self.enabled = false;
        Ok(())
    }

    /// Whether the stack considers the radio enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the driver reports itself powered down.
    pub fn is_off(&mut self) -> Result<bool, Error<D::Error>> {
        Ok(self.op_state()? == Some(OpState::Off))
    }

    /// Whether the driver reports itself idle.
    pub fn is_idle(&mut self) -> Result<bool, Error<D::Error>> {
        Ok(self.op_state()? == Some(OpState::Idle))
    }

    /// Whether the driver reports a frame reception in progress.
    pub fn is_receiving(&mut self) -> Result<bool, Error<D::Error>> {
        Ok(self.op_state()? == Some(OpState::Rx))
    }

    /// Derive the composite [`RadioState`].
    pub fn state(&mut self) -> Result<RadioState, Error<D::Error>> {
        if !self.enabled {
            return Ok(RadioState::Disabled);
        }
        match self.machine {
            Machine::Transmitting => return Ok(RadioState::Transmitting),
            Machine::AwaitingReceiveData => return Ok(RadioState::Receiving),
            Machine::Idle => {}
        }
        Ok(match self.op_state()? {
            Some(OpState::Off) | Some(OpState::Sleep) => RadioState::Sleep,
            Some(OpState::Rx) => RadioState::Receiving,
            Some(OpState::Tx) => RadioState::Transmitting,
            Some(OpState::Idle) => RadioState::Listening(self.channel()? as u8),
            None => RadioState::Idle,
        })
    }

    /// Set the PAN identifier.
    pub fn set_pan_id(&mut self, pan_id: u16) -> Result<(), Error<D::Error>> {
        debug!("radio: set PAN ID {=u16:#x}", pan_id);
        self.set_u16(Property::Nid, pan_id)
    }

    /// Set the extended address.
    ///
    /// The stack presents the address most significant byte first; the driver
    /// stores it least significant byte first, so the bytes are reversed on
    /// the way down.
    pub fn set_extended_address(&mut self, addr: &Eui64) -> Result<(), Error<D::Error>> {
        debug!("radio: set extended address");
        let mut reversed = [0u8; LONG_ADDRESS_LEN];
        for (dst, src) in reversed.iter_mut().zip(addr.iter().rev()) {
            *dst = *src;
        }
        self.dev.set(Property::LongAddress, &reversed)?;
        Ok(())
    }

    /// Set the short address, swapping its two bytes for the driver.
    pub fn set_short_address(&mut self, addr: u16) -> Result<(), Error<D::Error>> {
        debug!("radio: set short address {=u16:#x}", addr);
        self.set_u16(Property::ShortAddress, addr.swap_bytes())
    }

    /// Set the radio channel.
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Error<D::Error>> {
        self.set_u16(Property::Channel, u16::from(channel))
    }

    /// Current radio channel as the driver reports it.
    pub fn channel(&mut self) -> Result<u16, Error<D::Error>> {
        self.get_u16(Property::Channel)
    }

    /// Set the transmit power in dBm.
    pub fn set_transmit_power(&mut self, dbm: i16) -> Result<(), Error<D::Error>> {
        self.set_u16(Property::TxPower, dbm as u16)
    }

    /// Current transmit power in dBm.
    pub fn transmit_power(&mut self) -> Result<i16, Error<D::Error>> {
        Ok(self.get_u16(Property::TxPower)? as i16)
    }

    /// Switch promiscuous mode on or off.
    pub fn set_promiscuous(&mut self, enable: bool) -> Result<(), Error<D::Error>> {
        debug!("radio: set promiscuous {}", enable);
        self.dev.set(Property::Promiscuous, &[Toggle::from(enable) as u8])?;
        Ok(())
    }

    /// Whether the driver is in promiscuous mode.
    pub fn promiscuous(&mut self) -> Result<bool, Error<D::Error>> {
        let mut value = [0u8; 1];
        self.dev.get(Property::Promiscuous, &mut value)?;
        Ok(value[0] == Toggle::Enabled as u8)
    }

    /// Put the driver to sleep, idling it first.
    pub fn sleep(&mut self) -> Result<(), Error<D::Error>> {
        debug!("radio: sleep");
        self.set_op_state(OpState::Idle)?;
        self.set_op_state(OpState::Sleep)
    }

    /// Listen for frames on `channel`.
    ///
    /// The receiver is idled before the channel switch; a frame arriving
    /// between the two operations must not be taken on the old channel with
    /// the new channel's metadata.
    pub fn receive(&mut self, channel: u8) -> Result<(), Error<D::Error>> {
        debug!("radio: receive on channel {}", channel);
        self.set_op_state(OpState::Idle)?;
        self.set_channel(channel)?;
        self.rx.channel = channel;
        Ok(())
    }

    /// The frame the stack fills in before calling
    /// [`transmit`](Radio::transmit).
    pub fn transmit_frame(&mut self) -> &mut Frame<'a> {
        &mut self.tx
    }

    /// Hand the transmit frame to the driver.
    ///
    /// Channel and power are taken from the frame and applied first, then the
    /// payload goes to the driver as one contiguous buffer. Returns as soon
    /// as the driver has the buffer; the outcome arrives later through
    /// [`handle_event`](Radio::handle_event). The stack must not touch the
    /// transmit frame again until that completion is delivered.
    pub fn transmit(&mut self) -> Result<(), Error<D::Error>> {
        let channel = self.tx.channel;
        let power = self.tx.power;
        debug!("radio: transmit on channel {}", channel);
        self.set_channel(channel)?;
        self.set_transmit_power(power)?;
        self.dev.send(self.tx.payload())?;
        self.machine = Machine::Transmitting;
        Ok(())
    }

    /// Capabilities reported to the stack: none, every outcome is handled in
    /// software.
    pub fn caps(&self) -> Caps {
        Caps::empty()
    }

    /// Signal strength captured with the most recently delivered frame.
    pub fn rssi(&self) -> i8 {
        self.rssi
    }

    /// The device EUI-64, read from the driver's IPv6 interface identifier.
    pub fn ieee_eui64(&mut self) -> Result<Eui64, Error<D::Error>> {
        let mut eui = [0u8; LONG_ADDRESS_LEN];
        self.dev.get(Property::Ipv6Iid, &mut eui)?;
        Ok(eui)
    }

    /// Source-address-match filtering is stubbed upstream; accepted, no
    /// effect.
    pub fn enable_source_match(&mut self, _enable: bool) {}

    /// Accepted, no effect. See [`enable_source_match`](Radio::enable_source_match).
    pub fn add_source_match_short(&mut self, _addr: u16) -> Result<(), Error<D::Error>> {
        Ok(())
    }

    /// Accepted, no effect.
    pub fn add_source_match_extended(&mut self, _addr: &Eui64) -> Result<(), Error<D::Error>> {
        Ok(())
    }

    /// Accepted, no effect.
    pub fn clear_source_match_short(&mut self, _addr: u16) -> Result<(), Error<D::Error>> {
        Ok(())
    }

    /// Accepted, no effect.
    pub fn clear_source_match_extended(&mut self, _addr: &Eui64) -> Result<(), Error<D::Error>> {
        Ok(())
    }

    /// Accepted, no effect.
    pub fn clear_source_match_short_entries(&mut self) {}

    /// Accepted, no effect.
    pub fn clear_source_match_extended_entries(&mut self) {}

    /// Energy scanning is not provided by this layer.
    pub fn energy_scan(
        &mut self,
        _channel: u8,
        _duration_ms: u16,
    ) -> Result<(), Error<D::Error>> {
        Err(Error::NotImplemented)
    }

    /// Placeholder; the effective power is set per transmit frame.
    pub fn set_default_transmit_power(&mut self, _dbm: i16) {}

    pub(crate) fn op_state(&mut self) -> Result<Option<OpState>, Error<D::Error>> {
        let mut value = [0u8; 1];
        self.dev.get(Property::State, &mut value)?;
        Ok(OpState::from_byte(value[0]))
    }

    pub(crate) fn set_op_state(&mut self, state: OpState) -> Result<(), Error<D::Error>> {
        self.dev.set(Property::State, &[state as u8])?;
        Ok(())
    }

    fn get_u16(&mut self, property: Property) -> Result<u16, Error<D::Error>> {
        let mut value = [0u8; 2];
        self.dev.get(property, &mut value)?;
        Ok(u16::from_le_bytes(value))
    }

    fn set_u16(&mut self, property: Property, value: u16) -> Result<(), Error<D::Error>> {
        self.dev.set(property, &value.to_le_bytes())?;
        Ok(())
    }
}
