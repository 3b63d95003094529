//! A scripted netdev driver for exercising the adaptation layer on the host.
//!
//! [`MockDriver`] keeps its property store as raw bytes the way a real driver
//! would, records every call it sees in order, and lets a test script the
//! next receive operation, including reported lengths that no real frame
//! could carry.

use heapless::Vec;

use crate::frame::MAX_PSDU_LEN;
use crate::netdev::{Driver, OpState, Property, RxInfo};

const CALL_LOG_DEPTH: usize = 32;

/// One recorded driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// A property read.
    Get(Property),
    /// A property write.
    Set(Property),
    /// A frame of the given length handed to `send`.
    Send(u16),
    /// The length-query phase of `recv`.
    RecvQuery,
    /// The payload-copy phase of `recv`, with the buffer length offered.
    RecvCopy(u16),
}

/// Raw status code in the shape a driver would return it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(pub i32);

/// A netdev driver with a scripted receive path and a full call log.
pub struct MockDriver {
    channel: [u8; 2],
    tx_power: [u8; 2],
    nid: [u8; 2],
    long_address: [u8; 8],
    short_address: [u8; 2],
    promiscuous: [u8; 1],
    state: [u8; 1],
    ipv6_iid: [u8; 8],

    /// Payload the copy phase of `recv` serves.
    pub rx_payload: Vec<u8, MAX_PSDU_LEN>,
    /// Length the query phase of `recv` reports; independent of
    /// `rx_payload` so bound checks can be scripted.
    pub rx_reported_len: usize,
    /// Signal metadata the query phase captures.
    pub rx_info: RxInfo,
    /// Make the copy phase report zero bytes.
    pub fail_rx_copy: bool,

    /// Last frame handed to `send`.
    pub sent: Vec<u8, MAX_PSDU_LEN>,
    /// Every call, in order.
    pub calls: Vec<Call, CALL_LOG_DEPTH>,
    /// Every value written to [`Property::State`], in order.
    pub state_writes: Vec<u8, 8>,
}

impl MockDriver {
    /// A driver that starts out idle with all properties zeroed.
    pub fn new() -> Self {
        MockDriver {
            channel: [0; 2],
            tx_power: [0; 2],
            nid: [0; 2],
            long_address: [0; 8],
            short_address: [0; 2],
            promiscuous: [0; 1],
            state: [OpState::Idle as u8; 1],
            ipv6_iid: [0; 8],
            rx_payload: Vec::new(),
            rx_reported_len: 0,
            rx_info: RxInfo::default(),
            fail_rx_copy: false,
            sent: Vec::new(),
            calls: Vec::new(),
            state_writes: Vec::new(),
        }
    }

    /// Raw stored bytes of a property, as the driver keeps them.
    pub fn property(&self, property: Property) -> &[u8] {
        match property {
            Property::Channel => &self.channel,
            Property::TxPower => &self.tx_power,
            Property::Nid => &self.nid,
            Property::LongAddress => &self.long_address,
            Property::ShortAddress => &self.short_address,
            Property::Promiscuous => &self.promiscuous,
            Property::State => &self.state,
            Property::Ipv6Iid => &self.ipv6_iid,
        }
    }

    /// Stored value of a 16-bit property.
    pub fn property_u16(&self, property: Property) -> u16 {
        let bytes = self.property(property);
        u16::from_le_bytes([bytes[0], bytes[1]])
    }

    /// Preload a property, bypassing the call log.
    pub fn preload(&mut self, property: Property, value: &[u8]) {
        let slot = self.slot(property);
        let n = slot.len().min(value.len());
        slot[..n].copy_from_slice(&value[..n]);
    }

    /// Operational state the driver currently reports.
    pub fn op_state(&self) -> Option<OpState> {
        OpState::from_byte(self.state[0])
    }

    /// Index of the first matching call, for ordering assertions.
    pub fn call_position(&self, call: Call) -> Option<usize> {
        self.calls.iter().position(|recorded| *recorded == call)
    }

    fn slot(&mut self, property: Property) -> &mut [u8] {
        match property {
            Property::Channel => &mut self.channel,
            Property::TxPower => &mut self.tx_power,
            Property::Nid => &mut self.nid,
            Property::LongAddress => &mut self.long_address,
            Property::ShortAddress => &mut self.short_address,
            Property::Promiscuous => &mut self.promiscuous,
            Property::State => &mut self.state,
            Property::Ipv6Iid => &mut self.ipv6_iid,
        }
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        MockDriver::new()
    }
}

impl Driver for MockDriver {
    type Error = Status;

    fn get(&mut self, property: Property, value: &mut [u8]) -> Result<usize, Status> {
        self.calls.push(Call::Get(property)).ok();
        let stored = self.property(property);
        let n = stored.len().min(value.len());
        value[..n].copy_from_slice(&stored[..n]);
        Ok(n)
    }

    fn set(&mut self, property: Property, value: &[u8]) -> Result<(), Status> {
        self.calls.push(Call::Set(property)).ok();
        if property == Property::State {
            if let Some(byte) = value.first() {
                self.state_writes.push(*byte).ok();
            }
        }
        let slot = self.slot(property);
        let n = slot.len().min(value.len());
        slot[..n].copy_from_slice(&value[..n]);
        Ok(())
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), Status> {
        self.calls.push(Call::Send(frame.len() as u16)).ok();
        self.sent.clear();
        self.sent.extend_from_slice(frame).ok();
        // a real driver returns to listening once the transfer is queued out
        self.state = [OpState::Idle as u8];
        Ok(())
    }

    fn recv(&mut self, buf: Option<&mut [u8]>, info: Option<&mut RxInfo>) -> Result<usize, Status> {
        match buf {
            None => {
                self.calls.push(Call::RecvQuery).ok();
                if let Some(info) = info {
                    *info = self.rx_info;
                }
                Ok(self.rx_reported_len)
            }
            Some(buf) => {
                self.calls.push(Call::RecvCopy(buf.len().min(u16::MAX as usize) as u16)).ok();
                if self.fail_rx_copy {
                    return Ok(0);
                }
                let n = buf.len().min(self.rx_payload.len());
                buf[..n].copy_from_slice(&self.rx_payload[..n]);
                Ok(n)
            }
        }
    }
}
