/*

Completion translation runs as a three-state machine fed by driver events.
Each event is consumed exactly once; the response delivered to the stack is
indicated in parenthesis, and events not shown for a state are ignored
without a response.

O
│
╔═══════════════════╗   RxComplete    ╔═════════════════════╗
║ Idle              ║────────────────>║ AwaitingReceiveData ║
║                   ║                 ║                     ║
║                   ║  (ReceiveDone)  ║  length + rssi      ║
║                   ║<────────────────╫  idle the radio     ║
╚═══════════════════╝                 ║  copy payload       ║
   │           ^                      ╚═════════════════════╝
   │ transmit  │ TxComplete..TxMediumBusy
   │           │ (TransmitDone)
   v           │
╔═══════════════════╗
║ Transmitting      ║      RxComplete preempts this state too: reception
║                   ║      runs, delivers, and the machine ends up Idle.
╚═══════════════════╝
 */
use crate::frame::Frame;
use crate::netdev::{Driver, Event, OpState, RxInfo};
use crate::Radio;

/// Completion machine states. `transmit` parks the machine in
/// [`Transmitting`](Machine::Transmitting) until the driver reports an
/// outcome; there is no timeout here, a lost completion is upstream policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Machine {
    Idle,
    AwaitingReceiveData,
    Transmitting,
}

/// Result classification delivered with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Outcome {
    /// The transfer finished normally.
    Success,
    /// The transmission was not acknowledged.
    NoAck,
    /// The medium was busy; nothing was transmitted.
    ChannelAccessFailure,
    /// The received frame could not be delivered.
    Aborted,
}

/// A completion handed back to the mesh stack.
#[derive(Debug)]
pub enum Response<'m, 'a> {
    /// A receive operation finished. `frame` is `None` when the reception
    /// was aborted.
    ReceiveDone {
        /// The populated receive frame, if delivery succeeded.
        frame: Option<&'m Frame<'a>>,
        /// How the reception ended.
        outcome: Outcome,
    },
    /// The outstanding transmit operation finished. The frame is the layer's
    /// own outgoing copy, unchanged.
    TransmitDone {
        /// The stored transmit frame.
        frame: &'m Frame<'a>,
        /// Whether the acknowledgement announced pending data.
        frame_pending: bool,
        /// How the transmission ended.
        outcome: Outcome,
    },
}

impl<'a, D: Driver> Radio<'a, D> {
    /// Feed one driver event through the completion translator.
    ///
    /// Returns the completion to deliver to the stack, or `None` when the
    /// event does not produce one. Unknown event tags are ignored rather than
    /// treated as errors.
    pub fn handle_event(&mut self, event: Event) -> Option<Response<'_, 'a>> {
        match event {
            Event::RxComplete => self.rx_complete(),
            Event::TxComplete => self.tx_complete(false, Outcome::Success),
            Event::TxCompleteDataPending => self.tx_complete(true, Outcome::Success),
            Event::TxNoAck => self.tx_complete(false, Outcome::NoAck),
            Event::TxMediumBusy => self.tx_complete(false, Outcome::ChannelAccessFailure),
            _ => {
                trace!("radio: ignoring driver event {}", event);
                None
            }
        }
    }

    fn tx_complete(&mut self, frame_pending: bool, outcome: Outcome) -> Option<Response<'_, 'a>> {
        if self.machine != Machine::Transmitting {
            trace!("radio: transmit completion with no transmit outstanding");
            return None;
        }
        self.machine = Machine::Idle;
        debug!("radio: transmit done, pending {}", frame_pending);
        Some(Response::TransmitDone { frame: &self.tx, frame_pending, outcome })
    }

    fn rx_complete(&mut self) -> Option<Response<'_, 'a>> {
        debug!("radio: receive complete");
        self.machine = Machine::AwaitingReceiveData;

        let mut info = RxInfo::default();
        let queried = self.dev.recv(None, Some(&mut info));

        // The stack owns rx/tx turnaround timing, so the receiver must leave
        // receive mode before the frame is touched.
        let _ = self.set_op_state(OpState::Idle);
        self.machine = Machine::Idle;

        let length = match queried {
            Ok(length) => length,
            Err(_) => {
                return Some(Response::ReceiveDone { frame: None, outcome: Outcome::Aborted })
            }
        };
        self.rssi = info.rssi;

        // The wire format cannot address more than 16 bits of length, and the
        // receive storage is bounded by the caller.
        if length > usize::from(u16::MAX) || length > self.rx.capacity() {
            warn!("radio: dropping frame with reported length {}", length);
            return Some(Response::ReceiveDone { frame: None, outcome: Outcome::Aborted });
        }

        self.rx.length = length as u16;
        self.rx.rssi = info.rssi;
        self.rx.power = self.transmit_power().unwrap_or_default();

        let copied = self.dev.recv(Some(&mut self.rx.psdu_mut()[..length]), None);
        match copied {
            Ok(count) if count > 0 => {
                Some(Response::ReceiveDone { frame: Some(&self.rx), outcome: Outcome::Success })
            }
            _ => Some(Response::ReceiveDone { frame: None, outcome: Outcome::Aborted }),
        }
    }
}
