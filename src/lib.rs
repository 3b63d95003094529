#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Radio platform adaptation between an event-driven IEEE 802.15.4 netdev
//! driver and a Thread-style mesh networking stack.
//!
//! The mesh stack issues synchronous radio commands (enable, sleep, listen on
//! a channel, transmit) and expects receive and transmit completions to arrive
//! later; a netdev driver instead speaks a get/set property protocol plus
//! asynchronous events. [`Radio`] owns the translation between the two
//! contracts: it stores the enabled flag (the only radio state held locally),
//! answers every other state question with a live driver query, and turns
//! driver events into completion [`Response`]s without losing or duplicating
//! frames.
//!
//! The driver side is abstracted as [`netdev::Driver`]. The event loop that
//! owns driver interrupt dispatch feeds [`Radio::handle_event`] and hands the
//! returned [`Response`], if any, to the stack. Everything runs on one logical
//! thread of control; nothing here blocks or locks.
//!
//! ## Feature flags
#![doc = document_features::document_features!(feature_label = r#"<span class="stab portability"><code>{feature}</code></span>"#)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod frame;
pub mod netdev;
mod platform;

#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

pub use frame::{Frame, MAX_PSDU_LEN};
pub use platform::{Error, Outcome, Radio, RadioState, Response};

use bitflags::bitflags;

/// IEEE EUI-64 device identifier, most significant byte first.
pub type Eui64 = [u8; 8];

bitflags! {
    /// Hardware offload capabilities reported to the mesh stack.
    ///
    /// Drivers behind this adaptation report every transmit outcome through
    /// the event path, including missing acknowledgements, so no offload is
    /// claimed: [`Radio::caps`] always returns the empty set and the stack
    /// handles timing, retries and backoff in software.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Caps: u8 {
        /// The radio times out acknowledgements on its own.
        const ACK_TIMEOUT = 1;
        /// The radio can run an energy scan without stack involvement.
        const ENERGY_SCAN = 1 << 1;
        /// The radio retransmits on its own.
        const TRANSMIT_RETRIES = 1 << 2;
        /// The radio performs CSMA backoff on its own.
        const CSMA_BACKOFF = 1 << 3;
    }
}
