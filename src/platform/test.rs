use super::*;
use crate::mock::{Call, MockDriver};
use crate::netdev::Event;
use crate::MAX_PSDU_LEN;

#[test]
fn enable_disable_accepted_only_when_flag_changes() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    // the radio comes up enabled
    assert!(radio.is_enabled());
    assert!(matches!(radio.enable(), Err(Error::InvalidState)));

    assert!(radio.disable().is_ok());
    assert!(!radio.is_enabled());
    assert!(matches!(radio.disable(), Err(Error::InvalidState)));

    assert!(radio.enable().is_ok());
    assert!(radio.is_enabled());
    assert!(matches!(radio.enable(), Err(Error::InvalidState)));
}

#[test]
fn extended_address_reaches_driver_byte_reversed() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    let addr = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
    radio.set_extended_address(&addr).unwrap();

    let stored = radio.driver().property(Property::LongAddress);
    assert_eq!(stored, &[0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
    // reversal undoes itself
    let recovered: Vec<u8> = stored.iter().rev().copied().collect();
    assert_eq!(recovered, addr);
}

#[test]
fn short_address_is_byte_swapped() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    radio.set_short_address(0x1234).unwrap();
    assert_eq!(radio.driver().property_u16(Property::ShortAddress), 0x3412);
}

#[test]
fn pan_id_is_not_transformed() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    radio.set_pan_id(0xBEEF).unwrap();
    assert_eq!(radio.driver().property_u16(Property::Nid), 0xBEEF);
}

#[test]
fn channel_and_power_round_trip() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    radio.set_channel(26).unwrap();
    assert_eq!(radio.channel().unwrap(), 26);

    radio.set_transmit_power(-7).unwrap();
    assert_eq!(radio.driver().property_u16(Property::TxPower), (-7i16) as u16);
    assert_eq!(radio.transmit_power().unwrap(), -7);
}

#[test]
fn promiscuous_mode_round_trips_through_toggle_bytes() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    radio.set_promiscuous(true).unwrap();
    assert_eq!(radio.driver().property(Property::Promiscuous), &[1]);
    assert!(radio.promiscuous().unwrap());

    radio.set_promiscuous(false).unwrap();
    assert_eq!(radio.driver().property(Property::Promiscuous), &[0]);
    assert!(!radio.promiscuous().unwrap());
}

#[test]
fn sleep_idles_before_sleeping() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    radio.sleep().unwrap();
    assert_eq!(radio.driver().state_writes, [OpState::Idle as u8, OpState::Sleep as u8]);
    assert_eq!(radio.driver().op_state(), Some(OpState::Sleep));
}

#[test]
fn receive_idles_before_retuning() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    radio.receive(11).unwrap();

    let dev = radio.driver();
    assert_eq!(dev.calls, [Call::Set(Property::State), Call::Set(Property::Channel)]);
    assert_eq!(dev.state_writes, [OpState::Idle as u8]);
    assert_eq!(dev.property_u16(Property::Channel), 11);
}

#[test]
fn receive_complete_delivers_populated_frame() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut dev = MockDriver::new();
    dev.preload(Property::TxPower, &4i16.to_le_bytes());
    dev.rx_payload.extend_from_slice(&[0x42; 20]).unwrap();
    dev.rx_reported_len = 20;
    dev.rx_info.rssi = -60;
    let mut radio = Radio::new(dev, &mut tx, &mut rx);

    radio.receive(11).unwrap();

    match radio.handle_event(Event::RxComplete) {
        Some(Response::ReceiveDone { frame: Some(frame), outcome: Outcome::Success }) => {
            assert_eq!(frame.length, 20);
            assert_eq!(frame.channel, 11);
            assert_eq!(frame.power, 4);
            assert_eq!(frame.rssi, -60);
            assert_eq!(frame.payload(), &[0x42; 20]);
        }
        other => panic!("unexpected completion: {other:?}"),
    }
    assert_eq!(radio.rssi(), -60);

    let dev = radio.driver();
    assert_eq!(
        dev.calls,
        [
            Call::Set(Property::State),
            Call::Set(Property::Channel),
            Call::RecvQuery,
            Call::Set(Property::State),
            Call::Get(Property::TxPower),
            Call::RecvCopy(20),
        ]
    );
    // the receiver was idled before the payload was touched
    assert_eq!(dev.state_writes, [OpState::Idle as u8, OpState::Idle as u8]);
}

#[test]
fn receive_length_ceiling_is_inclusive() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = vec![0u8; usize::from(u16::MAX)];
    let mut dev = MockDriver::new();
    dev.rx_payload.extend_from_slice(&[0xAB; 12]).unwrap();
    dev.rx_reported_len = usize::from(u16::MAX);
    let mut radio = Radio::new(dev, &mut tx, &mut rx);

    match radio.handle_event(Event::RxComplete) {
        Some(Response::ReceiveDone { frame: Some(frame), outcome: Outcome::Success }) => {
            assert_eq!(frame.length, u16::MAX);
        }
        other => panic!("unexpected completion: {other:?}"),
    }
}

#[test]
fn receive_beyond_length_ceiling_aborts_without_frame() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut dev = MockDriver::new();
    dev.rx_reported_len = usize::from(u16::MAX) + 1;
    let mut radio = Radio::new(dev, &mut tx, &mut rx);

    assert!(matches!(
        radio.handle_event(Event::RxComplete),
        Some(Response::ReceiveDone { frame: None, outcome: Outcome::Aborted })
    ));

    let dev = radio.driver();
    // the radio was still idled, but no payload copy was attempted
    assert_eq!(dev.calls, [Call::RecvQuery, Call::Set(Property::State)]);
}

#[test]
fn receive_copy_failure_aborts_without_frame() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut dev = MockDriver::new();
    dev.rx_payload.extend_from_slice(&[0x42; 20]).unwrap();
    dev.rx_reported_len = 20;
    dev.fail_rx_copy = true;
    let mut radio = Radio::new(dev, &mut tx, &mut rx);

    assert!(matches!(
        radio.handle_event(Event::RxComplete),
        Some(Response::ReceiveDone { frame: None, outcome: Outcome::Aborted })
    ));
}

#[test]
fn transmit_applies_frame_settings_then_sends() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    let frame = radio.transmit_frame();
    frame.psdu_mut()[..5].copy_from_slice(&[1, 2, 3, 4, 5]);
    frame.length = 5;
    frame.channel = 15;
    frame.power = 0;
    radio.transmit().unwrap();

    assert_eq!(radio.state().unwrap(), RadioState::Transmitting);

    let dev = radio.driver();
    assert_eq!(
        dev.calls,
        [Call::Set(Property::Channel), Call::Set(Property::TxPower), Call::Send(5)]
    );
    assert_eq!(dev.property_u16(Property::Channel), 15);
    assert_eq!(dev.sent, [1, 2, 3, 4, 5]);
}

#[test]
fn transmit_no_ack_delivers_stored_frame_and_returns_to_idle() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    let frame = radio.transmit_frame();
    frame.psdu_mut()[..5].copy_from_slice(&[1, 2, 3, 4, 5]);
    frame.length = 5;
    frame.channel = 15;
    frame.power = 0;
    radio.transmit().unwrap();

    match radio.handle_event(Event::TxNoAck) {
        Some(Response::TransmitDone { frame, frame_pending, outcome }) => {
            assert_eq!(frame.payload(), &[1, 2, 3, 4, 5]);
            assert!(!frame_pending);
            assert_eq!(outcome, Outcome::NoAck);
        }
        other => panic!("unexpected completion: {other:?}"),
    }

    // the completion was consumed; repeating the event produces nothing
    assert!(radio.handle_event(Event::TxNoAck).is_none());
    assert_eq!(radio.state().unwrap(), RadioState::Listening(15));
}

#[test]
fn transmit_completion_mapping_is_total_and_exclusive() {
    let table = [
        (Event::TxComplete, false, Outcome::Success),
        (Event::TxCompleteDataPending, true, Outcome::Success),
        (Event::TxNoAck, false, Outcome::NoAck),
        (Event::TxMediumBusy, false, Outcome::ChannelAccessFailure),
    ];
    for (event, expected_pending, expected_outcome) in table {
        let mut tx = [0u8; MAX_PSDU_LEN];
        let mut rx = [0u8; MAX_PSDU_LEN];
        let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

        radio.transmit_frame().length = 1;
        radio.transmit().unwrap();

        match radio.handle_event(event) {
            Some(Response::TransmitDone { frame_pending, outcome, .. }) => {
                assert_eq!(frame_pending, expected_pending, "{event:?}");
                assert_eq!(outcome, expected_outcome, "{event:?}");
            }
            other => panic!("{event:?} produced {other:?}"),
        }
    }
}

#[test]
fn unknown_events_neither_complete_nor_disturb_a_transmit() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    radio.transmit_frame().length = 1;
    radio.transmit().unwrap();

    assert!(radio.handle_event(Event::LinkUp).is_none());
    assert!(radio.handle_event(Event::CrcError).is_none());
    assert_eq!(radio.state().unwrap(), RadioState::Transmitting);

    assert!(matches!(
        radio.handle_event(Event::TxComplete),
        Some(Response::TransmitDone { frame_pending: false, outcome: Outcome::Success, .. })
    ));
}

#[test]
fn transmit_completion_without_outstanding_transmit_is_ignored() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    assert!(radio.handle_event(Event::TxComplete).is_none());
    assert!(radio.handle_event(Event::TxNoAck).is_none());
}

#[test]
fn receive_completion_preempts_an_outstanding_transmit() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut dev = MockDriver::new();
    dev.rx_payload.extend_from_slice(&[7; 8]).unwrap();
    dev.rx_reported_len = 8;
    let mut radio = Radio::new(dev, &mut tx, &mut rx);

    radio.transmit_frame().length = 1;
    radio.transmit().unwrap();

    assert!(matches!(
        radio.handle_event(Event::RxComplete),
        Some(Response::ReceiveDone { frame: Some(_), outcome: Outcome::Success })
    ));
    // reception moved the machine to idle; the stale transmit completion is dropped
    assert!(radio.handle_event(Event::TxComplete).is_none());
}

#[test]
fn state_queries_ask_the_driver_live() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    radio.driver_mut().preload(Property::State, &[OpState::Off as u8]);
    assert!(radio.is_off().unwrap());
    assert!(!radio.is_idle().unwrap());

    radio.driver_mut().preload(Property::State, &[OpState::Idle as u8]);
    assert!(radio.is_idle().unwrap());

    radio.driver_mut().preload(Property::State, &[OpState::Rx as u8]);
    assert!(radio.is_receiving().unwrap());
    assert_eq!(radio.state().unwrap(), RadioState::Receiving);

    radio.driver_mut().preload(Property::State, &[OpState::Sleep as u8]);
    assert_eq!(radio.state().unwrap(), RadioState::Sleep);

    radio.driver_mut().preload(Property::State, &[OpState::Idle as u8]);
    radio.set_channel(20).unwrap();
    assert_eq!(radio.state().unwrap(), RadioState::Listening(20));

    radio.disable().unwrap();
    assert_eq!(radio.state().unwrap(), RadioState::Disabled);
}

#[test]
fn eui64_comes_from_the_interface_identifier() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut dev = MockDriver::new();
    dev.preload(Property::Ipv6Iid, &[0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7]);
    let mut radio = Radio::new(dev, &mut tx, &mut rx);

    assert_eq!(radio.ieee_eui64().unwrap(), [0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7]);
    assert_eq!(radio.driver().calls, [Call::Get(Property::Ipv6Iid)]);
}

#[test]
fn capability_gaps_are_preserved() {
    let mut tx = [0u8; MAX_PSDU_LEN];
    let mut rx = [0u8; MAX_PSDU_LEN];
    let mut radio = Radio::new(MockDriver::new(), &mut tx, &mut rx);

    assert!(radio.caps().is_empty());
    assert!(matches!(radio.energy_scan(11, 100), Err(Error::NotImplemented)));

    radio.enable_source_match(true);
    radio.add_source_match_short(0x1234).unwrap();
    radio.add_source_match_extended(&[0; 8]).unwrap();
    radio.clear_source_match_short(0x1234).unwrap();
    radio.clear_source_match_extended(&[0; 8]).unwrap();
    radio.clear_source_match_short_entries();
    radio.clear_source_match_extended_entries();
    radio.set_default_transmit_power(10);

    // none of the stubs generate driver traffic
    assert!(radio.driver().calls.is_empty());
}
