//! SPI transfer engine behaviour against a simulated device.

mod common;

use common::{open_mock, DeviceState, Event, SpiReply};
use mcp2210_hid::{Error, SpiMode, SpiStatus, SpiTransferSettings, MAX_SPI_TRANSFER_LEN};

#[test]
fn test_finished_on_first_response() {
    let mut initial = DeviceState::new();
    initial.spi_script.push_back(SpiReply::finished(&[]));
    let (device, state) = open_mock(initial);

    let received = device.transfer(&[0x01, 0x02, 0x03, 0x04]).unwrap();

    assert!(received.is_empty());
    let state = state.lock().unwrap();
    assert_eq!(state.writes_with_opcode(0x42).len(), 1);
    assert!(state.writes_with_opcode(0x40).is_empty(), "length already matched");
}

#[test]
fn test_chunks_accumulate_in_order() {
    let mut initial = DeviceState::new();
    initial
        .spi_script
        .push_back(SpiReply::in_progress(&[0x10, 0x11, 0x12, 0x13]));
    initial
        .spi_script
        .push_back(SpiReply::in_progress(&[0x20, 0x21, 0x22, 0x23]));
    initial.spi_script.push_back(SpiReply::finished(&[]));
    let (device, state) = open_mock(initial);

    let received = device.transfer(&[0xAA; 4]).unwrap();

    assert_eq!(
        received,
        vec![0x10, 0x11, 0x12, 0x13, 0x20, 0x21, 0x22, 0x23]
    );
    let state = state.lock().unwrap();
    let transfers = state.writes_with_opcode(0x42);
    assert_eq!(transfers.len(), 3);
    assert_eq!(&transfers[0][..8], &[0x42, 4, 0, 0, 0xAA, 0xAA, 0xAA, 0xAA]);
    // Follow-ups are pure reads.
    assert_eq!(transfers[1][1], 0);
    assert_eq!(transfers[2][1], 0);
}

#[test]
fn test_oversized_transfer_never_reaches_transport() {
    let (device, state) = open_mock(DeviceState::new());

    let result = device.transfer(&[0u8; 61]);

    assert!(matches!(
        result,
        Err(Error::OperationTooLarge {
            max: 60,
            actual: 61
        })
    ));
    assert!(state.lock().unwrap().log.is_empty());
}

#[test]
fn test_max_length_loopback() {
    let (device, state) = open_mock(DeviceState::new());
    let data: Vec<u8> = (0..MAX_SPI_TRANSFER_LEN as u8).collect();

    let received = device.transfer(&data).unwrap();

    assert_eq!(received, data);
    assert_eq!(state.lock().unwrap().bytes_per_transaction(), 60);
}

#[test]
fn test_length_mismatch_reconfigures_once() {
    let (device, state) = open_mock(DeviceState::new());
    assert_eq!(device.cached_spi_settings().unwrap().bytes_per_transaction, 4);

    assert_eq!(device.transfer(&[1, 2]).unwrap(), vec![1, 2]);
    assert_eq!(device.transfer(&[3, 4]).unwrap(), vec![3, 4]);

    let state = state.lock().unwrap();
    let settings_writes = state.writes_with_opcode(0x40);
    assert_eq!(settings_writes.len(), 1);
    assert_eq!(&settings_writes[0][18..20], &[2, 0]);
    // The settings write must precede the first data command.
    assert!(matches!(state.log.first(), Some(Event::Write(frame)) if frame[0] == 0x40));
    assert_eq!(device.cached_spi_settings().unwrap().bytes_per_transaction, 2);
}

#[test]
fn test_failure_status_is_an_error_with_partial_data() {
    let mut initial = DeviceState::new();
    initial
        .spi_script
        .push_back(SpiReply::in_progress(&[0xDE, 0xAD]));
    initial.spi_script.push_back(SpiReply::failed(0xF7));
    let (device, _state) = open_mock(initial);

    match device.transfer(&[0u8; 4]) {
        Err(Error::SpiTransferFailed { status, received }) => {
            assert_eq!(status, SpiStatus::BusUnavailable);
            assert_eq!(received, vec![0xDE, 0xAD]);
        }
        other => panic!("expected SpiTransferFailed, got {:?}", other),
    }
}

#[test]
fn test_busy_engine_on_first_command() {
    let mut initial = DeviceState::new();
    initial.spi_script.push_back(SpiReply::failed(0xF8));
    let (device, state) = open_mock(initial);

    let err = device.transfer(&[0u8; 4]).unwrap_err();

    assert!(matches!(
        err,
        Error::SpiTransferFailed {
            status: SpiStatus::TransferInProgress,
            ..
        }
    ));
    assert_eq!(state.lock().unwrap().writes_with_opcode(0x42).len(), 1);
}

#[test]
fn test_bogus_byte_count_is_rejected() {
    let mut initial = DeviceState::new();
    let mut reply = SpiReply::finished(&[]);
    reply.claimed_len = Some(61);
    initial.spi_script.push_back(reply);
    let (device, _state) = open_mock(initial);

    assert!(matches!(
        device.transfer(&[0u8; 4]),
        Err(Error::InvalidReport(61))
    ));
}

#[test]
fn test_settings_round_trip_through_device() {
    let (device, state) = open_mock(DeviceState::new());
    let settings = SpiTransferSettings {
        bit_rate: 12_000_000,
        bytes_per_transaction: 8,
        mode: SpiMode::Mode3,
        ..Default::default()
    };

    let echoed = device.set_spi_settings(&settings).unwrap();

    assert_eq!(echoed, settings);
    assert_eq!(device.spi_settings().unwrap(), settings);
    assert_eq!(state.lock().unwrap().spi_settings[16], 3);
}

#[test]
fn test_rejected_reconfiguration_sends_no_data() {
    let mut initial = DeviceState::new();
    initial.spi_settings_status = Some(0xF8);
    let (device, state) = open_mock(initial);

    assert!(matches!(
        device.transfer(&[1, 2]),
        Err(Error::CommandFailed {
            opcode: 0x40,
            status: 0xF8
        })
    ));
    let state = state.lock().unwrap();
    assert_eq!(state.writes_with_opcode(0x40).len(), 1);
    assert!(state.writes_with_opcode(0x42).is_empty());
}

#[test]
fn test_ignored_length_aborts_before_data() {
    let mut initial = DeviceState::new();
    initial.fixed_bytes_per_transaction = Some(4);
    let (device, state) = open_mock(initial);

    assert!(matches!(
        device.transfer(&[1, 2]),
        Err(Error::SpiLengthNotApplied {
            requested: 2,
            applied: 4
        })
    ));
    assert!(state.lock().unwrap().writes_with_opcode(0x42).is_empty());
}
