//! Unit tests for frame dispatch and outgoing encodings.
extern crate std;

use super::*;
use std::collections::VecDeque;
use std::string::{String, ToString};
use std::vec;
use std::vec::Vec;

#[derive(Debug, PartialEq)]
enum Call {
    Ping(String),
    Pong(String),
    Float(f32),
    RemoteInt,
    Int(i32),
}

/// Notification double recording every call.
#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Notifications for Recorder {
    fn on_ping(&mut self, text: &str) {
        self.calls.push(Call::Ping(text.to_string()));
    }

    fn on_pong(&mut self, text: &str) {
        self.calls.push(Call::Pong(text.to_string()));
    }

    fn on_float_sample(&mut self, value: f32) {
        self.calls.push(Call::Float(value));
    }

    fn on_remote_int_requested(&mut self) {
        self.calls.push(Call::RemoteInt);
    }

    fn on_int_value(&mut self, value: i32) {
        self.calls.push(Call::Int(value));
    }
}

#[derive(Default)]
struct QueueBus {
    rx: VecDeque<CanFrame>,
    sent: Vec<CanFrame>,
}

impl CanBus for QueueBus {
    type Error = ();

    fn send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        self.sent.push(frame.clone());
        Ok(())
    }

    fn poll_recv(&mut self) -> Option<CanFrame> {
        self.rx.pop_front()
    }

    fn bus_status(&mut self) -> BusStatus {
        BusStatus::default()
    }
}

fn data(device: u8, kind: MessageKind, payload: &[u8]) -> CanFrame {
    CanFrame::new_data(CompoundId::new(DeviceId(device), kind), payload).unwrap()
}

//==================================================================================DISPATCH
#[test]
/// A Ping "Hi" triggers exactly one `on_ping("Hi")` and nothing else.
fn test_ping_dispatch() {
    let mut recorder = Recorder::default();
    let kind = dispatch(&data(4, MessageKind::Ping, b"Hi"), &mut recorder).unwrap();

    assert_eq!(kind, MessageKind::Ping);
    assert_eq!(recorder.calls, vec![Call::Ping("Hi".to_string())]);
}

#[test]
fn test_pong_dispatch() {
    let mut recorder = Recorder::default();
    dispatch(&data(4, MessageKind::Pong, b"Pong"), &mut recorder).unwrap();
    assert_eq!(recorder.calls, vec![Call::Pong("Pong".to_string())]);
}

#[test]
/// Text never reads past the DLC even if the buffer holds more bytes.
fn test_text_stops_at_dlc() {
    let mut frame = data(1, MessageKind::Ping, b"PingPong");
    frame.len = 4;

    let mut recorder = Recorder::default();
    dispatch(&frame, &mut recorder).unwrap();
    assert_eq!(recorder.calls, vec![Call::Ping("Ping".to_string())]);
}

#[test]
fn test_float_dispatch() {
    let mut recorder = Recorder::default();
    let frame = data(2, MessageKind::FloatSample, &2.5f32.to_le_bytes());
    dispatch(&frame, &mut recorder).unwrap();
    assert_eq!(recorder.calls, vec![Call::Float(2.5)]);
}

#[test]
/// The remote flag, not the payload, separates request from value.
fn test_remote_int_branches_on_frame_type() {
    let mut recorder = Recorder::default();

    let request = CanFrame::new_request(CompoundId::new(DeviceId(2), MessageKind::IntRequest));
    assert_eq!(
        dispatch(&request, &mut recorder),
        Ok(MessageKind::IntRequest)
    );

    let value = data(2, MessageKind::IntValue, &1234i32.to_le_bytes());
    assert_eq!(dispatch(&value, &mut recorder), Ok(MessageKind::IntValue));

    assert_eq!(recorder.calls, vec![Call::RemoteInt, Call::Int(1234)]);
}

#[test]
/// Unknown kinds are reported and no notification fires.
fn test_unknown_kind_is_dropped() {
    let mut recorder = Recorder::default();
    let frame = CanFrame::new_data(CompoundId(0x1177), &[1, 2]).unwrap();

    assert_eq!(
        dispatch(&frame, &mut recorder),
        Err(DispatchError::UnknownKind { id: 0x1177, len: 2 })
    );
    assert!(recorder.calls.is_empty());
}

#[test]
fn test_short_float_is_dropped() {
    let mut recorder = Recorder::default();
    let frame = data(3, MessageKind::FloatSample, &[0, 0]);

    assert_eq!(
        dispatch(&frame, &mut recorder),
        Err(DispatchError::InvalidDataLen {
            kind: MessageKind::FloatSample,
            expected: 4,
            actual: 2
        })
    );
    assert!(recorder.calls.is_empty());
}

fn remote(raw: u32, dlc: usize) -> CanFrame {
    let id = embedded_can::ExtendedId::new(raw).unwrap();
    let frame = <CanFrame as embedded_can::Frame>::new_remote(id, dlc).unwrap();
    CanFrame::from_frame(&frame).unwrap()
}

#[test]
/// Remote frames with a Ping, Pong, or float code are dropped instead of
/// being decoded from bytes that were never sent.
fn test_remote_frame_for_data_kind_is_dropped() {
    let mut recorder = Recorder::default();

    assert_eq!(
        dispatch(&remote(0x4201, 4), &mut recorder),
        Err(DispatchError::UnexpectedRemote {
            kind: MessageKind::Ping,
            id: 0x4201
        })
    );
    assert_eq!(
        dispatch(&remote(0x4202, 4), &mut recorder),
        Err(DispatchError::UnexpectedRemote {
            kind: MessageKind::Pong,
            id: 0x4202
        })
    );
    assert_eq!(
        dispatch(&remote(0x4203, 4), &mut recorder),
        Err(DispatchError::UnexpectedRemote {
            kind: MessageKind::FloatSample,
            id: 0x4203
        })
    );
    assert!(recorder.calls.is_empty());

    // A remote integer request with a non-zero DLC is still a request.
    assert_eq!(
        dispatch(&remote(0x4204, 4), &mut recorder),
        Ok(MessageKind::IntRequest)
    );
    assert_eq!(recorder.calls, vec![Call::RemoteInt]);
}

//==================================================================================DEVICE
#[test]
/// Queued frames are dispatched in delivery order; bad ones are counted.
fn test_poll_drains_in_order() {
    let mut bus = QueueBus::default();
    bus.rx.push_back(data(1, MessageKind::Ping, b"a"));
    bus.rx.push_back(CanFrame::new_data(CompoundId(0x0142), &[]).unwrap());
    bus.rx.push_back(data(1, MessageKind::Pong, b"b"));

    let mut device = AppDevice::new(bus, DeviceId(9));
    let mut recorder = Recorder::default();
    let summary = device.poll(&mut recorder);

    assert_eq!(
        summary,
        PollSummary {
            dispatched: 2,
            dropped: 1
        }
    );
    assert_eq!(
        recorder.calls,
        vec![Call::Ping("a".to_string()), Call::Pong("b".to_string())]
    );
    assert!(device.bus_mut().rx.is_empty());
}

#[test]
/// Outgoing frames carry this device's identity and little-endian payloads.
fn test_outgoing_encodings() {
    let mut device = AppDevice::new(QueueBus::default(), DeviceId(0x21));

    device.send_pong("Pong").unwrap();
    device.send_float(-1.0).unwrap();
    device.send_int(1234).unwrap();
    device.send_ping("a rather long text").unwrap();

    let sent = device.into_inner().sent;
    assert_eq!(sent[0], data(0x21, MessageKind::Pong, b"Pong"));
    assert_eq!(
        sent[1],
        data(0x21, MessageKind::FloatSample, &(-1.0f32).to_le_bytes())
    );
    assert_eq!(sent[2].id, CompoundId(0x2104));
    assert!(!sent[2].remote);
    assert_eq!(sent[2].payload(), &[0xD2, 0x04, 0, 0]);
    // Truncated to the classic CAN capacity.
    assert_eq!(sent[3].payload(), b"a rather");
}

#[test]
/// Remote requests target the given device and carry no payload.
fn test_request_remote_int() {
    let mut device = AppDevice::new(QueueBus::default(), DeviceId(0x21));
    device.request_remote_int(DeviceId(0x42)).unwrap();

    let sent = device.into_inner().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, CompoundId(0x4204));
    assert!(sent[0].remote);
    assert_eq!(sent[0].len, 0);
    assert_eq!(sent[0].kind(), Some(MessageKind::IntRequest));
}

#[test]
fn test_set_device_id() {
    let mut device = AppDevice::new(QueueBus::default(), DeviceId(1));
    device.set_device_id(DeviceId(2));
    assert_eq!(device.device_id(), DeviceId(2));
}
