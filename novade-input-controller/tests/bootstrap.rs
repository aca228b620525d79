mod common;

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;

use common::{acceptance, focus, FakeHost, OwnershipCall, RecordingClient};
use novade_input_controller::protocol::wire::{decode_event, encode_request};
use novade_input_controller::{
    ControllerEvent, ControllerModule, ControllerRequest, DeviceClass, HostSignals, SeatSnapshot, SurfaceId,
    WireClient,
};
use novade_input_core::{ConfigLoader, CoreConfig};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn decode_all(mut bytes: &[u8]) -> Vec<ControllerEvent> {
    let mut events = Vec::new();
    while !bytes.is_empty() {
        let framed = decode_event(bytes).expect("well-formed event");
        events.push(framed.message);
        bytes = &bytes[framed.size..];
    }
    events
}

#[test]
fn test_wire_client_session() {
    let host = FakeHost::with_seats(vec![SeatSnapshot::new("seat0").with_devices(1, 1, 0)]);
    let mut controller = ControllerModule::load(host, &CoreConfig::default()).unwrap();
    controller.create_surface(SurfaceId(20)).unwrap();
    controller.create_surface(SurfaceId(21)).unwrap();

    let (client, outbox) = WireClient::new(12);
    let id = controller.bind_client(Box::new(client)).unwrap();
    assert_eq!(
        decode_all(&outbox.take()),
        vec![
            ControllerEvent::SeatCreated {
                seat: "seat0".to_string(),
                capabilities: DeviceClass::KEYBOARD | DeviceClass::POINTER,
            },
            focus(20, DeviceClass::empty(), true),
            focus(21, DeviceClass::empty(), true),
            acceptance(20, "default", true),
            acceptance(21, "default", true),
        ]
    );

    let mut requests = Vec::new();
    for request in [
        ControllerRequest::SetInputFocus { surface: SurfaceId(21), devices: DeviceClass::POINTER, enabled: true },
        ControllerRequest::SetInputAcceptance { surface: SurfaceId(20), seat: "default".to_string(), accepted: false },
        // Duplicate: no event.
        ControllerRequest::SetInputAcceptance { surface: SurfaceId(21), seat: "default".to_string(), accepted: true },
    ] {
        encode_request(&mut requests, 12, &request).unwrap();
    }
    assert_eq!(controller.dispatch_wire(id, &requests).unwrap(), 3);

    assert_eq!(
        decode_all(&outbox.take()),
        vec![
            focus(21, DeviceClass::POINTER, true),
            focus(20, DeviceClass::POINTER, false),
            acceptance(20, "default", false),
        ]
    );
    assert_eq!(controller.accepted_seats(SurfaceId(20)).unwrap(), Vec::<String>::new());
}

#[test]
fn test_host_signals_reach_attached_controller() {
    let host = FakeHost::default();
    let calls = host.calls.clone();
    let controller = Rc::new(RefCell::new(ControllerModule::load(host, &CoreConfig::default()).unwrap()));
    let client = RecordingClient::default();
    controller.borrow_mut().bind_client(Box::new(client.clone())).unwrap();

    let signals: HostSignals<SurfaceId> = HostSignals::new();
    let attachment = ControllerModule::attach(&controller, &signals);

    let seat = SeatSnapshot::new("seat0").with_devices(0, 0, 1);
    signals.seat_created.emit(&seat);
    signals.surface_created.emit(&SurfaceId(8));
    signals.surface_created.emit(&SurfaceId(8));
    signals.seat_removed.emit(&seat);
    signals.surface_removed.emit(&SurfaceId(8));

    assert_eq!(
        client.take(),
        vec![
            ControllerEvent::SeatCreated { seat: "seat0".to_string(), capabilities: DeviceClass::TOUCH },
            acceptance(8, "default", true),
            ControllerEvent::SeatDestroyed { seat: "seat0".to_string() },
        ]
    );
    assert_eq!(
        *calls.borrow(),
        vec![
            OwnershipCall::Claim("seat0".to_string(), DeviceClass::TOUCH),
            OwnershipCall::Release("seat0".to_string(), DeviceClass::TOUCH),
        ]
    );
    assert!(controller.borrow().surface_ids().is_empty());

    drop(attachment);
    signals.surface_created.emit(&SurfaceId(9));
    assert!(controller.borrow().surface_ids().is_empty());
}

#[test]
fn test_configuration_controls_default_seat_and_claims() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("input-controller.toml");
    fs::write(
        &path,
        "[controller]\ndefault_accepted_seat = \"seat0\"\nclaim_devices = false\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();
    let config = ConfigLoader::load_from_path(&path).unwrap();

    let host = FakeHost::with_seats(vec![SeatSnapshot::new("seat0").with_devices(1, 1, 1)]);
    let calls = host.calls.clone();
    let mut controller = ControllerModule::load(host, &config).unwrap();
    controller.create_surface(SurfaceId(1)).unwrap();

    assert_eq!(controller.accepted_seats(SurfaceId(1)).unwrap(), vec!["seat0"]);
    assert_eq!(controller.seat_capabilities("seat0"), Some(DeviceClass::all()));
    assert_eq!(controller.claims_for("seat0"), Some(DeviceClass::empty()));
    assert!(calls.borrow().is_empty());
}
