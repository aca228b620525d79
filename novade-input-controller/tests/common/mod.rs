//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use novade_input_controller::{
    ControllerClient, ControllerEvent, DeviceClaim, DeviceClass, DeviceOwnership, InputController, InputHost,
    SeatSnapshot, SurfaceId,
};
use novade_input_core::ControllerConfig;

/// Client that records every event it receives. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingClient {
    events: Rc<RefCell<Vec<ControllerEvent>>>,
}

impl RecordingClient {
    pub fn take(&self) -> Vec<ControllerEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn events(&self) -> Vec<ControllerEvent> {
        self.events.borrow().clone()
    }
}

impl ControllerClient for RecordingClient {
    fn send(&mut self, event: &ControllerEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// What the fake host was asked to do with device ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipCall {
    Claim(String, DeviceClass),
    Release(String, DeviceClass),
}

/// Host with a fixed seat list whose surface handles are plain ids.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub seats: Vec<SeatSnapshot>,
    pub calls: Rc<RefCell<Vec<OwnershipCall>>>,
    next_token: u64,
}

impl FakeHost {
    pub fn with_seats(seats: Vec<SeatSnapshot>) -> Self {
        Self { seats, ..Default::default() }
    }
}

impl DeviceOwnership for FakeHost {
    fn claim_device(&mut self, seat: &str, class: DeviceClass) -> Option<DeviceClaim> {
        self.next_token += 1;
        self.calls.borrow_mut().push(OwnershipCall::Claim(seat.to_string(), class));
        Some(DeviceClaim::new(seat, class, self.next_token))
    }

    fn release_device(&mut self, claim: DeviceClaim) {
        self.calls
            .borrow_mut()
            .push(OwnershipCall::Release(claim.seat().to_string(), claim.class()));
    }
}

impl InputHost for FakeHost {
    type Surface = SurfaceId;

    fn surface_id(&self, surface: &SurfaceId) -> SurfaceId {
        *surface
    }

    fn seats(&self) -> Vec<SeatSnapshot> {
        self.seats.clone()
    }
}

/// Controller with default configuration, plus one client bound before
/// anything else happened.
pub fn controller_with_client() -> (InputController<FakeHost>, RecordingClient) {
    let mut controller = InputController::new(FakeHost::default(), &ControllerConfig::default());
    let client = RecordingClient::default();
    controller.bind_client(Box::new(client.clone())).expect("bind client");
    (controller, client)
}

pub fn acceptance(surface: u32, seat: &str, accepted: bool) -> ControllerEvent {
    ControllerEvent::InputAcceptance { surface: SurfaceId(surface), seat: seat.to_string(), accepted }
}

pub fn focus(surface: u32, devices: DeviceClass, enabled: bool) -> ControllerEvent {
    ControllerEvent::InputFocus { surface: SurfaceId(surface), devices, enabled }
}
