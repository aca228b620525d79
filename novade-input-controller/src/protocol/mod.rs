//! The `ivi_input` control protocol: requests from control clients, events
//! broadcast to them, and the wire codec that frames both.

pub mod wire;

use crate::device::DeviceClass;
use crate::host::SurfaceId;

/// Interface name of the control global.
pub const INTERFACE_NAME: &str = "ivi_input";

/// Highest interface version implemented here.
pub const INTERFACE_VERSION: u32 = 1;

/// Requests a control client may issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerRequest {
    /// Set or clear focus for `devices` on `surface`.
    SetInputFocus { surface: SurfaceId, devices: DeviceClass, enabled: bool },
    /// Add or remove `seat` from the seats `surface` accepts input from.
    SetInputAcceptance { surface: SurfaceId, seat: String, accepted: bool },
}

/// Events broadcast to every bound control client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    SeatCapabilities { seat: String, capabilities: DeviceClass },
    SeatCreated { seat: String, capabilities: DeviceClass },
    SeatDestroyed { seat: String },
    InputFocus { surface: SurfaceId, devices: DeviceClass, enabled: bool },
    InputAcceptance { surface: SurfaceId, seat: String, accepted: bool },
}

impl ControllerEvent {
    /// Wire opcode of this event.
    pub fn opcode(&self) -> u16 {
        match self {
            ControllerEvent::SeatCapabilities { .. } => wire::EVT_SEAT_CAPABILITIES,
            ControllerEvent::SeatCreated { .. } => wire::EVT_SEAT_CREATED,
            ControllerEvent::SeatDestroyed { .. } => wire::EVT_SEAT_DESTROYED,
            ControllerEvent::InputFocus { .. } => wire::EVT_INPUT_FOCUS,
            ControllerEvent::InputAcceptance { .. } => wire::EVT_INPUT_ACCEPTANCE,
        }
    }
}

impl ControllerRequest {
    pub fn opcode(&self) -> u16 {
        match self {
            ControllerRequest::SetInputFocus { .. } => wire::REQ_SET_INPUT_FOCUS,
            ControllerRequest::SetInputAcceptance { .. } => wire::REQ_SET_INPUT_ACCEPTANCE,
        }
    }
}
