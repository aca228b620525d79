//! The input controller context.
//!
//! [`InputController`] owns the seat registry, the acceptance table (which
//! also carries per-surface focus) and the set of bound clients. Host
//! notifications and client requests enter through its methods; each call
//! runs to completion and broadcasts its resulting events before returning.

use novade_input_core::ControllerConfig;

use crate::broadcast::{ClientId, ControllerBroadcast, ControllerClient};
use crate::device::DeviceClass;
use crate::error::InputError;
use crate::focus::FocusArbiter;
use crate::host::{InputHost, SeatSnapshot, SurfaceId};
use crate::protocol::wire;
use crate::protocol::ControllerRequest;
use crate::seat::SeatRegistry;
use crate::surface::AcceptanceTable;

pub struct InputController<H: InputHost> {
    host: H,
    seats: SeatRegistry,
    surfaces: AcceptanceTable,
    broadcast: ControllerBroadcast,
}

impl<H: InputHost> std::fmt::Debug for InputController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputController")
            .field("seats", &self.seats)
            .field("surfaces", &self.surfaces)
            .field("broadcast", &self.broadcast)
            .finish_non_exhaustive()
    }
}

impl<H: InputHost> InputController<H> {
    pub fn new(host: H, config: &ControllerConfig) -> Self {
        Self {
            host,
            seats: SeatRegistry::new(config.claim_devices),
            surfaces: AcceptanceTable::new(config.default_accepted_seat.clone()),
            broadcast: ControllerBroadcast::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // Seat notifications.

    pub fn on_seat_appeared(&mut self, seat: &SeatSnapshot) -> Result<(), InputError> {
        self.seats.on_seat_appeared(seat, &mut self.host, &mut self.broadcast)
    }

    pub fn on_seat_capability_changed(&mut self, seat: &SeatSnapshot) -> Result<(), InputError> {
        self.seats.on_seat_capability_changed(seat, &mut self.host, &mut self.broadcast)
    }

    pub fn on_seat_removed(&mut self, seat: &SeatSnapshot) -> Result<(), InputError> {
        self.seats.on_seat_removed(seat, &mut self.host, &mut self.broadcast)
    }

    // Surface notifications.

    pub fn on_surface_created(&mut self, surface: &H::Surface) -> Result<(), InputError> {
        let id = self.host.surface_id(surface);
        self.create_surface(id)
    }

    pub fn on_surface_removed(&mut self, surface: &H::Surface) -> Result<(), InputError> {
        let id = self.host.surface_id(surface);
        self.destroy_surface(id)
    }

    pub fn create_surface(&mut self, id: SurfaceId) -> Result<(), InputError> {
        self.surfaces.create_surface(id, &mut self.broadcast)
    }

    pub fn destroy_surface(&mut self, id: SurfaceId) -> Result<(), InputError> {
        self.surfaces.destroy_surface(id)
    }

    // Control requests.

    pub fn set_input_focus(&mut self, id: SurfaceId, devices: DeviceClass, enabled: bool) -> Result<(), InputError> {
        FocusArbiter::set_focus(&mut self.surfaces, id, devices, enabled, &mut self.broadcast)
    }

    pub fn set_input_acceptance(&mut self, id: SurfaceId, seat: &str, accepted: bool) -> Result<(), InputError> {
        self.surfaces.set_acceptance(id, seat, accepted, &mut self.broadcast)
    }

    // Clients.

    /// Registers `client` and replays the current state to it.
    pub fn bind_client(&mut self, client: Box<dyn ControllerClient>) -> Result<ClientId, InputError> {
        self.broadcast.bind(client, &self.seats, &self.surfaces)
    }

    pub fn unbind_client(&mut self, id: ClientId) -> Result<(), InputError> {
        self.broadcast.unbind(id)
    }

    /// Applies a request issued by `client`. Requests from clients that are
    /// not bound are dropped.
    pub fn handle_request(&mut self, client: ClientId, request: ControllerRequest) -> Result<(), InputError> {
        if !self.broadcast.contains(client) {
            tracing::warn!("Request {:?} from unknown {} dropped", request, client);
            return Err(InputError::UnknownClient(client));
        }
        tracing::debug!("{} requested {:?}", client, request);
        match request {
            ControllerRequest::SetInputFocus { surface, devices, enabled } => {
                self.set_input_focus(surface, devices, enabled)
            }
            ControllerRequest::SetInputAcceptance { surface, seat, accepted } => {
                self.set_input_acceptance(surface, &seat, accepted)
            }
        }
    }

    /// Decodes and applies every framed request in `bytes`, returning how
    /// many frames were decoded.
    ///
    /// Failures of individual requests are already logged and do not stop
    /// the loop. A malformed frame stops decoding: it and everything after it
    /// is dropped, and the decode error is returned.
    pub fn dispatch_wire(&mut self, client: ClientId, bytes: &[u8]) -> Result<usize, InputError> {
        let mut offset = 0;
        let mut decoded = 0;
        while offset < bytes.len() {
            let framed = match wire::decode_request(&bytes[offset..]) {
                Ok(framed) => framed,
                Err(e) => {
                    tracing::warn!(
                        "Malformed request from {} at byte {}: {}. Dropping {} byte(s)",
                        client,
                        offset,
                        e,
                        bytes.len() - offset
                    );
                    return Err(e.into());
                }
            };
            offset += framed.size;
            decoded += 1;
            if let Err(e) = self.handle_request(client, framed.message) {
                tracing::debug!("Request from {} had no effect: {}", client, e);
            }
        }
        Ok(decoded)
    }

    // Queries.

    pub fn seat_names(&self) -> Vec<String> {
        self.seats.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn seat_capabilities(&self, name: &str) -> Option<DeviceClass> {
        self.seats.get(name).map(|s| s.capabilities())
    }

    /// Device classes currently claimed for the seat `name`.
    pub fn claims_for(&self, name: &str) -> Option<DeviceClass> {
        self.seats.get(name).map(|s| s.claimed())
    }

    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        self.surfaces.iter().map(|s| s.id()).collect()
    }

    pub fn surface_focus(&self, id: SurfaceId) -> Option<DeviceClass> {
        self.surfaces.get(id).map(|s| s.focus())
    }

    /// Accepted seats of `id`, in insertion order.
    pub fn accepted_seats(&self, id: SurfaceId) -> Option<Vec<String>> {
        self.surfaces
            .get(id)
            .map(|s| s.accepted_seats().iter().map(str::to_string).collect())
    }

    pub fn client_count(&self) -> usize {
        self.broadcast.client_count()
    }
}

impl<H: InputHost> Drop for InputController<H> {
    fn drop(&mut self) {
        self.seats.release_all(&mut self.host);
    }
}
