//! Bound control clients and event fan-out.

use std::fmt;

use crate::error::InputError;
use crate::protocol::ControllerEvent;
use crate::seat::SeatRegistry;
use crate::surface::AcceptanceTable;

/// Opaque handle for a bound control client, unique per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

impl ClientId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Receiving end of a control client's protocol resource.
///
/// Delivery is fire-and-forget: there is no acknowledgement and a client
/// cannot push back.
pub trait ControllerClient {
    fn send(&mut self, event: &ControllerEvent);
}

/// Registry of bound clients, kept in registration order.
pub struct ControllerBroadcast {
    clients: Vec<(ClientId, Box<dyn ControllerClient>)>,
    next_id: u64,
}

impl fmt::Debug for ControllerBroadcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerBroadcast")
            .field("clients", &self.clients.iter().map(|(id, _)| *id).collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Default for ControllerBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerBroadcast {
    pub fn new() -> Self {
        Self { clients: Vec::new(), next_id: 1 }
    }

    /// Registers `client` and replays the current state to it: every seat,
    /// then the focus mask of every surface, then every accepted seat of
    /// every surface. The replay reaches the new client only and completes
    /// before this returns, so it precedes any later live event.
    pub fn bind(
        &mut self,
        mut client: Box<dyn ControllerClient>,
        seats: &SeatRegistry,
        surfaces: &AcceptanceTable,
    ) -> Result<ClientId, InputError> {
        if self.clients.try_reserve(1).is_err() {
            tracing::error!("Failed to allocate memory for control client");
            return Err(InputError::ResourceExhausted("binding control client".to_string()));
        }
        let id = ClientId(self.next_id);
        self.next_id += 1;

        for seat in seats.iter() {
            client.send(&ControllerEvent::SeatCreated {
                seat: seat.name().to_string(),
                capabilities: seat.capabilities(),
            });
        }
        for surface in surfaces.iter() {
            client.send(&ControllerEvent::InputFocus {
                surface: surface.id(),
                devices: surface.focus(),
                enabled: true,
            });
        }
        for surface in surfaces.iter() {
            for seat in surface.accepted_seats().iter() {
                client.send(&ControllerEvent::InputAcceptance {
                    surface: surface.id(),
                    seat: seat.to_string(),
                    accepted: true,
                });
            }
        }

        self.clients.push((id, client));
        tracing::debug!(
            "Bound {} (replayed {} seat(s), {} surface(s))",
            id,
            seats.len(),
            surfaces.len()
        );
        Ok(id)
    }

    /// Forgets `id`. Seat and surface state is untouched.
    pub fn unbind(&mut self, id: ClientId) -> Result<(), InputError> {
        match self.clients.iter().position(|(client_id, _)| *client_id == id) {
            Some(index) => {
                self.clients.remove(index);
                tracing::debug!("Unbound {}", id);
                Ok(())
            }
            None => {
                tracing::warn!("Unbind of unknown {}", id);
                Err(InputError::UnknownClient(id))
            }
        }
    }

    pub fn broadcast(&mut self, event: &ControllerEvent) {
        tracing::trace!("Broadcasting {:?} to {} client(s)", event, self.clients.len());
        for (_, client) in &mut self.clients {
            client.send(event);
        }
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.iter().any(|(client_id, _)| *client_id == id)
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }
}
