//! Per-surface input acceptance.
//!
//! The [`AcceptanceTable`] owns one [`SurfaceEntry`] per tracked surface. An
//! entry holds the ordered set of seat names allowed to target the surface
//! and the surface's focus mask (which the focus arbiter edits in place).

use std::collections::TryReserveError;

use crate::broadcast::ControllerBroadcast;
use crate::device::DeviceClass;
use crate::error::InputError;
use crate::host::SurfaceId;
use crate::protocol::ControllerEvent;

/// Why [`AcceptedSeats::insert`] refused a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    Duplicate,
    OutOfMemory,
}

impl From<TryReserveError> for InsertError {
    fn from(_: TryReserveError) -> Self {
        InsertError::OutOfMemory
    }
}

/// Insertion-ordered set of seat names.
///
/// Names are unique; iteration yields them in the order they were first
/// inserted, and removal keeps the relative order of the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedSeats {
    names: Vec<String>,
}

impl AcceptedSeats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Appends `name`. Both allocations are made before anything is
    /// modified, so a failure leaves the set untouched.
    pub fn insert(&mut self, name: &str) -> Result<(), InsertError> {
        if self.contains(name) {
            return Err(InsertError::Duplicate);
        }
        let mut owned = String::new();
        owned.try_reserve_exact(name.len())?;
        owned.push_str(name);
        self.names.try_reserve(1)?;
        self.names.push(owned);
        Ok(())
    }

    /// Removes `name`, shifting later entries down. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.names.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Input state for one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceEntry {
    id: SurfaceId,
    /// One bit per device class currently focused on this surface.
    pub(crate) focus: DeviceClass,
    accepted: AcceptedSeats,
}

impl SurfaceEntry {
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn focus(&self) -> DeviceClass {
        self.focus
    }

    pub fn accepted_seats(&self) -> &AcceptedSeats {
        &self.accepted
    }
}

/// Tracked surfaces, in creation order.
///
/// Lookups are linear; the number of surfaces on an IVI display is small and
/// an explicit order keeps replay to late-bound clients deterministic.
#[derive(Debug)]
pub struct AcceptanceTable {
    surfaces: Vec<SurfaceEntry>,
    default_seat: String,
}

impl AcceptanceTable {
    /// `default_seat` is the name every new surface accepts.
    pub fn new(default_seat: impl Into<String>) -> Self {
        Self { surfaces: Vec::new(), default_seat: default_seat.into() }
    }

    pub fn default_seat(&self) -> &str {
        &self.default_seat
    }

    pub fn get(&self, id: SurfaceId) -> Option<&SurfaceEntry> {
        self.surfaces.iter().find(|s| s.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: SurfaceId) -> Option<&mut SurfaceEntry> {
        self.surfaces.iter_mut().find(|s| s.id == id)
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SurfaceEntry> + '_ {
        self.surfaces.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut SurfaceEntry> + '_ {
        self.surfaces.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Starts tracking `id` with only the default seat accepted, and tells
    /// every client about that acceptance.
    pub fn create_surface(&mut self, id: SurfaceId, broadcast: &mut ControllerBroadcast) -> Result<(), InputError> {
        if self.contains(id) {
            tracing::warn!("Surface context already created for surface {}", id);
            return Err(InputError::SurfaceAlreadyTracked(id));
        }

        let mut accepted = AcceptedSeats::new();
        if accepted.insert(&self.default_seat).is_err() {
            tracing::error!("Failed to allocate accepted seats for surface {}", id);
            return Err(InputError::ResourceExhausted(format!("creating surface {}", id)));
        }
        if self.surfaces.try_reserve(1).is_err() {
            tracing::error!("Failed to allocate tracking entry for surface {}", id);
            return Err(InputError::ResourceExhausted(format!("creating surface {}", id)));
        }
        self.surfaces.push(SurfaceEntry { id, focus: DeviceClass::empty(), accepted });
        tracing::debug!("Tracking surface {} (accepts '{}')", id, self.default_seat);

        broadcast.broadcast(&ControllerEvent::InputAcceptance {
            surface: id,
            seat: self.default_seat.clone(),
            accepted: true,
        });
        Ok(())
    }

    /// Stops tracking `id`. Nothing is broadcast.
    pub fn destroy_surface(&mut self, id: SurfaceId) -> Result<(), InputError> {
        match self.surfaces.iter().position(|s| s.id == id) {
            Some(index) => {
                let entry = self.surfaces.remove(index);
                tracing::debug!(
                    "Surface {} destroyed, released {} accepted seat(s)",
                    id,
                    entry.accepted.len()
                );
                Ok(())
            }
            None => {
                tracing::warn!("Surface {} already destroyed", id);
                Err(InputError::SurfaceNotFound(id))
            }
        }
    }

    pub fn add_accepted_seat(&mut self, id: SurfaceId, name: &str) -> Result<(), InputError> {
        let entry = self.get_mut(id).ok_or(InputError::SurfaceNotFound(id))?;
        match entry.accepted.insert(name) {
            Ok(()) => Ok(()),
            Err(InsertError::Duplicate) => {
                tracing::warn!("Seat '{}' is already accepted by surface {}", name, id);
                Err(InputError::SeatAlreadyAccepted { surface: id, seat: name.to_string() })
            }
            Err(InsertError::OutOfMemory) => {
                tracing::error!("Failed to expand accepted seats of surface {} for '{}'", id, name);
                Err(InputError::ResourceExhausted(format!("accepting seat on surface {}", id)))
            }
        }
    }

    pub fn remove_accepted_seat(&mut self, id: SurfaceId, name: &str) -> Result<(), InputError> {
        let entry = self.get_mut(id).ok_or(InputError::SurfaceNotFound(id))?;
        if entry.accepted.remove(name) {
            Ok(())
        } else {
            tracing::warn!("Seat '{}' not found for surface {}", name, id);
            Err(InputError::SeatNotAccepted { surface: id, seat: name.to_string() })
        }
    }

    /// Request entry point for `set_input_acceptance`.
    ///
    /// Broadcasts only when the set actually changed.
    pub fn set_acceptance(
        &mut self,
        id: SurfaceId,
        name: &str,
        accepted: bool,
        broadcast: &mut ControllerBroadcast,
    ) -> Result<(), InputError> {
        if !self.contains(id) {
            tracing::warn!("Acceptance request for unknown surface {} dropped", id);
            return Err(InputError::SurfaceNotFound(id));
        }

        if accepted {
            self.add_accepted_seat(id, name)?;
        } else {
            self.remove_accepted_seat(id, name)?;
        }

        broadcast.broadcast(&ControllerEvent::InputAcceptance {
            surface: id,
            seat: name.to_string(),
            accepted,
        });
        Ok(())
    }
}
