//! Live input seats and the device ownership claimed on their behalf.

use crate::broadcast::ControllerBroadcast;
use crate::device::DeviceClass;
use crate::error::InputError;
use crate::host::{DeviceClaim, DeviceOwnership, SeatSnapshot};
use crate::protocol::ControllerEvent;

/// Device classes in the order claims are attempted.
const CLAIM_ORDER: [DeviceClass; 3] = [DeviceClass::KEYBOARD, DeviceClass::POINTER, DeviceClass::TOUCH];

/// Tracking entry for one seat.
#[derive(Debug)]
pub struct SeatEntry {
    name: String,
    capabilities: DeviceClass,
    claims: Vec<DeviceClaim>,
}

impl SeatEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capabilities as computed from the most recent snapshot of this seat.
    pub fn capabilities(&self) -> DeviceClass {
        self.capabilities
    }

    /// Union of the device classes currently claimed for this seat.
    pub fn claimed(&self) -> DeviceClass {
        self.claims.iter().fold(DeviceClass::empty(), |acc, c| acc | c.class())
    }

    /// Claims every class in `capabilities` not yet held. A refused claim is
    /// retried on the next capability change.
    fn claim_missing(&mut self, capabilities: DeviceClass, owner: &mut dyn DeviceOwnership) {
        for class in CLAIM_ORDER {
            if !capabilities.contains(class) || self.claimed().contains(class) {
                continue;
            }
            if self.claims.try_reserve(1).is_err() {
                tracing::error!("Failed to allocate {} claim slot for seat '{}'", class, self.name);
                continue;
            }
            match owner.claim_device(&self.name, class) {
                Some(claim) => {
                    tracing::debug!("Claimed {} devices of seat '{}'", class, self.name);
                    self.claims.push(claim);
                }
                None => {
                    tracing::warn!("Host refused {} device claim for seat '{}'", class, self.name);
                }
            }
        }
    }

    fn release_claims(&mut self, owner: &mut dyn DeviceOwnership) {
        for claim in self.claims.drain(..) {
            tracing::debug!("Releasing {} devices of seat '{}'", claim.class(), self.name);
            owner.release_device(claim);
        }
    }
}

/// Seats known to the controller, in the order they appeared.
#[derive(Debug)]
pub struct SeatRegistry {
    seats: Vec<SeatEntry>,
    claim_devices: bool,
}

impl SeatRegistry {
    /// With `claim_devices == false` the seat lifecycle is tracked and
    /// broadcast as usual but no device is ever claimed.
    pub fn new(claim_devices: bool) -> Self {
        Self { seats: Vec::new(), claim_devices }
    }

    pub fn get(&self, name: &str) -> Option<&SeatEntry> {
        self.seats.iter().find(|s| s.name == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut SeatEntry> {
        self.seats.iter_mut().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeatEntry> + '_ {
        self.seats.iter()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn on_seat_appeared(
        &mut self,
        seat: &SeatSnapshot,
        owner: &mut dyn DeviceOwnership,
        broadcast: &mut ControllerBroadcast,
    ) -> Result<(), InputError> {
        if self.get(&seat.name).is_some() {
            tracing::warn!("Seat '{}' already tracked, ignoring duplicate", seat.name);
            return Err(InputError::SeatAlreadyTracked(seat.name.clone()));
        }
        if self.seats.try_reserve(1).is_err() {
            tracing::error!("Failed to allocate tracking entry for seat '{}'", seat.name);
            return Err(InputError::ResourceExhausted(format!("creating seat '{}'", seat.name)));
        }

        let capabilities = seat.capabilities();
        let mut entry = SeatEntry { name: seat.name.clone(), capabilities, claims: Vec::new() };
        if self.claim_devices {
            entry.claim_missing(capabilities, owner);
        }
        self.seats.push(entry);
        tracing::debug!("Seat '{}' created with capabilities {}", seat.name, capabilities);

        broadcast.broadcast(&ControllerEvent::SeatCreated { seat: seat.name.clone(), capabilities });
        Ok(())
    }

    /// Claims whatever became available and reports the new capabilities.
    /// Claims already held are kept even if the class disappeared.
    pub fn on_seat_capability_changed(
        &mut self,
        seat: &SeatSnapshot,
        owner: &mut dyn DeviceOwnership,
        broadcast: &mut ControllerBroadcast,
    ) -> Result<(), InputError> {
        let claim_devices = self.claim_devices;
        let entry = match self.get_mut(&seat.name) {
            Some(entry) => entry,
            None => {
                tracing::warn!("Capability change for unknown seat '{}' dropped", seat.name);
                return Err(InputError::SeatNotFound(seat.name.clone()));
            }
        };

        let capabilities = seat.capabilities();
        entry.capabilities = capabilities;
        if claim_devices {
            entry.claim_missing(capabilities, owner);
        }
        tracing::debug!("Seat '{}' capabilities now {}", seat.name, capabilities);

        broadcast.broadcast(&ControllerEvent::SeatCapabilities { seat: seat.name.clone(), capabilities });
        Ok(())
    }

    pub fn on_seat_removed(
        &mut self,
        seat: &SeatSnapshot,
        owner: &mut dyn DeviceOwnership,
        broadcast: &mut ControllerBroadcast,
    ) -> Result<(), InputError> {
        let index = match self.seats.iter().position(|s| s.name == seat.name) {
            Some(index) => index,
            None => {
                tracing::warn!("Removal of unknown seat '{}' dropped", seat.name);
                return Err(InputError::SeatNotFound(seat.name.clone()));
            }
        };

        let mut entry = self.seats.remove(index);
        entry.release_claims(owner);
        tracing::debug!("Seat '{}' destroyed", entry.name);

        broadcast.broadcast(&ControllerEvent::SeatDestroyed { seat: entry.name });
        Ok(())
    }

    /// Releases every claim held. Seats stay tracked and nothing is broadcast.
    pub fn release_all(&mut self, owner: &mut dyn DeviceOwnership) {
        for entry in &mut self.seats {
            entry.release_claims(owner);
        }
    }
}
