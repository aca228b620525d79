//! Collaborator interfaces the embedding compositor provides.
//!
//! The controller never talks to the compositor directly. Seats arrive as
//! [`SeatSnapshot`]s, surfaces as opaque host handles resolved through
//! [`InputHost::surface_id`], and exclusive device ownership goes through
//! [`DeviceOwnership`].

use crate::device::DeviceClass;
use std::fmt;

/// Stable numeric surface id assigned by the layer-management subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The host's view of a seat at the moment a seat signal fires.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SeatSnapshot {
    pub name: String,
    pub keyboard_devices: u32,
    pub pointer_devices: u32,
    pub touch_devices: u32,
}

impl SeatSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_devices(mut self, keyboard: u32, pointer: u32, touch: u32) -> Self {
        self.keyboard_devices = keyboard;
        self.pointer_devices = pointer;
        self.touch_devices = touch;
        self
    }

    /// Capability mask derived from the device counts. A class is present
    /// iff its count is non-zero.
    pub fn capabilities(&self) -> DeviceClass {
        let mut caps = DeviceClass::empty();
        if self.keyboard_devices > 0 {
            caps |= DeviceClass::KEYBOARD;
        }
        if self.pointer_devices > 0 {
            caps |= DeviceClass::POINTER;
        }
        if self.touch_devices > 0 {
            caps |= DeviceClass::TOUCH;
        }
        caps
    }
}

/// Proof that a seat's raw device stream of one class is owned by the
/// controller. While a claim exists no other consumer receives those events.
///
/// A claim has no event path: nothing is read through it. It is not `Clone`,
/// and handing it back to [`DeviceOwnership::release_device`] consumes it, so
/// a claim can be released only once.
#[derive(Debug, PartialEq, Eq)]
pub struct DeviceClaim {
    seat: String,
    class: DeviceClass,
    token: u64,
}

impl DeviceClaim {
    /// Called by hosts when they grant ownership. `token` is whatever the host
    /// needs to find its grab again on release.
    pub fn new(seat: impl Into<String>, class: DeviceClass, token: u64) -> Self {
        Self { seat: seat.into(), class, token }
    }

    pub fn seat(&self) -> &str {
        &self.seat
    }

    pub fn class(&self) -> DeviceClass {
        self.class
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

/// Exclusive raw-device ownership, per seat and device class.
pub trait DeviceOwnership {
    /// Takes exclusive ownership of `seat`'s devices of `class` (exactly one
    /// class bit). Returns `None` if the host cannot grant it right now.
    fn claim_device(&mut self, seat: &str, class: DeviceClass) -> Option<DeviceClaim>;

    /// Gives ownership back to the host.
    fn release_device(&mut self, claim: DeviceClaim);
}

/// Everything the controller needs from the embedding compositor.
pub trait InputHost: DeviceOwnership {
    /// Host-side surface handle carried by surface signals.
    type Surface;

    /// Resolves a surface handle to its layer-management id.
    fn surface_id(&self, surface: &Self::Surface) -> SurfaceId;

    /// Seats that already exist when the controller module is loaded.
    fn seats(&self) -> Vec<SeatSnapshot>;
}
