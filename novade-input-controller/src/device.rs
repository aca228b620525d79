//! Device classes carried in capability and focus masks.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Input device classes, as used both for seat capabilities and for
    /// per-surface focus.
    ///
    /// The bit values are part of the `ivi_input` wire protocol and must not
    /// change.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceClass: u32 {
        /// The seat has (or the surface is focused for) keyboard devices.
        const KEYBOARD = 1;
        /// Pointer devices (e.g. a mouse). Exclusive across surfaces.
        const POINTER = 2;
        /// Touch devices. Exclusive across surfaces.
        const TOUCH = 4;
    }
}

impl DeviceClass {
    /// Classes that may be focused on at most one surface at a time.
    pub const EXCLUSIVE: DeviceClass = DeviceClass::POINTER.union(DeviceClass::TOUCH);

    /// Builds a mask from a raw protocol value, keeping bits this crate does
    /// not know about so they are echoed back to clients unchanged.
    pub fn from_wire(raw: u32) -> Self {
        DeviceClass::from_bits_retain(raw)
    }

    /// The part of this mask that is subject to single-owner arbitration.
    pub fn exclusive_part(self) -> Self {
        self & Self::EXCLUSIVE
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(&name.to_lowercase())?;
            first = false;
        }
        let unknown = self.bits() & !Self::all().bits();
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{:#x}", unknown)?;
        }
        Ok(())
    }
}
