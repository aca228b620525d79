//! Focus arbitration.
//!
//! Pointer and touch focus is exclusive: granting either to one surface takes
//! it away from every other surface. Keyboard focus is tracked per surface
//! and granting it never affects other surfaces.

use crate::broadcast::ControllerBroadcast;
use crate::device::DeviceClass;
use crate::error::InputError;
use crate::host::SurfaceId;
use crate::protocol::ControllerEvent;
use crate::surface::AcceptanceTable;

/// Namespace for the `set_input_focus` request handler.
pub struct FocusArbiter;

impl FocusArbiter {
    /// Sets (`enabled`) or clears `devices` on the surface `id`, then, when
    /// enabling exclusive classes, clears those classes on every other
    /// surface and broadcasts the loss to clients.
    ///
    /// The sweep runs even when `id` is not tracked; the result is then
    /// [`InputError::SurfaceNotFound`] after the sweep completed.
    pub fn set_focus(
        surfaces: &mut AcceptanceTable,
        id: SurfaceId,
        devices: DeviceClass,
        enabled: bool,
        broadcast: &mut ControllerBroadcast,
    ) -> Result<(), InputError> {
        let exclusive = devices.exclusive_part();

        let found = match surfaces.get_mut(id) {
            Some(target) => {
                if enabled {
                    target.focus.insert(devices);
                } else {
                    target.focus.remove(devices);
                }
                tracing::debug!("Surface {} focus set to {} (enabled={}, devices={})", id, target.focus, enabled, devices);
                broadcast.broadcast(&ControllerEvent::InputFocus { surface: id, devices, enabled });
                true
            }
            None => false,
        };

        if enabled && !exclusive.is_empty() {
            for other in surfaces.iter_mut().filter(|s| s.id() != id) {
                other.focus.remove(exclusive);
                broadcast.broadcast(&ControllerEvent::InputFocus {
                    surface: other.id(),
                    devices: exclusive,
                    enabled: false,
                });
            }
        }

        if found {
            Ok(())
        } else {
            tracing::warn!("Surface {} was not found", id);
            Err(InputError::SurfaceNotFound(id))
        }
    }
}
