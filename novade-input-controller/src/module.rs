//! Loading the controller into a host and wiring it to the host's signals.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use novade_input_core::{ConfigError, CoreConfig, CoreError};

use crate::controller::InputController;
use crate::error::InputError;
use crate::host::InputHost;
use crate::protocol::{INTERFACE_NAME, INTERFACE_VERSION};
use crate::signal::{HostSignals, Subscription};

/// Entry points for embedding the controller.
pub struct ControllerModule;

impl ControllerModule {
    /// Creates a controller for `host` and catches up with the seats the host
    /// already has, claiming their devices as if each seat had just appeared
    /// and then reported its capabilities.
    ///
    /// # Errors
    ///
    /// [`InputError::Core`] when the configured global version is not one this
    /// crate implements.
    pub fn load<H: InputHost>(host: H, config: &CoreConfig) -> Result<InputController<H>, InputError> {
        if config.controller.global_version != INTERFACE_VERSION {
            tracing::error!(
                "Cannot advertise {} version {}; only version {} is implemented",
                INTERFACE_NAME,
                config.controller.global_version,
                INTERFACE_VERSION
            );
            return Err(CoreError::from(ConfigError::ValidationError(format!(
                "unsupported {} version {}",
                INTERFACE_NAME, config.controller.global_version
            )))
            .into());
        }

        let existing = host.seats();
        let mut controller = InputController::new(host, &config.controller);
        for seat in &existing {
            if controller.on_seat_appeared(seat).is_ok() {
                let _ = controller.on_seat_capability_changed(seat);
            }
        }

        tracing::info!(
            "input controller module loaded ({} v{}, {} seat(s))",
            INTERFACE_NAME,
            INTERFACE_VERSION,
            existing.len()
        );
        Ok(controller)
    }

    /// Subscribes `controller` to the host's lifecycle signals.
    ///
    /// The subscriptions hold only a weak reference to the controller. They
    /// end when the returned [`Attachment`] is dropped or detached.
    pub fn attach<H>(controller: &Rc<RefCell<InputController<H>>>, signals: &HostSignals<H::Surface>) -> Attachment
    where
        H: InputHost + 'static,
        H::Surface: 'static,
    {
        let subscriptions = vec![
            signals.seat_created.subscribe(forward(controller, |c, seat| c.on_seat_appeared(seat))),
            signals
                .seat_capabilities_changed
                .subscribe(forward(controller, |c, seat| c.on_seat_capability_changed(seat))),
            signals.seat_removed.subscribe(forward(controller, |c, seat| c.on_seat_removed(seat))),
            signals
                .surface_created
                .subscribe(forward(controller, |c, surface| c.on_surface_created(surface))),
            signals
                .surface_removed
                .subscribe(forward(controller, |c, surface| c.on_surface_removed(surface))),
        ];
        tracing::debug!("Input controller attached to {} host signal(s)", subscriptions.len());
        Attachment { subscriptions }
    }
}

/// Wraps a controller method as a signal listener.
fn forward<H, T, F>(controller: &Rc<RefCell<InputController<H>>>, handler: F) -> impl FnMut(&T) + 'static
where
    H: InputHost + 'static,
    T: 'static,
    F: Fn(&mut InputController<H>, &T) -> Result<(), InputError> + 'static,
{
    let weak: Weak<RefCell<InputController<H>>> = Rc::downgrade(controller);
    move |payload: &T| {
        let Some(controller) = weak.upgrade() else {
            tracing::debug!("Host signal after controller was dropped, ignoring");
            return;
        };
        match controller.try_borrow_mut() {
            // Failures are logged where they are detected.
            Ok(mut controller) => {
                let _ = handler(&mut *controller, payload);
            }
            Err(_) => tracing::warn!("Host signal raised while the controller is busy, ignoring"),
        };
    }
}

/// Live subscriptions of an attached controller.
#[derive(Debug)]
pub struct Attachment {
    subscriptions: Vec<Subscription>,
}

impl Attachment {
    /// Unsubscribes from every host signal.
    pub fn detach(self) {
        for subscription in self.subscriptions {
            subscription.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceClass;
    use crate::host::{DeviceClaim, DeviceOwnership, SeatSnapshot, SurfaceId};

    struct Host {
        seats: Vec<SeatSnapshot>,
    }

    impl DeviceOwnership for Host {
        fn claim_device(&mut self, seat: &str, class: DeviceClass) -> Option<DeviceClaim> {
            Some(DeviceClaim::new(seat, class, 0))
        }

        fn release_device(&mut self, _claim: DeviceClaim) {}
    }

    impl InputHost for Host {
        type Surface = SurfaceId;

        fn surface_id(&self, surface: &SurfaceId) -> SurfaceId {
            *surface
        }

        fn seats(&self) -> Vec<SeatSnapshot> {
            self.seats.clone()
        }
    }

    #[test]
    fn test_load_claims_existing_seats() {
        let host = Host { seats: vec![SeatSnapshot::new("seat0").with_devices(1, 1, 0)] };
        let controller = ControllerModule::load(host, &CoreConfig::default()).unwrap();
        assert_eq!(controller.seat_names(), vec!["seat0".to_string()]);
        assert_eq!(controller.claims_for("seat0"), Some(DeviceClass::KEYBOARD | DeviceClass::POINTER));
    }

    #[test]
    fn test_load_rejects_unsupported_version() {
        let mut config = CoreConfig::default();
        config.controller.global_version = 3;
        let result = ControllerModule::load(Host { seats: Vec::new() }, &config);
        assert!(matches!(result, Err(InputError::Core(CoreError::Config(ConfigError::ValidationError(_))))));
    }

    #[test]
    fn test_signals_drive_controller_until_detached() {
        let controller = Rc::new(RefCell::new(
            ControllerModule::load(Host { seats: Vec::new() }, &CoreConfig::default()).unwrap(),
        ));
        let signals: HostSignals<SurfaceId> = HostSignals::new();
        let attachment = ControllerModule::attach(&controller, &signals);

        signals.seat_created.emit(&SeatSnapshot::new("seat1"));
        signals.surface_created.emit(&SurfaceId(5));
        assert_eq!(controller.borrow().seat_names(), vec!["seat1".to_string()]);
        assert_eq!(controller.borrow().surface_ids(), vec![SurfaceId(5)]);

        attachment.detach();
        signals.surface_removed.emit(&SurfaceId(5));
        assert_eq!(controller.borrow().surface_ids(), vec![SurfaceId(5)]);
    }
}
