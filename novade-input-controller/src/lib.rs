//! # NovaDE Input Controller (`novade-input-controller`)
//!
//! Decides which surfaces receive input from which seats, and keeps control
//! clients of the `ivi_input` protocol informed.
//!
//! - [`seat`]: live seats, their capabilities and the device ownership
//!   claimed for them.
//! - [`surface`]: per-surface accepted seats (and the focus mask).
//! - [`focus`]: focus arbitration; pointer and touch focus is exclusive.
//! - [`broadcast`]: bound control clients, event fan-out and state replay.
//! - [`controller`]: [`InputController`], the context tying the above together.
//! - [`signal`] and [`module`]: host notification bus and bootstrap.
//! - [`protocol`]: requests, events and their wire encoding.
//!
//! ```rust,ignore
//! use std::{cell::RefCell, rc::Rc};
//! use novade_input_controller::{ControllerModule, HostSignals};
//!
//! let config = novade_input_core::ConfigLoader::load()?;
//! let controller = Rc::new(RefCell::new(ControllerModule::load(host, &config)?));
//! let signals = HostSignals::new();
//! let _attachment = ControllerModule::attach(&controller, &signals);
//! ```

pub mod broadcast;
pub mod controller;
pub mod device;
pub mod error;
pub mod focus;
pub mod host;
pub mod module;
pub mod protocol;
pub mod seat;
pub mod signal;
pub mod surface;

pub use broadcast::{ClientId, ControllerClient};
pub use controller::InputController;
pub use device::DeviceClass;
pub use error::{InputError, WireError};
pub use host::{DeviceClaim, DeviceOwnership, InputHost, SeatSnapshot, SurfaceId};
pub use module::{Attachment, ControllerModule};
pub use protocol::wire::{WireClient, WireOutbox};
pub use protocol::{ControllerEvent, ControllerRequest};
pub use signal::{HostSignals, Signal, Subscription};
