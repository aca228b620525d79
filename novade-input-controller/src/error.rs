use crate::host::SurfaceId;
use novade_input_core::CoreError;
use thiserror::Error;

/// Failures inside the input controller.
///
/// None of these are ever sent to a control client. They are logged where
/// they are detected, and the missing broadcast is the only thing a client
/// can observe.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Seat '{0}' is already tracked")]
    SeatAlreadyTracked(String),

    #[error("Seat not found: {0}")]
    SeatNotFound(String),

    #[error("Surface {0} is already tracked")]
    SurfaceAlreadyTracked(SurfaceId),

    #[error("Surface not found: {0}")]
    SurfaceNotFound(SurfaceId),

    #[error("Seat '{seat}' is already accepted by surface {surface}")]
    SeatAlreadyAccepted { surface: SurfaceId, seat: String },

    #[error("Seat '{seat}' is not accepted by surface {surface}")]
    SeatNotAccepted { surface: SurfaceId, seat: String },

    #[error("Out of memory while {0}")]
    ResourceExhausted(String),

    #[error("Unknown control client: {0}")]
    UnknownClient(crate::broadcast::ClientId),

    #[error("Wire protocol error: {0}")]
    Wire(#[from] WireError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Errors raised while decoding `ivi_input` messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("Invalid message header: {0}")]
    InvalidHeader(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not enough data: {0}")]
    NotEnoughData(String),

    #[error("Unsupported opcode {0}")]
    UnsupportedOpcode(u16),
}
