//! The window-compositor boundary.
//!
//! The boundary is an opaque, possibly-remote collaborator. Calls to it are
//! fallible at the transport level; failures are logged by the dispatcher and
//! never propagated, and local state is not rolled back (the boundary is
//! assumed eventually consistent).

use thiserror::Error;

/// Failure reported by a compositor-boundary call.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// Transport-level failure (the boundary process was unreachable, the
    /// call died mid-flight, etc.). The payload is whatever the boundary
    /// implementation can say about it.
    #[error("boundary transport failure: {0}")]
    Transport(#[from] anyhow::Error),
    /// The boundary understood the call and refused it.
    #[error("boundary rejected the call: {0}")]
    Rejected(String),
}

/// The compositor-side primitives this subsystem drives.
///
/// Implementations must tolerate calls from a background thread. Exactly one
/// of the two visibility protocols is used per process lifetime, selected at
/// construction via [`veil_config::TransitionProtocolMode`].
pub trait CompositorBoundary: Send + Sync {
    /// Legacy protocol: show/hide the lock surface, with the ambient flag.
    fn set_lock_surface_shown(&self, shown: bool, ambient: bool) -> Result<(), BoundaryError>;

    /// Shell-transition protocol: start a keyguard transition to the given
    /// visibility state.
    fn start_transition(&self, shown: bool, ambient: bool) -> Result<(), BoundaryError>;

    /// Legacy protocol: ask the compositor to make the surface behind the
    /// lock surface visible and start the going-away animation.
    fn request_going_away(&self) -> Result<(), BoundaryError>;
}
