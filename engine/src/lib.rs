//! Core engine for Veil - lock-surface visibility coordination.
//!
//! This crate keeps three independently-mutating facts consistent against a
//! window-compositor boundary: whether the secure lock surface is showing,
//! whether the ambient (always-on) display is visible, and whether a
//! cross-process going-away animation is currently revealing the surface
//! behind the lock surface.
//!
//! The compositor, the credential policy, the rendering layer, and the rest
//! of the system are consumed strictly through the traits in [`boundary`] and
//! [`collaborators`]; this crate contains only the state machine deciding
//! *when* those collaborators are called.

mod animation;
mod boundary;
mod collaborators;
mod coordinator;
mod dispatch;
mod executor;
mod user_switch;
mod visibility;

pub use animation::FinishHandle;
pub use boundary::{BoundaryError, CompositorBoundary};
pub use collaborators::{
    ActiveUserProvider, AlreadyDismissed, CredentialPolicyProvider, DismissDecisionProvider,
    GoingAwayObserver, RedirectCollaborator, RenderingTargetApplier,
};
pub use coordinator::{Collaborators, TransitionCoordinator};
pub use executor::{SerialExecutor, Task, TaskExecutor};

// Re-export from crates for public API
pub use veil_config::{TransitionProtocolMode, TransitionsConfig, VeilConfig};
pub use veil_types::{
    AnimationTargetDescriptor, LockSurfaceVisibility, SurfaceBounds, TargetGeometryError,
    TargetKind, UserId,
};
