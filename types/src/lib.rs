//! Core domain types for Veil - no IO, no async.
//!
//! Everything here is plain data shared between the coordination engine and
//! its embedders: user identity, the tri-state lock-surface visibility model,
//! and the opaque parameters describing a surface being revealed by a
//! going-away animation.

mod ids;
mod target;
mod visibility;

pub use ids::UserId;
pub use target::{AnimationTargetDescriptor, SurfaceBounds, TargetGeometryError, TargetKind};
pub use visibility::LockSurfaceVisibility;
