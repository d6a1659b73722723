//! Collaborator interfaces consumed by the coordinator.
//!
//! Everything the coordinator needs from the rest of the system arrives
//! through these traits. None of them may be called with the coordinator's
//! state lock held; implementations are free to call back into the
//! coordinator synchronously.

use veil_types::{AnimationTargetDescriptor, UserId};

/// Continuation fired when a requested dismiss transition finds the surface
/// already fully dismissed.
pub type AlreadyDismissed = Box<dyn FnOnce() + Send + 'static>;

/// Starts dismiss transitions on behalf of the coordinator.
pub trait DismissDecisionProvider: Send + Sync {
    /// Request a dismiss transition. If the surface is already in a fully
    /// dismissed state, `on_already_dismissed` is invoked (possibly
    /// synchronously) instead of a transition starting.
    fn start_dismiss_transition(&self, reason: &str, on_already_dismissed: Option<AlreadyDismissed>);
}

/// Applies reveal parameters to the surface being animated.
pub trait RenderingTargetApplier: Send + Sync {
    fn apply_parameters(&self, descriptor: &AnimationTargetDescriptor);

    /// The animation target is no longer in use. May arrive without a
    /// preceding `apply_parameters`; treat that as a no-op.
    fn notify_released(&self);
}

/// Reports the currently active device user.
pub trait ActiveUserProvider: Send + Sync {
    fn current_user_id(&self) -> UserId;
}

/// Reports whether a user has a secure credential configured.
pub trait CredentialPolicyProvider: Send + Sync {
    fn is_secure(&self, user: UserId) -> bool;
}

/// Notified when a user switch to a secure user invalidates a going-away
/// animation; the implementation must re-show a secure challenge.
pub trait RedirectCollaborator: Send + Sync {
    fn on_switched_to_secure_user_during_going_away(&self);
}

/// Observes every flip of the going-away flag.
pub trait GoingAwayObserver: Send + Sync {
    fn on_going_away_changed(&self, going_away: bool);
}
