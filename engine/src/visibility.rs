//! Single source of truth for the three visibility facts.
//!
//! The store decides, on every mutation, whether the change is actually new
//! and therefore worth a boundary call. All mutation happens through the
//! setters; side effects (the boundary call itself) are the coordinator's
//! job, driven by the returned [`ForwardVisibility`] decision.

use veil_types::LockSurfaceVisibility;

/// A visibility change that passed change detection and must reach the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ForwardVisibility {
    pub(crate) shown: bool,
    pub(crate) ambient: bool,
}

#[derive(Debug, Default)]
pub(crate) struct VisibilityStateStore {
    lock_surface: LockSurfaceVisibility,
    ambient_visible: bool,
    going_away: bool,
}

impl VisibilityStateStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock_surface(&self) -> LockSurfaceVisibility {
        self.lock_surface
    }

    pub(crate) fn ambient_visible(&self) -> bool {
        self.ambient_visible
    }

    pub(crate) fn going_away(&self) -> bool {
        self.going_away
    }

    pub(crate) fn set_going_away(&mut self, going_away: bool) {
        self.going_away = going_away;
    }

    /// Record intent to show/hide the lock surface.
    pub(crate) fn set_lock_surface_shown(&mut self, shown: bool) -> Option<ForwardVisibility> {
        self.update(shown, self.ambient_visible)
    }

    /// Record ambient-display visibility.
    ///
    /// While the lock-surface value is still unknown (boot), the flag is only
    /// cached locally: the boundary must never be called with an unknown
    /// shown value. The cached flag rides along with the first forward once
    /// the lock-surface value is decided.
    pub(crate) fn set_ambient_visible(&mut self, ambient: bool) -> Option<ForwardVisibility> {
        let Some(shown) = self.lock_surface.as_shown() else {
            tracing::debug!(
                ambient,
                "lock surface visibility still undecided, caching ambient flag without forwarding"
            );
            self.ambient_visible = ambient;
            return None;
        };
        self.update(shown, ambient)
    }

    fn update(&mut self, shown: bool, ambient: bool) -> Option<ForwardVisibility> {
        if self.lock_surface.as_shown() == Some(shown)
            && self.ambient_visible == ambient
            && !self.going_away
        {
            tracing::debug!(
                shown,
                ambient,
                "visibility unchanged and no going-away active, not forwarding"
            );
            return None;
        }

        self.lock_surface = LockSurfaceVisibility::from_shown(shown);
        self.ambient_visible = ambient;
        Some(ForwardVisibility { shown, ambient })
    }
}
