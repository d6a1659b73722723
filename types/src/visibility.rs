//! Tri-state visibility of the lock surface.

/// What the compositor boundary has been told (or not yet told) about the
/// lock surface.
///
/// `Unknown` exists because of the boot sequence: until the first explicit
/// show/hide decision is made, we must not assume either value, otherwise the
/// very first call would be short-circuited as a no-op change. Once a known
/// value has been recorded the state never returns to `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockSurfaceVisibility {
    /// The boundary has not been told anything yet (boot ambiguity).
    #[default]
    Unknown,
    /// The lock surface is showing.
    Shown,
    /// The lock surface is hidden.
    Hidden,
}

impl LockSurfaceVisibility {
    #[must_use]
    pub const fn from_shown(shown: bool) -> Self {
        if shown { Self::Shown } else { Self::Hidden }
    }

    /// The known shown value, or `None` while still `Unknown`.
    #[must_use]
    pub const fn as_shown(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Shown => Some(true),
            Self::Hidden => Some(false),
        }
    }

    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    #[must_use]
    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_unknown() {
        assert_eq!(LockSurfaceVisibility::default(), LockSurfaceVisibility::Unknown);
        assert!(!LockSurfaceVisibility::Unknown.is_known());
        assert_eq!(LockSurfaceVisibility::Unknown.as_shown(), None);
    }

    #[test]
    fn round_trips_shown_values() {
        assert_eq!(LockSurfaceVisibility::from_shown(true).as_shown(), Some(true));
        assert_eq!(LockSurfaceVisibility::from_shown(false).as_shown(), Some(false));
        assert!(LockSurfaceVisibility::Shown.is_shown());
        assert!(!LockSurfaceVisibility::Hidden.is_shown());
    }
}
