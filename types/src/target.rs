//! Parameters describing a surface revealed by a going-away animation.
//!
//! These are opaque to the coordination engine: it picks which descriptor (if
//! any) to animate and hands it to the rendering collaborator unmodified.

use thiserror::Error;

/// Which compositor surface group a target belongs to.
///
/// The boundary reports app, wallpaper, and non-app targets in a single batch;
/// only app targets are animated by the reveal effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    App,
    Wallpaper,
    NonApp,
}

/// Pixel bounds of a target surface, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl SurfaceBounds {
    #[must_use]
    pub const fn width(self) -> i32 {
        self.right - self.left
    }

    #[must_use]
    pub const fn height(self) -> i32 {
        self.bottom - self.top
    }
}

/// Invalid reveal-target geometry.
#[derive(Debug, Error, PartialEq)]
pub enum TargetGeometryError {
    /// Right/bottom edge precedes left/top edge.
    #[error("inverted bounds: left={left} top={top} right={right} bottom={bottom}")]
    InvertedBounds {
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    },
    /// Corner radius is negative or not a finite number.
    #[error("invalid corner radius: {0}")]
    InvalidCornerRadius(f32),
}

/// Opaque parameters for one surface being revealed behind the lock surface.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationTargetDescriptor {
    kind: TargetKind,
    bounds: SurfaceBounds,
    corner_radius: f32,
    /// Z-order of the target's leash relative to its siblings.
    layer: i32,
}

impl AnimationTargetDescriptor {
    pub fn new(
        kind: TargetKind,
        bounds: SurfaceBounds,
        corner_radius: f32,
        layer: i32,
    ) -> Result<Self, TargetGeometryError> {
        if bounds.right < bounds.left || bounds.bottom < bounds.top {
            return Err(TargetGeometryError::InvertedBounds {
                left: bounds.left,
                top: bounds.top,
                right: bounds.right,
                bottom: bounds.bottom,
            });
        }
        if !corner_radius.is_finite() || corner_radius < 0.0 {
            return Err(TargetGeometryError::InvalidCornerRadius(corner_radius));
        }
        Ok(Self {
            kind,
            bounds,
            corner_radius,
            layer,
        })
    }

    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        self.kind
    }

    #[must_use]
    pub const fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    #[must_use]
    pub const fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    #[must_use]
    pub const fn layer(&self) -> i32 {
        self.layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: SurfaceBounds = SurfaceBounds {
        left: 0,
        top: 0,
        right: 1080,
        bottom: 2400,
    };

    #[test]
    fn valid_descriptor() {
        let target = AnimationTargetDescriptor::new(TargetKind::App, BOUNDS, 32.0, 1)
            .expect("valid geometry");
        assert_eq!(target.kind(), TargetKind::App);
        assert_eq!(target.bounds().width(), 1080);
        assert_eq!(target.bounds().height(), 2400);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let bounds = SurfaceBounds {
            left: 100,
            top: 0,
            right: 0,
            bottom: 2400,
        };
        let err = AnimationTargetDescriptor::new(TargetKind::App, bounds, 0.0, 0).unwrap_err();
        assert!(matches!(err, TargetGeometryError::InvertedBounds { .. }));
    }

    #[test]
    fn rejects_bad_corner_radius() {
        for radius in [-1.0, f32::NAN, f32::INFINITY] {
            let err = AnimationTargetDescriptor::new(TargetKind::App, BOUNDS, radius, 0)
                .unwrap_err();
            assert!(matches!(err, TargetGeometryError::InvalidCornerRadius(_)));
        }
    }
}
