//! Field sampling capabilities consumed by the advection engine.
//!
//! The engine never implements a field. Data backends (gridded datasets,
//! analytic flows, test mocks) implement these traits and are passed by
//! reference into each integration or coloring call.

use glam::Vec3;

use crate::error::FieldError;

/// A time-varying 3D velocity field.
pub trait VelocityField {
    /// Sample the velocity at `(time, position)`.
    ///
    /// Returns `Err` if the position is outside the valid domain or the
    /// backing data cannot be read.
    fn velocity(&self, time: f32, position: Vec3) -> Result<Vec3, FieldError>;

    /// Whether `(time, position)` lies inside the field's valid volume.
    fn inside_volume(&self, time: f32, position: Vec3) -> bool;

    /// Spatial extents `(min, max)` of the valid volume, if known.
    ///
    /// Used by orchestration to derive periodic bounds.
    fn extents(&self) -> Option<(Vec3, Vec3)> {
        None
    }
}

/// A time-varying 3D scalar field.
pub trait ScalarField {
    /// Sample the scalar value at `(time, position)`.
    fn scalar(&self, time: f32, position: Vec3) -> Result<f32, FieldError>;
}

impl<F: VelocityField + ?Sized> VelocityField for &F {
    fn velocity(&self, time: f32, position: Vec3) -> Result<Vec3, FieldError> {
        (**self).velocity(time, position)
    }

    fn inside_volume(&self, time: f32, position: Vec3) -> bool {
        (**self).inside_volume(time, position)
    }

    fn extents(&self) -> Option<(Vec3, Vec3)> {
        (**self).extents()
    }
}

impl<F: VelocityField + ?Sized> VelocityField for Box<F> {
    fn velocity(&self, time: f32, position: Vec3) -> Result<Vec3, FieldError> {
        (**self).velocity(time, position)
    }

    fn inside_volume(&self, time: f32, position: Vec3) -> bool {
        (**self).inside_volume(time, position)
    }

    fn extents(&self) -> Option<(Vec3, Vec3)> {
        (**self).extents()
    }
}

impl<F: ScalarField + ?Sized> ScalarField for &F {
    fn scalar(&self, time: f32, position: Vec3) -> Result<f32, FieldError> {
        (**self).scalar(time, position)
    }
}

impl<F: ScalarField + ?Sized> ScalarField for Box<F> {
    fn scalar(&self, time: f32, position: Vec3) -> Result<f32, FieldError> {
        (**self).scalar(time, position)
    }
}
