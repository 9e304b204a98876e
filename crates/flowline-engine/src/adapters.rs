//! Field views used by the driver.
//!
//! Each adapter borrows a field and changes one aspect of how it is
//! sampled; the advection core never knows about them.

use flowline_core::{FieldError, ScalarField, Vec3, VelocityField};

/// Velocity multiplied by a constant factor.
pub struct ScaledVelocity<'a> {
    inner: &'a dyn VelocityField,
    factor: f32,
}

impl<'a> ScaledVelocity<'a> {
    /// Scale every sample of `inner` by `factor`.
    pub fn new(inner: &'a dyn VelocityField, factor: f32) -> Self {
        Self { inner, factor }
    }
}

impl VelocityField for ScaledVelocity<'_> {
    fn velocity(&self, time: f32, position: Vec3) -> Result<Vec3, FieldError> {
        Ok(self.inner.velocity(time, position)? * self.factor)
    }

    fn inside_volume(&self, time: f32, position: Vec3) -> bool {
        self.inner.inside_volume(time, position)
    }

    fn extents(&self) -> Option<(Vec3, Vec3)> {
        self.inner.extents()
    }
}

/// Velocity frozen at one time, for steady flow.
///
/// The requested time is ignored; particle times keep counting so the
/// step-size controller still sees elapsed time.
pub struct SteadyVelocity<'a> {
    inner: &'a dyn VelocityField,
    time: f32,
}

impl<'a> SteadyVelocity<'a> {
    /// Sample `inner` at `time` regardless of the particle's time.
    pub fn new(inner: &'a dyn VelocityField, time: f32) -> Self {
        Self { inner, time }
    }
}

impl VelocityField for SteadyVelocity<'_> {
    fn velocity(&self, _time: f32, position: Vec3) -> Result<Vec3, FieldError> {
        self.inner.velocity(self.time, position)
    }

    fn inside_volume(&self, _time: f32, position: Vec3) -> bool {
        self.inner.inside_volume(self.time, position)
    }

    fn extents(&self) -> Option<(Vec3, Vec3)> {
        self.inner.extents()
    }
}

/// Scalar field frozen at one time, for steady flow.
pub struct SteadyScalar<'a> {
    inner: &'a dyn ScalarField,
    time: f32,
}

impl<'a> SteadyScalar<'a> {
    /// Sample `inner` at `time` regardless of the particle's time.
    pub fn new(inner: &'a dyn ScalarField, time: f32) -> Self {
        Self { inner, time }
    }
}

impl ScalarField for SteadyScalar<'_> {
    fn scalar(&self, _time: f32, position: Vec3) -> Result<f32, FieldError> {
        self.inner.scalar(self.time, position)
    }
}
