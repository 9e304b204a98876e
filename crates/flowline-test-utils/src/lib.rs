//! Test utilities and mock fields for Flowline development.
//!
//! Provides analytic implementations of [`VelocityField`] and
//! [`ScalarField`] with closed-form trajectories, plus seed and
//! temporary-file fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;

use flowline_core::{FieldError, ScalarField, Vec3, VelocityField};

pub use fixtures::{grid_seeds, line_seeds, TempFile};

/// Axis-aligned box used as the valid volume of the mock fields.
///
/// Bounds are inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Constant velocity everywhere inside an optional bounding box.
///
/// Sampling outside the box fails with [`FieldError::OutOfDomain`].
pub struct UniformFlow {
    pub velocity: Vec3,
    pub bounds: Option<Bounds>,
}

impl UniformFlow {
    /// Unbounded uniform flow.
    pub fn new(velocity: Vec3) -> Self {
        Self {
            velocity,
            bounds: None,
        }
    }

    /// Uniform flow valid only inside `[min, max]`.
    pub fn bounded(velocity: Vec3, min: Vec3, max: Vec3) -> Self {
        Self {
            velocity,
            bounds: Some(Bounds::new(min, max)),
        }
    }
}

impl VelocityField for UniformFlow {
    fn velocity(&self, time: f32, position: Vec3) -> Result<Vec3, FieldError> {
        if self.inside_volume(time, position) {
            Ok(self.velocity)
        } else {
            Err(FieldError::OutOfDomain)
        }
    }

    fn inside_volume(&self, _time: f32, position: Vec3) -> bool {
        self.bounds.is_none_or(|b| b.contains(position))
    }

    fn extents(&self) -> Option<(Vec3, Vec3)> {
        self.bounds.map(|b| (b.min, b.max))
    }
}

/// Rigid rotation about the z axis through `center`.
///
/// `v = omega * (-(y - cy), x - cx, 0)`. Trajectories are circles, which
/// makes the curvature-adaptive step controller observable.
pub struct SolidBodyRotation {
    pub omega: f32,
    pub center: Vec3,
}

impl SolidBodyRotation {
    pub fn new(omega: f32) -> Self {
        Self {
            omega,
            center: Vec3::ZERO,
        }
    }
}

impl VelocityField for SolidBodyRotation {
    fn velocity(&self, _time: f32, position: Vec3) -> Result<Vec3, FieldError> {
        let r = position - self.center;
        Ok(Vec3::new(-self.omega * r.y, self.omega * r.x, 0.0))
    }

    fn inside_volume(&self, _time: f32, _position: Vec3) -> bool {
        true
    }
}

/// Velocity that grows linearly with time: `v = base * t`.
///
/// Lets tests tell apart samples taken at different times.
pub struct TimeRamp {
    pub base: Vec3,
}

impl VelocityField for TimeRamp {
    fn velocity(&self, time: f32, _position: Vec3) -> Result<Vec3, FieldError> {
        Ok(self.base * time)
    }

    fn inside_volume(&self, _time: f32, _position: Vec3) -> bool {
        true
    }
}

/// Wraps a velocity field and counts how often it is sampled.
pub struct CountingVelocity<F> {
    pub inner: F,
    samples: Cell<usize>,
}

impl<F> CountingVelocity<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            samples: Cell::new(0),
        }
    }

    pub fn samples(&self) -> usize {
        self.samples.get()
    }
}

impl<F: VelocityField> VelocityField for CountingVelocity<F> {
    fn velocity(&self, time: f32, position: Vec3) -> Result<Vec3, FieldError> {
        self.samples.set(self.samples.get() + 1);
        self.inner.velocity(time, position)
    }

    fn inside_volume(&self, time: f32, position: Vec3) -> bool {
        self.inner.inside_volume(time, position)
    }

    fn extents(&self) -> Option<(Vec3, Vec3)> {
        self.inner.extents()
    }
}

/// The same scalar everywhere.
pub struct ConstScalar(pub f32);

impl ScalarField for ConstScalar {
    fn scalar(&self, _time: f32, _position: Vec3) -> Result<f32, FieldError> {
        Ok(self.0)
    }
}

/// `s = gradient . p + offset`.
pub struct LinearScalar {
    pub gradient: Vec3,
    pub offset: f32,
}

impl ScalarField for LinearScalar {
    fn scalar(&self, _time: f32, position: Vec3) -> Result<f32, FieldError> {
        Ok(self.gradient.dot(position) + self.offset)
    }
}

/// Returns the sample time as the scalar value.
pub struct TimeScalar;

impl ScalarField for TimeScalar {
    fn scalar(&self, time: f32, _position: Vec3) -> Result<f32, FieldError> {
        Ok(time)
    }
}

/// Scalar field whose every sample fails.
pub struct FailingScalar;

impl ScalarField for FailingScalar {
    fn scalar(&self, _time: f32, _position: Vec3) -> Result<f32, FieldError> {
        Err(FieldError::Unavailable {
            reason: "deliberate failure".to_string(),
        })
    }
}

/// Scalar field that counts how often it is sampled and returns the
/// running count (1, 2, 3, ...).
pub struct SequenceScalar {
    next: Cell<f32>,
}

impl SequenceScalar {
    pub fn new() -> Self {
        Self {
            next: Cell::new(1.0),
        }
    }

    pub fn samples(&self) -> usize {
        (self.next.get() - 1.0) as usize
    }
}

impl Default for SequenceScalar {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarField for SequenceScalar {
    fn scalar(&self, _time: f32, _position: Vec3) -> Result<f32, FieldError> {
        let v = self.next.get();
        self.next.set(v + 1.0);
        Ok(v)
    }
}
