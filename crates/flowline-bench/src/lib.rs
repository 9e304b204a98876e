//! Benchmark profiles and fields for the Flowline advection engine.
//!
//! Provides an analytic reference flow and pre-built configurations:
//!
//! - [`AbcFlow`]: the Arnold-Beltrami-Childress flow on a `[0, 2pi]^3` box
//! - [`reference_registry`]: the ABC flow and its speed, registered by name
//! - [`reference_config`]: gridded seeds, all axes periodic, colored by speed
//! - [`reference_seeds`]: the same seeds, for driving an `Advection` directly

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::f32::consts::TAU;

use flowline_core::{FieldError, Particle, ScalarField, Vec3, VelocityField};
use flowline_engine::{FieldRegistry, FlowConfig, Rake, SeedMode};

/// Registered name of the reference velocity field.
pub const VELOCITY: &str = "abc";
/// Registered name of the reference color field.
pub const SPEED: &str = "abc_speed";

/// Arnold-Beltrami-Childress flow.
///
/// `u = A sin z + C cos y`, `v = B sin x + A cos z`, `w = C sin y + B cos x`.
/// The field is sampled analytically everywhere but reports only the
/// `[0, 2pi]^3` box as its volume, so periodic wrapping is exercised.
#[derive(Clone, Copy, Debug)]
pub struct AbcFlow {
    /// Coefficient A.
    pub a: f32,
    /// Coefficient B.
    pub b: f32,
    /// Coefficient C.
    pub c: f32,
}

impl Default for AbcFlow {
    fn default() -> Self {
        Self {
            a: 3.0f32.sqrt(),
            b: 2.0f32.sqrt(),
            c: 1.0,
        }
    }
}

impl AbcFlow {
    fn sample(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            self.a * p.z.sin() + self.c * p.y.cos(),
            self.b * p.x.sin() + self.a * p.z.cos(),
            self.c * p.y.sin() + self.b * p.x.cos(),
        )
    }
}

impl VelocityField for AbcFlow {
    fn velocity(&self, _time: f32, position: Vec3) -> Result<Vec3, FieldError> {
        Ok(self.sample(position))
    }

    fn inside_volume(&self, _time: f32, position: Vec3) -> bool {
        position.cmpge(Vec3::ZERO).all() && position.cmple(Vec3::splat(TAU)).all()
    }

    fn extents(&self) -> Option<(Vec3, Vec3)> {
        Some((Vec3::ZERO, Vec3::splat(TAU)))
    }
}

/// Speed of an [`AbcFlow`], used as the color field.
#[derive(Clone, Copy, Debug, Default)]
pub struct AbcSpeed(pub AbcFlow);

impl ScalarField for AbcSpeed {
    fn scalar(&self, _time: f32, position: Vec3) -> Result<f32, FieldError> {
        Ok(self.0.sample(position).length())
    }
}

/// Registry holding [`AbcFlow`] as [`VELOCITY`] and its speed as [`SPEED`].
pub fn reference_registry() -> FieldRegistry {
    let flow = AbcFlow::default();
    let mut reg = FieldRegistry::new();
    reg.register_velocity(VELOCITY, flow);
    reg.register_scalar(SPEED, AbcSpeed(flow));
    reg
}

/// Steady reference configuration: `n^3` gridded seeds, `steps` steps,
/// all axes periodic, colored by speed.
pub fn reference_config(n: usize, steps: usize) -> FlowConfig {
    FlowConfig {
        velocity_field: VELOCITY.to_string(),
        color_field: Some(SPEED.to_string()),
        steady: true,
        steady_num_of_steps: steps,
        seed_mode: SeedMode::Gridded { counts: [n; 3] },
        rake: Rake {
            min: Vec3::ZERO,
            max: Vec3::splat(TAU),
        },
        periodic: [true; 3],
        ..FlowConfig::default()
    }
}

/// Timestamps for the reference profile: ten unit intervals.
pub fn reference_timestamps() -> Vec<f32> {
    (0..=10).map(|t| t as f32).collect()
}

/// The seeds [`reference_config`] generates, at time zero.
pub fn reference_seeds(n: usize) -> Vec<Particle> {
    flowline_engine::seeding::gridded(
        &Rake {
            min: Vec3::ZERO,
            max: Vec3::splat(TAU),
        },
        [n; 3],
        0.0,
    )
}
