//! Explicit single-step integrators.
//!
//! Both integrators take the base particle `p0` and a signed step `dt`
//! and produce the next particle at `p0.time + dt`. A failed velocity
//! sample abandons the step; no partial particle is produced.

use flowline_core::{FieldError, Particle, VelocityField};

/// Numerical scheme used to advance a particle by one step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdvectionMethod {
    /// Forward Euler: one velocity sample per step.
    Euler,
    /// Classical fourth-order Runge-Kutta: four samples per step.
    #[default]
    Rk4,
}

impl AdvectionMethod {
    /// Advance `p0` by `dt` with this scheme.
    pub fn integrate(
        self,
        velocity: &dyn VelocityField,
        p0: &Particle,
        dt: f32,
    ) -> Result<Particle, FieldError> {
        match self {
            Self::Euler => euler(velocity, p0, dt),
            Self::Rk4 => rk4(velocity, p0, dt),
        }
    }
}

/// `x1 = x0 + dt * v(t0, x0)`.
pub fn euler(velocity: &dyn VelocityField, p0: &Particle, dt: f32) -> Result<Particle, FieldError> {
    let v0 = velocity.velocity(p0.time, p0.location)?;
    Ok(Particle::new(p0.location + dt * v0, p0.time + dt))
}

/// `x1 = x0 + dt/6 * (k1 + 2 k2 + 2 k3 + k4)`.
///
/// Fails if any of the four samples fails, including intermediate stages
/// that land outside the field's domain.
pub fn rk4(velocity: &dyn VelocityField, p0: &Particle, dt: f32) -> Result<Particle, FieldError> {
    let half = dt * 0.5;
    let (t0, x0) = (p0.time, p0.location);

    let k1 = velocity.velocity(t0, x0)?;
    let k2 = velocity.velocity(t0 + half, x0 + half * k1)?;
    let k3 = velocity.velocity(t0 + half, x0 + half * k2)?;
    let k4 = velocity.velocity(t0 + dt, x0 + dt * k3)?;

    let location = x0 + dt / 6.0 * (k1 + 2.0 * (k2 + k3) + k4);
    Ok(Particle::new(location, t0 + dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_core::Vec3;
    use flowline_test_utils::{SolidBodyRotation, TimeRamp, UniformFlow};

    fn seed() -> Particle {
        Particle::new(Vec3::ZERO, 0.0)
    }

    #[test]
    fn euler_constant_field() {
        let field = UniformFlow::new(Vec3::X);
        let p1 = euler(&field, &seed(), 1.0).unwrap();
        assert_eq!(p1.location, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(p1.time, 1.0);
        assert!(!p1.is_special());
        assert_eq!(p1.value, 0.0);
    }

    #[test]
    fn rk4_matches_euler_on_constant_field() {
        let field = UniformFlow::new(Vec3::new(1.0, -2.0, 0.5));
        let e = euler(&field, &seed(), 0.25).unwrap();
        let r = rk4(&field, &seed(), 0.25).unwrap();
        assert!((e.location - r.location).length() < 1e-6);
        assert_eq!(e.time, r.time);
    }

    #[test]
    fn backward_step_moves_against_flow() {
        let field = UniformFlow::new(Vec3::X);
        let p1 = AdvectionMethod::Euler
            .integrate(&field, &seed(), -0.5)
            .unwrap();
        assert_eq!(p1.location, Vec3::new(-0.5, 0.0, 0.0));
        assert_eq!(p1.time, -0.5);
    }

    #[test]
    fn rk4_integrates_time_dependent_field_exactly() {
        // v = t  =>  x(t) = t^2 / 2, which RK4 reproduces exactly.
        let field = TimeRamp { base: Vec3::X };
        let p1 = rk4(&field, &seed(), 2.0).unwrap();
        assert!((p1.location.x - 2.0).abs() < 1e-5, "got {}", p1.location.x);

        // Euler samples only at t0 = 0 and stays put.
        let e = euler(&field, &seed(), 2.0).unwrap();
        assert_eq!(e.location.x, 0.0);
    }

    #[test]
    fn rk4_tracks_circle_more_closely_than_euler() {
        let field = SolidBodyRotation::new(1.0);
        let start = Particle::new(Vec3::new(1.0, 0.0, 0.0), 0.0);
        let mut e = start.clone();
        let mut r = start.clone();
        for _ in 0..20 {
            e = euler(&field, &e, 0.1).unwrap();
            r = rk4(&field, &r, 0.1).unwrap();
        }
        let e_err = (e.location.length() - 1.0).abs();
        let r_err = (r.location.length() - 1.0).abs();
        assert!(r_err < 1e-4, "rk4 radius drift {r_err}");
        assert!(e_err > r_err);
    }

    #[test]
    fn rk4_fails_when_intermediate_stage_leaves_domain() {
        let field = UniformFlow::bounded(Vec3::X, Vec3::splat(-1.0), Vec3::splat(1.0));
        let base = Particle::new(Vec3::new(0.9, 0.0, 0.0), 0.0);
        // k2 is sampled at x = 1.4.
        assert_eq!(rk4(&field, &base, 1.0), Err(FieldError::OutOfDomain));
        // Euler only samples the base point.
        let p1 = euler(&field, &base, 1.0).unwrap();
        assert!((p1.location.x - 1.9).abs() < 1e-6);
    }
}
