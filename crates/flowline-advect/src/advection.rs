//! The [`Advection`] engine: a set of independent particle streams.
//!
//! Streams are index-aligned with the seed list they were created from
//! and each carries its own separator count. Integration calls extend
//! streams in place; [`Advection::use_seed_particles`] is the only reset.

use flowline_core::{
    AdvectError, AdvectStatus, Axis, Particle, ScalarField, Stream, VelocityField,
};

use crate::integrator::AdvectionMethod;
use crate::periodic::{wrap_and_splice, Periodicity, WrapOutcome};
use crate::step_size::next_step_size;

/// Owns the particle streams and integrates them through a velocity field.
///
/// # Lifecycle
///
/// ```text
/// new() ──▶ use_seed_particles(seeds) ──▶ set_*_periodicity(..)
///                    ▲                          │
///                    │                          ▼
///                    └──── reseed ◀──── advect_* / calculate_* (repeat)
/// ```
///
/// Periodicity survives reseeding, but callers are expected to re-apply
/// it after every [`use_seed_particles`](Self::use_seed_particles) since
/// the bounds usually come from the field the seeds were placed in.
#[derive(Clone, Debug, Default)]
pub struct Advection {
    pub(crate) streams: Vec<Stream>,
    pub(crate) separator_counts: Vec<usize>,
    periodicity: Periodicity,
}

impl Advection {
    /// Create an advection with no streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every stream with a one-particle stream per seed, in order,
    /// and reset all separator counts to zero.
    pub fn use_seed_particles(&mut self, seeds: &[Particle]) {
        self.streams = seeds.iter().map(|s| vec![s.clone()]).collect();
        self.separator_counts = vec![0; seeds.len()];
    }

    /// Fails with [`AdvectError::NoSeedParticleYet`] if any stream is empty.
    pub fn check_ready(&self) -> Result<(), AdvectError> {
        if self.streams.iter().any(|s| s.is_empty()) {
            return Err(AdvectError::NoSeedParticleYet);
        }
        Ok(())
    }

    /// Extend every stream by at most one integration step.
    ///
    /// Streams whose last particle is outside the volume are wrapped
    /// across periodic axes if possible; streams that cannot be brought
    /// back inside, or whose step fails mid-integration, are skipped for
    /// this call. `delta_t` is the base step and may be negative for
    /// backward integration.
    pub fn advect_one_step(
        &mut self,
        velocity: &dyn VelocityField,
        delta_t: f32,
        method: AdvectionMethod,
    ) -> Result<AdvectStatus, AdvectError> {
        self.check_ready()?;
        if !delta_t.is_finite() || delta_t == 0.0 {
            return Err(AdvectError::InvalidStepSize { value: delta_t });
        }
        let forward = delta_t > 0.0;

        let mut happened = false;
        for (idx, stream) in self.streams.iter_mut().enumerate() {
            match wrap_and_splice(stream, &self.periodicity, velocity) {
                WrapOutcome::Inside => {}
                WrapOutcome::Wrapped => {
                    self.separator_counts[idx] += 1;
                    log::debug!("stream {idx} wrapped across a periodic boundary");
                }
                WrapOutcome::NotPeriodic | WrapOutcome::StillOutside => continue,
            }

            let dt = next_step_size(stream, delta_t);
            let Some(p0) = stream.last() else { continue };
            let t0 = p0.time;
            match method.integrate(velocity, p0, dt) {
                Ok(p1) if !time_advanced(forward, t0, p1.time) => {
                    log::trace!("stream {idx}: time stalled at {t0}");
                }
                Ok(p1) => {
                    stream.push(p1);
                    happened = true;
                }
                Err(e) => log::trace!("stream {idx}: step abandoned: {e}"),
            }
        }

        Ok(status(happened))
    }

    /// Advance every stream until its time reaches `target_t`.
    ///
    /// Each stream runs independently and stops early when it leaves the
    /// volume for good or a step fails, so streams may end at different
    /// times. The last step of a stream may overshoot `target_t`. With a
    /// negative `delta_t` streams run backward until their time drops to
    /// `target_t`.
    pub fn advect_till_time(
        &mut self,
        velocity: &dyn VelocityField,
        delta_t: f32,
        target_t: f32,
        method: AdvectionMethod,
    ) -> Result<AdvectStatus, AdvectError> {
        self.check_ready()?;
        if !delta_t.is_finite() || delta_t == 0.0 {
            return Err(AdvectError::InvalidStepSize { value: delta_t });
        }
        let forward = delta_t > 0.0;
        let before_target = |t: f32| if forward { t < target_t } else { t > target_t };

        let mut happened = false;
        for (idx, stream) in self.streams.iter_mut().enumerate() {
            let mut steps = 0usize;
            while stream.last().is_some_and(|p| before_target(p.time)) {
                match wrap_and_splice(stream, &self.periodicity, velocity) {
                    WrapOutcome::Inside => {}
                    WrapOutcome::Wrapped => self.separator_counts[idx] += 1,
                    WrapOutcome::NotPeriodic | WrapOutcome::StillOutside => break,
                }

                let dt = next_step_size(stream, delta_t);
                let Some(p0) = stream.last() else { break };
                let t0 = p0.time;
                match method.integrate(velocity, p0, dt) {
                    Ok(p1) if !time_advanced(forward, t0, p1.time) => {
                        log::trace!("stream {idx}: time stalled at {t0} before target {target_t}");
                        break;
                    }
                    Ok(p1) => {
                        stream.push(p1);
                        steps += 1;
                    }
                    Err(e) => {
                        log::trace!("stream {idx}: stopped before target: {e}");
                        break;
                    }
                }
            }
            happened |= steps > 0;
        }

        Ok(status(happened))
    }

    /// Sample `scalar` at every non-separator particle and store it in
    /// [`Particle::value`].
    ///
    /// Particles are visited step by step across all streams (step 0 of
    /// every stream, then step 1, ...). With `skip_non_zero`, particles
    /// that already hold a non-zero value are left alone.
    pub fn calculate_particle_values(
        &mut self,
        scalar: &dyn ScalarField,
        skip_non_zero: bool,
    ) -> Result<(), AdvectError> {
        self.for_each_step_major(|stream, step, p| {
            if skip_non_zero && p.value != 0.0 {
                return Ok(());
            }
            p.value = sample(scalar, stream, step, p)?;
            Ok(())
        })
    }

    /// Like [`calculate_particle_values`](Self::calculate_particle_values)
    /// but appends each sample to the particle's property history and
    /// never skips.
    ///
    /// Separators get no sample, so a stream holds one history entry per
    /// particle minus its separator count.
    pub fn calculate_particle_properties(
        &mut self,
        scalar: &dyn ScalarField,
    ) -> Result<(), AdvectError> {
        self.for_each_step_major(|stream, step, p| {
            let v = sample(scalar, stream, step, p)?;
            p.attach_property(v);
            Ok(())
        })
    }

    /// Drop the property history of every particle.
    pub fn clear_particle_properties(&mut self) {
        for p in self.streams.iter_mut().flatten() {
            p.clear_properties();
        }
    }

    /// Reset every particle's value to `0.0` ("not yet computed").
    pub fn reset_particle_values(&mut self) {
        for p in self.streams.iter_mut().flatten() {
            p.value = 0.0;
        }
    }

    /// Enable or disable wrapping along x. Disabling resets the bounds.
    pub fn set_x_periodicity(&mut self, enabled: bool, min: f32, max: f32) {
        self.periodicity.set(Axis::X, enabled, min, max);
    }

    /// Enable or disable wrapping along y. Disabling resets the bounds.
    pub fn set_y_periodicity(&mut self, enabled: bool, min: f32, max: f32) {
        self.periodicity.set(Axis::Y, enabled, min, max);
    }

    /// Enable or disable wrapping along z. Disabling resets the bounds.
    pub fn set_z_periodicity(&mut self, enabled: bool, min: f32, max: f32) {
        self.periodicity.set(Axis::Z, enabled, min, max);
    }

    /// Current periodicity settings.
    pub fn periodicity(&self) -> &Periodicity {
        &self.periodicity
    }

    /// Number of streams.
    pub fn number_of_streams(&self) -> usize {
        self.streams.len()
    }

    /// The stream at index `i`.
    pub fn stream_at(&self, i: usize) -> Result<&[Particle], AdvectError> {
        self.streams
            .get(i)
            .map(Vec::as_slice)
            .ok_or(AdvectError::StreamIndexOutOfRange {
                index: i,
                len: self.streams.len(),
            })
    }

    /// Iterate over all streams in seed order.
    pub fn streams(&self) -> impl Iterator<Item = &[Particle]> + '_ {
        self.streams.iter().map(Vec::as_slice)
    }

    /// Number of separators inserted into stream `i`.
    pub fn separator_count(&self, i: usize) -> Result<usize, AdvectError> {
        self.separator_counts
            .get(i)
            .copied()
            .ok_or(AdvectError::StreamIndexOutOfRange {
                index: i,
                len: self.separator_counts.len(),
            })
    }

    /// Longest trajectory over all streams, not counting separators.
    pub fn max_num_of_steps(&self) -> usize {
        self.streams
            .iter()
            .zip(&self.separator_counts)
            .map(|(s, &sep)| s.len() - sep)
            .max()
            .unwrap_or(0)
    }

    /// Visit every non-separator particle, step index first, stream second.
    fn for_each_step_major<F>(&mut self, mut f: F) -> Result<(), AdvectError>
    where
        F: FnMut(usize, usize, &mut Particle) -> Result<(), AdvectError>,
    {
        let most_steps = self.streams.iter().map(Vec::len).max().unwrap_or(0);
        for step in 0..most_steps {
            for (idx, stream) in self.streams.iter_mut().enumerate() {
                match stream.get_mut(step) {
                    Some(p) if !p.is_special() => f(idx, step, p)?,
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

fn status(happened: bool) -> AdvectStatus {
    if happened {
        AdvectStatus::Happened
    } else {
        AdvectStatus::Idle
    }
}

/// True if `t1` lies strictly past `t0` in the integration direction.
fn time_advanced(forward: bool, t0: f32, t1: f32) -> bool {
    if forward {
        t1 > t0
    } else {
        t1 < t0
    }
}

fn sample(
    scalar: &dyn ScalarField,
    stream: usize,
    step: usize,
    p: &Particle,
) -> Result<f32, AdvectError> {
    scalar
        .scalar(p.time, p.location)
        .map_err(|source| AdvectError::ScalarSampleFailed {
            stream,
            step,
            source,
        })
}
