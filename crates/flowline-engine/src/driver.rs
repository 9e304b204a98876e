//! The flow driver: turns a [`FlowConfig`] into up-to-date trajectories.
//!
//! Every [`FlowDriver::update`] compares the configuration against the
//! one that produced the current trajectories and does the least work
//! that brings them up to date:
//!
//! | Change                                   | Advection      | Coloring       |
//! |------------------------------------------|----------------|----------------|
//! | seeds, rake, multiplier, periodicity     | reseed         | recompute      |
//! | velocity field name                      | reseed         | new particles  |
//! | color field name                         | -              | recompute      |
//! | more steady steps / later unsteady time  | extend         | new particles  |
//! | fewer steps / earlier time               | -              | -              |
//! | steady timestep or direction, mode flip  | reseed         | recompute      |
//!
//! "Fewer steps / earlier time" only changes what [`FlowDriver::polylines`]
//! returns.

use std::iter;
use std::path::Path;

use flowline_advect::{Advection, AdvectionMethod};
use flowline_core::{AdvectError, Particle, Vec3, VelocityField};

use crate::adapters::{ScaledVelocity, SteadyScalar, SteadyVelocity};
use crate::config::{ConfigError, FlowConfig, FlowDirection, SeedMode};
use crate::error::EngineError;
use crate::registry::FieldRegistry;
use crate::seeding;
use crate::status::{FlowCache, FlowStatus};

/// One point of a rendered trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolylineVertex {
    /// Particle position.
    pub position: Vec3,
    /// Particle value (color scalar, or `0.0` when uncolored).
    pub value: f32,
}

/// A connected run of trajectory points. Streams split into several
/// polylines wherever they wrapped across a periodic boundary.
pub type Polyline = Vec<PolylineVertex>;

/// Owns the registered fields, the dataset timestamps, and one or two
/// advections, and keeps them in sync with the configuration.
pub struct FlowDriver {
    registry: FieldRegistry,
    timestamps: Vec<f32>,
    cache: FlowCache,
    primary: Advection,
    secondary: Option<Advection>,
    advection_complete: bool,
    coloring_complete: bool,
}

impl FlowDriver {
    /// Create a driver over `registry` for a dataset with `timestamps`.
    ///
    /// Timestamps must be non-empty, finite, and strictly increasing.
    pub fn new(registry: FieldRegistry, timestamps: Vec<f32>) -> Result<Self, ConfigError> {
        validate_timestamps(&timestamps)?;
        Ok(Self {
            registry,
            timestamps,
            cache: FlowCache::new(),
            primary: Advection::new(),
            secondary: None,
            advection_complete: false,
            coloring_complete: false,
        })
    }

    /// Bring the trajectories up to date with `cfg`.
    ///
    /// A rejected configuration or an unknown field name leaves the driver
    /// untouched. A failure after that point (unreadable seed file, failed
    /// scalar sample) leaves the affected pass marked incomplete, so the
    /// next call retries it.
    pub fn update(&mut self, cfg: &FlowConfig) -> Result<(), EngineError> {
        cfg.validate()?;
        if cfg.current_timestep >= self.timestamps.len() {
            return Err(ConfigError::TimestepOutOfRange {
                index: cfg.current_timestep,
                len: self.timestamps.len(),
            }
            .into());
        }
        let velocity = lookup(self.registry.velocity(&cfg.velocity_field), &cfg.velocity_field)?;
        let scalar = match &cfg.color_field {
            Some(name) => Some(lookup(self.registry.scalar(name), name)?),
            None => None,
        };

        self.cache.observe(cfg);
        log::debug!(
            "flow status: velocity {:?}, color {:?}",
            self.cache.velocity_status(),
            self.cache.color_status()
        );
        match (cfg.is_bidirectional(), self.secondary.is_some()) {
            (true, false) => self.secondary = Some(Advection::new()),
            (false, true) => self.secondary = None,
            _ => {}
        }

        match self.cache.velocity_status() {
            FlowStatus::SimpleOutOfDate => {
                self.advection_complete = false;
                let seed_time = self.timestamps[0];
                reseed(&mut self.primary, self.secondary.as_mut(), cfg, velocity, seed_time)?;
            }
            FlowStatus::TimeStepOod => self.advection_complete = false,
            FlowStatus::UpToDate => {}
        }
        self.cache.velocity_done();

        match self.cache.color_status() {
            FlowStatus::SimpleOutOfDate => {
                self.primary.reset_particle_values();
                if let Some(sec) = self.secondary.as_mut() {
                    sec.reset_particle_values();
                }
                self.coloring_complete = false;
            }
            FlowStatus::TimeStepOod => self.coloring_complete = false,
            FlowStatus::UpToDate => {}
        }
        self.cache.color_done();

        if !self.advection_complete {
            let delta_t = base_step(&self.timestamps, cfg.base_step_fraction);
            let scaled = ScaledVelocity::new(velocity, cfg.velocity_multiplier);
            if cfg.steady {
                let steady = SteadyVelocity::new(&scaled, self.timestamps[cfg.current_timestep]);
                let delta_t = match cfg.direction {
                    FlowDirection::Backward => -delta_t,
                    FlowDirection::Forward | FlowDirection::Bidirectional => delta_t,
                };
                let steps = cfg.steady_num_of_steps;
                advance_steps(&mut self.primary, &steady, delta_t, steps, cfg.method)?;
                if let Some(sec) = self.secondary.as_mut() {
                    advance_steps(sec, &steady, -delta_t, steps, cfg.method)?;
                }
            } else {
                for &target in &self.timestamps[1..=cfg.current_timestep] {
                    self.primary
                        .advect_till_time(&scaled, delta_t, target, cfg.method)?;
                }
            }
            self.advection_complete = true;
            // New particles have no value yet.
            self.coloring_complete = false;
        }

        if let Some(scalar) = scalar {
            if !self.coloring_complete {
                let time = self.timestamps[cfg.current_timestep];
                for adv in iter::once(&mut self.primary).chain(self.secondary.as_mut()) {
                    if cfg.steady {
                        adv.calculate_particle_values(&SteadyScalar::new(scalar, time), true)?;
                    } else {
                        adv.calculate_particle_values(scalar, true)?;
                    }
                }
                self.coloring_complete = true;
            }
        }
        Ok(())
    }

    /// The forward (or only) advection.
    pub fn primary(&self) -> &Advection {
        &self.primary
    }

    /// The backward advection of a bidirectional steady flow.
    pub fn secondary(&self) -> Option<&Advection> {
        self.secondary.as_ref()
    }

    /// Staleness of the advection pass as of the last
    /// [`update`](Self::update).
    pub fn velocity_status(&self) -> FlowStatus {
        self.cache.velocity_status()
    }

    /// Staleness of the coloring pass as of the last
    /// [`update`](Self::update).
    pub fn color_status(&self) -> FlowStatus {
        self.cache.color_status()
    }

    /// Dataset timestamps.
    pub fn timestamps(&self) -> &[f32] {
        &self.timestamps
    }

    /// Registered fields.
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Drawable polylines for every stream of both advections.
    ///
    /// Each stream is split at its separators. Steady streams are cut
    /// after `steady_num_of_steps + 1` points; unsteady streams stop at
    /// the first particle later than the current timestamp.
    pub fn polylines(&self) -> Vec<Polyline> {
        let limit = if self.cache.is_steady() {
            Limit::Points(self.cache.steady_num_of_steps() + 1)
        } else {
            let ts = self.cache.current_timestep().unwrap_or(0);
            Limit::Time(self.timestamps[ts.min(self.timestamps.len() - 1)])
        };

        let mut out = Vec::new();
        for adv in iter::once(&self.primary).chain(self.secondary.as_ref()) {
            for stream in adv.streams() {
                split_stream(stream, limit, &mut out);
            }
        }
        out
    }

    /// Write both advections to `path` in gnuplot format: the primary
    /// truncates the file, the secondary (if any) appends to it.
    pub fn export_flowlines(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        self.primary.output_streams_gnuplot(path, false)?;
        if let Some(sec) = &self.secondary {
            sec.output_streams_gnuplot(path, true)?;
        }
        log::info!("exported flowlines to {}", path.display());
        Ok(())
    }
}

fn lookup<'a, T: ?Sized>(field: Option<&'a T>, name: &str) -> Result<&'a T, EngineError> {
    field.ok_or_else(|| EngineError::UnknownField {
        name: name.to_string(),
    })
}

fn validate_timestamps(timestamps: &[f32]) -> Result<(), ConfigError> {
    if timestamps.is_empty() {
        return Err(ConfigError::NoTimestamps);
    }
    if let Some(i) = timestamps.iter().position(|t| !t.is_finite()) {
        return Err(ConfigError::InvalidTimestamps {
            reason: format!("timestamp {i} is not finite"),
        });
    }
    if let Some(i) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
        return Err(ConfigError::InvalidTimestamps {
            reason: format!("timestamp {} does not follow timestamp {i}", i + 1),
        });
    }
    Ok(())
}

/// Base step: a fraction of the first timestamp interval, or the bare
/// fraction for single-timestamp datasets.
fn base_step(timestamps: &[f32], fraction: f32) -> f32 {
    match timestamps {
        [t0, t1, ..] => fraction * (t1 - t0),
        _ => fraction,
    }
}

fn reseed(
    primary: &mut Advection,
    secondary: Option<&mut Advection>,
    cfg: &FlowConfig,
    velocity: &dyn VelocityField,
    time: f32,
) -> Result<(), EngineError> {
    match &cfg.seed_mode {
        SeedMode::Gridded { counts } => {
            primary.use_seed_particles(&seeding::gridded(&cfg.rake, *counts, time));
        }
        SeedMode::Random { count, rng_seed } => {
            primary.use_seed_particles(&seeding::random(&cfg.rake, *count, *rng_seed, time));
        }
        SeedMode::List { path } => {
            if primary.input_streams_gnuplot(path)? == 0 {
                log::warn!("seed file {} holds no seeds", path.display());
                primary.use_seed_particles(&[]);
            }
        }
    }
    log::debug!("reseeded {} streams", primary.number_of_streams());
    apply_periodicity(primary, cfg.periodic, velocity)?;

    if let Some(sec) = secondary {
        let seeds: Vec<Particle> = primary
            .streams()
            .filter_map(|s| s.first().cloned())
            .collect();
        sec.use_seed_particles(&seeds);
        apply_periodicity(sec, cfg.periodic, velocity)?;
    }
    Ok(())
}

/// Periodic bounds come from the velocity field's extents.
fn apply_periodicity(
    adv: &mut Advection,
    periodic: [bool; 3],
    velocity: &dyn VelocityField,
) -> Result<(), AdvectError> {
    let (min, max) = if periodic.contains(&true) {
        velocity.extents().ok_or_else(|| AdvectError::Grid {
            reason: "periodic boundaries need the velocity field's extents".to_string(),
        })?
    } else {
        (Vec3::ZERO, Vec3::ZERO)
    };
    adv.set_x_periodicity(periodic[0], min.x, max.x);
    adv.set_y_periodicity(periodic[1], min.y, max.y);
    adv.set_z_periodicity(periodic[2], min.z, max.z);
    Ok(())
}

/// Step until the longest stream holds `steps` steps (`steps + 1`
/// particles) or nothing moves.
fn advance_steps(
    adv: &mut Advection,
    velocity: &dyn VelocityField,
    delta_t: f32,
    steps: usize,
    method: AdvectionMethod,
) -> Result<(), AdvectError> {
    for _ in adv.max_num_of_steps()..=steps {
        if !adv.advect_one_step(velocity, delta_t, method)?.happened() {
            break;
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug)]
enum Limit {
    Points(usize),
    Time(f32),
}

fn split_stream(stream: &[Particle], limit: Limit, out: &mut Vec<Polyline>) {
    let mut line = Polyline::new();
    let mut drawn = 0usize;
    for p in stream {
        if p.is_special() {
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            continue;
        }
        let past_limit = match limit {
            Limit::Points(n) => drawn >= n,
            Limit::Time(t) => p.time > t,
        };
        if past_limit {
            break;
        }
        line.push(PolylineVertex {
            position: p.location,
            value: p.value,
        });
        drawn += 1;
    }
    if !line.is_empty() {
        out.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, t: f32) -> Particle {
        Particle::new(Vec3::new(x, 0.0, 0.0), t)
    }

    fn xs(line: &Polyline) -> Vec<f32> {
        line.iter().map(|v| v.position.x).collect()
    }

    #[test]
    fn timestamps_validated() {
        assert_eq!(validate_timestamps(&[]), Err(ConfigError::NoTimestamps));
        assert!(validate_timestamps(&[0.0]).is_ok());
        assert!(validate_timestamps(&[0.0, 1.0, 2.5]).is_ok());
        assert!(matches!(
            validate_timestamps(&[0.0, 1.0, 1.0]),
            Err(ConfigError::InvalidTimestamps { .. })
        ));
        assert!(matches!(
            validate_timestamps(&[0.0, f32::NAN]),
            Err(ConfigError::InvalidTimestamps { .. })
        ));
    }

    #[test]
    fn base_step_uses_first_interval() {
        assert_eq!(base_step(&[0.0, 2.0, 10.0], 0.05), 0.1);
        assert_eq!(base_step(&[3.0], 0.05), 0.05);
    }

    #[test]
    fn split_at_separators() {
        let stream = vec![at(8.0, 0.0), at(9.0, 1.0), Particle::separator(), at(0.5, 2.0)];
        let mut out = Vec::new();
        split_stream(&stream, Limit::Points(10), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(xs(&out[0]), vec![8.0, 9.0]);
        assert_eq!(xs(&out[1]), vec![0.5]);
    }

    #[test]
    fn point_limit_ignores_separators() {
        let stream = vec![at(8.0, 0.0), Particle::separator(), at(1.0, 1.0), at(2.0, 2.0)];
        let mut out = Vec::new();
        split_stream(&stream, Limit::Points(2), &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(xs(&out[0]), vec![8.0]);
        assert_eq!(xs(&out[1]), vec![1.0]);
    }

    #[test]
    fn time_limit_stops_after_current_time() {
        let stream = vec![at(0.0, 0.0), at(1.0, 1.0), at(2.0, 2.0), at(3.0, 3.0)];
        let mut out = Vec::new();
        split_stream(&stream, Limit::Time(2.0), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(xs(&out[0]), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn lookup_reports_name() {
        let missing: Option<&str> = None;
        match lookup(missing, "wind") {
            Err(EngineError::UnknownField { name }) => assert_eq!(name, "wind"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
