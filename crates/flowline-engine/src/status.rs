//! Staleness tracking for the advection and coloring passes.
//!
//! [`FlowCache`] remembers the configuration that produced the current
//! trajectories and, on every [`FlowCache::observe`], compares it to the
//! new one. Each difference degrades one or both [`FlowStatus`] values;
//! the driver reads them, recomputes what is stale, and acknowledges.

use crate::config::{FlowConfig, FlowDirection, Rake, SeedMode};
use flowline_advect::AdvectionMethod;

/// How stale a pass is.
///
/// Ordered by severity: `UpToDate < TimeStepOod < SimpleOutOfDate`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum FlowStatus {
    /// Nothing to do.
    UpToDate,
    /// Existing results stay valid; only more steps or timestamps are
    /// needed.
    TimeStepOod,
    /// Results must be discarded and recomputed from scratch.
    #[default]
    SimpleOutOfDate,
}

impl FlowStatus {
    /// Raise to `other` if that is more severe.
    fn degrade(&mut self, other: FlowStatus) {
        if other > *self {
            *self = other;
        }
    }
}

/// Snapshot of the configuration behind the current trajectories.
#[derive(Clone, Debug)]
pub struct FlowCache {
    velocity_status: FlowStatus,
    color_status: FlowStatus,

    seed_mode: Option<SeedMode>,
    rake: Option<Rake>,
    velocity_field: Option<String>,
    color_field: Option<Option<String>>,
    velocity_multiplier: Option<f32>,
    periodic: Option<[bool; 3]>,
    method: Option<AdvectionMethod>,
    base_step_fraction: Option<f32>,

    steady: bool,
    steady_num_of_steps: usize,
    current_timestep: Option<usize>,
    direction: FlowDirection,
}

impl Default for FlowCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowCache {
    /// A cache that has seen no configuration; both passes start stale.
    pub fn new() -> Self {
        Self {
            velocity_status: FlowStatus::SimpleOutOfDate,
            color_status: FlowStatus::SimpleOutOfDate,
            seed_mode: None,
            rake: None,
            velocity_field: None,
            color_field: None,
            velocity_multiplier: None,
            periodic: None,
            method: None,
            base_step_fraction: None,
            steady: false,
            steady_num_of_steps: 0,
            current_timestep: None,
            direction: FlowDirection::Forward,
        }
    }

    /// Staleness of the advection pass.
    pub fn velocity_status(&self) -> FlowStatus {
        self.velocity_status
    }

    /// Staleness of the coloring pass.
    pub fn color_status(&self) -> FlowStatus {
        self.color_status
    }

    /// Mark the advection pass as recomputed.
    pub fn velocity_done(&mut self) {
        self.velocity_status = FlowStatus::UpToDate;
    }

    /// Mark the coloring pass as recomputed.
    pub fn color_done(&mut self) {
        self.color_status = FlowStatus::UpToDate;
    }

    /// Step count recorded for steady flow.
    pub fn steady_num_of_steps(&self) -> usize {
        self.steady_num_of_steps
    }

    /// Timestep index recorded by the last observation.
    pub fn current_timestep(&self) -> Option<usize> {
        self.current_timestep
    }

    /// Whether the last observation was in steady mode.
    pub fn is_steady(&self) -> bool {
        self.steady
    }

    /// Compare `cfg` with the cached configuration, degrade the statuses
    /// accordingly, and remember `cfg`.
    pub fn observe(&mut self, cfg: &FlowConfig) {
        // Anything that changes the seeds or the integration itself
        // invalidates both passes. Seed lists ignore the rake.
        let uses_rake = !matches!(cfg.seed_mode, SeedMode::List { .. });
        let reseed = self.seed_mode.as_ref() != Some(&cfg.seed_mode)
            || (uses_rake && self.rake != Some(cfg.rake))
            || self.velocity_multiplier != Some(cfg.velocity_multiplier)
            || self.periodic != Some(cfg.periodic)
            || self.method != Some(cfg.method)
            || self.base_step_fraction != Some(cfg.base_step_fraction);
        if reseed {
            self.both(FlowStatus::SimpleOutOfDate);
            self.seed_mode = Some(cfg.seed_mode.clone());
            self.velocity_multiplier = Some(cfg.velocity_multiplier);
            self.periodic = Some(cfg.periodic);
            self.method = Some(cfg.method);
            self.base_step_fraction = Some(cfg.base_step_fraction);
        }
        self.rake = Some(cfg.rake);

        if self.velocity_field.as_deref() != Some(cfg.velocity_field.as_str()) {
            self.velocity_status.degrade(FlowStatus::SimpleOutOfDate);
            self.velocity_field = Some(cfg.velocity_field.clone());
        }
        if self.color_field.as_ref() != Some(&cfg.color_field) {
            self.color_status.degrade(FlowStatus::SimpleOutOfDate);
            self.color_field = Some(cfg.color_field.clone());
        }

        if cfg.steady {
            self.observe_steady(cfg);
        } else {
            self.observe_unsteady(cfg);
        }
    }

    fn observe_steady(&mut self, cfg: &FlowConfig) {
        if !self.steady {
            self.both(FlowStatus::SimpleOutOfDate);
            self.steady = true;
            self.steady_num_of_steps = cfg.steady_num_of_steps;
        } else if cfg.steady_num_of_steps > self.steady_num_of_steps {
            // More steps extend the existing trajectories.
            self.both(FlowStatus::TimeStepOod);
            self.steady_num_of_steps = cfg.steady_num_of_steps;
        } else if cfg.steady_num_of_steps < self.steady_num_of_steps {
            // Fewer steps only shorten what is drawn.
            self.steady_num_of_steps = cfg.steady_num_of_steps;
        }

        // Steady fields are sampled at the current timestep.
        if self.current_timestep != Some(cfg.current_timestep) {
            self.both(FlowStatus::SimpleOutOfDate);
            self.current_timestep = Some(cfg.current_timestep);
        }

        if self.direction != cfg.direction {
            self.both(FlowStatus::SimpleOutOfDate);
            self.direction = cfg.direction;
        }
    }

    fn observe_unsteady(&mut self, cfg: &FlowConfig) {
        if self.steady {
            self.both(FlowStatus::SimpleOutOfDate);
            self.steady = false;
            self.current_timestep = Some(cfg.current_timestep);
            return;
        }
        match self.current_timestep {
            Some(cached) if cfg.current_timestep > cached => {
                self.both(FlowStatus::TimeStepOod);
                self.current_timestep = Some(cfg.current_timestep);
            }
            Some(cached) if cfg.current_timestep < cached => {
                // Going back in time only shortens what is drawn.
                self.current_timestep = Some(cfg.current_timestep);
            }
            Some(_) => {}
            None => {
                self.both(FlowStatus::SimpleOutOfDate);
                self.current_timestep = Some(cfg.current_timestep);
            }
        }
    }

    fn both(&mut self, status: FlowStatus) {
        self.velocity_status.degrade(status);
        self.color_status.degrade(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_core::Vec3;
    use std::path::PathBuf;

    fn base() -> FlowConfig {
        FlowConfig {
            velocity_field: "wind".to_string(),
            color_field: Some("speed".to_string()),
            ..FlowConfig::default()
        }
    }

    /// A cache that has already processed `cfg`.
    fn settled(cfg: &FlowConfig) -> FlowCache {
        let mut cache = FlowCache::new();
        cache.observe(cfg);
        cache.velocity_done();
        cache.color_done();
        cache
    }

    fn statuses(cache: &FlowCache) -> (FlowStatus, FlowStatus) {
        (cache.velocity_status(), cache.color_status())
    }

    const FRESH: (FlowStatus, FlowStatus) = (FlowStatus::UpToDate, FlowStatus::UpToDate);
    const STALE: (FlowStatus, FlowStatus) =
        (FlowStatus::SimpleOutOfDate, FlowStatus::SimpleOutOfDate);
    const EXTEND: (FlowStatus, FlowStatus) = (FlowStatus::TimeStepOod, FlowStatus::TimeStepOod);

    // -----------------------------------------------------------------
    // General rules
    // -----------------------------------------------------------------

    #[test]
    fn new_cache_is_stale() {
        let cache = FlowCache::new();
        assert_eq!(statuses(&cache), STALE);
    }

    #[test]
    fn unchanged_config_stays_fresh() {
        let cfg = base();
        let mut cache = settled(&cfg);
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), FRESH);
    }

    #[test]
    fn seed_mode_change_invalidates_both() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.seed_mode = SeedMode::Random {
            count: 8,
            rng_seed: 3,
        };
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
    }

    #[test]
    fn seed_file_change_invalidates_both() {
        let mut cfg = base();
        cfg.seed_mode = SeedMode::List {
            path: PathBuf::from("a.txt"),
        };
        let mut cache = settled(&cfg);
        cfg.seed_mode = SeedMode::List {
            path: PathBuf::from("b.txt"),
        };
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
    }

    #[test]
    fn rake_change_invalidates_rake_modes() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.rake = Rake {
            min: Vec3::splat(-1.0),
            max: Vec3::ONE,
        };
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);

        cfg.seed_mode = SeedMode::Random {
            count: 8,
            rng_seed: 3,
        };
        let mut cache = settled(&cfg);
        cfg.rake.max = Vec3::splat(2.0);
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
    }

    #[test]
    fn rake_change_ignored_for_seed_list() {
        let mut cfg = base();
        cfg.seed_mode = SeedMode::List {
            path: PathBuf::from("a.txt"),
        };
        let mut cache = settled(&cfg);
        cfg.rake = Rake {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(3.0),
        };
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), FRESH);
    }

    #[test]
    fn velocity_name_change_invalidates_velocity_only() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.velocity_field = "current".to_string();
        cache.observe(&cfg);
        assert_eq!(
            statuses(&cache),
            (FlowStatus::SimpleOutOfDate, FlowStatus::UpToDate)
        );
    }

    #[test]
    fn color_name_change_invalidates_color_only() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.color_field = None;
        cache.observe(&cfg);
        assert_eq!(
            statuses(&cache),
            (FlowStatus::UpToDate, FlowStatus::SimpleOutOfDate)
        );
    }

    #[test]
    fn multiplier_and_periodicity_invalidate_both() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.velocity_multiplier = 2.0;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);

        let mut cache = settled(&cfg);
        cfg.periodic = [true, false, false];
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
    }

    // -----------------------------------------------------------------
    // Steady mode
    // -----------------------------------------------------------------

    #[test]
    fn more_steady_steps_extend() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.steady_num_of_steps += 50;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), EXTEND);
        assert_eq!(cache.steady_num_of_steps(), 150);
    }

    #[test]
    fn fewer_steady_steps_change_nothing() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.steady_num_of_steps = 10;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), FRESH);
        assert_eq!(cache.steady_num_of_steps(), 10);
    }

    #[test]
    fn steady_timestep_change_invalidates_both() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.current_timestep = 1;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
    }

    #[test]
    fn steady_direction_change_invalidates_both() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.direction = FlowDirection::Bidirectional;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
    }

    #[test]
    fn steady_to_unsteady_invalidates_both() {
        let mut cfg = base();
        let mut cache = settled(&cfg);
        cfg.steady = false;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
        assert!(!cache.is_steady());
    }

    // -----------------------------------------------------------------
    // Unsteady mode
    // -----------------------------------------------------------------

    #[test]
    fn later_timestep_extends() {
        let mut cfg = base();
        cfg.steady = false;
        let mut cache = settled(&cfg);
        cfg.current_timestep = 3;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), EXTEND);
        assert_eq!(cache.current_timestep(), Some(3));
    }

    #[test]
    fn earlier_timestep_changes_nothing() {
        let mut cfg = base();
        cfg.steady = false;
        cfg.current_timestep = 4;
        let mut cache = settled(&cfg);
        cfg.current_timestep = 2;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), FRESH);
        assert_eq!(cache.current_timestep(), Some(2));
    }

    #[test]
    fn unsteady_ignores_direction() {
        let mut cfg = base();
        cfg.steady = false;
        let mut cache = settled(&cfg);
        cfg.direction = FlowDirection::Backward;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), FRESH);
    }

    #[test]
    fn unsteady_to_steady_invalidates_both() {
        let mut cfg = base();
        cfg.steady = false;
        let mut cache = settled(&cfg);
        cfg.steady = true;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
        assert!(cache.is_steady());
    }

    #[test]
    fn extension_does_not_mask_pending_reset() {
        let mut cfg = base();
        cfg.steady = false;
        let mut cache = settled(&cfg);
        cfg.velocity_multiplier = 3.0;
        cfg.current_timestep = 2;
        cache.observe(&cfg);
        assert_eq!(statuses(&cache), STALE);
    }
}
