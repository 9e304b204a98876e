//! Flow configuration, validation, and error types.
//!
//! [`FlowConfig`] is what a front end hands to the
//! [`FlowDriver`](crate::driver::FlowDriver) every frame.
//! [`validate()`](FlowConfig::validate) checks the structural invariants
//! that do not depend on the loaded dataset; the driver checks the rest
//! (timestep range) against its timestamps.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use flowline_advect::AdvectionMethod;
use flowline_core::Vec3;

// ── FlowDirection ──────────────────────────────────────────────────

/// Integration direction for steady flow.
///
/// Unsteady flow always integrates forward in time; the direction is
/// ignored there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlowDirection {
    /// Follow the velocity.
    #[default]
    Forward,
    /// Integrate against the velocity.
    Backward,
    /// Two advections from the same seeds, one in each direction.
    Bidirectional,
}

// ── Seeding ────────────────────────────────────────────────────────

/// Axis-aligned box that seeds are placed in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rake {
    /// Lower corner.
    pub min: Vec3,
    /// Upper corner.
    pub max: Vec3,
}

impl Default for Rake {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ONE,
        }
    }
}

/// Where seed particles come from.
#[derive(Clone, Debug, PartialEq)]
pub enum SeedMode {
    /// An interior lattice of the rake with the given counts per axis.
    Gridded {
        /// Seeds along x, y, z.
        counts: [usize; 3],
    },
    /// Uniformly distributed seeds inside the rake.
    Random {
        /// Number of seeds.
        count: usize,
        /// RNG seed, so the same configuration reseeds identically.
        rng_seed: u64,
    },
    /// Seeds read from a gnuplot-style text file.
    List {
        /// Path of the seed file.
        path: PathBuf,
    },
}

impl Default for SeedMode {
    fn default() -> Self {
        Self::Gridded { counts: [4, 4, 1] }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`FlowConfig::validate()`] or driver setup.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// No velocity field name was given.
    EmptyVelocityField,
    /// The velocity multiplier is NaN or infinite.
    InvalidMultiplier {
        /// The invalid value.
        value: f32,
    },
    /// The base step fraction is not finite and positive.
    InvalidStepFraction {
        /// The invalid value.
        value: f32,
    },
    /// The rake box is empty or not finite.
    InvalidRake {
        /// Description of the problem.
        reason: String,
    },
    /// The seed mode cannot produce seeds.
    InvalidSeedMode {
        /// Description of the problem.
        reason: String,
    },
    /// The dataset has no timestamps.
    NoTimestamps,
    /// Timestamps are not finite and strictly increasing.
    InvalidTimestamps {
        /// Description of the problem.
        reason: String,
    },
    /// The current timestep is past the last timestamp.
    TimestepOutOfRange {
        /// The configured timestep index.
        index: usize,
        /// Number of timestamps available.
        len: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyVelocityField => write!(f, "velocity field name is empty"),
            Self::InvalidMultiplier { value } => {
                write!(f, "velocity multiplier must be finite, got {value}")
            }
            Self::InvalidStepFraction { value } => {
                write!(f, "base step fraction must be finite and positive, got {value}")
            }
            Self::InvalidRake { reason } => write!(f, "invalid rake: {reason}"),
            Self::InvalidSeedMode { reason } => write!(f, "invalid seed mode: {reason}"),
            Self::NoTimestamps => write!(f, "dataset has no timestamps"),
            Self::InvalidTimestamps { reason } => write!(f, "invalid timestamps: {reason}"),
            Self::TimestepOutOfRange { index, len } => {
                write!(f, "timestep {index} out of range for {len} timestamps")
            }
        }
    }
}

impl Error for ConfigError {}

// ── FlowConfig ─────────────────────────────────────────────────────

/// Complete per-frame configuration of a flow visualization.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowConfig {
    /// Registered name of the velocity field.
    pub velocity_field: String,
    /// Registered name of the color field; `None` draws in a single color
    /// and skips scalar sampling.
    pub color_field: Option<String>,
    /// Steady flow (step count) or unsteady flow (timestamps).
    pub steady: bool,
    /// Number of steps for steady flow. Default: 100.
    pub steady_num_of_steps: usize,
    /// Index of the current timestamp.
    pub current_timestep: usize,
    /// Integration direction for steady flow.
    pub direction: FlowDirection,
    /// Seed source.
    pub seed_mode: SeedMode,
    /// Box used by the rake seed modes.
    pub rake: Rake,
    /// Per-axis periodic boundaries.
    pub periodic: [bool; 3],
    /// Factor applied to every velocity sample. Default: 1.0.
    pub velocity_multiplier: f32,
    /// Integration scheme. Default: RK4.
    pub method: AdvectionMethod,
    /// Base step as a fraction of the first timestamp interval.
    /// Default: 0.05.
    pub base_step_fraction: f32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            velocity_field: String::new(),
            color_field: None,
            steady: true,
            steady_num_of_steps: 100,
            current_timestep: 0,
            direction: FlowDirection::default(),
            seed_mode: SeedMode::default(),
            rake: Rake::default(),
            periodic: [false; 3],
            velocity_multiplier: 1.0,
            method: AdvectionMethod::default(),
            base_step_fraction: 0.05,
        }
    }
}

impl FlowConfig {
    /// Validate all dataset-independent invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. A velocity field must be named.
        if self.velocity_field.is_empty() {
            return Err(ConfigError::EmptyVelocityField);
        }
        // 2. Numeric knobs.
        if !self.velocity_multiplier.is_finite() {
            return Err(ConfigError::InvalidMultiplier {
                value: self.velocity_multiplier,
            });
        }
        if !self.base_step_fraction.is_finite() || self.base_step_fraction <= 0.0 {
            return Err(ConfigError::InvalidStepFraction {
                value: self.base_step_fraction,
            });
        }
        // 3. Rake must be a finite, non-inverted box.
        let Rake { min, max } = self.rake;
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::InvalidRake {
                reason: "corners must be finite".to_string(),
            });
        }
        if min.cmpgt(max).any() {
            return Err(ConfigError::InvalidRake {
                reason: format!("min {min} exceeds max {max}"),
            });
        }
        // 4. Seed mode must be able to produce seeds.
        match &self.seed_mode {
            SeedMode::Gridded { counts } => {
                if counts.contains(&0) {
                    return Err(ConfigError::InvalidSeedMode {
                        reason: format!("grid counts must be at least 1, got {counts:?}"),
                    });
                }
            }
            SeedMode::Random { count, .. } => {
                if *count == 0 {
                    return Err(ConfigError::InvalidSeedMode {
                        reason: "random seed count must be at least 1".to_string(),
                    });
                }
            }
            SeedMode::List { path } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidSeedMode {
                        reason: "seed list path is empty".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether a second, backward advection is needed.
    pub fn is_bidirectional(&self) -> bool {
        self.steady && self.direction == FlowDirection::Bidirectional
    }
}
