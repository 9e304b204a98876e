//! Flowline: streamline and pathline advection for flow visualization.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Flowline sub-crates. For most users, adding `flowline` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use flowline::prelude::*;
//!
//! // A uniform breeze along +x, valid everywhere.
//! struct Breeze;
//! impl VelocityField for Breeze {
//!     fn velocity(&self, _time: f32, _position: Vec3) -> Result<Vec3, FieldError> {
//!         Ok(Vec3::X)
//!     }
//!     fn inside_volume(&self, _time: f32, _position: Vec3) -> bool {
//!         true
//!     }
//! }
//!
//! let mut registry = FieldRegistry::new();
//! registry.register_velocity("breeze", Breeze);
//! let mut driver = FlowDriver::new(registry, vec![0.0, 1.0]).unwrap();
//!
//! // Default seeding is a 4x4 rake in the unit box.
//! let config = FlowConfig {
//!     velocity_field: "breeze".into(),
//!     steady_num_of_steps: 10,
//!     ..FlowConfig::default()
//! };
//! driver.update(&config).unwrap();
//!
//! let lines = driver.polylines();
//! assert_eq!(lines.len(), 16);
//! assert!(lines.iter().all(|line| line.len() == 11));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `flowline-core` | Particles, field traits, errors |
//! | [`advect`] | `flowline-advect` | Stream container, integrators, periodicity, gnuplot I/O |
//! | [`engine`] | `flowline-engine` | Flow driver, configuration, seeding, field registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and traits (`flowline-core`).
///
/// Contains [`types::Particle`], the field sampling traits
/// ([`types::VelocityField`], [`types::ScalarField`]), and the shared
/// error types.
pub use flowline_core as types;

/// Advection engine (`flowline-advect`).
///
/// [`advect::Advection`] owns the streams; [`advect::gnuplot`] reads and
/// writes them as text.
pub use flowline_advect as advect;

/// Flow driver (`flowline-engine`).
///
/// [`engine::FlowDriver`] keeps trajectories in sync with an
/// [`engine::FlowConfig`], recomputing only what changed.
pub use flowline_engine as engine;

/// Common imports for typical Flowline usage.
///
/// ```rust
/// use flowline::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use flowline_core::{Axis, Particle, ScalarField, Stream, Vec3, VelocityField};

    // Errors
    pub use flowline_core::{AdvectError, AdvectStatus, FieldError, FileError};
    pub use flowline_engine::{ConfigError, EngineError};

    // Advection
    pub use flowline_advect::{Advection, AdvectionMethod};

    // Engine
    pub use flowline_engine::{
        FieldRegistry, FlowConfig, FlowDirection, FlowDriver, FlowStatus, Polyline, Rake, SeedMode,
    };
}
