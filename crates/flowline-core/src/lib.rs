//! Core types and traits for the Flowline advection engine.
//!
//! This is the leaf crate with no internal dependencies. It defines
//! the particle data model, the field sampling capabilities consumed by
//! the integrators, and the error types shared across the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod particle;

pub use error::{AdvectError, AdvectStatus, FieldError, FileError};
pub use field::{ScalarField, VelocityField};
pub use particle::{Axis, Particle, Stream};

/// Re-exported so downstream crates agree on the vector type.
pub use glam::Vec3;
