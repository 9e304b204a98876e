//! Streamline and pathline advection for Flowline.
//!
//! [`Advection`] owns one stream per seed particle and extends them
//! through a caller-supplied [`VelocityField`](flowline_core::VelocityField),
//! either one step at a time (steady flow) or up to a target time
//! (unsteady flow).
//!
//! # Modules
//!
//! - [`advection`]: the stream container and its operations
//! - [`integrator`]: Euler and RK4 single-step schemes
//! - [`step_size`]: the curvature-adaptive step controller
//! - [`periodic`]: per-axis wrap settings and separator splicing
//! - [`gnuplot`]: plain-text export and seed import

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod advection;
pub mod gnuplot;
pub mod integrator;
pub mod periodic;
pub mod step_size;

pub use advection::Advection;
pub use integrator::AdvectionMethod;
pub use periodic::{PeriodicAxis, Periodicity, WrapOutcome};
