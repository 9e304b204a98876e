//! Flow driver orchestrating Flowline advections.
//!
//! Provides the [`FlowDriver`] that owns the registered fields and the
//! dataset timestamps, generates seeds, runs one or two
//! [`Advection`](flowline_advect::Advection)s, colors the particles, and
//! recomputes only what a configuration change made stale.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adapters;
pub mod config;
pub mod driver;
pub mod error;
pub mod registry;
pub mod seeding;
pub mod status;

pub use config::{ConfigError, FlowConfig, FlowDirection, Rake, SeedMode};
pub use driver::{FlowDriver, Polyline, PolylineVertex};
pub use error::EngineError;
pub use registry::FieldRegistry;
pub use status::{FlowCache, FlowStatus};
