//! Error type for driver operations.

use std::error::Error;
use std::fmt;

use flowline_core::AdvectError;

use crate::config::ConfigError;

/// Errors from [`FlowDriver`](crate::driver::FlowDriver) operations.
#[derive(Debug)]
pub enum EngineError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// A named field is not registered.
    UnknownField {
        /// The missing name.
        name: String,
    },
    /// Advection, coloring, or file I/O failed.
    Advect(AdvectError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::UnknownField { name } => write!(f, "no field registered as {name:?}"),
            Self::Advect(e) => write!(f, "advection error: {e}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::UnknownField { .. } => None,
            Self::Advect(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<AdvectError> for EngineError {
    fn from(e: AdvectError) -> Self {
        Self::Advect(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_source() {
        let e: EngineError = ConfigError::NoTimestamps.into();
        assert_eq!(e.to_string(), "config error: dataset has no timestamps");
        assert!(e.source().is_some());

        let e = EngineError::UnknownField {
            name: "wind".to_string(),
        };
        assert_eq!(e.to_string(), "no field registered as \"wind\"");
        assert!(e.source().is_none());

        let e: EngineError = AdvectError::NoSeedParticleYet.into();
        assert!(matches!(e, EngineError::Advect(_)));
    }
}
