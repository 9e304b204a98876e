//! Status and error types for the Flowline advection engine.
//!
//! Organized by subsystem: field sampling ([`FieldError`]), trajectory
//! text I/O ([`FileError`]), and the advection operations themselves
//! ([`AdvectError`]). Successful integration calls report an
//! [`AdvectStatus`].

use std::error::Error;
use std::fmt;
use std::io;

/// Outcome of a successful integration call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvectStatus {
    /// At least one stream gained a particle.
    Happened,
    /// No stream made progress. Not an error: every stream is parked
    /// outside the domain or its step could not be completed.
    Idle,
}

impl AdvectStatus {
    /// Returns `true` for [`AdvectStatus::Happened`].
    pub fn happened(self) -> bool {
        matches!(self, Self::Happened)
    }
}

/// Errors reported by a field capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldError {
    /// The sample position lies outside the field's valid volume.
    OutOfDomain,
    /// The backing data could not be read.
    Unavailable {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfDomain => write!(f, "sample position outside field domain"),
            Self::Unavailable { reason } => write!(f, "field data unavailable: {reason}"),
        }
    }
}

impl Error for FieldError {}

/// Errors from trajectory text import and export.
#[derive(Debug)]
pub enum FileError {
    /// No file name was given.
    EmptyPath,
    /// The file could not be opened, read, or written.
    Io(io::Error),
    /// A line could not be parsed as a seed.
    MalformedLine {
        /// 1-based line number in the input.
        line: usize,
        /// What was wrong with the line.
        detail: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "empty file name"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MalformedLine { line, detail } => {
                write!(f, "malformed line {line}: {detail}")
            }
        }
    }
}

impl Error for FileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors from advection operations.
#[derive(Debug)]
pub enum AdvectError {
    /// At least one stream has no particle; seed the advection first.
    NoSeedParticleYet,
    /// A stream index was out of range.
    StreamIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of streams held.
        len: usize,
    },
    /// The base step size is not usable for the requested integration.
    InvalidStepSize {
        /// The rejected step size.
        value: f32,
    },
    /// Scalar sampling failed on a particle that was reached by advection.
    ScalarSampleFailed {
        /// Stream index of the particle.
        stream: usize,
        /// Position of the particle within its stream.
        step: usize,
        /// The underlying field error.
        source: FieldError,
    },
    /// Trajectory text import or export failed.
    File(FileError),
    /// Field data could not be acquired for this run.
    Grid {
        /// Description of what could not be acquired.
        reason: String,
    },
}

impl fmt::Display for AdvectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSeedParticleYet => write!(f, "no seed particle yet"),
            Self::StreamIndexOutOfRange { index, len } => {
                write!(f, "stream index {index} out of range for {len} streams")
            }
            Self::InvalidStepSize { value } => write!(f, "invalid step size {value}"),
            Self::ScalarSampleFailed {
                stream,
                step,
                source,
            } => {
                write!(
                    f,
                    "scalar sampling failed at stream {stream}, step {step}: {source}"
                )
            }
            Self::File(e) => write!(f, "file error: {e}"),
            Self::Grid { reason } => write!(f, "grid error: {reason}"),
        }
    }
}

impl Error for AdvectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ScalarSampleFailed { source, .. } => Some(source),
            Self::File(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FileError> for AdvectError {
    fn from(e: FileError) -> Self {
        Self::File(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_happened() {
        assert!(AdvectStatus::Happened.happened());
        assert!(!AdvectStatus::Idle.happened());
    }

    #[test]
    fn file_error_chains_io_source() {
        let err = AdvectError::from(FileError::from(io::Error::new(
            io::ErrorKind::NotFound,
            "missing",
        )));
        assert!(err.to_string().contains("missing"));
        let file = err.source().unwrap();
        assert!(file.source().is_some());
    }

    #[test]
    fn malformed_line_display() {
        let err = FileError::MalformedLine {
            line: 3,
            detail: "unparsable token \"abc\"".to_string(),
        };
        assert_eq!(err.to_string(), "malformed line 3: unparsable token \"abc\"");
    }
}
