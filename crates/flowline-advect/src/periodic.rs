//! Periodic boundary configuration and the wrap-and-splice helper.
//!
//! Periodicity only changes how an out-of-volume position is
//! reinterpreted; it never touches the integration math.

use flowline_core::{Axis, Particle, Stream, Vec3, VelocityField};

/// Wrap settings for one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PeriodicAxis {
    /// Whether positions wrap along this axis.
    pub enabled: bool,
    /// Lower bound of the period (inclusive).
    pub min: f32,
    /// Upper bound of the period (exclusive).
    pub max: f32,
}

/// Per-axis periodicity. All axes start disabled with bounds `(0, 0)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Periodicity {
    axes: [PeriodicAxis; 3],
}

impl Periodicity {
    /// Enable or disable wrapping along `axis`.
    ///
    /// Disabling resets that axis's bounds to `(0, 0)`.
    pub fn set(&mut self, axis: Axis, enabled: bool, min: f32, max: f32) {
        self.axes[axis.index()] = if enabled {
            PeriodicAxis { enabled, min, max }
        } else {
            PeriodicAxis::default()
        };
    }

    /// Current settings for `axis`.
    pub fn axis(&self, axis: Axis) -> PeriodicAxis {
        self.axes[axis.index()]
    }

    /// Whether any axis wraps.
    pub fn any(&self) -> bool {
        self.axes.iter().any(|a| a.enabled)
    }

    /// Remap every periodic coordinate of `position` into its period.
    ///
    /// Returns `None` when no axis is periodic.
    pub fn wrap(&self, position: Vec3) -> Option<Vec3> {
        if !self.any() {
            return None;
        }
        let mut out = position;
        for (i, a) in self.axes.iter().enumerate() {
            if a.enabled {
                out[i] = apply_periodic(out[i], a.min, a.max);
            }
        }
        Some(out)
    }
}

/// Shift `val` by whole spans of `max - min` until it lies in `[min, max)`.
///
/// Values that cannot be wrapped (non-finite input or an empty span) are
/// returned unchanged.
pub fn apply_periodic(val: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    if !val.is_finite() || span.is_nan() || span <= 0.0 {
        return val;
    }
    if val >= min && val < max {
        return val;
    }
    let wrapped = min + (val - min).rem_euclid(span);
    if wrapped >= max {
        min
    } else {
        wrapped
    }
}

/// What [`wrap_and_splice`] did to a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapOutcome {
    /// The last particle was already inside the volume; nothing changed.
    Inside,
    /// The last particle was wrapped back inside and a separator was
    /// inserted in front of it.
    Wrapped,
    /// The last particle is outside and no axis is periodic.
    NotPeriodic,
    /// The last particle is outside even after wrapping; nothing changed.
    StillOutside,
}

impl WrapOutcome {
    /// Whether the stream can be advanced from its last particle.
    pub fn can_advance(self) -> bool {
        matches!(self, Self::Inside | Self::Wrapped)
    }
}

/// Bring the last particle of `stream` back into the velocity field's
/// volume across periodic boundaries.
///
/// On success the last particle's location is overwritten with the
/// wrapped location first, and only then is a separator inserted
/// immediately before it, so the stream ends `[.., separator, wrapped]`.
/// The caller owns the stream's separator count and must increment it on
/// [`WrapOutcome::Wrapped`].
pub fn wrap_and_splice(
    stream: &mut Stream,
    periodicity: &Periodicity,
    velocity: &dyn VelocityField,
) -> WrapOutcome {
    let Some(last) = stream.last_mut() else {
        return WrapOutcome::StillOutside;
    };
    if velocity.inside_volume(last.time, last.location) {
        return WrapOutcome::Inside;
    }
    let Some(wrapped) = periodicity.wrap(last.location) else {
        return WrapOutcome::NotPeriodic;
    };
    if !velocity.inside_volume(last.time, wrapped) {
        return WrapOutcome::StillOutside;
    }

    last.location = wrapped;
    let at = stream.len() - 1;
    stream.insert(at, Particle::separator());
    WrapOutcome::Wrapped
}
