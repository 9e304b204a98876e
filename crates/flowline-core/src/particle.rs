//! The particle data model: [`Particle`], [`Stream`], and [`Axis`].

use glam::Vec3;
use smallvec::SmallVec;

/// One seed's trajectory: time-ordered particles, interrupted by zero or
/// more separators wherever the trajectory wrapped across a periodic
/// boundary.
pub type Stream = Vec<Particle>;

/// A spatial axis of the 3D domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The first spatial axis.
    X,
    /// The second spatial axis.
    Y,
    /// The third spatial axis.
    Z,
}

impl Axis {
    /// All three axes in component order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis into a `Vec3` (0, 1, or 2).
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// A point sample in space-time.
///
/// `value` holds the sampled scalar used for coloring; `0.0` means "not yet
/// computed". A *special* particle is a separator marking a discontinuity
/// in its stream; its location and value carry no meaning and it is never
/// advected from or colored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Particle {
    /// Position in the field's coordinate space.
    pub location: Vec3,
    /// Simulation time of this sample.
    pub time: f32,
    /// Attached scalar value (`0.0` = not yet computed).
    pub value: f32,
    special: bool,
    properties: SmallVec<[f32; 2]>,
}

impl Particle {
    /// Create a particle at `location` and `time` with no value attached.
    pub fn new(location: Vec3, time: f32) -> Self {
        Self {
            location,
            time,
            ..Self::default()
        }
    }

    /// Build a particle from 3 or 4 raw components.
    ///
    /// The first three are the location; the optional fourth is the time,
    /// which defaults to `0.0`. Components past the fourth are ignored.
    /// Returns `None` when fewer than three components are supplied.
    pub fn from_components(values: &[f32]) -> Option<Self> {
        match values {
            [x, y, z] => Some(Self::new(Vec3::new(*x, *y, *z), 0.0)),
            [x, y, z, t, ..] => Some(Self::new(Vec3::new(*x, *y, *z), *t)),
            _ => None,
        }
    }

    /// Create a separator particle.
    pub fn separator() -> Self {
        Self {
            special: true,
            ..Self::default()
        }
    }

    /// Whether this particle is a separator rather than a physical sample.
    pub fn is_special(&self) -> bool {
        self.special
    }

    /// Mark or unmark this particle as a separator.
    pub fn set_special(&mut self, special: bool) {
        self.special = special;
    }

    /// Append one value to the attached-property history.
    pub fn attach_property(&mut self, value: f32) {
        self.properties.push(value);
    }

    /// The attached-property history, oldest first.
    pub fn properties(&self) -> &[f32] {
        &self.properties
    }

    /// Drop the attached-property history, keeping geometry and value.
    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }
}
