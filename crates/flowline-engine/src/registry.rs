//! Named velocity and scalar fields.
//!
//! Fields are registered explicitly by the host; there is no global
//! lookup. Names iterate in registration order.

use indexmap::IndexMap;

use flowline_core::{ScalarField, VelocityField};

/// Registered fields, keyed by name.
#[derive(Default)]
pub struct FieldRegistry {
    velocity: IndexMap<String, Box<dyn VelocityField>>,
    scalar: IndexMap<String, Box<dyn ScalarField>>,
}

impl FieldRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a velocity field, returning the one it replaces.
    pub fn register_velocity(
        &mut self,
        name: impl Into<String>,
        field: impl VelocityField + 'static,
    ) -> Option<Box<dyn VelocityField>> {
        self.velocity.insert(name.into(), Box::new(field))
    }

    /// Register a scalar field, returning the one it replaces.
    pub fn register_scalar(
        &mut self,
        name: impl Into<String>,
        field: impl ScalarField + 'static,
    ) -> Option<Box<dyn ScalarField>> {
        self.scalar.insert(name.into(), Box::new(field))
    }

    /// Look up a velocity field.
    pub fn velocity(&self, name: &str) -> Option<&dyn VelocityField> {
        self.velocity.get(name).map(|f| f.as_ref())
    }

    /// Look up a scalar field.
    pub fn scalar(&self, name: &str) -> Option<&dyn ScalarField> {
        self.scalar.get(name).map(|f| f.as_ref())
    }

    /// Velocity field names.
    pub fn velocity_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.velocity.keys().map(String::as_str)
    }

    /// Scalar field names.
    pub fn scalar_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.scalar.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline_core::Vec3;
    use flowline_test_utils::{ConstScalar, UniformFlow};

    #[test]
    fn lookup_by_name() {
        let mut reg = FieldRegistry::new();
        reg.register_velocity("wind", UniformFlow::new(Vec3::X));
        reg.register_scalar("temp", ConstScalar(3.0));

        let v = reg.velocity("wind").unwrap();
        assert_eq!(v.velocity(0.0, Vec3::ZERO).unwrap(), Vec3::X);
        assert_eq!(reg.scalar("temp").unwrap().scalar(0.0, Vec3::ZERO), Ok(3.0));
        assert!(reg.velocity("temp").is_none());
        assert!(reg.scalar("wind").is_none());
    }

    #[test]
    fn names_keep_registration_order() {
        let mut reg = FieldRegistry::new();
        reg.register_velocity("b", UniformFlow::new(Vec3::X));
        reg.register_velocity("a", UniformFlow::new(Vec3::Y));
        assert_eq!(reg.velocity_names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn reregistering_replaces() {
        let mut reg = FieldRegistry::new();
        assert!(reg.register_velocity("wind", UniformFlow::new(Vec3::X)).is_none());
        assert!(reg.register_velocity("wind", UniformFlow::new(Vec3::Y)).is_some());
        let v = reg.velocity("wind").unwrap();
        assert_eq!(v.velocity(0.0, Vec3::ZERO).unwrap(), Vec3::Y);
        assert_eq!(reg.velocity_names().count(), 1);
    }
}
