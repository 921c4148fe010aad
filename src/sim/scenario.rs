//! Simulation scenario definition
//!
//! A scenario combines a material registry with the silo list that
//! discharges onto the belt.

use crate::model::{MaterialRegistry, Silo};
use crate::sim::validator::Violation;

/// Simulation scenario
///
/// Defines a specific plant to simulate:
/// - Material registry (identities and display properties)
/// - Silo list (sources, schedules, positions)
///
/// # Design
///
/// The same scenario can be run under different parameters (finer
/// resolution, longer horizon) without rebuilding it. This is the "WHAT to
/// simulate" (not "HOW to discretize").
///
/// # Examples
///
/// ```rust
/// use belt_rs::model::{Color, Material, MaterialRegistry, Silo};
/// use belt_rs::sim::Scenario;
///
/// let registry = MaterialRegistry::new(vec![Material::new("A", Color::new(0, 0, 0))]);
/// let scenario = Scenario::new(registry, vec![Silo::new("A", 100.0, 10.0, 0.0, 0.0)]);
///
/// assert_eq!(scenario.silo_count(), 1);
/// assert_eq!(scenario.material_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    registry: MaterialRegistry,
    silos: Vec<Silo>,
}

impl Scenario {
    /// Create a scenario
    pub fn new(registry: MaterialRegistry, silos: Vec<Silo>) -> Self {
        Self { registry, silos }
    }

    /// The material registry
    pub fn registry(&self) -> &MaterialRegistry {
        &self.registry
    }

    /// The silo list, in caller order
    pub fn silos(&self) -> &[Silo] {
        &self.silos
    }

    /// Number of registered materials
    pub fn material_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of silos
    pub fn silo_count(&self) -> usize {
        self.silos.len()
    }

    /// Registry index of each silo's material, in silo order
    ///
    /// Fails with the first unresolved reference; after a successful
    /// [`validate`](crate::sim::validate) pass this cannot fail.
    pub fn material_indices(&self) -> Result<Vec<usize>, Violation> {
        self.silos
            .iter()
            .enumerate()
            .map(|(index, silo)| {
                self.registry
                    .index_of(silo.material())
                    .ok_or_else(|| Violation::UnknownMaterial {
                        silo: index,
                        material: silo.material().to_string(),
                    })
            })
            .collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
