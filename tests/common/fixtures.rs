//! Plant fixtures with known analytical behaviour
//!
//! These configurations have hand-computable discharge windows and
//! compositions, making them ideal for validating the engine output.

use belt_rs::model::{Color, Material, MaterialRegistry, Silo, SimulationParameters};
use belt_rs::sim::Scenario;

/// Registry with two materials, "Sinter" (index 0) and "Coke" (index 1)
pub fn two_material_registry() -> MaterialRegistry {
    MaterialRegistry::new(vec![
        Material::new("Sinter", Color::new(178, 34, 34)),
        Material::new("Coke", Color::new(47, 47, 47)),
    ])
}

/// The canonical single-silo case
///
/// One silo, capacity 100, flow 10, start 0, position 0, material "Sinter".
/// Discharges exactly over the window [0, 10): 10 steps of 10 kg at
/// resolution 1.
pub fn single_silo_scenario() -> Scenario {
    Scenario::new(
        two_material_registry(),
        vec![Silo::new("Sinter", 100.0, 10.0, 0.0, 0.0)],
    )
}

/// Three silos with staggered, overlapping windows
///
/// - Sinter: 100 kg at 10 kg/s over [0, 10) at position 0
/// - Sinter:  60 kg at 12 kg/s over [5, 10) at position 20
/// - Coke:    40 kg at  5 kg/s over [2, 10) at position 40
///
/// During [5, 10) all three discharge: Sinter flows 22, Coke flows 5.
pub fn three_silo_blend_scenario() -> Scenario {
    Scenario::new(
        two_material_registry(),
        vec![
            Silo::new("Sinter", 100.0, 10.0, 0.0, 0.0),
            Silo::new("Sinter", 60.0, 12.0, 5.0, 20.0),
            Silo::new("Coke", 40.0, 5.0, 2.0, 40.0),
        ],
    )
}

/// The canonical parameter set: 20 s, 100 m belt, 1 m buckets, 1 m/s
///
/// Derived grid: dt = 1 s, 21 samples at t = 0..=20.
pub fn reference_parameters() -> SimulationParameters {
    SimulationParameters::new(20.0, 100.0, 1.0, 1.0)
}
