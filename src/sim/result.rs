//! Immutable simulation output
//!
//! The engine owns the result exclusively while it is being built and hands
//! it over by value once the run completes. Post-construction the result is
//! read-only: private fields, accessor methods, and derived views that are
//! sufficient to drive all four external displays (per-material flow vs
//! time, composition vs time, total flow vs time, silo operating schedule)
//! without re-running any calculator logic.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::model::{Silo, SimulationParameters};
use crate::sim::belt::BeltOccupancy;
use crate::sim::calculator::is_discharging;
use crate::sim::scenario::Scenario;

// =================================================================================================
// Silo State
// =================================================================================================

/// Operating state of one silo at one sample instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiloState {
    /// The discharge window has not opened yet
    Idle,
    /// Inside the half-open discharge window
    Discharging,
    /// The window has closed (capacity exhausted)
    Finished,
}

impl SiloState {
    /// Classify a silo at time `t`
    ///
    /// At exactly `stop_time` the silo reports `Finished`, matching the
    /// half-open discharge window of
    /// [`is_discharging`](crate::sim::calculator::is_discharging).
    pub fn at(silo: &Silo, t: f64) -> Self {
        if is_discharging(silo, t) {
            SiloState::Discharging
        } else if t < silo.start_time() {
            SiloState::Idle
        } else {
            SiloState::Finished
        }
    }

    /// Whether this state means active discharge
    pub fn is_discharging(&self) -> bool {
        matches!(self, SiloState::Discharging)
    }
}

// =================================================================================================
// Simulation Sample
// =================================================================================================

/// One instant of the simulation output
///
/// Per-material vectors are laid out in registry index order. Composition
/// fractions sum to 1 whenever `total_flow > 0` and are all exactly 0
/// otherwise — never NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSample {
    /// Sample timestamp
    pub time: f64,
    /// Instantaneous flow per material at the discharge point [mass/time]
    pub flow_rates: DVector<f64>,
    /// Composition fraction per material
    pub composition: DVector<f64>,
    /// Sum of all material flows [mass/time]
    pub total_flow: f64,
    /// Operating state of each silo, in silo list order
    pub silo_states: Vec<SiloState>,
}

// =================================================================================================
// Mass Balance
// =================================================================================================

/// Conservation summary of one run
///
/// Total discharged mass should equal on-belt inventory plus exited mass;
/// the error fields quantify any numerical drift.
#[derive(Debug, Clone, PartialEq)]
pub struct MassBalance {
    /// Mass discharged per material over the whole run
    pub discharged: DVector<f64>,
    /// Sum of all discharged mass
    pub total_discharged: f64,
    /// Mass still on the belt at the final sample
    pub on_belt: f64,
    /// Mass that travelled past the far end of the belt
    pub exited: f64,
    /// `|total_discharged - (on_belt + exited)|`
    pub balance_error: f64,
    /// Balance error relative to the discharged total, in percent
    pub balance_error_percent: f64,
}

// =================================================================================================
// Simulation Result
// =================================================================================================

/// Complete, ordered output of one simulation run
///
/// Samples are strictly ordered by timestamp — a hard invariant regardless
/// of how the engine computed them. The result also carries the scenario
/// and parameters that produced it, the final-time belt occupancy, and
/// free-form string metadata for diagnostics and reproducibility.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    samples: Vec<SimulationSample>,
    scenario: Scenario,
    parameters: SimulationParameters,
    final_belt: BeltOccupancy,
    metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Assemble a result; engine-internal
    pub(crate) fn new(
        samples: Vec<SimulationSample>,
        scenario: Scenario,
        parameters: SimulationParameters,
        final_belt: BeltOccupancy,
    ) -> Self {
        Self {
            samples,
            scenario,
            parameters,
            final_belt,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry; engine-internal
    pub(crate) fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    // ======================================== Accessors =========================================

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check emptiness (a completed run always has at least one sample)
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The ordered sample sequence
    pub fn samples(&self) -> &[SimulationSample] {
        &self.samples
    }

    /// The scenario this result was computed from
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The parameters this result was computed with
    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Belt occupancy at the final sample time
    pub fn belt_occupancy(&self) -> &BeltOccupancy {
        &self.final_belt
    }

    /// Diagnostic metadata (engine name, step count, time step, ...)
    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    // ====================================== Derived Views =======================================

    /// Sample timestamps in order
    pub fn time_points(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    /// Material names in registry (vector index) order
    pub fn material_names(&self) -> Vec<&str> {
        self.scenario.registry().names()
    }

    /// Flow-vs-time series of one material, by name
    pub fn flow_series(&self, material: &str) -> Option<Vec<f64>> {
        let index = self.scenario.registry().index_of(material)?;
        Some(self.samples.iter().map(|s| s.flow_rates[index]).collect())
    }

    /// Composition-vs-time series of one material, by name
    pub fn composition_series(&self, material: &str) -> Option<Vec<f64>> {
        let index = self.scenario.registry().index_of(material)?;
        Some(self.samples.iter().map(|s| s.composition[index]).collect())
    }

    /// Total-flow-vs-time series
    pub fn total_flow_series(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.total_flow).collect()
    }

    /// Operating schedule of one silo across all samples
    pub fn silo_schedule(&self, silo: usize) -> Option<Vec<SiloState>> {
        if silo >= self.scenario.silo_count() {
            return None;
        }
        Some(self.samples.iter().map(|s| s.silo_states[silo]).collect())
    }

    /// Belt occupancy snapshot at an arbitrary probe time
    ///
    /// Recomputed on demand from the stored scenario and parameters; the
    /// final-time snapshot is pre-computed and available through
    /// [`belt_occupancy`](SimulationResult::belt_occupancy).
    pub fn belt_occupancy_at(&self, t: f64) -> BeltOccupancy {
        // The scenario was validated before this result existed, so the
        // material references are guaranteed to resolve.
        BeltOccupancy::at_time(&self.scenario, &self.parameters, t)
            .unwrap_or_else(|_| self.final_belt.clone())
    }

    /// Mass-balance summary of the run
    ///
    /// Discharged totals integrate the recorded flow samples over the step
    /// width; on-belt and exited masses come from the final occupancy
    /// snapshot.
    pub fn mass_balance(&self) -> MassBalance {
        let materials = self.scenario.material_count();
        let dt = self.parameters.time_step();

        let mut discharged = DVector::zeros(materials);
        for sample in &self.samples {
            discharged += &sample.flow_rates * dt;
        }

        let total_discharged: f64 = discharged.sum();
        let on_belt = self.final_belt.total_on_belt();
        let exited = self.final_belt.total_exited();

        let balance_error = (total_discharged - (on_belt + exited)).abs();
        let balance_error_percent = if total_discharged > 0.0 {
            balance_error / total_discharged * 100.0
        } else {
            0.0
        };

        MassBalance {
            discharged,
            total_discharged,
            on_belt,
            exited,
            balance_error,
            balance_error_percent,
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ====== Silo state classification ======

    #[test]
    fn test_silo_state_transitions() {
        let silo = Silo::new("A", 100.0, 10.0, 5.0, 0.0); // window [5, 15)

        assert_eq!(SiloState::at(&silo, 0.0), SiloState::Idle);
        assert_eq!(SiloState::at(&silo, 4.999), SiloState::Idle);
        assert_eq!(SiloState::at(&silo, 5.0), SiloState::Discharging);
        assert_eq!(SiloState::at(&silo, 14.999), SiloState::Discharging);
        // At exactly stop_time the silo must already report finished.
        assert_eq!(SiloState::at(&silo, 15.0), SiloState::Finished);
        assert_eq!(SiloState::at(&silo, 1000.0), SiloState::Finished);
    }

    #[test]
    fn test_silo_state_predicate() {
        assert!(SiloState::Discharging.is_discharging());
        assert!(!SiloState::Idle.is_discharging());
        assert!(!SiloState::Finished.is_discharging());
    }
}
