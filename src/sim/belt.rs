//! Belt occupancy snapshots
//!
//! For any instant on the sample grid, the belt can be described by a
//! materials × segments matrix: how much of each material sits in each
//! position bucket, plus the mass per material that has already travelled
//! past the far end. A snapshot is a pure function of (scenario,
//! parameters, time): every discharged parcel is advected from its
//! discharge step to the probe time and bucketed, so no mutable belt state
//! is carried between engine steps.

use nalgebra::{DMatrix, DVector};

use crate::model::SimulationParameters;
use crate::sim::calculator::{belt_arrival_position, instantaneous_flow, material_falls_off};
use crate::sim::scenario::Scenario;
use crate::sim::validator::Violation;

/// Per-bucket, per-material mass on the belt at one instant
///
/// Row `m` is the registry material with index `m`; column `s` is the belt
/// bucket starting at `s * resolution`. Masses share the unit of the silo
/// capacities.
///
/// # Example
///
/// ```rust
/// use belt_rs::model::{Color, Material, MaterialRegistry, Silo, SimulationParameters};
/// use belt_rs::sim::{BeltOccupancy, Scenario};
///
/// let registry = MaterialRegistry::new(vec![Material::new("A", Color::new(0, 0, 0))]);
/// let scenario = Scenario::new(registry, vec![Silo::new("A", 100.0, 10.0, 0.0, 0.0)]);
/// let parameters = SimulationParameters::new(20.0, 100.0, 1.0, 1.0);
///
/// let belt = BeltOccupancy::at_time(&scenario, &parameters, 5.0).unwrap();
/// // Grid steps t = 0..=5 discharged 10 kg each; nothing has reached the
/// // far end yet.
/// assert_eq!(belt.total_on_belt(), 60.0);
/// assert_eq!(belt.total_exited(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BeltOccupancy {
    /// Probe instant of this snapshot
    time: f64,
    /// materials × segments mass matrix
    occupancy: DMatrix<f64>,
    /// Mass per material that has left the modeled span
    exited: DVector<f64>,
}

impl BeltOccupancy {
    /// Compute the occupancy snapshot at time `t`
    ///
    /// Replays the discharge grid up to `t`: the parcel discharged by a
    /// silo during the step starting at `t_i` has mass
    /// `instantaneous_flow(silo, t_i, dt) * dt` and sits at
    /// `belt_arrival_position(silo, t, t_i, velocity)` by the probe time —
    /// on the belt in its bucket, or in the exited tally once it has
    /// fallen off the far end.
    ///
    /// Fails only on an unresolved material reference, which a validated
    /// scenario cannot produce.
    pub fn at_time(
        scenario: &Scenario,
        parameters: &SimulationParameters,
        t: f64,
    ) -> Result<Self, Violation> {
        let material_index = scenario.material_indices()?;

        let materials = scenario.material_count();
        let segments = parameters.segment_count();
        let dt = parameters.time_step();

        let mut occupancy = DMatrix::zeros(materials, segments);
        let mut exited = DVector::zeros(materials);

        for (silo, &row) in scenario.silos().iter().zip(material_index.iter()) {
            // Steps on the grid no later than the probe time.
            let mut step = 0usize;
            loop {
                let t0 = step as f64 * dt;
                if t0 > t || t0 > parameters.total_time {
                    break;
                }

                let mass = instantaneous_flow(silo, t0, dt) * dt;
                if mass > 0.0 {
                    // t0 <= t, so the parcel always exists by the probe time.
                    if let Some(position) =
                        belt_arrival_position(silo, t, t0, parameters.belt_velocity)
                    {
                        if material_falls_off(position, parameters.conveyor_length) {
                            exited[row] += mass;
                        } else {
                            occupancy[(row, parameters.segment_of(position))] += mass;
                        }
                    }
                }

                step += 1;
            }
        }

        Ok(Self {
            time: t,
            occupancy,
            exited,
        })
    }

    /// Probe instant of this snapshot
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of material rows
    pub fn materials(&self) -> usize {
        self.occupancy.nrows()
    }

    /// Number of belt buckets
    pub fn segments(&self) -> usize {
        self.occupancy.ncols()
    }

    /// The materials × segments mass matrix
    pub fn occupancy(&self) -> &DMatrix<f64> {
        &self.occupancy
    }

    /// Total on-belt mass of one material
    pub fn mass_of(&self, material: usize) -> f64 {
        self.occupancy.row(material).sum()
    }

    /// Total mass currently on the belt
    pub fn total_on_belt(&self) -> f64 {
        self.occupancy.sum()
    }

    /// Mass of one material that has left the modeled span
    pub fn exited_of(&self, material: usize) -> f64 {
        self.exited[material]
    }

    /// Total mass that has left the modeled span
    pub fn total_exited(&self) -> f64 {
        self.exited.sum()
    }

    /// Composition fractions inside one bucket
    ///
    /// Fractions sum to 1 when the bucket holds any mass, and are all
    /// exactly 0 for an empty bucket — the same zero-division guard the
    /// engine applies to the flow composition.
    pub fn composition_at_segment(&self, segment: usize) -> DVector<f64> {
        let column = self.occupancy.column(segment);
        let total: f64 = column.sum();

        if total > 0.0 {
            DVector::from_iterator(self.materials(), column.iter().map(|m| m / total))
        } else {
            DVector::zeros(self.materials())
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
