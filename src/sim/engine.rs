//! Simulation engine
//!
//! # Algorithm
//!
//! The engine walks an ordered time grid from 0 to the total time and, at
//! each step:
//!
//! 1. Evaluates every silo's discharge rate via the calculator
//! 2. Aggregates flows per material — the blending step: silos discharging
//!    concurrently simply sum their contributions
//! 3. Sums the total flow and derives the zero-division-guarded composition
//! 4. Records every silo's operating state
//! 5. Reports progress and honours cancellation at the step boundary
//!
//! Each sample is a pure function of its timestamp, so the grid can also be
//! computed in ordered batches with Rayon (`parallel` feature, see
//! [`parallel_threshold`](crate::sim::parallel_threshold)); the sample
//! sequence is ordered by timestamp either way.
//!
//! # Failure policy
//!
//! Validation runs first and aborts before any computation, returning every
//! collected violation. A non-finite value appearing in a sample aborts the
//! run with the offending step index. Cancellation is not a failure: it
//! discards the partially built sequence and returns
//! [`RunOutcome::Cancelled`] with no result.

use nalgebra::DVector;

use crate::error::SimulationError;
use crate::model::{SimulationParameters, Silo};
use crate::sim::belt::BeltOccupancy;
use crate::sim::calculator::instantaneous_flow;
use crate::sim::monitor::RunMonitor;
use crate::sim::result::{SiloState, SimulationResult, SimulationSample};
use crate::sim::scenario::Scenario;
use crate::sim::validator::validate;

/// Steps per progress/cancellation window in parallel execution
#[cfg(feature = "parallel")]
const PARALLEL_BATCH: usize = 1024;

// =================================================================================================
// Run Outcome
// =================================================================================================

/// Outcome of a completed engine call
///
/// Cancellation is a deliberate early termination, distinct from the error
/// cases of [`SimulationError`], and carries no partial result.
#[derive(Debug)]
pub enum RunOutcome {
    /// The run finished; the full ordered result is attached
    Completed(SimulationResult),
    /// The caller cancelled the run; nothing is returned
    Cancelled,
}

impl RunOutcome {
    /// Whether the run was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled)
    }

    /// Borrow the result, when the run completed
    pub fn result(&self) -> Option<&SimulationResult> {
        match self {
            RunOutcome::Completed(result) => Some(result),
            RunOutcome::Cancelled => None,
        }
    }

    /// Take ownership of the result, when the run completed
    pub fn into_result(self) -> Option<SimulationResult> {
        match self {
            RunOutcome::Completed(result) => Some(result),
            RunOutcome::Cancelled => None,
        }
    }
}

// =================================================================================================
// Simulation Engine
// =================================================================================================

/// The conveyor blending engine
///
/// Stateless: all state of a run lives in local variables, so cancelling a
/// run leaves nothing behind and a fresh run with the same inputs
/// reproduces identical output.
///
/// # Example
///
/// ```rust
/// use belt_rs::model::{Color, Material, MaterialRegistry, Silo, SimulationParameters};
/// use belt_rs::sim::{RunMonitor, Scenario, SimulationEngine};
///
/// let registry = MaterialRegistry::new(vec![Material::new("A", Color::new(0, 0, 0))]);
/// let scenario = Scenario::new(registry, vec![Silo::new("A", 100.0, 10.0, 0.0, 0.0)]);
/// let parameters = SimulationParameters::new(20.0, 100.0, 1.0, 1.0);
///
/// let outcome = SimulationEngine::new()
///     .run(&scenario, &parameters, &RunMonitor::default())
///     .unwrap();
/// assert_eq!(outcome.result().unwrap().len(), 21);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationEngine;

impl SimulationEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }

    /// Engine name (used for display and result metadata)
    pub fn name(&self) -> &'static str {
        "Belt Grid Accumulator"
    }

    /// Run a simulation
    ///
    /// Re-validates the inputs defensively (failing fast with every
    /// collected violation rather than trusting the caller), walks the time
    /// grid, and returns the completed result — or `Cancelled` when the
    /// monitor's token fires at a step boundary.
    pub fn run(
        &self,
        scenario: &Scenario,
        parameters: &SimulationParameters,
        monitor: &RunMonitor,
    ) -> Result<RunOutcome, SimulationError> {
        // ====== Step 1: Validation ======

        validate(scenario.registry(), scenario.silos(), parameters)
            .map_err(SimulationError::Validation)?;

        let material_index = scenario
            .material_indices()
            .map_err(|violation| SimulationError::Validation(vec![violation]))?;

        // ====== Step 2: Setup ======

        let dt = parameters.time_step();

        // Validation already bounds dt and total_time, but the quotient is
        // what actually sizes the run — reject a degenerate grid here with
        // the step index it broke at.
        let raw_steps = parameters.total_time / dt;
        if !raw_steps.is_finite() {
            return Err(SimulationError::Numerical {
                step: 0,
                detail: format!("step count {raw_steps} is not finite"),
            });
        }

        let steps = parameters.step_count();
        let sample_count = steps + 1;

        log::debug!(
            "starting run: {} samples, dt={}, {} silos, {} materials",
            sample_count,
            dt,
            scenario.silo_count(),
            scenario.material_count()
        );

        // ====== Step 3: Time Grid ======

        let samples = match self.compute_samples(
            scenario,
            &material_index,
            dt,
            sample_count,
            monitor,
        )? {
            Some(samples) => samples,
            None => {
                log::debug!("run cancelled, discarding partial samples");
                return Ok(RunOutcome::Cancelled);
            }
        };

        // ====== Step 4: Build Result ======

        // Timestamp of the final sample; the grid guarantees it is within
        // total_time under the truncate policy.
        let final_time = (steps as f64) * dt;
        let final_belt = BeltOccupancy::at_time(scenario, parameters, final_time)
            .map_err(|violation| SimulationError::Validation(vec![violation]))?;

        let mut result =
            SimulationResult::new(samples, scenario.clone(), *parameters, final_belt);

        // Metadata for diagnostics and reproducibility
        result.add_metadata("engine", self.name());
        result.add_metadata("samples", &sample_count.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("total time", &parameters.total_time.to_string());

        log::debug!("run completed: {} samples", result.len());

        Ok(RunOutcome::Completed(result))
    }

    // ============================================================================================
    // Grid Drivers
    // ============================================================================================

    /// Compute the ordered sample sequence; `Ok(None)` means cancelled
    fn compute_samples(
        &self,
        scenario: &Scenario,
        material_index: &[usize],
        dt: f64,
        sample_count: usize,
        monitor: &RunMonitor,
    ) -> Result<Option<Vec<SimulationSample>>, SimulationError> {
        #[cfg(feature = "parallel")]
        if sample_count >= crate::sim::parallel_threshold() {
            return self.compute_samples_parallel(
                scenario,
                material_index,
                dt,
                sample_count,
                monitor,
            );
        }

        self.compute_samples_sequential(scenario, material_index, dt, sample_count, monitor)
    }

    /// Strictly sequential step loop: progress and cancellation at every
    /// step boundary
    fn compute_samples_sequential(
        &self,
        scenario: &Scenario,
        material_index: &[usize],
        dt: f64,
        sample_count: usize,
        monitor: &RunMonitor,
    ) -> Result<Option<Vec<SimulationSample>>, SimulationError> {
        // Reserve exact capacity to avoid reallocation during the walk
        let mut samples = Vec::with_capacity(sample_count);

        for step in 0..sample_count {
            if monitor.is_cancelled() {
                return Ok(None);
            }

            // Calculate the timestamp directly from the index to avoid
            // accumulation of floating-point rounding errors; after
            // thousands of `t += dt` additions the grid would drift off the
            // exact multiples the truncate policy promises.
            let t = step as f64 * dt;

            let sample = sample_at(
                scenario.silos(),
                material_index,
                scenario.material_count(),
                t,
                dt,
            );
            validate_sample(&sample, step)?;
            samples.push(sample);

            monitor.report((step + 1) as f64 / sample_count as f64);
        }

        Ok(Some(samples))
    }

    /// Ordered batch computation with Rayon: progress and cancellation at
    /// batch boundaries
    ///
    /// `into_par_iter().map(..).collect()` preserves index order, so the
    /// reassembled sequence is ordered by timestamp exactly like the
    /// sequential walk.
    #[cfg(feature = "parallel")]
    fn compute_samples_parallel(
        &self,
        scenario: &Scenario,
        material_index: &[usize],
        dt: f64,
        sample_count: usize,
        monitor: &RunMonitor,
    ) -> Result<Option<Vec<SimulationSample>>, SimulationError> {
        use rayon::prelude::*;

        let mut samples = Vec::with_capacity(sample_count);

        let mut batch_start = 0usize;
        while batch_start < sample_count {
            if monitor.is_cancelled() {
                return Ok(None);
            }

            let batch_end = (batch_start + PARALLEL_BATCH).min(sample_count);

            let batch: Vec<SimulationSample> = (batch_start..batch_end)
                .into_par_iter()
                .map(|step| {
                    let t = step as f64 * dt;
                    sample_at(
                        scenario.silos(),
                        material_index,
                        scenario.material_count(),
                        t,
                        dt,
                    )
                })
                .collect();

            for (offset, sample) in batch.iter().enumerate() {
                validate_sample(sample, batch_start + offset)?;
            }
            samples.extend(batch);

            monitor.report(batch_end as f64 / sample_count as f64);
            batch_start = batch_end;
        }

        Ok(Some(samples))
    }
}

// =================================================================================================
// Per-Step Computation
// =================================================================================================

/// Compute one sample — a pure function of the timestamp
///
/// This is where blending happens: every silo's instantaneous flow is added
/// into its material's slot, so concurrent discharges of the same material
/// sum and concurrent discharges of different materials shape the
/// composition.
fn sample_at(
    silos: &[Silo],
    material_index: &[usize],
    materials: usize,
    t: f64,
    dt: f64,
) -> SimulationSample {
    // Unreferenced registry materials still occupy a row, so the vector
    // layout matches the registry even when no silo feeds the trailing
    // materials.
    let mut flow_rates = DVector::zeros(materials);

    for (silo, &row) in silos.iter().zip(material_index.iter()) {
        flow_rates[row] += instantaneous_flow(silo, t, dt);
    }

    let total_flow = flow_rates.sum();

    // Explicit zero-division guard: an idle belt has an all-zero
    // composition, never NaN.
    let composition = if total_flow > 0.0 {
        flow_rates.map(|flow| flow / total_flow)
    } else {
        DVector::zeros(flow_rates.len())
    };

    let silo_states = silos.iter().map(|silo| SiloState::at(silo, t)).collect();

    SimulationSample {
        time: t,
        flow_rates,
        composition,
        total_flow,
        silo_states,
    }
}

/// Abort on non-finite values with the offending step index
///
/// The composition is guarded by construction; anything non-finite here
/// means a genuine numerical breakdown (e.g. overflowing flow aggregation)
/// that must not silently propagate into the result.
fn validate_sample(sample: &SimulationSample, step: usize) -> Result<(), SimulationError> {
    if !sample.total_flow.is_finite() {
        return Err(SimulationError::Numerical {
            step,
            detail: format!("total flow {} is not finite", sample.total_flow),
        });
    }

    if let Some(flow) = sample.flow_rates.iter().find(|f| !f.is_finite()) {
        return Err(SimulationError::Numerical {
            step,
            detail: format!("material flow {flow} is not finite"),
        });
    }

    if let Some(fraction) = sample.composition.iter().find(|c| !c.is_finite()) {
        return Err(SimulationError::Numerical {
            step,
            detail: format!("composition fraction {fraction} is not finite"),
        });
    }

    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
