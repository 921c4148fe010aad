//! Simulation core
//!
//! This module contains everything that computes: the validator that gates
//! inputs, the pure calculator routines, the engine that drives them over
//! the time grid, and the immutable result they produce.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! The core separates concerns into three layers:
//!
//! 1. **Scenario** ([`Scenario`]) - WHAT to simulate
//!    - Material registry (identities)
//!    - Silo list (sources and schedules)
//!
//! 2. **Parameters** ([`SimulationParameters`](crate::model::SimulationParameters)) - HOW to discretize
//!    - Belt geometry and velocity
//!    - Resolution (bucket size, derived time step)
//!
//! 3. **Engine** ([`SimulationEngine`]) - The computation
//!    - Validates, steps the time grid, aggregates flows
//!    - Independent of any UI or threading wrapper
//!
//! This separation allows the same scenario to be re-run under different
//! resolutions, and the same parameters to be reused across scenarios,
//! without rebuilding either.
//!
//! # Module Organization
//!
//! - **`validator`**: all-at-once input checking ([`Violation`])
//! - **`calculator`**: pure per-silo numeric routines
//! - **`belt`**: belt occupancy snapshots ([`BeltOccupancy`])
//! - **`engine`**: the step loop ([`SimulationEngine`], [`RunOutcome`])
//! - **`monitor`**: progress/cancellation contract ([`RunMonitor`])
//! - **`result`**: immutable output ([`SimulationResult`])
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────────┐
//! │ Scenario         │   │ SimulationParameters │
//! │ (registry+silos) │   │ (grid + belt)        │
//! └────────┬─────────┘   └─────────┬────────────┘
//!          │                       │
//!          └─────────┬─────────────┘
//!                    │
//!          ┌─────────▼─────────┐
//!          │ Validator         │ ← every violation, not just the first
//!          └─────────┬─────────┘
//!                    │
//!          ┌─────────▼─────────┐      ┌─────────────┐
//!          │ SimulationEngine  │ ←──→ │ RunMonitor  │
//!          │ (step loop)       │      │ (progress + │
//!          └─────────┬─────────┘      │  cancel)    │
//!                    │                └─────────────┘
//!          ┌─────────▼─────────┐
//!          │ SimulationResult  │ ← ordered samples + belt occupancy
//!          └───────────────────┘
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================
pub mod validator;
pub mod calculator;
pub mod scenario;
pub mod belt;
pub mod engine;
pub mod monitor;
pub mod result;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand work off to Rayon is an execution concern, not a
// blending concern. It therefore lives here (sim) rather than in the
// calculator. Samples are pure functions of the timestamp, so batches can be
// computed in parallel and reassembled in timestamp order; ordering of the
// final sample sequence is a hard invariant either way.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (useful in benchmarks and tests) without requiring a mutex on
// every run. Relaxed ordering is sufficient: the value is a performance
// hint, not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of time steps above which the engine switches to parallel
/// sample computation.
///
/// The crossover is set at 4 096 steps. Below that point the overhead of
/// Rayon's thread-pool dispatch outweighs the per-step work of evaluating a
/// handful of silo windows.
const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Runtime-configurable parallel-execution threshold.
///
/// Read via [`parallel_threshold()`], written via [`set_parallel_threshold()`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// The engine uses the sequential step loop when the run contains fewer
/// steps than this value, and switches to Rayon batch computation when it
/// contains more — but only when the crate is compiled with the `parallel`
/// feature.
///
/// # Example
///
/// ```rust
/// use belt_rs::sim::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`. A zero-step threshold would force parallel
/// dispatch on every trivial run, which is never the intended behaviour.
///
/// # Example
///
/// ```rust
/// use belt_rs::sim::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(1024);
/// assert_eq!(parallel_threshold(), 1024);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Only compiled in test builds. Prevents one test from leaking a modified
/// threshold value into the next.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the public setter so that restoring to any value (including
        // the original default) never panics.
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use validator::{validate, Violation};
pub use scenario::Scenario;
pub use belt::BeltOccupancy;
pub use engine::{RunOutcome, SimulationEngine};
pub use monitor::{CancellationToken, RunMonitor};
pub use result::{MassBalance, SiloState, SimulationResult, SimulationSample};

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_value() {
        assert_eq!(DEFAULT_PARALLEL_THRESHOLD, 4096);
    }

    #[test]
    fn test_get_and_set_threshold() {
        let _guard = ThresholdGuard::save(500);
        assert_eq!(parallel_threshold(), 500);
    }

    #[test]
    #[should_panic(expected = "parallel threshold must be at least 1")]
    fn test_zero_threshold_panics() {
        set_parallel_threshold(0);
    }

    #[test]
    fn test_threshold_guard_restores_previous_value() {
        let before = parallel_threshold();
        {
            let _guard = ThresholdGuard::save(42);
            assert_eq!(parallel_threshold(), 42);
        }
        // Guard dropped — value must be back to what it was before.
        assert_eq!(parallel_threshold(), before);
    }

    #[test]
    fn test_threshold_is_visible_across_threads() {
        use std::thread;

        let _guard = ThresholdGuard::save(1234);

        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(parallel_threshold))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1234);
        }
    }
}
