//! Structured failure types surfaced by the engine
//!
//! There are exactly two failure classes: invalid input (every violation
//! collected, never truncated to the first) and numerical breakdown during
//! the run (attributed to the offending step). Cancellation is deliberately
//! NOT an error — it is the [`RunOutcome::Cancelled`](crate::sim::RunOutcome)
//! outcome and carries no partial result.

use thiserror::Error;

use crate::sim::Violation;

/// Failure of a simulation run
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Input validation failed; all violations are collected
    #[error("validation failed with {} violation(s): {}", .0.len(), format_violations(.0))]
    Validation(Vec<Violation>),

    /// A non-finite value appeared outside the guarded composition step,
    /// or the step grid itself could not be computed
    #[error("numerical failure at step {step}: {detail}")]
    Numerical {
        /// Index of the offending time step
        step: usize,
        /// Diagnostic description
        detail: String,
    },
}

impl SimulationError {
    /// The collected violations, when this is a validation failure
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            SimulationError::Validation(violations) => Some(violations),
            SimulationError::Numerical { .. } => None,
        }
    }
}

fn format_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_every_violation() {
        let error = SimulationError::Validation(vec![
            Violation::InvalidParameter {
                field: "flow rate".into(),
                value: -3.0,
            },
            Violation::PositionOutOfRange {
                silo: 0,
                position: 120.0,
                conveyor_length: 100.0,
            },
        ]);

        let text = error.to_string();
        assert!(text.contains("2 violation(s)"));
        assert!(text.contains("flow rate"));
        assert!(text.contains("120"));
    }

    #[test]
    fn test_numerical_display_names_the_step() {
        let error = SimulationError::Numerical {
            step: 42,
            detail: "NaN in total flow".to_string(),
        };

        assert!(error.to_string().contains("step 42"));
        assert!(error.violations().is_none());
    }
}
