//! Input validation
//!
//! One pass over the whole configuration that collects EVERY violation in a
//! deterministic order, so a caller can present all errors at once instead
//! of fixing them one by one. The validator performs no mutation and never
//! fails on expected edge cases — overlapping discharge windows on the same
//! belt segment are the whole point of a blending simulation and are always
//! permitted.
//!
//! # Check order
//!
//! 1. Simulation parameters (each field by name, then grid coarseness)
//! 2. Material registry (emptiness, duplicate names)
//! 3. Silos in list order (emptiness first, then per-silo fields, material
//!    resolution, position range, start-vs-total-time)

use thiserror::Error;

use crate::model::{MaterialRegistry, Silo, SimulationParameters};

// =================================================================================================
// Violation
// =================================================================================================

/// One named, field-attributed configuration violation
///
/// Silo indices are zero-based and refer to the caller's silo list order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    /// A numeric field is not a positive finite number (start times may be
    /// zero; everything else gated here must be strictly positive)
    #[error("{field} must be a positive finite number, got {value}")]
    InvalidParameter {
        /// Human-readable field name, e.g. `"silo 1 flow rate"`
        field: String,
        /// The offending value
        value: f64,
    },

    /// A silo references a material name absent from the registry
    #[error("silo {silo} references unknown material {material:?}")]
    UnknownMaterial { silo: usize, material: String },

    /// A silo's discharge point lies beyond the modeled belt span
    #[error("silo {silo} position {position} exceeds conveyor length {conveyor_length}")]
    PositionOutOfRange {
        silo: usize,
        position: f64,
        conveyor_length: f64,
    },

    /// The spatial bucket is larger than the whole belt
    #[error("resolution {resolution} exceeds conveyor length {conveyor_length}")]
    ResolutionExceedsLength {
        resolution: f64,
        conveyor_length: f64,
    },

    /// Not even one full time step fits into the total time
    #[error("time step {time_step} derived from the resolution exceeds total time {total_time}")]
    NoFullTimeStep { time_step: f64, total_time: f64 },

    /// The configuration has no materials or no silos
    #[error("at least one {what} must be defined")]
    EmptyConfiguration { what: &'static str },

    /// Two registry materials share a name
    #[error("duplicate material name {name:?}")]
    DuplicateMaterial { name: String },

    /// A silo would start discharging after the run already ended
    #[error("silo {silo} start time {start_time} exceeds total time {total_time}")]
    StartBeyondTotalTime {
        silo: usize,
        start_time: f64,
        total_time: f64,
    },
}

// =================================================================================================
// Validation
// =================================================================================================

/// Validate a full configuration, collecting all violations
///
/// Returns `Ok(())` for a valid configuration, or the ordered list of every
/// violation found — never truncated to the first.
///
/// # Example
///
/// ```rust
/// use belt_rs::model::{Color, Material, MaterialRegistry, Silo, SimulationParameters};
/// use belt_rs::sim::validate;
///
/// let registry = MaterialRegistry::new(vec![Material::new("A", Color::new(0, 0, 0))]);
/// let silos = vec![Silo::new("A", 100.0, 10.0, 0.0, 0.0)];
/// let parameters = SimulationParameters::new(20.0, 100.0, 1.0, 1.0);
///
/// assert!(validate(&registry, &silos, &parameters).is_ok());
/// ```
pub fn validate(
    registry: &MaterialRegistry,
    silos: &[Silo],
    parameters: &SimulationParameters,
) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    check_parameters(parameters, &mut violations);
    check_registry(registry, &mut violations);
    check_silos(registry, silos, parameters, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Strictly positive finite check with field attribution
fn check_positive(field: &str, value: f64, violations: &mut Vec<Violation>) -> bool {
    if value.is_finite() && value > 0.0 {
        true
    } else {
        violations.push(Violation::InvalidParameter {
            field: field.to_string(),
            value,
        });
        false
    }
}

/// Non-negative finite check with field attribution (start times, positions)
fn check_non_negative(field: &str, value: f64, violations: &mut Vec<Violation>) -> bool {
    if value.is_finite() && value >= 0.0 {
        true
    } else {
        violations.push(Violation::InvalidParameter {
            field: field.to_string(),
            value,
        });
        false
    }
}

fn check_parameters(parameters: &SimulationParameters, violations: &mut Vec<Violation>) {
    let total_ok = check_positive("total time", parameters.total_time, violations);
    let length_ok = check_positive("conveyor length", parameters.conveyor_length, violations);
    let resolution_ok = check_positive("resolution", parameters.resolution, violations);
    let velocity_ok = check_positive("belt velocity", parameters.belt_velocity, violations);

    // Grid coarseness checks only make sense once the fields themselves are
    // sound, otherwise they would duplicate the per-field reports.
    if resolution_ok && length_ok && parameters.resolution > parameters.conveyor_length {
        violations.push(Violation::ResolutionExceedsLength {
            resolution: parameters.resolution,
            conveyor_length: parameters.conveyor_length,
        });
    }

    if resolution_ok && velocity_ok && total_ok {
        let time_step = parameters.time_step();
        if time_step > parameters.total_time {
            violations.push(Violation::NoFullTimeStep {
                time_step,
                total_time: parameters.total_time,
            });
        }
    }
}

fn check_registry(registry: &MaterialRegistry, violations: &mut Vec<Violation>) {
    if registry.is_empty() {
        violations.push(Violation::EmptyConfiguration { what: "material" });
        return;
    }

    let mut seen: Vec<&str> = Vec::with_capacity(registry.len());
    for material in registry.materials() {
        if seen.contains(&material.name()) {
            violations.push(Violation::DuplicateMaterial {
                name: material.name().to_string(),
            });
        } else {
            seen.push(material.name());
        }
    }
}

fn check_silos(
    registry: &MaterialRegistry,
    silos: &[Silo],
    parameters: &SimulationParameters,
    violations: &mut Vec<Violation>,
) {
    if silos.is_empty() {
        violations.push(Violation::EmptyConfiguration { what: "silo" });
        return;
    }

    let length_ok = parameters.conveyor_length.is_finite() && parameters.conveyor_length > 0.0;
    let total_ok = parameters.total_time.is_finite() && parameters.total_time > 0.0;

    for (index, silo) in silos.iter().enumerate() {
        if !registry.contains(silo.material()) {
            violations.push(Violation::UnknownMaterial {
                silo: index,
                material: silo.material().to_string(),
            });
        }

        let capacity_ok =
            check_positive(&format!("silo {index} capacity"), silo.capacity(), violations);
        let flow_ok = check_positive(
            &format!("silo {index} flow rate"),
            silo.flow_rate(),
            violations,
        );
        let start_ok = check_non_negative(
            &format!("silo {index} start time"),
            silo.start_time(),
            violations,
        );
        let position_ok = check_non_negative(
            &format!("silo {index} position"),
            silo.position(),
            violations,
        );

        if position_ok && length_ok && silo.position() > parameters.conveyor_length {
            violations.push(Violation::PositionOutOfRange {
                silo: index,
                position: silo.position(),
                conveyor_length: parameters.conveyor_length,
            });
        }

        if start_ok && total_ok && silo.start_time() > parameters.total_time {
            violations.push(Violation::StartBeyondTotalTime {
                silo: index,
                start_time: silo.start_time(),
                total_time: parameters.total_time,
            });
        }

        // A silo outlasting the run is a valid configuration — the residual
        // capacity simply stays in the silo — but it is usually a data-entry
        // slip, so it is worth a note in the log.
        if capacity_ok && flow_ok && start_ok && total_ok
            && silo.stop_time() > 1.5 * parameters.total_time
        {
            log::warn!(
                "silo {index} will not empty within the run (stops at {:.1}, run ends at {:.1})",
                silo.stop_time(),
                parameters.total_time
            );
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
