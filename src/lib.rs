//! belt-rs: Conveyor Blending Simulation Framework
//!
//! Simulates how discrete material discharges from multiple silos combine on
//! a moving conveyor belt over time, producing per-material flow-rate and
//! composition time series. Built with Rust for performance and safety.
//!
//! # Architecture
//!
//! belt-rs is built on two core principles:
//!
//! 1. **Separation of Configuration and Computation**
//!    - Value structures define the plant (what to simulate)
//!    - The engine drives pure calculator routines (how to simulate)
//!
//! 2. **Validated Inputs, Immutable Outputs**
//!    - All inputs pass through one validator that reports every violation
//!    - The result is immutable once built and owns everything it exposes
//!
//! # Quick Start
//!
//! ```rust
//! use belt_rs::model::{Color, Material, MaterialRegistry, Silo, SimulationParameters};
//! use belt_rs::sim::{RunMonitor, RunOutcome, Scenario, SimulationEngine};
//!
//! # fn main() -> Result<(), belt_rs::SimulationError> {
//! // 1. Describe the plant
//! let registry = MaterialRegistry::new(vec![
//!     Material::new("Sinter", Color::new(178, 34, 34)),
//! ]);
//! let silos = vec![Silo::new("Sinter", 100.0, 10.0, 0.0, 0.0)];
//! let scenario = Scenario::new(registry, silos);
//!
//! // 2. Configure the discretization
//! let parameters = SimulationParameters::new(
//!     20.0,    // total simulation time [s]
//!     100.0,   // conveyor length [m]
//!     1.0,     // resolution: belt bucket size [m]
//!     1.0,     // belt velocity [m/s]
//! );
//!
//! // 3. Run the simulation
//! let engine = SimulationEngine::new();
//! let outcome = engine.run(&scenario, &parameters, &RunMonitor::default())?;
//!
//! // 4. Access results
//! if let RunOutcome::Completed(result) = outcome {
//!     println!("Samples: {}", result.len());
//!     println!("Total flow at t=0: {}", result.samples()[0].total_flow);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`model`]: Plant description (materials, silos, parameters)
//! - [`sim`]: Validator, calculator, engine and results
//! - [`output`]: Result export for external analysis

// Core modules
pub mod model;

pub mod sim;
pub mod output;

mod error;

pub use error::SimulationError;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //!
    //! use belt_rs::prelude::*;
    //! ```
    pub use crate::model::{Color,
                           Material,
                           MaterialRegistry,
                           Silo,
                           SimulationParameters};
    pub use crate::sim::{CancellationToken,
                         RunMonitor,
                         RunOutcome,
                         Scenario,
                         SiloState,
                         SimulationEngine,
                         SimulationResult,
                         Violation};
    pub use crate::error::SimulationError;
}
