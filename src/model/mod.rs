//! Plant description
//!
//! This module provides the value structures that describe the simulated
//! plant: which materials exist, which silos discharge them, and how the
//! belt and the discretization are configured.
//!
//! # Core Concepts
//!
//! - **Material**: identity plus display properties, held in a registry
//! - **Silo**: one discrete material source with capacity, flow rate,
//!   start time and belt position
//! - **SimulationParameters**: belt geometry, velocity and resolution
//!
//! # Architecture
//!
//! Plant description is **separate from the simulation core**:
//! - This module provides the **configuration** (plain validated values)
//! - The [`sim`](crate::sim) module provides the **computation**
//!
//! Every structure here is an immutable value once the run starts. The
//! engine never mutates caller-owned materials, silos or parameters; a UI
//! or config layer builds them, the validator gates them, the engine reads
//! them.
//!
//! # Example
//!
//! ```rust
//! use belt_rs::model::{Color, Material, MaterialRegistry, Silo, SimulationParameters};
//!
//! let registry = MaterialRegistry::new(vec![
//!     Material::new("Pellets", Color::new(70, 130, 180)),
//!     Material::new("Coke", Color::new(47, 47, 47)),
//! ]);
//!
//! // 500 kg at 25 kg/s, starting at t=30s, 12m from the belt origin
//! let silo = Silo::new("Coke", 500.0, 25.0, 30.0, 12.0);
//! assert_eq!(silo.stop_time(), 50.0);
//!
//! let parameters = SimulationParameters::new(600.0, 120.0, 0.5, 2.0);
//! assert_eq!(parameters.time_step(), 0.25);
//! ```

// module declaration
pub mod material;
pub mod silo;
pub mod parameters;

// re-export commonly used types for convenience
pub use material::{Color, Material, MaterialRegistry};
pub use silo::Silo;
pub use parameters::SimulationParameters;
