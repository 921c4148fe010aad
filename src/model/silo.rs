//! Silo configuration
//!
//! A silo is a discrete material source with finite capacity that discharges
//! onto the belt at a fixed position over a finite time window. The window
//! is derived, not stored: it ends when the capacity is exhausted at the
//! configured flow rate.

/// One silo of the plant
///
/// # Units
///
/// The crate is unit-agnostic but consistent: if capacity is in kg and flow
/// rate in kg/s, then times are in seconds; positions share the unit of the
/// conveyor length.
///
/// # Derived quantities
///
/// - [`discharge_duration`](Silo::discharge_duration) `= capacity / flow_rate`
/// - [`stop_time`](Silo::stop_time) `= start_time + discharge_duration`
///
/// The discharge window is half-open: the silo is discharging for
/// `start_time <= t < stop_time` and idle or finished elsewhere (see
/// [`sim::calculator`](crate::sim::calculator)).
///
/// # Example
///
/// ```rust
/// use belt_rs::model::Silo;
///
/// // 100 kg at 10 kg/s starting at t=0, discharging at the belt origin
/// let silo = Silo::new("Sinter", 100.0, 10.0, 0.0, 0.0);
/// assert_eq!(silo.discharge_duration(), 10.0);
/// assert_eq!(silo.stop_time(), 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Silo {
    /// Name of the registry material this silo discharges
    material: String,
    /// Total dischargeable mass [mass]
    capacity: f64,
    /// Discharge rate while active [mass/time]
    flow_rate: f64,
    /// First instant of discharge [time]
    start_time: f64,
    /// Distance from the belt origin to the discharge point [length]
    position: f64,
}

impl Silo {
    /// Create a silo
    ///
    /// # Arguments
    ///
    /// * `material` - Registry name of the discharged material
    /// * `capacity` - Total dischargeable mass, must be positive
    /// * `flow_rate` - Discharge rate while active, must be positive
    /// * `start_time` - First instant of discharge, must be non-negative
    /// * `position` - Distance from the belt origin, must be non-negative
    ///
    /// Range constraints are enforced by the validator, not here, so a UI
    /// can build silos incrementally and present all errors at once.
    pub fn new(
        material: impl Into<String>,
        capacity: f64,
        flow_rate: f64,
        start_time: f64,
        position: f64,
    ) -> Self {
        Self {
            material: material.into(),
            capacity,
            flow_rate,
            start_time,
            position,
        }
    }

    /// Registry name of the discharged material
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Total dischargeable mass
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Discharge rate while active
    pub fn flow_rate(&self) -> f64 {
        self.flow_rate
    }

    /// First instant of discharge
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Distance from the belt origin to the discharge point
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Time needed to empty the silo at the configured flow rate
    pub fn discharge_duration(&self) -> f64 {
        self.capacity / self.flow_rate
    }

    /// Instant at which the silo runs empty
    pub fn stop_time(&self) -> f64 {
        self.start_time + self.discharge_duration()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
