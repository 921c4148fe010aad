//! Helper functions for integration tests

use belt_rs::sim::SimulationResult;

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Integrate one material's recorded flow over the whole run
///
/// Each sample's rate applies for one step width, so the cumulative mass is
/// the plain sum of `rate * dt`.
pub fn discharged_mass(result: &SimulationResult, material: &str) -> f64 {
    let dt = result.parameters().time_step();
    result
        .flow_series(material)
        .expect("material must exist in the result")
        .iter()
        .map(|rate| rate * dt)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_error() {
        assert!((relative_error(1.0, 1.0) - 0.0).abs() < 1e-10);
        assert!((relative_error(1.1, 1.0) - 0.1).abs() < 1e-10);
        assert!((relative_error(0.9, 1.0) - 0.1).abs() < 1e-10);
    }
}
