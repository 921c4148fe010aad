//! Integration tests: engine + result views
//!
//! These tests drive the full pipeline (validate, run, derive views) on
//! plant fixtures with hand-computable behaviour.

use belt_rs::model::{Silo, SimulationParameters};
use belt_rs::sim::{
    validate, RunMonitor, Scenario, SiloState, SimulationEngine,
};

mod common;
use common::{
    discharged_mass, reference_parameters, single_silo_scenario, three_silo_blend_scenario,
    two_material_registry,
};

// =================================================================================================
// Canonical End-to-End Scenario
// =================================================================================================

#[test]
fn test_single_silo_end_to_end() {
    // capacity=100, flow=10, start=0, velocity=1, length=100, total=20,
    // resolution=1: the silo discharges for exactly the steps t = 0..9.
    let scenario = single_silo_scenario();
    let parameters = reference_parameters();

    let result = SimulationEngine::new()
        .run(&scenario, &parameters, &RunMonitor::default())
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(result.len(), 21);

    let flows = result.flow_series("Sinter").unwrap();
    let composition = result.composition_series("Sinter").unwrap();
    let totals = result.total_flow_series();

    for step in 0..=20 {
        if step < 10 {
            assert_eq!(flows[step], 10.0, "flow at t={step}");
            assert_eq!(composition[step], 1.0, "composition at t={step}");
            assert_eq!(totals[step], 10.0);
        } else {
            assert_eq!(flows[step], 0.0, "flow at t={step}");
            assert_eq!(composition[step], 0.0, "composition at t={step}");
            assert_eq!(totals[step], 0.0);
        }
    }

    // 10 steps x 10 kg/s x 1 s = the full 100 kg capacity, exactly.
    assert!((discharged_mass(&result, "Sinter") - 100.0).abs() < 1e-9);
}

#[test]
fn test_silo_schedule_view() {
    let scenario = single_silo_scenario();

    let result = SimulationEngine::new()
        .run(&scenario, &reference_parameters(), &RunMonitor::default())
        .unwrap()
        .into_result()
        .unwrap();

    let schedule = result.silo_schedule(0).unwrap();

    for (step, state) in schedule.iter().enumerate() {
        if step < 10 {
            assert_eq!(*state, SiloState::Discharging, "state at t={step}");
        } else {
            // At t = stop_time the silo must already report finished.
            assert_eq!(*state, SiloState::Finished, "state at t={step}");
        }
    }

    assert!(result.silo_schedule(1).is_none());
}

// =================================================================================================
// Blending
// =================================================================================================

#[test]
fn test_three_silo_blend_flows_and_composition() {
    let scenario = three_silo_blend_scenario();

    let result = SimulationEngine::new()
        .run(&scenario, &reference_parameters(), &RunMonitor::default())
        .unwrap()
        .into_result()
        .unwrap();

    let sinter = result.flow_series("Sinter").unwrap();
    let coke = result.flow_series("Coke").unwrap();
    let composition = result.composition_series("Sinter").unwrap();

    // Before any overlap: only the first silo.
    assert_eq!(sinter[0], 10.0);
    assert_eq!(coke[0], 0.0);
    assert_eq!(composition[0], 1.0);

    // Coke joins at t=2.
    assert_eq!(coke[2], 5.0);
    assert!((composition[2] - 10.0 / 15.0).abs() < 1e-12);

    // Full overlap in [5, 10): identical-material silos sum exactly.
    for step in 5..10 {
        assert_eq!(sinter[step], 22.0, "blended sinter at t={step}");
        assert_eq!(coke[step], 5.0);
        assert!((composition[step] - 22.0 / 27.0).abs() < 1e-12);
    }

    // Everything stops at t=10.
    assert_eq!(result.total_flow_series()[10], 0.0);

    // Discharged masses match the configured capacities.
    assert!((discharged_mass(&result, "Sinter") - 160.0).abs() < 1e-9);
    assert!((discharged_mass(&result, "Coke") - 40.0).abs() < 1e-9);
}

// =================================================================================================
// Belt Occupancy and Mass Balance
// =================================================================================================

#[test]
fn test_final_belt_occupancy_and_mass_balance() {
    let scenario = single_silo_scenario();
    let parameters = reference_parameters();

    let result = SimulationEngine::new()
        .run(&scenario, &parameters, &RunMonitor::default())
        .unwrap()
        .into_result()
        .unwrap();

    // Parcels discharged at t0 = 0..9 sit at positions 20 - t0 = 11..20 by
    // the final sample; nothing has reached the 100 m far end.
    let belt = result.belt_occupancy();
    assert_eq!(belt.time(), 20.0);
    assert!((belt.total_on_belt() - 100.0).abs() < 1e-9);
    assert_eq!(belt.total_exited(), 0.0);
    assert_eq!(belt.occupancy()[(0, 20)], 10.0);
    assert_eq!(belt.occupancy()[(0, 11)], 10.0);
    assert_eq!(belt.occupancy()[(0, 10)], 0.0);

    let balance = result.mass_balance();
    assert!((balance.total_discharged - 100.0).abs() < 1e-9);
    assert!(balance.balance_error < 1e-9);
    assert_eq!(balance.exited, 0.0);
}

#[test]
fn test_exited_material_still_counts_at_the_discharge_point() {
    // Short belt: parcels fall off the 5 m end long before the run ends,
    // but the flow series at the discharge point is unaffected.
    let scenario = single_silo_scenario();
    let parameters = SimulationParameters::new(20.0, 5.0, 1.0, 1.0);

    let result = SimulationEngine::new()
        .run(&scenario, &parameters, &RunMonitor::default())
        .unwrap()
        .into_result()
        .unwrap();

    assert!((discharged_mass(&result, "Sinter") - 100.0).abs() < 1e-9);

    let balance = result.mass_balance();
    assert!(balance.exited > 0.0);
    assert!(balance.balance_error < 1e-9);
}

#[test]
fn test_occupancy_probe_at_intermediate_time() {
    let scenario = single_silo_scenario();

    let result = SimulationEngine::new()
        .run(&scenario, &reference_parameters(), &RunMonitor::default())
        .unwrap()
        .into_result()
        .unwrap();

    // At t=5 the parcels from t0 = 0..5 are on the belt: 60 kg.
    let belt = result.belt_occupancy_at(5.0);
    assert!((belt.total_on_belt() - 60.0).abs() < 1e-9);
}

// =================================================================================================
// Validation Gate
// =================================================================================================

#[test]
fn test_minimal_valid_configuration_has_zero_violations() {
    let scenario = single_silo_scenario();

    assert!(validate(
        scenario.registry(),
        scenario.silos(),
        &reference_parameters()
    )
    .is_ok());
}

#[test]
fn test_engine_reports_all_violations_before_computing() {
    let scenario = Scenario::new(
        two_material_registry(),
        vec![Silo::new("Sinter", 100.0, -5.0, 0.0, 150.0)],
    );

    let error = SimulationEngine::new()
        .run(&scenario, &reference_parameters(), &RunMonitor::default())
        .unwrap_err();

    let violations = error.violations().expect("must be a validation failure");
    assert_eq!(violations.len(), 2);
}
