//! Integration tests for full simulation runs

use springbed_core::contact::is_touching;
use springbed_core::runtime::{
    build_simulation_context, energy_loss, run_simulation, run_simulation_checked,
    step_simulation, SimulationError,
};
use springbed_core::tests::test_helpers::{approx_eq, diverging_constants, reference_constants};
use springbed_core::SimulationConstants;

#[test]
fn test_reference_scenario_loses_some_energy() {
    let constants = reference_constants();
    let result = run_simulation(&constants, -50.0);

    assert_eq!(result.initial_energy, 12500.0);
    assert_eq!(result.steps, 2000);

    let loss = result.energy_loss();
    assert!(loss.is_finite());
    assert!(loss > 0.0, "projectile should lose energy to the springs, got {}", loss);
    assert!(loss < result.initial_energy, "cannot lose more than it started with");
    // A few hundred joules at most: the bounce is mostly elastic
    assert!(loss > 50.0 && loss < 200.0, "unexpected energy loss {}", loss);
}

#[test]
fn test_reference_scenario_bounces_back() {
    let result = run_simulation(&reference_constants(), -50.0);

    // After 2 s the ball has bounced and is rising again
    assert!(result.final_velocity.y > 0.0);
    assert!(result.final_position.y > 0.5);
}

#[test]
fn test_vertical_drop_stays_on_axis() {
    let result = run_simulation(&reference_constants(), -50.0);

    // Centred above the middle spring with no horizontal velocity, every
    // contact normal is vertical
    assert_eq!(result.final_position.x, 2.0);
    assert_eq!(result.final_velocity.x, 0.0);
}

#[test]
fn test_mirrored_runs_are_mirror_images() {
    let right = SimulationConstants {
        v_x: 3.0,
        ..reference_constants()
    };
    let left = SimulationConstants {
        v_x: -3.0,
        ..reference_constants()
    };

    let a = run_simulation(&right, -50.0);
    let b = run_simulation(&left, -50.0);

    // The field is symmetric about x = 2
    assert!(approx_eq(a.final_position.x - 2.0, 2.0 - b.final_position.x, 1e-6));
    assert!(approx_eq(a.final_velocity.x, -b.final_velocity.x, 1e-6));
    assert!(approx_eq(a.final_velocity.y, b.final_velocity.y, 1e-6));
    assert!(approx_eq(a.energy_loss(), b.energy_loss(), 1e-6));
}

#[test]
fn test_offset_drops_are_mirror_images() {
    let right = SimulationConstants {
        x_start: 2.25,
        ..reference_constants()
    };
    let left = SimulationConstants {
        x_start: 1.75,
        ..reference_constants()
    };

    let a = run_simulation(&right, -50.0);
    let b = run_simulation(&left, -50.0);

    assert!(approx_eq(a.final_position.x - 2.0, 2.0 - b.final_position.x, 1e-6));
    assert!(approx_eq(a.energy_loss(), b.energy_loss(), 1e-6));
}

#[test]
fn test_empty_field_loses_nothing() {
    let constants = SimulationConstants {
        n_springs: 0,
        ..reference_constants()
    };

    for vy in [-500.0, -50.0, -1.0, 0.0, 25.0] {
        assert_eq!(energy_loss(&constants, vy), 0.0, "vy = {}", vy);
    }
}

#[test]
fn test_projectile_that_never_arrives_loses_nothing() {
    let constants = SimulationConstants {
        y_start: 100.0,
        timesteps: 10,
        ..reference_constants()
    };

    let mut ctx = build_simulation_context(&constants, -50.0);
    while !ctx.is_finished() {
        step_simulation(&mut ctx);
        let projectile = &ctx.world.projectile;
        assert!(ctx
            .world
            .field
            .iter()
            .all(|spring| !is_touching(spring, projectile, constants.epsilon)));
    }

    assert_eq!(ctx.finish().energy_loss(), 0.0);
}

#[test]
fn test_zero_timesteps() {
    let constants = SimulationConstants {
        timesteps: 0,
        ..reference_constants()
    };
    let result = run_simulation(&constants, -50.0);
    assert_eq!(result.steps, 0);
    assert_eq!(result.energy_loss(), 0.0);
    assert_eq!(result.final_position.y, 5.0);
}

#[test]
fn test_faster_impacts_lose_more() {
    // Soft property: holds for this constants set, not a general law
    let constants = reference_constants();
    let slow = energy_loss(&constants, -20.0);
    let fast = energy_loss(&constants, -50.0);

    assert!(slow > 0.0);
    assert!(fast >= slow, "loss at -50 ({}) below loss at -20 ({})", fast, slow);
}

#[test]
fn test_same_inputs_give_bit_identical_output() {
    let constants = reference_constants();
    let first = energy_loss(&constants, -50.0);
    let second = energy_loss(&constants, -50.0);
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn test_manual_stepping_matches_runner() {
    let constants = reference_constants();

    let mut ctx = build_simulation_context(&constants, -35.0);
    while !ctx.is_finished() {
        step_simulation(&mut ctx);
    }

    assert_eq!(ctx.finish(), run_simulation(&constants, -35.0));
}

#[test]
fn test_checked_run_matches_unchecked_when_stable() {
    let constants = reference_constants();
    let checked = run_simulation_checked(&constants, -50.0).expect("stable run");
    assert_eq!(checked, run_simulation(&constants, -50.0));
}

#[test]
fn test_checked_run_reports_divergence() {
    let constants = diverging_constants();

    match run_simulation_checked(&constants, -10.0) {
        Err(SimulationError::Diverged { step, timesteps }) => {
            assert!(step > 0 && step <= timesteps);
            assert_eq!(timesteps, 2000);
        }
        Ok(result) => panic!("expected divergence, got loss {}", result.energy_loss()),
    }
}

#[test]
fn test_unchecked_run_never_fails_on_divergence() {
    // Reference behaviour: the loop keeps going and returns a number
    let result = run_simulation(&diverging_constants(), -10.0);
    assert_eq!(result.steps, 2000);
}
