//! Test helper utilities for springbed tests

use crate::config::SimulationConstants;
use std::path::PathBuf;

/// Check if two floating point values are approximately equal within tolerance
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Five springs one unit apart, projectile centred above the middle one
pub fn reference_constants() -> SimulationConstants {
    SimulationConstants {
        n_springs: 5,
        dx: 1.0,
        m: 0.1,
        k: 100.0,
        mass: 10.0,
        v_x: 0.0,
        x_start: 2.0,
        y_start: 5.0,
        radius: 0.5,
        dt: 0.001,
        timesteps: 2000,
        epsilon: 1e-4,
    }
}

/// Flat-text rendering of [`reference_constants`]
pub const REFERENCE_CONSTANTS_TEXT: &str = "\
# reference scenario
N_springs = 5
dx = 1.0
m = 0.1
k = 100
M = 10
V_X_projectile = 0
X_projectile_start = 2.0
Y_projectile_start = 5.0
R = 0.5
dt = 0.001
timesteps = 2000
epsilon = 1e-4
";

/// Stiff, light springs with a coarse step: spring state blows up after the
/// projectile bounces off
pub fn diverging_constants() -> SimulationConstants {
    SimulationConstants {
        n_springs: 1,
        dx: 1.0,
        m: 0.001,
        k: 1e4,
        mass: 1.0,
        v_x: 0.0,
        x_start: 0.0,
        y_start: 0.6,
        radius: 0.5,
        dt: 0.01,
        timesteps: 2000,
        epsilon: 1e-4,
    }
}

/// Path to a fixture under `tests/data`
pub fn test_data_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}
