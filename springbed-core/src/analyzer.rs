//! Static checks on simulation constants
//!
//! Catches values that make the run meaningless before any step is taken,
//! and warns about step sizes that explicit Euler cannot integrate stably.

use crate::config::SimulationConstants;
use crate::diagnostics::{Diagnostic, Diagnostics};

/// Semi-implicit Euler on an undamped oscillator is stable while `dt·ω < 2`
const EULER_STABILITY_LIMIT: f64 = 2.0;

/// Analyze constants and return diagnostics
pub fn analyze_constants(constants: &SimulationConstants) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    let floats = [
        ("dx", constants.dx),
        ("m", constants.m),
        ("k", constants.k),
        ("M", constants.mass),
        ("V_X_projectile", constants.v_x),
        ("X_projectile_start", constants.x_start),
        ("Y_projectile_start", constants.y_start),
        ("R", constants.radius),
        ("dt", constants.dt),
        ("epsilon", constants.epsilon),
    ];
    let mut all_finite = true;
    for (name, value) in floats {
        if !value.is_finite() {
            all_finite = false;
            diagnostics.push(Diagnostic::error(
                format!("'{}' must be finite, got {}", name, value),
                None,
            ));
        }
    }
    if !all_finite {
        return diagnostics;
    }

    if constants.mass <= 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("projectile mass 'M' must be positive, got {}", constants.mass),
            None,
        ));
    }
    if constants.radius < 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("radius 'R' must not be negative, got {}", constants.radius),
            None,
        ));
    }
    if constants.dt <= 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("timestep 'dt' must be positive, got {}", constants.dt),
            None,
        ));
    }
    if constants.k < 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("stiffness 'k' must not be negative, got {}", constants.k),
            None,
        ));
    }
    if constants.epsilon < 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("tolerance 'epsilon' must not be negative, got {}", constants.epsilon),
            None,
        ));
    }

    if constants.n_springs == 0 {
        diagnostics.push(Diagnostic::warning(
            "'N_springs' is 0: the projectile has nothing to hit",
            None,
        ));
        return diagnostics;
    }

    if constants.m <= 0.0 {
        diagnostics.push(Diagnostic::error(
            format!("spring mass 'm' must be positive, got {}", constants.m),
            None,
        ));
    }

    if diagnostics.has_errors() {
        return diagnostics;
    }

    let spring_step = constants.dt * (constants.k / constants.m).sqrt();
    if spring_step >= EULER_STABILITY_LIMIT {
        diagnostics.push(Diagnostic::warning(
            format!(
                "dt*sqrt(k/m) = {:.3} >= {}: spring integration will likely diverge",
                spring_step, EULER_STABILITY_LIMIT
            ),
            None,
        ));
    }
    let contact_step = constants.dt * (constants.k / constants.mass).sqrt();
    if contact_step >= EULER_STABILITY_LIMIT {
        diagnostics.push(Diagnostic::warning(
            format!(
                "dt*sqrt(k/M) = {:.3} >= {}: projectile contact will likely diverge",
                contact_step, EULER_STABILITY_LIMIT
            ),
            None,
        ));
    }

    diagnostics
}
