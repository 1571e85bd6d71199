use crate::config::SimulationConstants;
use crate::engine::{Projectile, SpringField, World};
use crate::integrator::step;
use glam::DVec2;
use thiserror::Error;

/// Errors raised while running a simulation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Projectile or spring state stopped being finite
    #[error("simulation diverged at step {step} of {timesteps}: state is no longer finite")]
    Diverged { step: u64, timesteps: u64 },
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub initial_vy: f64,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub steps: u64,
    pub final_position: DVec2,
    pub final_velocity: DVec2,
}

impl SimulationResult {
    /// Kinetic energy the projectile lost; spring energy is not counted
    pub fn energy_loss(&self) -> f64 {
        self.initial_energy - self.final_energy
    }
}

/// State of a run in progress, for callers that drive the loop themselves
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub constants: SimulationConstants,
    pub world: World,
    pub initial_vy: f64,
    pub initial_energy: f64,
    pub steps_taken: u64,
}

/// Build the spring field and projectile for one run
pub fn build_world(constants: &SimulationConstants, initial_vy: f64) -> World {
    let field = SpringField::new(constants.n_springs, constants.dx, constants.k, constants.m);
    let projectile = Projectile::new(
        constants.mass,
        DVec2::new(constants.v_x, initial_vy),
        DVec2::new(constants.x_start, constants.y_start),
        constants.radius,
    );
    World::new(field, projectile)
}

/// Build a fresh context at step 0
pub fn build_simulation_context(
    constants: &SimulationConstants,
    initial_vy: f64,
) -> SimulationContext {
    let world = build_world(constants, initial_vy);
    let initial_energy = world.projectile.energy();
    SimulationContext {
        constants: *constants,
        world,
        initial_vy,
        initial_energy,
        steps_taken: 0,
    }
}

/// Advance a context by one timestep
pub fn step_simulation(ctx: &mut SimulationContext) {
    step(&mut ctx.world, ctx.constants.dt, ctx.constants.epsilon);
    ctx.steps_taken += 1;
}

impl SimulationContext {
    pub fn is_finished(&self) -> bool {
        self.steps_taken >= self.constants.timesteps
    }

    /// Snapshot the energies at the current step
    pub fn finish(&self) -> SimulationResult {
        let projectile = &self.world.projectile;
        SimulationResult {
            initial_vy: self.initial_vy,
            initial_energy: self.initial_energy,
            final_energy: projectile.energy(),
            steps: self.steps_taken,
            final_position: projectile.pos,
            final_velocity: projectile.vel,
        }
    }
}

/// Main entry point: run all timesteps for one initial vertical velocity.
///
/// Never fails. An unstable `dt`/`k` combination yields whatever numbers the
/// integrator produces; see [`run_simulation_checked`].
pub fn run_simulation(constants: &SimulationConstants, initial_vy: f64) -> SimulationResult {
    let mut ctx = build_simulation_context(constants, initial_vy);
    while !ctx.is_finished() {
        step_simulation(&mut ctx);
    }

    let result = ctx.finish();
    log::debug!(
        "vy = {}: {} steps, energy {} -> {}",
        initial_vy,
        result.steps,
        result.initial_energy,
        result.final_energy
    );
    result
}

/// Like [`run_simulation`], but stops with [`SimulationError::Diverged`] as
/// soon as any projectile or spring value becomes non-finite
pub fn run_simulation_checked(
    constants: &SimulationConstants,
    initial_vy: f64,
) -> Result<SimulationResult, SimulationError> {
    let mut ctx = build_simulation_context(constants, initial_vy);
    while !ctx.is_finished() {
        step_simulation(&mut ctx);
        if !ctx.world.is_finite() {
            return Err(SimulationError::Diverged {
                step: ctx.steps_taken,
                timesteps: constants.timesteps,
            });
        }
    }
    Ok(ctx.finish())
}

/// Energy loss for one initial vertical velocity
pub fn energy_loss(constants: &SimulationConstants, initial_vy: f64) -> f64 {
    run_simulation(constants, initial_vy).energy_loss()
}
