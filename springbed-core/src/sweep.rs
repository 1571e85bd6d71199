//! Batch sweeps over initial vertical velocities
//!
//! Every sample builds its own spring field and projectile, so samples run on
//! rayon workers with nothing shared between them. A sample that diverges or
//! runs past its wall-clock budget is reported as skipped rather than failing
//! the whole sweep.

use crate::config::SimulationConstants;
use crate::runtime::{
    build_simulation_context, step_simulation, SimulationError, SimulationResult,
};
use rayon::prelude::*;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How often a running sample looks at the clock
const TIMEOUT_CHECK_INTERVAL: u64 = 1024;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to start sweep workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone, Default)]
pub struct SweepOptions {
    /// Wall-clock budget per sample
    pub timeout: Option<Duration>,
    /// Worker count; rayon's default when unset
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SweepOutcome {
    Completed(SimulationResult),
    Diverged(SimulationError),
    TimedOut { elapsed: Duration, steps: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepSample {
    pub initial_vy: f64,
    pub outcome: SweepOutcome,
}

impl SweepSample {
    /// Energy loss when the sample completed
    pub fn energy_loss(&self) -> Option<f64> {
        match &self.outcome {
            SweepOutcome::Completed(result) => Some(result.energy_loss()),
            _ => None,
        }
    }
}

/// `points` evenly spaced values from `start` to `end`, both included
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            let mut values: Vec<f64> = (0..points).map(|i| start + step * i as f64).collect();
            values[points - 1] = end;
            values
        }
    }
}

/// Run one sample, checking for divergence every step and for the timeout
/// every few steps
pub fn run_sample(
    constants: &SimulationConstants,
    initial_vy: f64,
    timeout: Option<Duration>,
) -> SweepSample {
    let started = Instant::now();
    let mut ctx = build_simulation_context(constants, initial_vy);

    let outcome = loop {
        if ctx.is_finished() {
            break SweepOutcome::Completed(ctx.finish());
        }
        step_simulation(&mut ctx);

        if !ctx.world.is_finite() {
            break SweepOutcome::Diverged(SimulationError::Diverged {
                step: ctx.steps_taken,
                timesteps: constants.timesteps,
            });
        }
        if let Some(limit) = timeout {
            if ctx.steps_taken % TIMEOUT_CHECK_INTERVAL == 0 && started.elapsed() > limit {
                break SweepOutcome::TimedOut {
                    elapsed: started.elapsed(),
                    steps: ctx.steps_taken,
                };
            }
        }
    };

    match &outcome {
        SweepOutcome::Completed(_) => {}
        SweepOutcome::Diverged(err) => log::warn!("skipping vy = {}: {}", initial_vy, err),
        SweepOutcome::TimedOut { elapsed, steps } => log::warn!(
            "skipping vy = {}: timed out after {:.1?} ({} steps)",
            initial_vy,
            elapsed,
            steps
        ),
    }

    SweepSample {
        initial_vy,
        outcome,
    }
}

/// Run every velocity in parallel; samples come back in input order
pub fn run_sweep(
    constants: &SimulationConstants,
    velocities: &[f64],
    options: &SweepOptions,
) -> Result<Vec<SweepSample>, SweepError> {
    let run_all = || {
        velocities
            .par_iter()
            .map(|&vy| run_sample(constants, vy, options.timeout))
            .collect::<Vec<_>>()
    };

    let samples = match options.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(run_all),
        None => run_all(),
    };

    log::debug!(
        "sweep finished: {} of {} samples completed",
        samples.iter().filter(|s| s.energy_loss().is_some()).count(),
        samples.len()
    );
    Ok(samples)
}
