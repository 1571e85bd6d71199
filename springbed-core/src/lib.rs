pub mod analyzer;
pub mod config;
pub mod contact;
pub mod diagnostics;
pub mod engine;
pub mod integrator;
pub mod parser;
pub mod runtime;
pub mod sweep;

pub use analyzer::analyze_constants;
pub use config::{
    load_constants, source_for_path, ConfigError, ConstantsSource, FlatTextFile, JsonFile,
    LoadReport, SimulationConstants,
};
pub use contact::{add_forces, is_touching, push_outside};
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceLocation, Span};
pub use engine::{Projectile, Spring, SpringField, World};
pub use parser::{parse_constants, ConstantTable, ConstantValue};
pub use runtime::{
    build_simulation_context, energy_loss, run_simulation, run_simulation_checked,
    step_simulation, SimulationContext, SimulationError, SimulationResult,
};
pub use sweep::{linspace, run_sweep, SweepOptions, SweepOutcome, SweepSample};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
