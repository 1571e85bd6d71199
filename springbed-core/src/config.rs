//! Simulation constants and the adapters that load them
//!
//! Two on-disk formats describe the same record:
//!
//! - flat `key = value` text (`N_springs`, `dx`, `m`, `k`, `M`,
//!   `V_X_projectile`, `X_projectile_start`, `Y_projectile_start`, `R`, `dt`,
//!   `timesteps`, `epsilon`)
//! - JSON with short keys:
//!
//! ```json
//! { "N": 5, "dx": 1.0, "k": 100.0, "m": 0.1, "M": 10.0, "R": 0.5,
//!   "dt": 0.001, "timesteps": 2000, "epsilon": 1e-4 }
//! ```
//!
//! JSON may also carry `V_X` (default `0`), `X` (default `1.4`) and `Y`
//! (default `1.5`). Other keys are ignored.
//!
//! Both go through [`ConstantsSource`], so the runner only ever sees a
//! validated [`SimulationConstants`].

use crate::analyzer::analyze_constants;
use crate::diagnostics::Diagnostics;
use crate::parser::{parse_constants, ConstantTable, ConstantValue};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Keys every flat constants file must define
pub const REQUIRED_KEYS: [&str; 12] = [
    "N_springs",
    "dx",
    "m",
    "k",
    "M",
    "V_X_projectile",
    "X_projectile_start",
    "Y_projectile_start",
    "R",
    "dt",
    "timesteps",
    "epsilon",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read constants file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("missing required constants: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
    #[error("invalid value for '{key}': expected {expected}, found '{value}'")]
    InvalidValue {
        key: String,
        expected: &'static str,
        value: String,
    },
    #[error("invalid JSON constants: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid constants: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Immutable constants for one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConstants {
    pub n_springs: usize,
    pub dx: f64,
    /// Spring mass
    pub m: f64,
    /// Spring stiffness
    pub k: f64,
    /// Projectile mass
    pub mass: f64,
    pub v_x: f64,
    pub x_start: f64,
    pub y_start: f64,
    pub radius: f64,
    pub dt: f64,
    pub timesteps: u64,
    pub epsilon: f64,
}

impl SimulationConstants {
    /// Type a raw table, reporting every missing key at once
    pub fn from_table(table: &ConstantTable) -> Result<Self, ConfigError> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !table.contains_key(key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingKeys(missing));
        }

        let n_springs = count(table, "N_springs")?;
        let n_springs = usize::try_from(n_springs).map_err(|_| ConfigError::InvalidValue {
            key: "N_springs".to_string(),
            expected: "a spring count",
            value: n_springs.to_string(),
        })?;

        Ok(Self {
            n_springs,
            dx: float(table, "dx")?,
            m: float(table, "m")?,
            k: float(table, "k")?,
            mass: float(table, "M")?,
            v_x: float(table, "V_X_projectile")?,
            x_start: float(table, "X_projectile_start")?,
            y_start: float(table, "Y_projectile_start")?,
            radius: float(table, "R")?,
            dt: float(table, "dt")?,
            timesteps: count(table, "timesteps")?,
            epsilon: float(table, "epsilon")?,
        })
    }

    /// Parse and type flat `key = value` text
    pub fn from_flat_text(source: &str) -> Result<Self, ConfigError> {
        let (table, warnings) = parse_constants(source);
        for warning in warnings.iter() {
            log::warn!("{}", warning);
        }
        Self::from_table(&table)
    }

    /// Parse and type the JSON representation
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let raw: JsonConstants = serde_json::from_str(source)?;
        Ok(raw.into())
    }

    /// Fail on any error the analyzer reports
    pub fn validate(&self) -> Result<(), ConfigError> {
        let diagnostics = analyze_constants(self);
        if diagnostics.has_errors() {
            return Err(ConfigError::Invalid(
                diagnostics.errors().map(|d| d.message.clone()).collect(),
            ));
        }
        Ok(())
    }
}

fn lookup<'a>(table: &'a ConstantTable, key: &str) -> Result<&'a ConstantValue, ConfigError> {
    table
        .get(key)
        .ok_or_else(|| ConfigError::MissingKeys(vec![key.to_string()]))
}

fn float(table: &ConstantTable, key: &str) -> Result<f64, ConfigError> {
    let value = lookup(table, key)?;
    value.as_f64().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "a number",
        value: value.to_string(),
    })
}

fn count(table: &ConstantTable, key: &str) -> Result<u64, ConfigError> {
    let value = lookup(table, key)?;
    value.as_count().ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "a non-negative integer",
        value: value.to_string(),
    })
}

fn default_x() -> f64 {
    1.4
}

fn default_y() -> f64 {
    1.5
}

#[derive(Debug, Deserialize)]
struct JsonConstants {
    #[serde(rename = "N")]
    n: usize,
    dx: f64,
    k: f64,
    m: f64,
    #[serde(rename = "M")]
    mass: f64,
    #[serde(rename = "R")]
    radius: f64,
    dt: f64,
    timesteps: u64,
    epsilon: f64,
    #[serde(rename = "V_X", default)]
    v_x: f64,
    #[serde(rename = "X", default = "default_x")]
    x: f64,
    #[serde(rename = "Y", default = "default_y")]
    y: f64,
}

impl From<JsonConstants> for SimulationConstants {
    fn from(raw: JsonConstants) -> Self {
        Self {
            n_springs: raw.n,
            dx: raw.dx,
            m: raw.m,
            k: raw.k,
            mass: raw.mass,
            v_x: raw.v_x,
            x_start: raw.x,
            y_start: raw.y,
            radius: raw.radius,
            dt: raw.dt,
            timesteps: raw.timesteps,
            epsilon: raw.epsilon,
        }
    }
}

/// Typed constants plus everything noticed while producing them
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub constants: SimulationConstants,
    pub diagnostics: Diagnostics,
}

impl LoadReport {
    /// The constants, unless the diagnostics contain an error
    pub fn into_constants(self) -> Result<SimulationConstants, ConfigError> {
        if self.diagnostics.has_errors() {
            return Err(ConfigError::Invalid(
                self.diagnostics.errors().map(|d| d.message.clone()).collect(),
            ));
        }
        Ok(self.constants)
    }
}

/// Anything that can produce a `SimulationConstants` record
pub trait ConstantsSource {
    /// Load the constants with parser warnings and analyzer findings, without
    /// failing on analyzer errors
    fn load_report(&self) -> Result<LoadReport, ConfigError>;

    /// Load and validate
    fn load(&self) -> Result<SimulationConstants, ConfigError> {
        self.load_report()?.into_constants()
    }
}

fn report(constants: SimulationConstants, mut diagnostics: Diagnostics) -> LoadReport {
    diagnostics.extend(analyze_constants(&constants));
    LoadReport {
        constants,
        diagnostics,
    }
}

fn read_source(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Flat `key = value` constants file
#[derive(Debug, Clone)]
pub struct FlatTextFile {
    pub path: PathBuf,
}

impl FlatTextFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConstantsSource for FlatTextFile {
    fn load_report(&self) -> Result<LoadReport, ConfigError> {
        let source = read_source(&self.path)?;
        let (table, diagnostics) = parse_constants(&source);
        let constants = SimulationConstants::from_table(&table)?;
        Ok(report(constants, diagnostics))
    }
}

/// JSON constants file
#[derive(Debug, Clone)]
pub struct JsonFile {
    pub path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConstantsSource for JsonFile {
    fn load_report(&self) -> Result<LoadReport, ConfigError> {
        let source = read_source(&self.path)?;
        let constants = SimulationConstants::from_json(&source)?;
        Ok(report(constants, Diagnostics::new()))
    }
}

/// An already-parsed table, e.g. assembled by a caller
impl ConstantsSource for ConstantTable {
    fn load_report(&self) -> Result<LoadReport, ConfigError> {
        let constants = SimulationConstants::from_table(self)?;
        Ok(report(constants, Diagnostics::new()))
    }
}

/// Pick an adapter from the file extension: `.json` is JSON, anything else
/// is flat text
pub fn source_for_path(path: impl AsRef<Path>) -> Box<dyn ConstantsSource> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Box::new(JsonFile::new(path))
    } else {
        Box::new(FlatTextFile::new(path))
    }
}

/// Load and validate constants from a path
pub fn load_constants(path: impl AsRef<Path>) -> Result<SimulationConstants, ConfigError> {
    source_for_path(path).load()
}
