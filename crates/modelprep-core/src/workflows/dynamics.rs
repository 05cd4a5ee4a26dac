use crate::engine::error::{EngineError, ExternalError};
use crate::engine::progress::ProgressReporter;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Joint type assigned to a bond in a mobility descriptor file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mobility {
    Cartesian,
    Pin,
    Torsion,
    Slider,
}

impl fmt::Display for Mobility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mobility::Cartesian => "Cartesian",
            Mobility::Pin => "Pin",
            Mobility::Torsion => "Torsion",
            Mobility::Slider => "Slider",
        };
        f.write_str(name)
    }
}

impl FromStr for Mobility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cartesian" => Ok(Mobility::Cartesian),
            "Pin" => Ok(Mobility::Pin),
            "Torsion" => Ok(Mobility::Torsion),
            "Slider" => Ok(Mobility::Slider),
            other => Err(format!("unknown mobility '{}'", other)),
        }
    }
}

/// Mobility of the bond between two atoms, by 0-based atom index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobilityDescriptor {
    pub first_atom: usize,
    pub second_atom: usize,
    pub mobility: Mobility,
}

const WELD: &str = "Weld";

/// Parses `atomA atomB Mobility` lines. Lines starting with `#`, lines with
/// fewer than three fields and `Weld` bonds are skipped.
pub fn parse_mobility_descriptors(text: &str) -> Result<Vec<MobilityDescriptor>, EngineError> {
    let mut descriptors = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 || fields[2] == WELD {
            continue;
        }

        let parse_error = |message: String| EngineError::Parse {
            context: "mobility descriptor",
            line: index + 1,
            message,
        };
        let atom = |value: &str| {
            value
                .parse::<usize>()
                .map_err(|_| parse_error(format!("'{}' is not an atom index", value)))
        };

        descriptors.push(MobilityDescriptor {
            first_atom: atom(fields[0])?,
            second_atom: atom(fields[1])?,
            mobility: fields[2].parse().map_err(parse_error)?,
        });
    }
    Ok(descriptors)
}

pub fn read_mobility_file(path: &Path) -> Result<Vec<MobilityDescriptor>, EngineError> {
    let text = std::fs::read_to_string(path)?;
    parse_mobility_descriptors(&text)
}

/// Inputs of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct MdJob {
    pub name: String,
    pub topology: PathBuf,
    pub coordinates: PathBuf,
    pub equilibration_steps: u64,
    pub production_steps: u64,
    pub write_frequency: u64,
    /// Kelvin.
    pub base_temperature: f64,
    pub seed: u64,
    /// One extra sampling world per file.
    pub mobility_files: Vec<PathBuf>,
}

impl MdJob {
    pub fn new(name: &str, topology: &Path, coordinates: &Path) -> Self {
        Self {
            name: name.to_string(),
            topology: topology.to_path_buf(),
            coordinates: coordinates.to_path_buf(),
            equilibration_steps: 50_000,
            production_steps: 5_000_000,
            write_frequency: 50,
            base_temperature: 300.0,
            seed: 12345,
            mobility_files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MdOutput {
    pub trajectory: PathBuf,
}

/// An external molecular-dynamics engine. Calls block until the simulation
/// finishes.
pub trait MdEngine {
    fn name(&self) -> &str;

    /// `worlds` holds the descriptors of each mobility file, in job order.
    fn simulate(
        &self,
        job: &MdJob,
        worlds: &[Vec<MobilityDescriptor>],
    ) -> Result<MdOutput, ExternalError>;
}

#[instrument(skip_all, name = "dynamics_workflow")]
pub fn run(
    engine: &dyn MdEngine,
    job: &MdJob,
    reporter: &ProgressReporter,
) -> Result<MdOutput, EngineError> {
    if job.production_steps == 0 || job.write_frequency == 0 {
        return Err(EngineError::Validation(
            "production steps and write frequency must be positive".to_string(),
        ));
    }
    if !(job.base_temperature.is_finite() && job.base_temperature > 0.0) {
        return Err(EngineError::Validation(format!(
            "invalid base temperature {}",
            job.base_temperature
        )));
    }

    reporter.phase_start("Reading Mobility Files");
    let worlds = job
        .mobility_files
        .iter()
        .map(|path| {
            let descriptors = read_mobility_file(path)?;
            debug!("{}: {} flexible bond(s)", path.display(), descriptors.len());
            Ok(descriptors)
        })
        .collect::<Result<Vec<_>, EngineError>>()?;
    reporter.phase_finish();

    reporter.phase_start("Simulating");
    info!(
        engine = engine.name(),
        name = %job.name,
        worlds = worlds.len(),
        steps = job.production_steps,
        "Starting simulation."
    );
    let output = engine
        .simulate(job, &worlds)
        .map_err(|source| EngineError::External {
            engine: engine.name().to_string(),
            source,
        })?;
    reporter.phase_finish();

    info!("Simulation finished: {}.", output.trajectory.display());
    Ok(output)
}
