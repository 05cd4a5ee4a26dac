use thiserror::Error;

use super::config::ConfigError;
use crate::core::alignment::region::RegionParseError;
use crate::core::alignment::set::AlignmentError;
use crate::core::io::pdb::PdbError;
use crate::core::models::ids::ResidueSpecifier;
use crate::core::models::structure::LookupError;

/// Opaque failure reported by an external modeling or MD engine.
pub type ExternalError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Residue {residue} has no {atom_name} atom on a {residue_name} residue")]
    MissingAtom {
        residue: ResidueSpecifier,
        atom_name: String,
        residue_name: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Structure already carries linkage or connectivity records; start from a clean parse")]
    AlreadyAnnotated,

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("Structure file error: {0}")]
    Structure(#[from] PdbError),

    #[error("Alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    #[error("Region preference error: {0}")]
    Region(#[from] RegionParseError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid {context} on line {line}: {message}")]
    Parse {
        context: &'static str,
        line: usize,
        message: String,
    },

    #[error("Report error: {0}")]
    Report(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("External engine '{engine}' failed: {source}")]
    External {
        engine: String,
        #[source]
        source: ExternalError,
    },
}
