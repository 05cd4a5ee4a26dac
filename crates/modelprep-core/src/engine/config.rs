use super::disulfide::ResiduePair;
use crate::core::io::pdb::ParseOptions;
use crate::core::models::ids::ResidueSpecifier;
use std::collections::BTreeSet;
use thiserror::Error;

pub const DEFAULT_BOND_ATOM_NAME: &str = "SG";
pub const DEFAULT_BOND_RESIDUE_NAME: &str = "CYS";
/// Default S-S cutoff in Angstroms; ideal disulfide geometry is about 2.05.
pub const DEFAULT_BOND_CUTOFF: f64 = 2.2;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid distance cutoff {0}: must be a positive, finite number of Angstroms")]
    InvalidCutoff(f64),
    #[error("Parameter '{0}' must not be empty")]
    EmptyParameter(&'static str),
    #[error("Forced pair {0} bonds a residue to itself")]
    SelfPair(ResiduePair),
}

/// Which atoms take part in the candidate search, and how far apart they may be.
#[derive(Debug, Clone, PartialEq)]
pub struct BondSearchConfig {
    pub atom_name: String,
    pub residue_name: String,
    pub cutoff: f64,
}

impl Default for BondSearchConfig {
    fn default() -> Self {
        Self {
            atom_name: DEFAULT_BOND_ATOM_NAME.to_string(),
            residue_name: DEFAULT_BOND_RESIDUE_NAME.to_string(),
            cutoff: DEFAULT_BOND_CUTOFF,
        }
    }
}

/// Constraints applied on top of the geometric candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionPolicy {
    /// Pairs accepted regardless of distance, in priority order.
    pub forced: Vec<ResiduePair>,
    /// Residues barred from automatic bonds. Forced bonds still apply.
    pub excluded: BTreeSet<ResidueSpecifier>,
    /// Lets a residue take part in more than one forced bond.
    pub allow_shared_forced: bool,
}

/// Configuration of one structure-preparation run.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepConfig {
    pub parse: ParseOptions,
    pub search: BondSearchConfig,
    pub resolution: ResolutionPolicy,
    /// Treat a run that accepts no bonds as a failure.
    pub require_bonds: bool,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            parse: ParseOptions::default(),
            search: BondSearchConfig::default(),
            resolution: ResolutionPolicy::default(),
            require_bonds: true,
        }
    }
}

#[derive(Default)]
pub struct PrepConfigBuilder {
    keep_hetero: Option<bool>,
    atom_name: Option<String>,
    residue_name: Option<String>,
    cutoff: Option<f64>,
    forced: Vec<ResiduePair>,
    excluded: BTreeSet<ResidueSpecifier>,
    allow_shared_forced: Option<bool>,
    require_bonds: Option<bool>,
}

impl PrepConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_hetero(mut self, keep: bool) -> Self {
        self.keep_hetero = Some(keep);
        self
    }
    pub fn atom_name(mut self, name: impl Into<String>) -> Self {
        self.atom_name = Some(name.into());
        self
    }
    pub fn residue_name(mut self, name: impl Into<String>) -> Self {
        self.residue_name = Some(name.into());
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn forced_pair(mut self, pair: ResiduePair) -> Self {
        self.forced.push(pair);
        self
    }
    pub fn forced_pairs(mut self, pairs: impl IntoIterator<Item = ResiduePair>) -> Self {
        self.forced.extend(pairs);
        self
    }
    pub fn excluded_residue(mut self, residue: ResidueSpecifier) -> Self {
        self.excluded.insert(residue);
        self
    }
    pub fn excluded_residues(mut self, residues: impl IntoIterator<Item = ResidueSpecifier>) -> Self {
        self.excluded.extend(residues);
        self
    }
    pub fn allow_shared_forced(mut self, allow: bool) -> Self {
        self.allow_shared_forced = Some(allow);
        self
    }
    pub fn require_bonds(mut self, require: bool) -> Self {
        self.require_bonds = Some(require);
        self
    }

    pub fn build(self) -> Result<PrepConfig, ConfigError> {
        let defaults = PrepConfig::default();

        let cutoff = self.cutoff.unwrap_or(defaults.search.cutoff);
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(ConfigError::InvalidCutoff(cutoff));
        }
        let atom_name = self.atom_name.unwrap_or(defaults.search.atom_name);
        if atom_name.trim().is_empty() {
            return Err(ConfigError::EmptyParameter("atom_name"));
        }
        let residue_name = self.residue_name.unwrap_or(defaults.search.residue_name);
        if residue_name.trim().is_empty() {
            return Err(ConfigError::EmptyParameter("residue_name"));
        }
        if let Some(pair) = self.forced.iter().find(|pair| pair.is_self_pair()) {
            return Err(ConfigError::SelfPair(*pair));
        }

        Ok(PrepConfig {
            parse: ParseOptions {
                keep_hetero: self.keep_hetero.unwrap_or(defaults.parse.keep_hetero),
            },
            search: BondSearchConfig {
                atom_name: atom_name.trim().to_string(),
                residue_name: residue_name.trim().to_string(),
                cutoff,
            },
            resolution: ResolutionPolicy {
                forced: self.forced,
                excluded: self.excluded,
                allow_shared_forced: self
                    .allow_shared_forced
                    .unwrap_or(defaults.resolution.allow_shared_forced),
            },
            require_bonds: self.require_bonds.unwrap_or(defaults.require_bonds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_defaults() {
        let config = PrepConfigBuilder::new().build().unwrap();
        assert_eq!(config, PrepConfig::default());
        assert_eq!(config.search.atom_name, "SG");
        assert_eq!(config.search.residue_name, "CYS");
        assert_eq!(config.search.cutoff, 2.2);
        assert!(!config.parse.keep_hetero);
        assert!(!config.resolution.allow_shared_forced);
        assert!(config.require_bonds);
    }

    #[test]
    fn builder_applies_overrides() {
        let pair: ResiduePair = "A:46-A:69".parse().unwrap();
        let config = PrepConfigBuilder::new()
            .keep_hetero(true)
            .cutoff(3.0)
            .atom_name(" SG ")
            .forced_pair(pair)
            .excluded_residue(ResidueSpecifier::new('A', 120))
            .allow_shared_forced(true)
            .require_bonds(false)
            .build()
            .unwrap();

        assert!(config.parse.keep_hetero);
        assert_eq!(config.search.cutoff, 3.0);
        assert_eq!(config.search.atom_name, "SG");
        assert_eq!(config.resolution.forced, vec![pair]);
        assert!(
            config
                .resolution
                .excluded
                .contains(&ResidueSpecifier::new('A', 120))
        );
        assert!(config.resolution.allow_shared_forced);
        assert!(!config.require_bonds);
    }

    #[test]
    fn builder_rejects_invalid_cutoffs() {
        for cutoff in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = PrepConfigBuilder::new().cutoff(cutoff).build();
            assert!(matches!(result, Err(ConfigError::InvalidCutoff(_))));
        }
    }

    #[test]
    fn builder_rejects_empty_names_and_self_pairs() {
        assert_eq!(
            PrepConfigBuilder::new().residue_name("  ").build(),
            Err(ConfigError::EmptyParameter("residue_name"))
        );
        let self_pair = ResiduePair::new(ResidueSpecifier::new('A', 5), ResidueSpecifier::new('A', 5));
        assert_eq!(
            PrepConfigBuilder::new().forced_pair(self_pair).build(),
            Err(ConfigError::SelfPair(self_pair))
        );
    }
}
