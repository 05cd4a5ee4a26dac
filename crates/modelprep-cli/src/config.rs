use crate::cli::PrepArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use modelprep::engine::config as core_config;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialParseConfig {
    keep_hetero: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSearchConfig {
    atom_name: Option<String>,
    residue_name: Option<String>,
    cutoff: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialResolutionConfig {
    forced: Option<Vec<String>>,
    excluded: Option<Vec<String>>,
    allow_shared_forced: Option<bool>,
    require_bonds: Option<bool>,
}

/// The TOML configuration file, every field optional.
///
/// ```toml
/// [search]
/// cutoff = 2.2
/// [resolution]
/// forced = ["A:46-A:69"]
/// excluded = ["A:120"]
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialPrepConfig {
    parse: Option<PartialParseConfig>,
    search: Option<PartialSearchConfig>,
    resolution: Option<PartialResolutionConfig>,
}

impl PartialPrepConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::InputFile {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Layers `--set` values and then the dedicated flags on top of the file.
    pub fn merge_with_cli(mut self, args: &PrepArgs) -> Result<core_config::PrepConfig> {
        self.apply_set_values(&args.set_values)?;

        let parse = self.parse.take().unwrap_or_default();
        let search = self.search.take().unwrap_or_default();
        let resolution = self.resolution.take().unwrap_or_default();

        let forced_items = if args.forced.is_empty() {
            resolution.forced.unwrap_or_default()
        } else {
            args.forced.clone()
        };
        let excluded_items = if args.excluded.is_empty() {
            resolution.excluded.unwrap_or_default()
        } else {
            args.excluded.clone()
        };

        let mut forced = Vec::new();
        for item in &forced_items {
            forced.extend(
                parser::parse_pair_list(item).map_err(|e| CliError::Argument(e.to_string()))?,
            );
        }
        let mut excluded = Vec::new();
        for item in &excluded_items {
            excluded.extend(
                parser::parse_residue_list(item).map_err(|e| CliError::Argument(e.to_string()))?,
            );
        }

        let mut builder = core_config::PrepConfigBuilder::new()
            .keep_hetero(args.keep_hetero || parse.keep_hetero.unwrap_or(false))
            .forced_pairs(forced)
            .excluded_residues(excluded)
            .allow_shared_forced(
                args.allow_shared_forced || resolution.allow_shared_forced.unwrap_or(false),
            )
            .require_bonds(!args.allow_empty && resolution.require_bonds.unwrap_or(true));

        if let Some(cutoff) = args.cutoff.or(search.cutoff) {
            builder = builder.cutoff(cutoff);
        }
        if let Some(name) = args.atom_name.clone().or(search.atom_name) {
            builder = builder.atom_name(name);
        }
        if let Some(name) = args.residue_name.clone().or(search.residue_name) {
            builder = builder.residue_name(name);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = parser::parse_assignment(kv_pair)
                .map_err(|e| CliError::Config(e.to_string()))?;

            let invalid = |kind: &str| {
                CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
            };
            let parse_bool = || value_str.parse::<bool>().map_err(|_| invalid("boolean"));

            match key {
                "parse.keep-hetero" => {
                    self.parse.get_or_insert_with(Default::default).keep_hetero =
                        Some(parse_bool()?);
                }
                "search.cutoff" => {
                    self.search.get_or_insert_with(Default::default).cutoff =
                        Some(value_str.parse().map_err(|_| invalid("float"))?);
                }
                "search.atom-name" => {
                    self.search.get_or_insert_with(Default::default).atom_name =
                        Some(value_str.to_string());
                }
                "search.residue-name" => {
                    self.search.get_or_insert_with(Default::default).residue_name =
                        Some(value_str.to_string());
                }
                "resolution.allow-shared-forced" => {
                    self.resolution
                        .get_or_insert_with(Default::default)
                        .allow_shared_forced = Some(parse_bool()?);
                }
                "resolution.require-bonds" => {
                    self.resolution
                        .get_or_insert_with(Default::default)
                        .require_bonds = Some(parse_bool()?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
