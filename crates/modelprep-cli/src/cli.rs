use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "modelprep - Prepare and cross-check structure and alignment files for homology modeling and molecular dynamics.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output and progress bars
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect disulfide bonds and write SSBOND/CONECT records into a structure file.
    Annotate(AnnotateArgs),
    /// List the disulfide bonds that would be written, without modifying anything.
    Scan(ScanArgs),
    /// Report residue numbering gaps and per-chain coverage of one or more structures.
    Gaps(GapsArgs),
    /// Classify the entries of an alignment file and map region preferences onto it.
    Alignment(AlignmentArgs),
    /// Export the chain sequences of a structure as FASTA or as an alignment skeleton.
    Sequence(SequenceArgs),
}

/// Bond search and resolution options shared by `annotate` and `scan`.
#[derive(Args, Debug, Clone, Default)]
pub struct PrepArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the maximum bonding-atom distance in Angstroms.
    #[arg(long, allow_negative_numbers = true, value_name = "FLOAT")]
    pub cutoff: Option<f64>,

    /// Override the bonding atom name (default 'SG').
    #[arg(long, value_name = "NAME")]
    pub atom_name: Option<String>,

    /// Override the bonding residue name (default 'CYS').
    #[arg(long, value_name = "NAME")]
    pub residue_name: Option<String>,

    /// Force a bond regardless of distance. Accepts 'A:46-A:69' or the legacy '46,69';
    /// several pairs may be separated by ';' or given by repeating the flag.
    /// Replaces the forced pairs of the config file.
    #[arg(short = 'f', long = "force", value_name = "PAIRS")]
    pub forced: Vec<String>,

    /// Keep a residue out of automatic bonds, e.g. 'A:120'. Comma-separated lists
    /// and repeated flags are accepted. Replaces the exclusions of the config file.
    #[arg(short = 'x', long = "exclude", value_name = "RESIDUES")]
    pub excluded: Vec<String>,

    /// Keep HETATM records when reading the structure.
    #[arg(long)]
    pub keep_hetero: bool,

    /// Allow one residue to take part in several forced bonds.
    #[arg(long)]
    pub allow_shared_forced: bool,

    /// Succeed even when no bond is accepted.
    #[arg(long)]
    pub allow_empty: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.cutoff=2.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `annotate` subcommand.
#[derive(Args, Debug)]
pub struct AnnotateArgs {
    /// Path to the input structure file (fixed-column PDB format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the annotated output structure file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Also write a CSV report of accepted bonds and rejected candidates.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub prep: PrepArgs,
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Path to the input structure file (fixed-column PDB format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Write a CSV report of accepted bonds and rejected candidates.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub prep: PrepArgs,
}

/// Arguments for the `gaps` subcommand.
#[derive(Args, Debug)]
pub struct GapsArgs {
    /// Structure files to analyze.
    #[arg(required = true, num_args = 1.., value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Atom whose presence marks a residue as observed.
    #[arg(long, default_value = "CA", value_name = "NAME")]
    pub atom_name: String,

    /// Keep HETATM records when reading the structures.
    #[arg(long)]
    pub keep_hetero: bool,

    /// Write every gap of every file to a CSV report.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

/// Arguments for the `alignment` subcommand.
#[derive(Args, Debug)]
pub struct AlignmentArgs {
    /// Path to the alignment file (PIR format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Region preferences, e.g. '384-410:6MEJ:3.0,450-470:1ABC'.
    #[arg(short = 'R', long, value_name = "SPEC")]
    pub regions: Option<String>,

    /// Value subtracted from global residue numbers to obtain model numbering.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true, value_name = "INT")]
    pub offset: isize,

    /// Keep only these templates (comma-separated, in the given order).
    #[arg(short, long, value_delimiter = ',', value_name = "CODES")]
    pub templates: Vec<String>,

    /// Write the (possibly reduced) alignment to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequenceFormat {
    #[default]
    Fasta,
    Pir,
}

/// Arguments for the `sequence` subcommand.
#[derive(Args, Debug)]
pub struct SequenceArgs {
    /// Path to the input structure file (fixed-column PDB format).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Code used in headers; defaults to the input file stem.
    #[arg(long, value_name = "CODE")]
    pub code: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = SequenceFormat::Fasta)]
    pub format: SequenceFormat,

    /// Code of the target block written in PIR mode.
    #[arg(long, default_value = "target", value_name = "CODE")]
    pub target: String,

    /// Do not insert '-' for missing residue numbers.
    #[arg(long)]
    pub no_gap_fill: bool,

    /// Write to this path instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_and_global_flags_are_collected() {
        let cli = Cli::parse_from([
            "modelprep", "annotate", "-i", "in.pdb", "-o", "out.pdb", "-f", "A:46-A:69", "-f",
            "76,103", "-x", "A:120", "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Annotate(args) => {
                assert_eq!(args.prep.forced, vec!["A:46-A:69", "76,103"]);
                assert_eq!(args.prep.excluded, vec!["A:120"]);
                assert!(args.report.is_none());
            }
            other => panic!("Expected 'annotate' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn alignment_templates_are_comma_separated() {
        let cli = Cli::parse_from([
            "modelprep", "alignment", "-i", "aln.pir", "-t", "6MEJ,1ABC", "--offset", "-5",
        ]);
        match cli.command {
            Commands::Alignment(args) => {
                assert_eq!(args.templates, vec!["6MEJ", "1ABC"]);
                assert_eq!(args.offset, -5);
            }
            other => panic!("Expected 'alignment' subcommand, got {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["modelprep", "-q", "-v", "gaps", "a.pdb"]).is_err());
    }
}
