use crate::cli::ScanArgs;
use crate::config::PartialPrepConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use modelprep::{
    core::io::{pdb::PdbFile, traits::StructureFile},
    engine::{progress::ProgressReporter, report},
    workflows,
};
use tracing::{info, warn};

pub fn run(args: ScanArgs, quiet: bool) -> Result<()> {
    let config = PartialPrepConfig::load(args.prep.config.as_deref())?.merge_with_cli(&args.prep)?;

    info!("Loading input structure from {:?}", &args.input);
    let (structure, _) = PdbFile::read_from_path(&args.input, &config.parse).map_err(|e| {
        CliError::InputFile {
            path: args.input.clone(),
            source: e.into(),
        }
    })?;
    if structure.is_annotated() {
        warn!("Input already carries SSBOND or CONECT records; 'annotate' will refuse it.");
    }

    let progress_handler = CliProgressHandler::new(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let (candidate_count, resolution) =
        workflows::annotate::scan(&structure, &config, &reporter)?;

    if let Some(report_path) = &args.report {
        report::write_rows_to_path(&report::bond_report_rows(&resolution), report_path)?;
        info!("Wrote bond report to {:?}", report_path);
    }

    println!(
        "{} {}-{} candidate(s) within {:.2} Å, {} accepted:",
        candidate_count,
        config.search.residue_name,
        config.search.atom_name,
        config.search.cutoff,
        resolution.bonds.len()
    );
    super::print_resolution(&resolution);

    let engine_arguments: Vec<String> = resolution
        .bonds
        .iter()
        .map(|bond| format!("--ss {}", bond.pair.engine_argument()))
        .collect();
    if !engine_arguments.is_empty() {
        println!("{}", engine_arguments.join(" "));
    }

    Ok(())
}
