use crate::cli::AnnotateArgs;
use crate::config::PartialPrepConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use modelprep::{
    engine::{progress::ProgressReporter, report},
    workflows,
};
use tracing::info;

pub fn run(args: AnnotateArgs, quiet: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = PartialPrepConfig::load(args.prep.config.as_deref())?.merge_with_cli(&args.prep)?;

    let progress_handler = CliProgressHandler::new(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Annotating {:?} -> {:?}", &args.input, &args.output);
    let outcome = workflows::annotate::run_file(&args.input, &args.output, &config, &reporter)?;

    if let Some(report_path) = &args.report {
        let rows = report::bond_report_rows(&outcome.resolution);
        report::write_rows_to_path(&rows, report_path)?;
        info!("Wrote {} report row(s) to {:?}", rows.len(), report_path);
    }

    println!(
        "✓ {} of {} candidate(s) accepted; {} SSBOND and {} CONECT record(s) written to: {}",
        outcome.resolution.bonds.len(),
        outcome.candidate_count,
        outcome.summary.linkage_records,
        outcome.summary.connectivity_records,
        args.output.display()
    );
    super::print_resolution(&outcome.resolution);

    Ok(())
}
