use crate::cli::GapsArgs;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use modelprep::{
    core::io::pdb::ParseOptions,
    engine::{progress::ProgressReporter, report},
    workflows::{self, coverage::StructureCoverage},
};
use tracing::info;

pub fn run(args: GapsArgs, quiet: bool) -> Result<()> {
    let options = ParseOptions {
        keep_hetero: args.keep_hetero,
    };

    let progress_handler = CliProgressHandler::new(quiet);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let results =
        workflows::coverage::run_files(&args.inputs, &args.atom_name, &options, &reporter);

    let mut rows = Vec::new();
    let mut failures = 0;
    for (path, result) in &results {
        match result {
            Ok(analysis) => {
                print_coverage(analysis);
                rows.extend(report::gap_report_rows(
                    &path.display().to_string(),
                    &analysis.chains,
                ));
            }
            Err(e) => {
                failures += 1;
                eprintln!("✗ {}: {}", path.display(), e);
            }
        }
    }

    if let Some(report_path) = &args.report {
        report::write_rows_to_path(&rows, report_path)?;
        info!("Wrote {} gap row(s) to {:?}", rows.len(), report_path);
    }

    if failures == results.len() {
        return Err(CliError::Argument(format!(
            "none of the {} input file(s) could be analyzed",
            results.len()
        )));
    }
    Ok(())
}

fn print_coverage(analysis: &StructureCoverage) {
    println!("{}", analysis.path.display());
    for (chain, report) in &analysis.chains {
        println!(
            "  Chain {}: residues {}-{}, {}/{} present ({:.1}%)",
            chain,
            report.first_residue,
            report.last_residue,
            report.present,
            report.expected(),
            report.completeness_percent()
        );
        for gap in &report.gaps {
            if gap.start == gap.end {
                println!("    missing {}", gap.start);
            } else {
                println!("    missing {}-{} ({} residues)", gap.start, gap.end, gap.length());
            }
        }
    }

    let quality = &analysis.quality;
    if !quality.incomplete_residues.is_empty() || !quality.extreme_atoms.is_empty() {
        println!(
            "  Quality: {} residue(s) missing backbone atoms, {} atom(s) with extreme coordinates",
            quality.incomplete_residues.len(),
            quality.extreme_atoms.len()
        );
    }
}
