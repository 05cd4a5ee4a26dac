use crate::core::io::pdb::{ParseOptions, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use crate::engine::coverage::{self, CoverageReport};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::quality::{self, QualitySummary};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Coverage and quality of one structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureCoverage {
    pub path: PathBuf,
    pub chains: BTreeMap<char, CoverageReport>,
    pub quality: QualitySummary,
}

/// Per-chain coverage counted on residues that carry `atom_name`.
#[instrument(skip_all, name = "coverage_workflow")]
pub fn run(structure: &Structure, atom_name: &str) -> Result<BTreeMap<char, CoverageReport>, EngineError> {
    let reports = coverage::analyze_structure(structure, atom_name);
    if reports.is_empty() {
        return Err(EngineError::Validation(format!(
            "no residue carries a {} atom",
            atom_name
        )));
    }
    for (chain, report) in &reports {
        info!(
            chain = %chain,
            first = report.first_residue,
            last = report.last_residue,
            gaps = report.gaps.len(),
            "Chain coverage {:.1}%.",
            report.completeness_percent()
        );
    }
    Ok(reports)
}

pub fn run_file(
    path: &Path,
    atom_name: &str,
    options: &ParseOptions,
) -> Result<StructureCoverage, EngineError> {
    let (structure, _) = PdbFile::read_from_path(path, options)?;
    let chains = run(&structure, atom_name)?;
    Ok(StructureCoverage {
        path: path.to_path_buf(),
        chains,
        quality: quality::summarize(&structure),
    })
}

/// Analyzes several files in order. A file that fails is logged and
/// returned as an error entry; the remaining files are still processed.
pub fn run_files(
    paths: &[PathBuf],
    atom_name: &str,
    options: &ParseOptions,
    reporter: &ProgressReporter,
) -> Vec<(PathBuf, Result<StructureCoverage, EngineError>)> {
    reporter.phase_start("Analyzing Coverage");
    reporter.report(Progress::TaskStart {
        total_steps: paths.len() as u64,
    });

    let results = paths
        .iter()
        .map(|path| {
            let result = run_file(path, atom_name, options);
            if let Err(e) = &result {
                warn!("Skipping {}: {}", path.display(), e);
            }
            reporter.report(Progress::TaskIncrement);
            (path.clone(), result)
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    reporter.phase_finish();
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::coverage::{DEFAULT_COVERAGE_ATOM, GapRange};
    use std::fs;
    use tempfile::tempdir;

    fn ca_line(serial: usize, number: isize) -> String {
        format!(
            "ATOM  {:>5}  CA  ALA A{:>4}       1.000   1.000   1.000  1.00  0.00           C",
            serial, number
        )
    }

    fn write_model(dir: &Path, name: &str, numbers: &[isize]) -> PathBuf {
        let mut text: String = numbers
            .iter()
            .enumerate()
            .map(|(i, n)| ca_line(i + 1, *n) + "\n")
            .collect();
        text.push_str("END\n");
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn run_file_reports_gaps_and_quality() {
        let dir = tempdir().unwrap();
        let path = write_model(dir.path(), "model.pdb", &[1, 2, 3, 7, 8, 10]);

        let result = run_file(&path, DEFAULT_COVERAGE_ATOM, &ParseOptions::default()).unwrap();
        let report = &result.chains[&'A'];
        assert_eq!(
            report.gaps,
            vec![GapRange { start: 4, end: 6 }, GapRange { start: 9, end: 9 }]
        );
        assert_eq!(result.quality.incomplete_residues.len(), 6);
        assert_eq!(result.quality.gap_count, 2);
    }

    #[test]
    fn run_rejects_structures_without_qualifying_residues() {
        let dir = tempdir().unwrap();
        let path = write_model(dir.path(), "model.pdb", &[1, 2]);
        let (structure, _) = PdbFile::read_from_path(&path, &ParseOptions::default()).unwrap();
        assert!(matches!(
            run(&structure, "CB"),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn run_files_continues_past_failures_and_reports_progress() {
        let dir = tempdir().unwrap();
        let good = write_model(dir.path(), "good.pdb", &[1, 2, 3]);
        let missing = dir.path().join("missing.pdb");

        let increments = std::sync::atomic::AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if event == Progress::TaskIncrement {
                increments.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        }));

        let results = run_files(
            &[missing.clone(), good.clone()],
            DEFAULT_COVERAGE_ATOM,
            &ParseOptions::default(),
            &reporter,
        );
        drop(reporter);

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_err());
        assert!(results[1].1.as_ref().unwrap().chains[&'A'].is_complete());
        assert_eq!(increments.into_inner(), 2);
    }
}
