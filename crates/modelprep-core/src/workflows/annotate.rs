use crate::core::io::pdb::{PdbFile, PdbMetadata};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use crate::engine::annotation::{self, AnnotationSummary};
use crate::engine::config::PrepConfig;
use crate::engine::disulfide::{Resolution, candidates, resolution};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use std::path::Path;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationOutcome {
    /// Number of geometric candidates found before resolution.
    pub candidate_count: usize,
    pub resolution: Resolution,
    pub summary: AnnotationSummary,
}

/// Finds and resolves bonds without touching the structure.
#[instrument(skip_all, name = "scan_workflow")]
pub fn scan(
    structure: &Structure,
    config: &PrepConfig,
    reporter: &ProgressReporter,
) -> Result<(usize, Resolution), EngineError> {
    reporter.phase_start("Scanning Candidates");
    let found = candidates::generate_candidates(structure, &config.search);
    info!(
        "Found {} {}-{} candidate pair(s) within {:.2} A.",
        found.len(),
        config.search.residue_name,
        config.search.atom_name,
        config.search.cutoff
    );
    reporter.phase_finish();

    reporter.phase_start("Resolving Bonds");
    let resolved = resolution::resolve(structure, &found, &config.search, &config.resolution)?;
    info!(
        accepted = resolved.bonds.len(),
        rejected = resolved.rejected.len(),
        "Bond resolution finished."
    );
    reporter.phase_finish();

    Ok((found.len(), resolved))
}

/// Scans, resolves and writes the accepted bonds into `structure`.
#[instrument(skip_all, name = "annotate_workflow")]
pub fn run(
    structure: &mut Structure,
    config: &PrepConfig,
    reporter: &ProgressReporter,
) -> Result<AnnotationOutcome, EngineError> {
    if structure.is_annotated() {
        return Err(EngineError::AlreadyAnnotated);
    }

    let (candidate_count, resolution) = scan(structure, config, reporter)?;
    if resolution.bonds.is_empty() && config.require_bonds {
        return Err(EngineError::Validation(format!(
            "no {} bonds accepted ({} candidate(s) found)",
            config.search.residue_name, candidate_count
        )));
    }

    reporter.phase_start("Writing Annotations");
    let summary = annotation::annotate(structure, &resolution.bonds)?;
    reporter.message(format!(
        "{} SSBOND and {} CONECT record(s) added",
        summary.linkage_records, summary.connectivity_records
    ));
    reporter.phase_finish();

    info!(
        "Annotation complete: {} bond(s) written.",
        summary.linkage_records
    );
    Ok(AnnotationOutcome {
        candidate_count,
        resolution,
        summary,
    })
}

/// Reads `input`, annotates it and writes the result to `output`.
pub fn run_file(
    input: &Path,
    output: &Path,
    config: &PrepConfig,
    reporter: &ProgressReporter,
) -> Result<AnnotationOutcome, EngineError> {
    reporter.phase_start("Reading Structure");
    let (mut structure, metadata): (Structure, PdbMetadata) =
        PdbFile::read_from_path(input, &config.parse)?;
    info!(
        atoms = structure.atom_count(),
        residues = structure.residue_count(),
        "Read {}.",
        input.display()
    );
    reporter.phase_finish();

    let outcome = run(&mut structure, config, reporter)?;
    PdbFile::write_to_path(&structure, &metadata, output)?;
    info!("Wrote annotated structure to {}.", output.display());
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::PrepConfigBuilder;
    use crate::engine::disulfide::ResiduePair;

    const TWO_CYSTEINES: &str = "\
HEADER    TEST
ATOM      1  SG  CYS A  46       0.000   0.000   0.000  1.00  0.00           S
ATOM      2  SG  CYS A  69       2.030   0.000   0.000  1.00  0.00           S
ATOM      3  SG  CYS A  90       9.000   0.000   0.000  1.00  0.00           S
END
";

    fn parse(text: &str) -> Structure {
        PdbFile::read_from_str(text, &Default::default()).unwrap().0
    }

    #[test]
    fn run_annotates_the_accepted_bond() {
        let mut structure = parse(TWO_CYSTEINES);
        let outcome = run(&mut structure, &PrepConfig::default(), &ProgressReporter::new()).unwrap();

        assert_eq!(outcome.candidate_count, 1);
        assert_eq!(outcome.resolution.bonds.len(), 1);
        assert_eq!(outcome.summary.linkage_records, 1);
        assert_eq!(structure.connectivity_records().count(), 2);
    }

    #[test]
    fn run_requires_bonds_unless_disabled() {
        let far_apart = TWO_CYSTEINES.replace("   2.030", "   5.030");
        let mut structure = parse(&far_apart);
        let result = run(&mut structure, &PrepConfig::default(), &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Validation(_))));
        assert!(!structure.is_annotated());

        let lenient = PrepConfigBuilder::new().require_bonds(false).build().unwrap();
        let outcome = run(&mut structure, &lenient, &ProgressReporter::new()).unwrap();
        assert!(outcome.resolution.bonds.is_empty());
    }

    #[test]
    fn run_refuses_an_annotated_structure() {
        let mut structure = parse(TWO_CYSTEINES);
        run(&mut structure, &PrepConfig::default(), &ProgressReporter::new()).unwrap();
        let again = run(&mut structure, &PrepConfig::default(), &ProgressReporter::new());
        assert!(matches!(again, Err(EngineError::AlreadyAnnotated)));
    }

    fn written(structure: &Structure, metadata: &PdbMetadata) -> String {
        let mut buffer = Vec::new();
        PdbFile::write_to(structure, metadata, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn inserted_cysteine_is_bonded_under_its_own_identity() {
        let text = "\
ATOM      1  CA  ALA A  52       9.000   0.000   0.000  1.00  0.00           C
ATOM      2  CA  CYS A  52A      1.500   0.000   0.000  1.00  0.00           C
ATOM      3  SG  CYS A  52A      0.000   0.000   0.000  1.00  0.00           S
ATOM      4  SG  CYS A  80       2.030   0.000   0.000  1.00  0.00           S
END
";
        let (mut structure, metadata) = PdbFile::read_from_str(text, &Default::default()).unwrap();
        assert_eq!(structure.residue_count(), 3);

        let outcome = run(&mut structure, &PrepConfig::default(), &ProgressReporter::new()).unwrap();
        let bond = &outcome.resolution.bonds.bonds()[0];
        assert_eq!(bond.pair.to_string(), "A:52A-A:80");
        assert_eq!(bond.pair.engine_argument(), "52A:A-80:A");
        assert_eq!((bond.first_serial, bond.second_serial), (3, 4));

        let output = written(&structure, &metadata);
        let ssbond = output.lines().find(|line| line.starts_with("SSBOND")).unwrap();
        assert_eq!(&ssbond[15..22], "A   52A");
    }

    #[test]
    fn two_model_file_keeps_only_the_first_model_and_a_header_linkage() {
        let text = "\
HEADER    TEST
MODEL        1
ATOM      1  SG  CYS A  46       0.000   0.000   0.000  1.00  0.00           S
ATOM      2  SG  CYS A  69       2.030   0.000   0.000  1.00  0.00           S
ENDMDL
MODEL        2
ATOM      3  SG  CYS A  46       0.100   0.000   0.000  1.00  0.00           S
ATOM      4  SG  CYS A  69       2.130   0.000   0.000  1.00  0.00           S
ENDMDL
END
";
        let (mut structure, metadata) = PdbFile::read_from_str(text, &Default::default()).unwrap();
        run(&mut structure, &PrepConfig::default(), &ProgressReporter::new()).unwrap();

        let tags: Vec<_> = written(&structure, &metadata)
            .lines()
            .map(|line| line[..line.len().min(6)].trim().to_string())
            .collect();
        assert_eq!(
            tags,
            vec![
                "HEADER", "SSBOND", "MODEL", "ATOM", "ATOM", "ENDMDL", "CONECT", "CONECT", "END"
            ]
        );
    }

    #[test]
    fn scan_applies_forced_pairs_without_mutating() {
        let structure = parse(TWO_CYSTEINES);
        let config = PrepConfigBuilder::new()
            .forced_pair("A:69-A:90".parse::<ResiduePair>().unwrap())
            .build()
            .unwrap();
        let (count, resolved) = scan(&structure, &config, &ProgressReporter::new()).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            resolved.bonds.bonds()[0].pair.to_string(),
            "A:69-A:90"
        );
        assert_eq!(resolved.rejected.len(), 1);
        assert!(!structure.is_annotated());
    }
}
