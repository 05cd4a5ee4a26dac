use crate::cli::AlignmentArgs;
use crate::error::{CliError, Result};
use modelprep::{
    core::{
        alignment::{region, set::AlignmentSet},
        io::pir::PirFile,
    },
    engine::{disulfide::BondSet, error::EngineError},
    workflows::modeling::{PreparedRestraints, RestraintStrategy},
};
use tracing::{info, warn};

pub fn run(args: AlignmentArgs) -> Result<()> {
    info!("Loading alignment from {:?}", &args.input);
    let (alignment, metadata) =
        PirFile::read_from_path(&args.input).map_err(|e| CliError::InputFile {
            path: args.input.clone(),
            source: e.into(),
        })?;
    if !metadata.warnings.is_empty() {
        warn!(
            "{} problem(s) found while reading {:?}",
            metadata.warnings.len(),
            &args.input
        );
    }

    let alignment = if args.templates.is_empty() {
        alignment
    } else {
        let codes: Vec<&str> = args.templates.iter().map(String::as_str).collect();
        alignment.subset(&codes).map_err(EngineError::from)?
    };
    print_entries(&alignment);

    if let Some(spec) = &args.regions {
        let regions = region::parse_spec(spec).map_err(EngineError::from)?;
        let restraints =
            PreparedRestraints::new(&BondSet::default(), &regions, &alignment, args.offset);

        println!("Region preferences (offset {}):", args.offset);
        for hint in restraints.region_hints() {
            let (start, end) = hint.model_range;
            let template = match hint.template_index {
                Some(index) => alignment.entries()[index].code.as_str(),
                None => "not in alignment",
            };
            println!("  {} -> model {}-{} ({})", hint.preference, start, end, template);
        }
    }

    if let Some(output) = &args.output {
        PirFile::write_to_path(&alignment, output).map_err(EngineError::from)?;
        println!("✓ Alignment with {} entries written to: {}", alignment.len(), output.display());
    }

    Ok(())
}

fn print_entries(alignment: &AlignmentSet) {
    for entry in alignment.entries() {
        println!(
            "{:<24} {:<8} ({}) {} residue(s), aligned length {}",
            entry.code,
            entry.role.to_string(),
            entry.evidence,
            entry.residue_count(),
            entry.aligned_length()
        );
    }
    for (code, length) in alignment.length_mismatches() {
        println!(
            "  warning: '{}' has aligned length {}, target has {}",
            code,
            length,
            alignment.target().aligned_length()
        );
    }
}
