use crate::cli::{SequenceArgs, SequenceFormat};
use crate::error::{CliError, Result};
use modelprep::{
    core::{
        alignment::set::AlignmentSet,
        io::{pdb::PdbFile, pir::PirFile, traits::StructureFile},
    },
    engine::{
        error::EngineError,
        sequence::{self, ChainSequence},
    },
};
use std::path::Path;
use tracing::info;

pub fn run(args: SequenceArgs) -> Result<()> {
    let (structure, _) =
        PdbFile::read_from_path(&args.input, &Default::default()).map_err(|e| {
            CliError::InputFile {
                path: args.input.clone(),
                source: e.into(),
            }
        })?;

    let chains = sequence::extract_chain_sequences(&structure, !args.no_gap_fill);
    if chains.is_empty() {
        return Err(EngineError::Validation(format!(
            "{} contains no protein chain with CA atoms",
            args.input.display()
        ))
        .into());
    }
    info!("Extracted {} chain sequence(s).", chains.len());

    let code = args
        .code
        .clone()
        .unwrap_or_else(|| default_code(&args.input));
    let text = match args.format {
        SequenceFormat::Fasta => chains.iter().map(|chain| chain.to_fasta(&code)).collect(),
        SequenceFormat::Pir => pir_skeleton(&chains, &code, &args.target)?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, text)?;
            println!("✓ {} chain sequence(s) written to: {}", chains.len(), path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn default_code(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}

/// One template block per chain plus a target block seeded with the first
/// chain's sequence, ready to be aligned by hand.
fn pir_skeleton(chains: &[ChainSequence], code: &str, target: &str) -> Result<String> {
    let mut entries: Vec<_> = chains
        .iter()
        .map(|chain| {
            if chains.len() == 1 {
                chain.to_template_entry(code)
            } else {
                chain.to_template_entry(&format!("{}_{}", code, chain.chain_id))
            }
        })
        .collect();
    entries.push(chains[0].to_target_entry(target));

    let alignment = AlignmentSet::new(entries).map_err(EngineError::from)?;
    Ok(PirFile::to_text(&alignment).map_err(EngineError::from)?)
}
