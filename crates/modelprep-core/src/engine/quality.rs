use super::coverage;
use crate::core::models::ids::ResidueSpecifier;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::is_extreme_position;
use crate::core::utils::identifiers::{REQUIRED_BACKBONE_ATOMS, is_amino_acid};
use std::collections::BTreeSet;

/// An amino-acid residue lacking one or more heavy backbone atoms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteResidue {
    pub residue: ResidueSpecifier,
    pub name: String,
    pub missing: Vec<&'static str>,
}

/// Structural sanity checks on a parsed model.
#[derive(Debug, Clone, PartialEq)]
pub struct QualitySummary {
    pub residue_count: usize,
    pub atom_count: usize,
    pub incomplete_residues: Vec<IncompleteResidue>,
    /// Serials of atoms with a coordinate beyond the plausible range.
    pub extreme_atoms: Vec<usize>,
    /// Numbering gaps summed over all chains, counted on residue presence.
    pub gap_count: usize,
}

impl QualitySummary {
    pub fn is_clean(&self) -> bool {
        self.incomplete_residues.is_empty() && self.extreme_atoms.is_empty() && self.gap_count == 0
    }
}

pub fn summarize(structure: &Structure) -> QualitySummary {
    let mut incomplete_residues = Vec::new();
    let mut gap_count = 0;

    for chain in structure.chains() {
        for residue in structure.residues_of(chain) {
            if !is_amino_acid(&residue.name) {
                continue;
            }
            let missing: Vec<&'static str> = REQUIRED_BACKBONE_ATOMS
                .iter()
                .copied()
                .filter(|name| !residue.has_atom(name))
                .collect();
            if !missing.is_empty() {
                incomplete_residues.push(IncompleteResidue {
                    residue: ResidueSpecifier::new(chain.id, residue.number)
                        .with_insertion_code(residue.insertion_code),
                    name: residue.name.clone(),
                    missing,
                });
            }
        }

        let numbers: BTreeSet<isize> = structure.residues_of(chain).map(|r| r.number).collect();
        if let Some(report) = coverage::analyze(&numbers) {
            gap_count += report.gaps.len();
        }
    }

    let mut extreme_atoms: Vec<usize> = structure
        .atoms_iter()
        .filter(|(_, atom)| is_extreme_position(&atom.position))
        .map(|(_, atom)| atom.serial)
        .collect();
    extreme_atoms.sort_unstable();

    QualitySummary {
        residue_count: structure.residue_count(),
        atom_count: structure.atom_count(),
        incomplete_residues,
        extreme_atoms,
        gap_count,
    }
}
