use super::ids::ResidueId;
use std::fmt;

/// Polymer class of a chain, decided by the first record that names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    /// First seen on an `ATOM` record.
    Protein,
    /// First seen on a `HETATM` record (ligands, waters, ions).
    Other,
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChainType::Protein => "protein",
            ChainType::Other => "other",
        })
    }
}

/// One chain of a [`Structure`](super::structure::Structure).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,
    pub chain_type: ChainType,
    /// Kept sorted by residue number by `Structure::add_residue`.
    pub(crate) residues: Vec<ResidueId>,
}

impl Chain {
    pub(crate) fn new(id: char, chain_type: ChainType) -> Self {
        Self {
            id,
            chain_type,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn is_protein(&self) -> bool {
        self.chain_type == ChainType::Protein
    }
}
