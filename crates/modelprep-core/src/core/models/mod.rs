//! # Core Models Module
//!
//! This module contains the data structures used to represent a parsed
//! macromolecular structure file in modelprep.
//!
//! ## Overview
//!
//! A [`structure::Structure`] owns three slot-map arenas (atoms, residues and
//! chains) that refer to each other by typed keys, together with the ordered
//! record layout of the file it was read from. Keeping the layout next to the
//! model lets writers reproduce the input byte-for-byte apart from the records
//! that were deliberately added.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual coordinate records with serial, name and position
//! - [`residue`] - Residues with a name-to-atom index
//! - [`chain`] - Chains holding residues in ascending residue-number order
//! - [`record`] - Record layout entries, including linkage and connectivity records
//! - [`structure`] - The complete structure with lookup helpers
//! - [`ids`] - Arena keys and the user-facing [`ids::ResidueSpecifier`]
//!
//! ## Usage
//!
//! ```ignore
//! use modelprep::core::models::{atom::Atom, chain::ChainType, structure::Structure};
//!
//! let mut structure = Structure::new();
//! let chain_id = structure.add_chain('A', ChainType::Protein);
//! let residue_id = structure.add_residue(chain_id, 46, "CYS").unwrap();
//! structure.add_atom_to_residue(residue_id, Atom::new(1, "SG", residue_id, Point3::origin()));
//!
//! let sulfur = structure.lookup('A', 46, "SG")?;
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod record;
pub mod residue;
pub mod structure;
