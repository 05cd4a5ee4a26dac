use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::ids::{AtomId, ChainId, ResidueId, ResidueSpecifier};
use super::record::{ConnectivityRecord, LinkageRecord, Record};
use super::residue::Residue;
use slotmap::SlotMap;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Atom '{atom_name}' not found in residue {residue}")]
    NotFound {
        residue: ResidueSpecifier,
        atom_name: String,
    },
}

/// A parsed macromolecular structure: atoms grouped into residues and chains,
/// plus the ordered record layout of the file it came from.
///
/// Atoms, residues and chains live in slot-map arenas and refer to each other
/// by key. The record layout preserves every line of the source so that the
/// structure can be written back with only the intended changes.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in order of first appearance.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain ID, residue number and
    /// insertion code.
    residue_id_map: HashMap<(ChainId, isize, char), ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
    /// Lookup map from atom serial number to atom ID.
    serial_map: HashMap<usize, AtomId>,
    /// Every record of the source file, in file order.
    records: Vec<Record>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns an iterator over all atoms in insertion order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Finds an atom by its serial number.
    pub fn atom_by_serial(&self, serial: usize) -> Option<&Atom> {
        self.serial_map
            .get(&serial)
            .and_then(|&id| self.atoms.get(id))
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns the chains in order of first appearance in the source.
    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.chain_order.iter().filter_map(|&id| self.chains.get(id))
    }

    /// Returns the residues of a chain in ascending residue-number order.
    pub fn residues_of<'a>(&'a self, chain: &'a Chain) -> impl Iterator<Item = &'a Residue> {
        chain
            .residues()
            .iter()
            .filter_map(|&id| self.residues.get(id))
    }

    /// Returns the atoms of a residue in file order.
    pub fn atoms_of<'a>(&'a self, residue: &'a Residue) -> impl Iterator<Item = &'a Atom> {
        residue.atoms().iter().filter_map(|&id| self.atoms.get(id))
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue by chain character, residue number and insertion code.
    pub fn find_residue(&self, specifier: ResidueSpecifier) -> Option<ResidueId> {
        let chain_id = self.find_chain_by_id(specifier.chain_id)?;
        self.residue_id_map
            .get(&(
                chain_id,
                specifier.residue_number,
                specifier.insertion_code,
            ))
            .copied()
    }

    /// Builds the user-facing specifier of a residue.
    pub fn residue_specifier(&self, id: ResidueId) -> Option<ResidueSpecifier> {
        let residue = self.residues.get(id)?;
        let chain = self.chains.get(residue.chain_id)?;
        Some(
            ResidueSpecifier::new(chain.id, residue.number)
                .with_insertion_code(residue.insertion_code),
        )
    }

    /// Adds a new chain or returns the existing one with the same identifier.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id, chain_type));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a residue without an insertion code; see [`Self::add_residue_at`].
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        name: &str,
    ) -> Option<ResidueId> {
        self.add_residue_at(chain_id, residue_number, ' ', name)
    }

    /// Adds a new residue or returns the existing one with the same number and
    /// insertion code.
    ///
    /// The residue is inserted into its chain so that the chain stays sorted by
    /// residue number, then insertion code. Returns `None` if the chain does
    /// not exist.
    pub fn add_residue_at(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: char,
        name: &str,
    ) -> Option<ResidueId> {
        if !self.chains.contains_key(chain_id) {
            return None;
        }
        let key = (chain_id, residue_number, insertion_code);
        if let Some(&existing) = self.residue_id_map.get(&key) {
            return Some(existing);
        }

        let residue_id = self.residues.insert(Residue::new(
            residue_number,
            insertion_code,
            name,
            chain_id,
        ));
        self.residue_id_map.insert(key, residue_id);

        let residues = &self.residues;
        let chain = self.chains.get_mut(chain_id)?;
        let position = chain.residues.partition_point(|&id| {
            (residues[id].number, residues[id].insertion_code) < (residue_number, insertion_code)
        });
        chain.residues.insert(position, residue_id);

        Some(residue_id)
    }

    /// Adds an atom to a residue.
    ///
    /// Returns `None` if the residue does not exist or the atom's serial number
    /// is already taken; serial numbers are unique within a structure.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if self.serial_map.contains_key(&atom.serial) {
            return None;
        }
        let residue = self.residues.get_mut(residue_id)?;

        let serial = atom.serial;
        let name = atom.name.clone();
        let atom_id = self.atoms.insert(Atom { residue_id, ..atom });
        residue.add_atom(&name, atom_id);
        self.serial_map.insert(serial, atom_id);

        Some(atom_id)
    }

    /// Finds the atom named `atom_name` in residue `chain_id:residue_number`
    /// (no insertion code).
    pub fn lookup(
        &self,
        chain_id: char,
        residue_number: isize,
        atom_name: &str,
    ) -> Result<&Atom, LookupError> {
        self.lookup_in(ResidueSpecifier::new(chain_id, residue_number), atom_name)
    }

    pub fn lookup_in(
        &self,
        residue: ResidueSpecifier,
        atom_name: &str,
    ) -> Result<&Atom, LookupError> {
        let not_found = || LookupError::NotFound {
            residue,
            atom_name: atom_name.to_string(),
        };

        let residue_id = self.find_residue(residue).ok_or_else(not_found)?;
        let atom_id = self.residues[residue_id]
            .get_atom_id_by_name(atom_name)
            .ok_or_else(not_found)?;
        self.atoms.get(atom_id).ok_or_else(not_found)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn linkage_records(&self) -> impl Iterator<Item = &LinkageRecord> {
        self.records.iter().filter_map(|record| match record {
            Record::Linkage(linkage) => Some(linkage),
            _ => None,
        })
    }

    pub fn connectivity_records(&self) -> impl Iterator<Item = &ConnectivityRecord> {
        self.records.iter().filter_map(|record| match record {
            Record::Connectivity(connectivity) => Some(connectivity),
            _ => None,
        })
    }

    /// Whether the structure already carries linkage or connectivity records.
    pub fn is_annotated(&self) -> bool {
        self.records
            .iter()
            .any(|record| matches!(record, Record::Linkage(_) | Record::Connectivity(_)))
    }

    /// Returns the distinct record tags present in the layout (e.g. `ATOM`, `SSBOND`).
    pub fn record_categories(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|record| match record {
                Record::Coordinate(id) => self.atoms.get(*id).map(|atom| {
                    let tag = if atom.is_hetero() { "HETATM" } else { "ATOM" };
                    tag.to_string()
                }),
                Record::Linkage(_) => Some("SSBOND".to_string()),
                Record::Connectivity(_) => Some("CONECT".to_string()),
                Record::Raw(line) => {
                    let tag = Record::raw_tag(line);
                    (!tag.is_empty()).then(|| tag.to_string())
                }
            })
            .collect()
    }

    /// Inserts linkage records ahead of the first `MODEL` or coordinate
    /// record, whichever comes first, and connectivity records ahead of the
    /// terminal `END` marker (or at the end of the layout when there is none).
    pub(crate) fn insert_annotation_records(
        &mut self,
        linkages: Vec<LinkageRecord>,
        connectivity: Vec<ConnectivityRecord>,
    ) {
        let linkage_at = self
            .records
            .iter()
            .position(|record| match record {
                Record::Coordinate(_) => true,
                Record::Raw(line) => Record::raw_tag(line) == "MODEL",
                _ => false,
            })
            .unwrap_or(self.records.len());
        self.records.splice(
            linkage_at..linkage_at,
            linkages.into_iter().map(Record::Linkage),
        );

        let connect_at = self
            .records
            .iter()
            .rposition(Record::is_end_marker)
            .unwrap_or(self.records.len());
        self.records.splice(
            connect_at..connect_at,
            connectivity.into_iter().map(Record::Connectivity),
        );
    }
}
