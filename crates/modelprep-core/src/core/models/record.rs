use super::ids::{AtomId, ResidueSpecifier};

/// Crystallographic symmetry operator for the identity transform.
pub const IDENTITY_SYMMETRY: &str = "1555";

/// One line of a structure file, in file order.
///
/// Coordinate records point into the atom arena of the owning
/// [`Structure`](super::structure::Structure); linkage and connectivity records
/// are kept parsed so they can be counted and regenerated; everything else is
/// carried through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Coordinate(AtomId),
    Linkage(LinkageRecord),
    Connectivity(ConnectivityRecord),
    Raw(String),
}

impl Record {
    /// Returns the trimmed record tag of a raw line (columns 1-6).
    pub fn raw_tag(line: &str) -> &str {
        let end = line.len().min(6);
        line.get(..end).unwrap_or("").trim()
    }

    pub fn is_end_marker(&self) -> bool {
        matches!(self, Record::Raw(line) if Record::raw_tag(line) == "END")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkageEnd {
    pub residue_name: String,
    pub residue: ResidueSpecifier,
}

/// A covalent disulfide linkage between two residues (`SSBOND`).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkageRecord {
    /// 1-based running number of the record.
    pub serial_number: usize,
    pub first: LinkageEnd,
    pub second: LinkageEnd,
    pub first_symmetry: String,
    pub second_symmetry: String,
    /// Bond length in Angstroms, absent in older files.
    pub distance: Option<f64>,
}

/// Explicit atom connectivity (`CONECT`), from one atom serial to one or more others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityRecord {
    pub origin: usize,
    pub targets: Vec<usize>,
}

impl ConnectivityRecord {
    pub fn new(origin: usize, targets: Vec<usize>) -> Self {
        Self { origin, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_tag_trims_record_name() {
        assert_eq!(Record::raw_tag("END"), "END");
        assert_eq!(Record::raw_tag("ENDMDL"), "ENDMDL");
        assert_eq!(Record::raw_tag("TER     100      CYS A  69"), "TER");
        assert_eq!(Record::raw_tag(""), "");
    }

    #[test]
    fn only_exact_end_is_an_end_marker() {
        assert!(Record::Raw("END".to_string()).is_end_marker());
        assert!(Record::Raw("END   ".to_string()).is_end_marker());
        assert!(!Record::Raw("ENDMDL".to_string()).is_end_marker());
        assert!(!Record::Raw("REMARK END".to_string()).is_end_marker());
    }
}
