use super::ids::ResidueId;
use nalgebra::Point3;

/// Coarse classification of an atom, assigned when the structure is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AtomRole {
    /// Polypeptide backbone atom (N, CA, C, O).
    Backbone,
    /// Any other atom of a standard (`ATOM`) record.
    Sidechain,
    /// Atom of a `HETATM` record.
    Hetero,
    #[default]
    Other,
}

/// A single coordinate record of a structure.
///
/// The chain, residue name and residue number are owned by the parent residue
/// (see [`Structure::residue`](super::structure::Structure::residue)); the atom
/// only stores the key of that residue.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial from the source file; unique per structure.
    pub serial: usize,
    /// The trimmed atom name (e.g., "SG", "CA").
    pub name: String,
    /// Owning residue.
    pub residue_id: ResidueId,
    pub role: AtomRole,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    pub fn new(serial: usize, name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            residue_id,
            role: AtomRole::default(),
            position,
        }
    }

    pub fn with_role(mut self, role: AtomRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_hetero(&self) -> bool {
        self.role == AtomRole::Hetero
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_atom_keeps_source_serial_and_default_role() {
        let residue_id = ResidueId::default();
        let atom = Atom::new(12, "SG", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.serial, 12);
        assert_eq!(atom.name, "SG");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.role, AtomRole::Other);
    }

    #[test]
    fn only_hetero_role_reports_hetatm() {
        let atom = Atom::new(1, "ZN", ResidueId::default(), Point3::origin())
            .with_role(AtomRole::Hetero);
        assert!(atom.is_hetero());

        let backbone = Atom::new(2, "CA", ResidueId::default(), Point3::origin())
            .with_role(AtomRole::Backbone);
        assert!(!backbone.is_hetero());
    }
}
