use super::disulfide::BondSet;
use super::error::EngineError;
use crate::core::models::ids::ResidueSpecifier;
use crate::core::models::record::{
    ConnectivityRecord, IDENTITY_SYMMETRY, LinkageEnd, LinkageRecord,
};
use crate::core::models::structure::Structure;
use tracing::debug;

/// Counts of the records added by [`annotate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnnotationSummary {
    pub linkage_records: usize,
    pub connectivity_records: usize,
}

/// Adds one `SSBOND` record per bond and a `CONECT` record in each direction
/// between the two bonding atoms.
///
/// This is the only operation that mutates a structure. It refuses a
/// structure that already carries linkage or connectivity records, so
/// running it twice cannot duplicate annotations.
pub fn annotate(structure: &mut Structure, bonds: &BondSet) -> Result<AnnotationSummary, EngineError> {
    if structure.is_annotated() {
        return Err(EngineError::AlreadyAnnotated);
    }

    let mut linkages = Vec::with_capacity(bonds.len());
    let mut connectivity = Vec::with_capacity(bonds.len() * 2);

    for (index, bond) in bonds.iter().enumerate() {
        linkages.push(LinkageRecord {
            serial_number: index + 1,
            first: linkage_end(structure, bond.pair.first())?,
            second: linkage_end(structure, bond.pair.second())?,
            first_symmetry: IDENTITY_SYMMETRY.to_string(),
            second_symmetry: IDENTITY_SYMMETRY.to_string(),
            distance: Some(bond.distance),
        });
        connectivity.push(ConnectivityRecord::new(
            bond.first_serial,
            vec![bond.second_serial],
        ));
        connectivity.push(ConnectivityRecord::new(
            bond.second_serial,
            vec![bond.first_serial],
        ));
    }

    let summary = AnnotationSummary {
        linkage_records: linkages.len(),
        connectivity_records: connectivity.len(),
    };
    structure.insert_annotation_records(linkages, connectivity);
    debug!(
        "Inserted {} linkage and {} connectivity record(s)",
        summary.linkage_records, summary.connectivity_records
    );
    Ok(summary)
}

fn linkage_end(structure: &Structure, residue: ResidueSpecifier) -> Result<LinkageEnd, EngineError> {
    let residue_name = structure
        .find_residue(residue)
        .and_then(|id| structure.residue(id))
        .map(|record| record.name.clone())
        .ok_or_else(|| {
            EngineError::Validation(format!("bonded residue {} is not part of the structure", residue))
        })?;
    Ok(LinkageEnd {
        residue_name,
        residue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::models::record::Record;
    use crate::engine::config::{BondSearchConfig, ResolutionPolicy};
    use crate::engine::disulfide::{candidates, resolution};
    use nalgebra::Point3;

    fn bonded_structure() -> (Structure, BondSet) {
        let mut structure = Structure::new();
        structure.push_record(Record::Raw("HEADER    TEST".to_string()));
        let chain = structure.add_chain('A', ChainType::Protein);
        for (serial, number, x) in [(8, 46, 0.0), (120, 69, 2.03)] {
            let residue = structure.add_residue(chain, number, "CYS").unwrap();
            let atom = Atom::new(serial, "SG", residue, Point3::new(x, 0.0, 0.0));
            let id = structure.add_atom_to_residue(residue, atom).unwrap();
            structure.push_record(Record::Coordinate(id));
        }
        structure.push_record(Record::Raw("END".to_string()));

        let search = BondSearchConfig::default();
        let found = candidates::generate_candidates(&structure, &search);
        let resolved =
            resolution::resolve(&structure, &found, &search, &ResolutionPolicy::default()).unwrap();
        (structure, resolved.bonds)
    }

    #[test]
    fn one_linkage_and_two_connectivity_records_per_bond() {
        let (mut structure, bonds) = bonded_structure();
        let summary = annotate(&mut structure, &bonds).unwrap();

        assert_eq!(
            summary,
            AnnotationSummary {
                linkage_records: 1,
                connectivity_records: 2,
            }
        );

        let linkage = structure.linkage_records().next().unwrap();
        assert_eq!(linkage.serial_number, 1);
        assert_eq!(linkage.first.residue, ResidueSpecifier::new('A', 46));
        assert_eq!(linkage.second.residue_name, "CYS");
        assert_eq!(linkage.first_symmetry, "1555");
        assert!((linkage.distance.unwrap() - 2.03).abs() < 1e-9);

        let connectivity: Vec<_> = structure.connectivity_records().cloned().collect();
        assert_eq!(
            connectivity,
            vec![
                ConnectivityRecord::new(8, vec![120]),
                ConnectivityRecord::new(120, vec![8]),
            ]
        );
    }

    #[test]
    fn annotating_twice_is_refused() {
        let (mut structure, bonds) = bonded_structure();
        annotate(&mut structure, &bonds).unwrap();
        let before = structure.records().len();

        assert!(matches!(
            annotate(&mut structure, &bonds),
            Err(EngineError::AlreadyAnnotated)
        ));
        assert_eq!(structure.records().len(), before);
    }

    #[test]
    fn empty_bond_set_leaves_records_untouched() {
        let (mut structure, _) = bonded_structure();
        let before = structure.records().to_vec();
        let summary = annotate(&mut structure, &BondSet::default()).unwrap();
        assert_eq!(summary, AnnotationSummary::default());
        assert_eq!(structure.records(), before.as_slice());
    }
}
