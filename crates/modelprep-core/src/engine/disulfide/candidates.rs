use super::{BondCandidate, BondOrigin, ResiduePair};
use crate::core::models::ids::ResidueSpecifier;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry;
use crate::engine::config::BondSearchConfig;
use nalgebra::Point3;
use std::cmp::Ordering;
use tracing::debug;

/// A bonding atom eligible for the candidate search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondSite {
    pub residue: ResidueSpecifier,
    pub serial: usize,
    pub position: Point3<f64>,
}

impl BondCandidate {
    /// Builds a candidate between two sites, keeping the serials aligned with
    /// the normalized pair order.
    pub fn between(a: &BondSite, b: &BondSite, distance: f64, origin: BondOrigin) -> Self {
        let pair = ResiduePair::new(a.residue, b.residue);
        let (first_serial, second_serial) = if pair.first() == a.residue {
            (a.serial, b.serial)
        } else {
            (b.serial, a.serial)
        };
        Self {
            pair,
            distance,
            origin,
            first_serial,
            second_serial,
        }
    }
}

/// Collects one site per residue named `residue_name` that carries an atom
/// named `atom_name`, in chain then residue-number order.
pub fn collect_sites(structure: &Structure, search: &BondSearchConfig) -> Vec<BondSite> {
    let mut sites = Vec::new();
    for chain in structure.chains() {
        for residue in structure.residues_of(chain) {
            if !residue.is_named(&search.residue_name) {
                continue;
            }
            let specifier = ResidueSpecifier::new(chain.id, residue.number)
                .with_insertion_code(residue.insertion_code);
            let Some(atom) = residue
                .get_atom_id_by_name(&search.atom_name)
                .and_then(|id| structure.atom(id))
            else {
                debug!(
                    "Residue {} has no {} atom; skipped",
                    specifier, search.atom_name
                );
                continue;
            };
            sites.push(BondSite {
                residue: specifier,
                serial: atom.serial,
                position: atom.position,
            });
        }
    }
    sites
}

/// Measures every unordered pair of sites and keeps those within the cutoff
/// (inclusive), sorted by [`sort_candidates`].
pub fn generate_candidates(structure: &Structure, search: &BondSearchConfig) -> Vec<BondCandidate> {
    let sites = collect_sites(structure, search);
    let mut candidates = Vec::new();

    for (index, a) in sites.iter().enumerate() {
        for b in &sites[index + 1..] {
            if let Some(distance) = geometry::within_cutoff(&a.position, &b.position, search.cutoff)
            {
                candidates.push(BondCandidate::between(a, b, distance, BondOrigin::Automatic));
            }
        }
    }

    sort_candidates(&mut candidates);
    debug!(
        "{} candidate pair(s) among {} site(s) within {:.2} A",
        candidates.len(),
        sites.len(),
        search.cutoff
    );
    candidates
}

/// Ascending distance; ties broken by residue pair so the order is total.
pub fn sort_candidates(candidates: &mut [BondCandidate]) {
    candidates.sort_by(compare_candidates);
}

fn compare_candidates(a: &BondCandidate, b: &BondCandidate) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.pair.cmp(&b.pair))
}
