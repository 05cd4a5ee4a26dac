use super::candidates::BondSite;
use super::{BondCandidate, BondOrigin, BondSet, RejectedCandidate, RejectionReason, Resolution};
use crate::core::models::ids::ResidueSpecifier;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry;
use crate::engine::config::{BondSearchConfig, ResolutionPolicy};
use crate::engine::error::EngineError;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Merges forced pairs and sorted automatic candidates into a bond set.
///
/// Forced pairs are validated against the structure and accepted first, in
/// priority order. Automatic candidates are then taken greedily in the given
/// order: a candidate is accepted only when neither residue is excluded and
/// neither is already bonded. The result depends only on its inputs, so
/// resolving the same inputs twice yields the same bonds.
pub fn resolve(
    structure: &Structure,
    candidates: &[BondCandidate],
    search: &BondSearchConfig,
    policy: &ResolutionPolicy,
) -> Result<Resolution, EngineError> {
    let mut accepted: Vec<BondCandidate> = Vec::new();
    let mut bonded: HashSet<ResidueSpecifier> = HashSet::new();

    for pair in &policy.forced {
        if accepted.iter().any(|bond| bond.pair == *pair) {
            debug!("Forced pair {} listed more than once; ignored", pair);
            continue;
        }
        if pair.is_self_pair() {
            return Err(EngineError::Validation(format!(
                "forced pair {} bonds a residue to itself",
                pair
            )));
        }
        if !policy.allow_shared_forced {
            if let Some(shared) = [pair.first(), pair.second()]
                .into_iter()
                .find(|residue| bonded.contains(residue))
            {
                return Err(EngineError::Validation(format!(
                    "residue {} appears in more than one forced pair; enable shared forced bonds to allow this",
                    shared
                )));
            }
        }

        let first = forced_site(structure, pair.first(), search)?;
        let second = forced_site(structure, pair.second(), search)?;
        let distance = geometry::distance(&first.position, &second.position);
        if distance > search.cutoff {
            warn!(
                "Forced pair {} is {:.3} A apart, beyond the {:.2} A cutoff",
                pair, distance, search.cutoff
            );
        }

        bonded.insert(pair.first());
        bonded.insert(pair.second());
        accepted.push(BondCandidate::between(
            &first,
            &second,
            distance,
            BondOrigin::Forced,
        ));
    }

    let mut rejected = Vec::new();
    for candidate in candidates {
        let pair = candidate.pair;
        let reason = if policy.excluded.contains(&pair.first())
            || policy.excluded.contains(&pair.second())
        {
            Some(RejectionReason::Excluded)
        } else if bonded.contains(&pair.first()) || bonded.contains(&pair.second()) {
            Some(RejectionReason::AlreadyBonded)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                debug!("Candidate {} rejected: {}", pair, reason);
                rejected.push(RejectedCandidate {
                    candidate: *candidate,
                    reason,
                });
            }
            None => {
                bonded.insert(pair.first());
                bonded.insert(pair.second());
                accepted.push(BondCandidate {
                    origin: BondOrigin::Automatic,
                    ..*candidate
                });
            }
        }
    }

    Ok(Resolution {
        bonds: BondSet::new(accepted),
        rejected,
    })
}

fn forced_site(
    structure: &Structure,
    residue: ResidueSpecifier,
    search: &BondSearchConfig,
) -> Result<BondSite, EngineError> {
    let missing = || EngineError::MissingAtom {
        residue,
        atom_name: search.atom_name.clone(),
        residue_name: search.residue_name.clone(),
    };

    let residue_id = structure.find_residue(residue).ok_or_else(missing)?;
    let record = structure.residue(residue_id).ok_or_else(missing)?;
    if !record.is_named(&search.residue_name) {
        return Err(missing());
    }
    let atom = structure
        .lookup_in(residue, &search.atom_name)
        .map_err(|_| missing())?;
    Ok(BondSite {
        residue,
        serial: atom.serial,
        position: atom.position,
    })
}
