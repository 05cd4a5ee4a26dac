//! Disulfide bond inference.
//!
//! [`candidates`] measures every qualifying atom pair of a structure;
//! [`resolution`] turns the sorted candidates, the forced pairs and the
//! excluded residues of a [`ResolutionPolicy`](crate::engine::config::ResolutionPolicy)
//! into a [`BondSet`] in which no residue is bonded twice (unless shared
//! forced bonds are explicitly allowed).

pub mod candidates;
pub mod resolution;

use crate::core::models::ids::ResidueSpecifier;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chain assumed by the legacy `46,69` pair notation.
pub const LEGACY_PAIR_CHAIN: char = 'A';

/// An unordered pair of residues; `first() <= second()` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResiduePair {
    first: ResidueSpecifier,
    second: ResidueSpecifier,
}

impl ResiduePair {
    pub fn new(a: ResidueSpecifier, b: ResidueSpecifier) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> ResidueSpecifier {
        self.first
    }

    pub fn second(&self) -> ResidueSpecifier {
        self.second
    }

    pub fn contains(&self, residue: ResidueSpecifier) -> bool {
        self.first == residue || self.second == residue
    }

    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }

    /// The `number:chain-number:chain` form understood by the modeling engine's
    /// `--ss` option, e.g. `46:A-69:A` (insertion codes follow the number).
    pub fn engine_argument(&self) -> String {
        format!(
            "{}:{}-{}:{}",
            self.first.number_label(),
            self.first.chain_id,
            self.second.number_label(),
            self.second.chain_id
        )
    }
}

impl fmt::Display for ResiduePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid residue pair '{0}': expected 'A:46-A:69' or '46,69'")]
pub struct ParseResiduePairError(pub String);

impl FromStr for ResiduePair {
    type Err = ParseResiduePairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || ParseResiduePairError(text.to_string());

        if let Some((a, b)) = text.split_once(',') {
            let a = a.trim().parse::<isize>().map_err(|_| invalid())?;
            let b = b.trim().parse::<isize>().map_err(|_| invalid())?;
            return Ok(Self::new(
                ResidueSpecifier::new(LEGACY_PAIR_CHAIN, a),
                ResidueSpecifier::new(LEGACY_PAIR_CHAIN, b),
            ));
        }

        // Residue numbers may be negative, so try every '-' as the separator.
        text.match_indices('-')
            .find_map(|(index, _)| {
                let a = text[..index].parse::<ResidueSpecifier>().ok()?;
                let b = text[index + 1..].parse::<ResidueSpecifier>().ok()?;
                Some(Self::new(a, b))
            })
            .ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrigin {
    Forced,
    Automatic,
}

impl fmt::Display for BondOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrigin::Forced => write!(f, "forced"),
            BondOrigin::Automatic => write!(f, "automatic"),
        }
    }
}

/// A measured residue pair, with the serials of the two bonding atoms in
/// the same order as the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondCandidate {
    pub pair: ResiduePair,
    pub distance: f64,
    pub origin: BondOrigin,
    pub first_serial: usize,
    pub second_serial: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// One of the residues already takes part in an accepted bond.
    AlreadyBonded,
    /// One of the residues is excluded from automatic bonds.
    Excluded,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::AlreadyBonded => write!(f, "already bonded"),
            RejectionReason::Excluded => write!(f, "excluded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RejectedCandidate {
    pub candidate: BondCandidate,
    pub reason: RejectionReason,
}

/// Accepted bonds in acceptance order (forced first, then by distance).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BondSet {
    bonds: Vec<BondCandidate>,
}

impl BondSet {
    pub(crate) fn new(bonds: Vec<BondCandidate>) -> Self {
        Self { bonds }
    }

    pub fn bonds(&self) -> &[BondCandidate] {
        &self.bonds
    }

    pub fn iter(&self) -> impl Iterator<Item = &BondCandidate> {
        self.bonds.iter()
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    pub fn contains_pair(&self, pair: &ResiduePair) -> bool {
        self.bonds.iter().any(|bond| bond.pair == *pair)
    }

    /// Residues bonded to `residue`; more than one only with shared forced bonds.
    pub fn partners_of(&self, residue: ResidueSpecifier) -> Vec<ResidueSpecifier> {
        self.bonds
            .iter()
            .filter_map(|bond| {
                if bond.pair.first() == residue {
                    Some(bond.pair.second())
                } else if bond.pair.second() == residue {
                    Some(bond.pair.first())
                } else {
                    None
                }
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a BondSet {
    type Item = &'a BondCandidate;
    type IntoIter = std::slice::Iter<'a, BondCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.bonds.iter()
    }
}

/// Outcome of resolving candidates against a policy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub bonds: BondSet,
    pub rejected: Vec<RejectedCandidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(chain: char, number: isize) -> ResidueSpecifier {
        ResidueSpecifier::new(chain, number)
    }

    #[test]
    fn pair_identity_is_order_independent() {
        let forward = ResiduePair::new(spec('A', 46), spec('A', 69));
        let backward = ResiduePair::new(spec('A', 69), spec('A', 46));
        assert_eq!(forward, backward);
        assert_eq!(forward.first(), spec('A', 46));
        assert!(forward.contains(spec('A', 69)));
        assert!(!forward.contains(spec('B', 69)));
    }

    #[test]
    fn pair_parses_chain_qualified_and_legacy_forms() {
        assert_eq!(
            "A:69-A:46".parse::<ResiduePair>().unwrap(),
            ResiduePair::new(spec('A', 46), spec('A', 69))
        );
        assert_eq!(
            " 46, 69 ".parse::<ResiduePair>().unwrap(),
            ResiduePair::new(spec('A', 46), spec('A', 69))
        );
        assert_eq!(
            "A:-3-B:12".parse::<ResiduePair>().unwrap(),
            ResiduePair::new(spec('A', -3), spec('B', 12))
        );
    }

    #[test]
    fn pair_rejects_malformed_text() {
        for text in ["A:46", "A:46-", "46-69", "x,69", "A:46-B"] {
            assert!(text.parse::<ResiduePair>().is_err(), "{text}");
        }
    }

    #[test]
    fn pair_renders_display_and_engine_argument() {
        let pair = ResiduePair::new(spec('B', 101), spec('A', 46));
        assert_eq!(pair.to_string(), "A:46-B:101");
        assert_eq!(pair.engine_argument(), "46:A-101:B");
    }

    #[test]
    fn pair_keeps_insertion_codes() {
        let pair: ResiduePair = "A:80-A:52A".parse().unwrap();
        assert_eq!(pair.first(), spec('A', 52).with_insertion_code('A'));
        assert_eq!(pair.to_string(), "A:52A-A:80");
        assert_eq!(pair.engine_argument(), "52A:A-80:A");
    }

    #[test]
    fn partners_of_lists_bonded_residues() {
        let bond = |a: isize, b: isize| BondCandidate {
            pair: ResiduePair::new(spec('A', a), spec('A', b)),
            distance: 2.05,
            origin: BondOrigin::Forced,
            first_serial: 1,
            second_serial: 2,
        };
        let set = BondSet::new(vec![bond(46, 69), bond(46, 120)]);
        assert_eq!(set.partners_of(spec('A', 46)), vec![spec('A', 69), spec('A', 120)]);
        assert_eq!(set.partners_of(spec('A', 69)), vec![spec('A', 46)]);
        assert!(set.partners_of(spec('A', 1)).is_empty());
        assert!(set.contains_pair(&ResiduePair::new(spec('A', 69), spec('A', 46))));
    }
}
