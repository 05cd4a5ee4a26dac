use crate::core::models::structure::Structure;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Atom a residue must carry to count as present.
pub const DEFAULT_COVERAGE_ATOM: &str = "CA";

/// An inclusive run of missing residue numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapRange {
    pub start: isize,
    pub end: isize,
}

impl GapRange {
    pub fn length(&self) -> usize {
        (self.end - self.start + 1) as usize
    }
}

/// Numbering coverage of one chain between its first and last residue.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    pub first_residue: isize,
    pub last_residue: isize,
    pub present: usize,
    /// Ascending, non-overlapping missing runs.
    pub gaps: Vec<GapRange>,
}

impl CoverageReport {
    /// Residues expected between the first and last residue, inclusive.
    pub fn expected(&self) -> usize {
        (self.last_residue - self.first_residue + 1) as usize
    }

    /// Present residues as a fraction of the expected count.
    pub fn completeness(&self) -> f64 {
        self.present as f64 / self.expected() as f64
    }

    pub fn completeness_percent(&self) -> f64 {
        self.completeness() * 100.0
    }

    pub fn missing_count(&self) -> usize {
        self.gaps.iter().map(GapRange::length).sum()
    }

    pub fn missing_residues(&self) -> Vec<isize> {
        self.gaps
            .iter()
            .flat_map(|gap| gap.start..=gap.end)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// Finds the missing runs in a set of residue numbers. Returns `None` for an
/// empty input.
pub fn analyze(numbers: &BTreeSet<isize>) -> Option<CoverageReport> {
    let first_residue = *numbers.first()?;
    let last_residue = *numbers.last()?;

    let mut gaps = Vec::new();
    let mut previous = first_residue;
    for &number in numbers.iter().skip(1) {
        if number - previous > 1 {
            gaps.push(GapRange {
                start: previous + 1,
                end: number - 1,
            });
        }
        previous = number;
    }

    Some(CoverageReport {
        first_residue,
        last_residue,
        present: numbers.len(),
        gaps,
    })
}

/// Runs [`analyze`] on each chain, counting residues that carry `atom_name`.
/// Chains without such residues are left out.
pub fn analyze_structure(structure: &Structure, atom_name: &str) -> BTreeMap<char, CoverageReport> {
    structure
        .chains()
        .filter_map(|chain| {
            let numbers: BTreeSet<isize> = structure
                .residues_of(chain)
                .filter(|residue| residue.has_atom(atom_name))
                .map(|residue| residue.number)
                .collect();
            analyze(&numbers).map(|report| (chain.id, report))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use nalgebra::Point3;

    fn numbers(values: &[isize]) -> BTreeSet<isize> {
        values.iter().copied().collect()
    }

    #[test]
    fn detects_maximal_missing_runs() {
        let report = analyze(&numbers(&[1, 2, 3, 7, 8, 10])).unwrap();

        assert_eq!(
            report.gaps,
            vec![GapRange { start: 4, end: 6 }, GapRange { start: 9, end: 9 }]
        );
        assert_eq!(report.expected(), 10);
        assert_eq!(report.present, 6);
        assert!((report.completeness() - 0.6).abs() < 1e-12);
        assert!((report.completeness_percent() - 60.0).abs() < 1e-9);
        assert_eq!(report.missing_count(), 4);
        assert_eq!(report.missing_residues(), vec![4, 5, 6, 9]);
    }

    #[test]
    fn contiguous_and_single_residue_chains_are_complete() {
        let report = analyze(&numbers(&[-2, -1, 0, 1])).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.completeness(), 1.0);

        let single = analyze(&numbers(&[42])).unwrap();
        assert_eq!(single.expected(), 1);
        assert!(single.is_complete());
    }

    #[test]
    fn empty_input_has_no_report() {
        assert!(analyze(&BTreeSet::new()).is_none());
    }

    #[test]
    fn structure_analysis_counts_residues_with_the_atom() {
        let mut structure = Structure::new();
        let chain_a = structure.add_chain('A', ChainType::Protein);
        let chain_w = structure.add_chain('W', ChainType::Other);
        let mut serial = 0;
        let mut add = |structure: &mut Structure, chain, number, atom_name: &str| {
            serial += 1;
            let residue = structure.add_residue(chain, number, "ALA").unwrap();
            let atom = Atom::new(serial, atom_name, residue, Point3::origin());
            structure.add_atom_to_residue(residue, atom).unwrap();
        };
        add(&mut structure, chain_a, 1, "CA");
        add(&mut structure, chain_a, 2, "N");
        add(&mut structure, chain_a, 3, "CA");
        add(&mut structure, chain_w, 1, "O");

        let reports = analyze_structure(&structure, DEFAULT_COVERAGE_ATOM);
        assert_eq!(reports.len(), 1);
        let report = &reports[&'A'];
        assert_eq!(report.gaps, vec![GapRange { start: 2, end: 2 }]);
    }
}
