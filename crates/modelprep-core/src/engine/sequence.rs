use crate::core::alignment::entry::{AlignmentEntry, AlignmentRole, DescriptionFields};
use crate::core::models::structure::Structure;
use crate::core::utils::identifiers::one_letter_code;
use std::fmt::Write;

/// Residue letters per line of FASTA output.
pub const FASTA_LINE_WIDTH: usize = 60;

const GAP_CHARACTER: char = '-';
const SEQUENCE_ATOM: &str = "CA";

/// One-letter sequence of a protein chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSequence {
    pub chain_id: char,
    pub first_residue: isize,
    pub last_residue: isize,
    /// One letter per residue, with `-` for numbering gaps when gap filling
    /// was requested.
    pub sequence: String,
}

impl ChainSequence {
    pub fn gap_count(&self) -> usize {
        self.sequence.chars().filter(|&c| c == GAP_CHARACTER).count()
    }

    pub fn to_fasta(&self, code: &str) -> String {
        let mut text = format!(
            ">{}_{} | Chain {} | Residues {}-{}",
            code, self.chain_id, self.chain_id, self.first_residue, self.last_residue
        );
        let gaps = self.gap_count();
        if gaps > 0 {
            let _ = write!(text, " | {} gaps", gaps);
        }
        text.push('\n');

        let letters: Vec<char> = self.sequence.chars().collect();
        for line in letters.chunks(FASTA_LINE_WIDTH) {
            text.extend(line);
            text.push('\n');
        }
        text
    }

    /// Template block describing this chain as a known structure.
    pub fn to_template_entry(&self, code: &str) -> AlignmentEntry {
        let fields = DescriptionFields {
            role_keyword: "structureX".to_string(),
            code: code.to_string(),
            start: Some(self.first_residue),
            start_chain: Some(self.chain_id),
            end: Some(self.last_residue),
            end_chain: Some(self.chain_id),
            resolution: Some(0.0),
            r_factor: Some(0.0),
            ..DescriptionFields::default()
        };
        AlignmentEntry::new(
            code,
            AlignmentRole::TemplateStructure,
            &fields.to_string(),
            &self.sequence,
        )
    }

    /// Target block for this chain's sequence.
    pub fn to_target_entry(&self, code: &str) -> AlignmentEntry {
        let fields = DescriptionFields {
            role_keyword: "sequence".to_string(),
            code: code.to_string(),
            resolution: Some(0.0),
            r_factor: Some(0.0),
            ..DescriptionFields::default()
        };
        AlignmentEntry::new(code, AlignmentRole::Target, &fields.to_string(), &self.sequence)
    }
}

/// Builds the sequence of every protein chain from residues carrying a `CA`
/// atom, in chain order. With `fill_gaps`, each missing residue number
/// becomes a `-`.
pub fn extract_chain_sequences(structure: &Structure, fill_gaps: bool) -> Vec<ChainSequence> {
    let mut sequences = Vec::new();

    for chain in structure.chains() {
        if !chain.is_protein() {
            continue;
        }
        let residues: Vec<_> = structure
            .residues_of(chain)
            .filter(|residue| residue.has_atom(SEQUENCE_ATOM))
            .collect();
        let (Some(first), Some(last)) = (residues.first(), residues.last()) else {
            continue;
        };

        let mut sequence = String::with_capacity(residues.len());
        let mut previous: Option<isize> = None;
        for residue in &residues {
            if let (true, Some(previous)) = (fill_gaps, previous) {
                let missing = (residue.number - previous - 1).max(0) as usize;
                sequence.extend(std::iter::repeat_n(GAP_CHARACTER, missing));
            }
            sequence.push(one_letter_code(&residue.name));
            previous = Some(residue.number);
        }

        sequences.push(ChainSequence {
            chain_id: chain.id,
            first_residue: first.number,
            last_residue: last.number,
            sequence,
        });
    }
    sequences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use nalgebra::Point3;

    fn structure() -> Structure {
        let mut structure = Structure::new();
        let chain_a = structure.add_chain('A', ChainType::Protein);
        let chain_w = structure.add_chain('W', ChainType::Other);
        let mut serial = 0;
        for (chain, number, name, atom_name) in [
            (chain_a, 10, "MET", "CA"),
            (chain_a, 11, "LYS", "CA"),
            (chain_a, 12, "VAL", "N"),
            (chain_a, 14, "CYS", "CA"),
            (chain_a, 15, "MSE", "CA"),
            (chain_w, 1, "HOH", "O"),
        ] {
            serial += 1;
            let residue = structure.add_residue(chain, number, name).unwrap();
            let atom = Atom::new(serial, atom_name, residue, Point3::origin());
            structure.add_atom_to_residue(residue, atom).unwrap();
        }
        structure
    }

    #[test]
    fn extraction_uses_alpha_carbon_residues_of_protein_chains() {
        let sequences = extract_chain_sequences(&structure(), false);
        assert_eq!(
            sequences,
            vec![ChainSequence {
                chain_id: 'A',
                first_residue: 10,
                last_residue: 15,
                sequence: "MKCM".to_string(),
            }]
        );
    }

    #[test]
    fn gap_filling_inserts_one_marker_per_missing_residue() {
        let sequences = extract_chain_sequences(&structure(), true);
        assert_eq!(sequences[0].sequence, "MK--CM");
        assert_eq!(sequences[0].gap_count(), 2);
    }

    #[test]
    fn fasta_header_reports_range_and_gaps() {
        let sequences = extract_chain_sequences(&structure(), true);
        assert_eq!(
            sequences[0].to_fasta("6MEJ"),
            ">6MEJ_A | Chain A | Residues 10-15 | 2 gaps\nMK--CM\n"
        );

        let long = ChainSequence {
            chain_id: 'B',
            first_residue: 1,
            last_residue: 61,
            sequence: "A".repeat(61),
        };
        let fasta = long.to_fasta("x");
        let lines: Vec<&str> = fasta.lines().collect();
        assert_eq!(lines[0], ">x_B | Chain B | Residues 1-61");
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[2], "A");
    }

    #[test]
    fn template_entry_carries_structure_description() {
        let sequences = extract_chain_sequences(&structure(), true);
        let entry = sequences[0].to_template_entry("6MEJ_0001");

        assert_eq!(entry.role, AlignmentRole::TemplateStructure);
        assert_eq!(
            entry.description,
            "structureX:6MEJ_0001:10:A:15:A::: 0.00: 0.00"
        );
        let fields = entry.description_fields().unwrap();
        assert_eq!(fields.start, Some(10));
        assert_eq!(fields.end_chain, Some('A'));
        assert_eq!(entry.residue_count(), 4);

        let target = sequences[0].to_target_entry("query");
        assert_eq!(target.description, "sequence:query::::::: 0.00: 0.00");
        assert!(target.is_target());
    }
}
