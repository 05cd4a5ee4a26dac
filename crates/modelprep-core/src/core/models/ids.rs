use serde::Serialize;
use slotmap::new_key_type;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

new_key_type! {
    pub struct AtomId;
    pub struct ResidueId;
    pub struct ChainId;
}

/// Identifies a residue by its chain character, sequence number and
/// insertion code.
///
/// Unlike the arena keys above, a specifier is stable across parses and is the
/// form in which users name residues (forced pairs, exclusions, reports).
/// Ordering is by chain, then residue number, then insertion code; a blank
/// code sorts before any letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResidueSpecifier {
    pub chain_id: char,
    pub residue_number: isize,
    /// `' '` when the residue has no insertion code.
    pub insertion_code: char,
}

impl ResidueSpecifier {
    pub fn new(chain_id: char, residue_number: isize) -> Self {
        Self {
            chain_id,
            residue_number,
            insertion_code: ' ',
        }
    }

    pub fn with_insertion_code(mut self, insertion_code: char) -> Self {
        self.insertion_code = insertion_code;
        self
    }

    /// Residue number followed by the insertion code, if any (`52`, `52A`).
    pub fn number_label(&self) -> String {
        if self.insertion_code == ' ' {
            self.residue_number.to_string()
        } else {
            format!("{}{}", self.residue_number, self.insertion_code)
        }
    }
}

impl fmt::Display for ResidueSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.number_label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid residue specifier '{0}': expected 'CHAIN:NUMBER' (e.g., 'A:46' or 'A:52A')")]
pub struct ParseResidueSpecifierError(pub String);

impl FromStr for ResidueSpecifier {
    type Err = ParseResidueSpecifierError;

    /// Parses `CHAIN:NUMBER[INSERTION]`, e.g. `A:46`, `B:-3` or `A:52A`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseResidueSpecifierError(s.to_string());
        let (chain, number) = s.trim().split_once(':').ok_or_else(invalid)?;

        let mut chars = chain.chars();
        let chain_id = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => return Err(invalid()),
        };

        let number = number.trim();
        let (digits, insertion_code) = match number.chars().last() {
            Some(code) if code.is_ascii_alphabetic() => {
                (&number[..number.len() - 1], code.to_ascii_uppercase())
            }
            _ => (number, ' '),
        };
        let residue_number = digits.parse::<isize>().map_err(|_| invalid())?;

        Ok(Self::new(chain_id, residue_number).with_insertion_code(insertion_code))
    }
}
