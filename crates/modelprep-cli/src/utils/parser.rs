use modelprep::core::models::ids::ResidueSpecifier;
use modelprep::engine::disulfide::ResiduePair;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Invalid residue pair '{0}'. Expected 'CHAIN:NUMBER-CHAIN:NUMBER' (e.g., 'A:46-A:69') or '46,69'."
    )]
    InvalidPair(String),

    #[error("Invalid residue '{0}'. Expected 'CHAIN:NUMBER' (e.g., 'A:120').")]
    InvalidResidue(String),

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),
}

/// Parses a `;`-separated list of residue pairs. Empty items are ignored.
///
/// The legacy `46,69` form uses a comma inside the pair, so pairs are never
/// split on commas.
pub fn parse_pair_list(text: &str) -> Result<Vec<ResiduePair>, ParseError> {
    text.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<ResiduePair>()
                .map_err(|_| ParseError::InvalidPair(item.to_string()))
        })
        .collect()
}

/// Parses a list of residues separated by `,` or `;`.
pub fn parse_residue_list(text: &str) -> Result<Vec<ResidueSpecifier>, ParseError> {
    text.split([',', ';'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<ResidueSpecifier>()
                .map_err(|_| ParseError::InvalidResidue(item.to_string()))
        })
        .collect()
}

/// Splits `KEY=VALUE` at the first `=`.
pub fn parse_assignment(text: &str) -> Result<(&str, &str), ParseError> {
    text.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| ParseError::InvalidAssignment(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn residue(chain: char, number: isize) -> ResidueSpecifier {
        ResidueSpecifier::new(chain, number)
    }

    #[test]
    fn pair_lists_accept_both_notations() {
        let pairs = parse_pair_list("A:46-A:69; 76,103 ;;B:5-A:-2").unwrap();
        assert_eq!(
            pairs,
            vec![
                ResiduePair::new(residue('A', 46), residue('A', 69)),
                ResiduePair::new(residue('A', 76), residue('A', 103)),
                ResiduePair::new(residue('B', 5), residue('A', -2)),
            ]
        );
        assert!(parse_pair_list("").unwrap().is_empty());
    }

    #[test]
    fn malformed_pair_names_the_offending_item() {
        assert_eq!(
            parse_pair_list("A:46-A:69;46-69"),
            Err(ParseError::InvalidPair("46-69".to_string()))
        );
    }

    #[test]
    fn residue_lists_split_on_commas_and_semicolons() {
        assert_eq!(
            parse_residue_list("A:120, B:7;A:-1").unwrap(),
            vec![residue('A', 120), residue('B', 7), residue('A', -1)]
        );
        assert_eq!(
            parse_residue_list("A:x"),
            Err(ParseError::InvalidResidue("A:x".to_string()))
        );
    }

    #[test]
    fn assignments_split_at_the_first_equals_sign() {
        assert_eq!(
            parse_assignment("search.atom-name=SG").unwrap(),
            ("search.atom-name", "SG")
        );
        assert_eq!(parse_assignment("a=b=c").unwrap(), ("a", "b=c"));
        assert!(parse_assignment("cutoff").is_err());
        assert!(parse_assignment("=2.0").is_err());
    }
}
