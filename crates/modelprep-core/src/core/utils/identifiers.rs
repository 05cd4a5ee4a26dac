use phf::{Map, Set, phf_map, phf_set};

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "HA", "C", "O", "OXT", "H1", "H2", "H3", "NT",
    "HT1", "HT2", "HT3", "OT1", "OT2", "HC", "HOXT", "HA1", "HA2", "1HA", "2HA",
};

/// Heavy backbone atoms every complete amino-acid residue carries.
pub const REQUIRED_BACKBONE_ATOMS: [&str; 4] = ["N", "CA", "C", "O"];

static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    // Protonation variants written by common preparation tools
    "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
    "CYX" => 'C', "CYM" => 'C', "ASH" => 'D', "GLH" => 'E', "LYN" => 'K',
    // Non-standard residues with a conventional one-letter code
    "MSE" => 'M', "SEC" => 'U', "PYL" => 'O',
};

/// Placeholder used for residues without a one-letter code.
pub const UNKNOWN_RESIDUE_CODE: char = 'X';

/// Backbone names, including terminal and hydrogen variants. Case-sensitive.
pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

/// Maps a three-letter residue name to its one-letter code, `X` if unknown.
pub fn one_letter_code(residue_name: &str) -> char {
    let name = residue_name.trim().to_ascii_uppercase();
    ONE_LETTER_CODES
        .get(name.as_str())
        .copied()
        .unwrap_or(UNKNOWN_RESIDUE_CODE)
}

pub fn is_amino_acid(residue_name: &str) -> bool {
    ONE_LETTER_CODES.contains_key(residue_name.trim().to_ascii_uppercase().as_str())
}
