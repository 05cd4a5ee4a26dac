use std::fmt;

/// Marker written for protein sequence blocks (`>P1;code`).
pub const DEFAULT_BLOCK_MARKER: &str = "P1";

/// Characters in an alignment sequence that do not stand for a residue.
pub const NON_RESIDUE_CHARACTERS: [char; 3] = ['-', '/', '.'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentRole {
    /// The sequence being modeled.
    Target,
    /// A known structure supplying coordinates to the model.
    TemplateStructure,
}

impl fmt::Display for AlignmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentRole::Target => write!(f, "target"),
            AlignmentRole::TemplateStructure => write!(f, "template"),
        }
    }
}

/// The rule that decided an entry's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleEvidence {
    /// Description starts with a structure keyword (`structureX`, `structureN`, ...).
    StructureKeyword,
    /// Description starts with the `sequence` keyword.
    SequenceKeyword,
    /// The entry code names a target (e.g. `protein_target`).
    TargetCode,
    /// No explicit hint; assigned by position.
    Fallback,
    /// Set by the caller when constructing the entry directly.
    Declared,
}

impl fmt::Display for RoleEvidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RoleEvidence::StructureKeyword => "structure keyword",
            RoleEvidence::SequenceKeyword => "sequence keyword",
            RoleEvidence::TargetCode => "target code",
            RoleEvidence::Fallback => "fallback",
            RoleEvidence::Declared => "declared",
        };
        f.write_str(text)
    }
}

/// One named block of an alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentEntry {
    pub code: String,
    /// The block marker between `>` and `;` (usually `P1`).
    pub marker: String,
    pub role: AlignmentRole,
    pub evidence: RoleEvidence,
    pub description: String,
    /// One-letter residue codes plus gap markers, without the terminator.
    pub sequence: String,
}

impl AlignmentEntry {
    pub fn new(code: &str, role: AlignmentRole, description: &str, sequence: &str) -> Self {
        Self {
            code: code.to_string(),
            marker: DEFAULT_BLOCK_MARKER.to_string(),
            role,
            evidence: RoleEvidence::Declared,
            description: description.to_string(),
            sequence: sequence.to_string(),
        }
    }

    pub fn is_target(&self) -> bool {
        self.role == AlignmentRole::Target
    }

    /// Number of residues, ignoring gap and chain-break markers.
    pub fn residue_count(&self) -> usize {
        self.sequence
            .chars()
            .filter(|c| !NON_RESIDUE_CHARACTERS.contains(c))
            .count()
    }

    /// Aligned length, gaps included.
    pub fn aligned_length(&self) -> usize {
        self.sequence.chars().count()
    }

    pub fn description_fields(&self) -> Option<DescriptionFields> {
        DescriptionFields::parse(&self.description)
    }
}

/// The colon-delimited fields of a description line:
/// `role:code:start:chain:end:chain:name:source:resolution:r-factor`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DescriptionFields {
    pub role_keyword: String,
    pub code: String,
    pub start: Option<isize>,
    pub start_chain: Option<char>,
    pub end: Option<isize>,
    pub end_chain: Option<char>,
    pub name: String,
    pub source: String,
    pub resolution: Option<f64>,
    pub r_factor: Option<f64>,
}

impl DescriptionFields {
    /// Parses a description line; returns `None` unless it has at least a role
    /// keyword and a code.
    pub fn parse(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim().split(':').map(str::trim).collect();
        if fields.len() < 2 || fields[0].is_empty() {
            return None;
        }
        let field = |i: usize| fields.get(i).copied().unwrap_or("");
        let chain = |i: usize| {
            let mut chars = field(i).chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        };

        Some(Self {
            role_keyword: field(0).to_string(),
            code: field(1).to_string(),
            start: field(2).parse().ok(),
            start_chain: chain(3),
            end: field(4).parse().ok(),
            end_chain: chain(5),
            name: field(6).to_string(),
            source: field(7).to_string(),
            resolution: field(8).parse().ok(),
            r_factor: field(9).parse().ok(),
        })
    }
}

impl fmt::Display for DescriptionFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let number = |n: Option<isize>| n.map(|v| v.to_string()).unwrap_or_default();
        let chain = |c: Option<char>| c.map(String::from).unwrap_or_default();
        let quality = |q: Option<f64>| q.map(|v| format!("{:>5.2}", v)).unwrap_or_default();
        write!(
            f,
            "{}:{}:{}:{}:{}:{}:{}:{}:{}:{}",
            self.role_keyword,
            self.code,
            number(self.start),
            chain(self.start_chain),
            number(self.end),
            chain(self.end_chain),
            self.name,
            self.source,
            quality(self.resolution),
            quality(self.r_factor)
        )
    }
}
