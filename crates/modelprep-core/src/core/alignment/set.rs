use super::classify::{classify_role, resolve_roles};
use super::entry::{AlignmentEntry, AlignmentRole};
use std::io;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Alignment contains no entries")]
    Empty,
    #[error("Alignment has no target entry")]
    MissingTarget,
    #[error("Alignment has more than one target entry: {}", .0.join(", "))]
    MultipleTargets(Vec<String>),
    #[error("Alignment has no template structure entry")]
    MissingTemplate,
    #[error("Template '{0}' is not part of the alignment")]
    UnknownTemplate(String),
}

/// A parsed but not yet classified alignment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentBlock {
    pub marker: String,
    pub code: String,
    pub description: String,
    pub sequence: String,
}

/// An alignment with exactly one target and at least one template.
///
/// The set can only be built through [`AlignmentSet::new`] or
/// [`AlignmentSet::from_blocks`], both of which enforce the role invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSet {
    entries: Vec<AlignmentEntry>,
    target_index: usize,
}

impl AlignmentSet {
    /// Validates the roles of `entries` and builds the set.
    pub fn new(entries: Vec<AlignmentEntry>) -> Result<Self, AlignmentError> {
        if entries.is_empty() {
            return Err(AlignmentError::Empty);
        }
        let targets: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_target())
            .map(|(index, _)| index)
            .collect();

        let target_index = match targets.as_slice() {
            [] => return Err(AlignmentError::MissingTarget),
            [index] => *index,
            _ => {
                return Err(AlignmentError::MultipleTargets(
                    targets.iter().map(|&i| entries[i].code.clone()).collect(),
                ));
            }
        };
        if entries.len() == 1 {
            return Err(AlignmentError::MissingTemplate);
        }

        let set = Self {
            entries,
            target_index,
        };
        set.warn_on_length_mismatch();
        Ok(set)
    }

    /// Classifies raw blocks and builds the set.
    pub fn from_blocks(blocks: Vec<AlignmentBlock>) -> Result<Self, AlignmentError> {
        let classifications: Vec<_> = blocks
            .iter()
            .map(|block| classify_role(&block.code, &block.description))
            .collect();
        let roles = resolve_roles(&classifications);

        let entries = blocks
            .into_iter()
            .zip(roles)
            .map(|(block, (role, evidence))| {
                debug!(code = %block.code, %role, %evidence, "Classified alignment entry");
                AlignmentEntry {
                    code: block.code,
                    marker: block.marker,
                    role,
                    evidence,
                    description: block.description,
                    sequence: block.sequence,
                }
            })
            .collect();
        Self::new(entries)
    }

    pub fn entries(&self) -> &[AlignmentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn target(&self) -> &AlignmentEntry {
        &self.entries[self.target_index]
    }

    /// Template entries in file order.
    pub fn templates(&self) -> impl Iterator<Item = &AlignmentEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.role == AlignmentRole::TemplateStructure)
    }

    pub fn template_codes(&self) -> Vec<&str> {
        self.templates().map(|entry| entry.code.as_str()).collect()
    }

    pub fn get(&self, code: &str) -> Option<&AlignmentEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }

    /// Keeps the target plus the named templates, in the order given.
    pub fn subset(&self, template_codes: &[&str]) -> Result<Self, AlignmentError> {
        let mut entries = vec![self.target().clone()];
        for &code in template_codes {
            let template = self
                .templates()
                .find(|entry| entry.code == code)
                .ok_or_else(|| AlignmentError::UnknownTemplate(code.to_string()))?;
            entries.push(template.clone());
        }
        Self::new(entries)
    }

    /// Entries whose aligned length differs from the target's.
    pub fn length_mismatches(&self) -> Vec<(&str, usize)> {
        let expected = self.target().aligned_length();
        self.entries
            .iter()
            .filter(|entry| entry.aligned_length() != expected)
            .map(|entry| (entry.code.as_str(), entry.aligned_length()))
            .collect()
    }

    fn warn_on_length_mismatch(&self) {
        let expected = self.target().aligned_length();
        for (code, length) in self.length_mismatches() {
            warn!(
                "Alignment entry '{}' has length {} but the target has length {}",
                code, length, expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::entry::RoleEvidence;

    fn block(code: &str, description: &str, sequence: &str) -> AlignmentBlock {
        AlignmentBlock {
            marker: "P1".into(),
            code: code.into(),
            description: description.into(),
            sequence: sequence.into(),
        }
    }

    fn template(code: &str) -> AlignmentEntry {
        AlignmentEntry::new(
            code,
            AlignmentRole::TemplateStructure,
            &format!("structureX:{code}"),
            "ACDE",
        )
    }

    fn target(code: &str) -> AlignmentEntry {
        AlignmentEntry::new(code, AlignmentRole::Target, "sequence:t", "ACDE")
    }

    #[test]
    fn from_blocks_classifies_regardless_of_order() {
        let set = AlignmentSet::from_blocks(vec![
            block("tmpl", "structureX:tmpl:1:A:4:A::::", "ACDE"),
            block("query", "sequence:query:::::::0.00: 0.00", "ACDE"),
        ])
        .unwrap();

        assert_eq!(set.target().code, "query");
        assert_eq!(set.target().evidence, RoleEvidence::SequenceKeyword);
        assert_eq!(set.template_codes(), vec!["tmpl"]);
    }

    #[test]
    fn new_requires_exactly_one_target() {
        assert!(matches!(
            AlignmentSet::new(vec![template("a"), template("b")]),
            Err(AlignmentError::MissingTarget)
        ));
        match AlignmentSet::new(vec![target("t1"), target("t2"), template("a")]) {
            Err(AlignmentError::MultipleTargets(codes)) => assert_eq!(codes, vec!["t1", "t2"]),
            other => panic!("expected MultipleTargets, got {other:?}"),
        }
    }

    #[test]
    fn new_requires_a_template() {
        assert!(matches!(
            AlignmentSet::new(vec![target("t")]),
            Err(AlignmentError::MissingTemplate)
        ));
        assert!(matches!(
            AlignmentSet::new(vec![]),
            Err(AlignmentError::Empty)
        ));
    }

    #[test]
    fn subset_keeps_target_and_named_templates_in_order() {
        let set = AlignmentSet::new(vec![
            template("a"),
            target("t"),
            template("b"),
            template("c"),
        ])
        .unwrap();
        let subset = set.subset(&["c", "a"]).unwrap();

        let codes: Vec<_> = subset.entries().iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["t", "c", "a"]);
        assert_eq!(subset.target().code, "t");
    }

    #[test]
    fn subset_rejects_unknown_templates() {
        let set = AlignmentSet::new(vec![target("t"), template("a")]).unwrap();
        assert!(matches!(
            set.subset(&["zzz"]),
            Err(AlignmentError::UnknownTemplate(code)) if code == "zzz"
        ));
        assert!(matches!(
            set.subset(&["t"]),
            Err(AlignmentError::UnknownTemplate(_))
        ));
        assert!(matches!(set.subset(&[]), Err(AlignmentError::MissingTemplate)));
    }

    #[test]
    fn length_mismatches_are_reported_against_the_target() {
        let mut short = template("short");
        short.sequence = "AC".into();
        let set = AlignmentSet::new(vec![target("t"), template("a"), short]).unwrap();
        assert_eq!(set.length_mismatches(), vec![("short", 2)]);
    }
}
