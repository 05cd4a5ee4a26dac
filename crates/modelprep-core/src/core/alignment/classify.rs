//! Target/template role classification for alignment blocks.
//!
//! Classification is split in two: [`classify_role`] inspects a single block
//! and reports an explicit role only when the block itself carries a hint,
//! while [`resolve_roles`] settles the remaining blocks with knowledge of the
//! whole file. Both functions are pure.

use super::entry::{AlignmentRole, RoleEvidence};

const STRUCTURE_KEYWORD: &str = "structure";
const STRUCTURE_X_KEYWORD: &str = "structurex";
const SEQUENCE_KEYWORD: &str = "sequence";
const TARGET_CODE_MARKER: &str = "target";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Explicit {
        role: AlignmentRole,
        evidence: RoleEvidence,
    },
    Unclassified,
}

/// Classifies one block; the first matching rule wins.
///
/// 1. A description starting with a structure keyword (`structureX`,
///    `structureN`, `structureM`, ...) marks a template. A `structureX` field
///    anywhere in the description counts as well.
/// 2. A description starting with `sequence`, or a code containing `target`,
///    marks the target.
pub fn classify_role(code: &str, description: &str) -> Classification {
    let description = description.trim().to_ascii_lowercase();
    if description.starts_with(STRUCTURE_KEYWORD) || description.contains(STRUCTURE_X_KEYWORD) {
        return Classification::Explicit {
            role: AlignmentRole::TemplateStructure,
            evidence: RoleEvidence::StructureKeyword,
        };
    }
    if description.starts_with(SEQUENCE_KEYWORD) {
        return Classification::Explicit {
            role: AlignmentRole::Target,
            evidence: RoleEvidence::SequenceKeyword,
        };
    }
    if code.to_ascii_lowercase().contains(TARGET_CODE_MARKER) {
        return Classification::Explicit {
            role: AlignmentRole::Target,
            evidence: RoleEvidence::TargetCode,
        };
    }
    Classification::Unclassified
}

/// Assigns a role to every block.
///
/// Unclassified blocks fall back by position: the first becomes the target if
/// no block claimed that role explicitly, every other one becomes a template.
pub fn resolve_roles(classifications: &[Classification]) -> Vec<(AlignmentRole, RoleEvidence)> {
    let mut target_assigned = classifications.iter().any(|c| {
        matches!(
            c,
            Classification::Explicit {
                role: AlignmentRole::Target,
                ..
            }
        )
    });

    classifications
        .iter()
        .map(|classification| match *classification {
            Classification::Explicit { role, evidence } => (role, evidence),
            Classification::Unclassified if !target_assigned => {
                target_assigned = true;
                (AlignmentRole::Target, RoleEvidence::Fallback)
            }
            Classification::Unclassified => {
                (AlignmentRole::TemplateStructure, RoleEvidence::Fallback)
            }
        })
        .collect()
}
