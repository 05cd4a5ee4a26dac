use super::traits::ParseWarning;
use crate::core::alignment::set::{AlignmentBlock, AlignmentError, AlignmentSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Residue letters per sequence line when writing.
pub const SEQUENCE_LINE_WIDTH: usize = 75;

const BLOCK_TERMINATOR: char = '*';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PirMetadata {
    pub warnings: Vec<ParseWarning>,
}

/// Reader and writer for PIR-style alignment files.
///
/// Each block is a `>MARKER;code` header, one description line, and sequence
/// lines closed by `*`:
///
/// ```text
/// >P1;6MEJ_0001
/// structureX:6MEJ_0001:383:A:536:A::: 0.00: 0.00
/// MKV--LAAG*
/// ```
pub struct PirFile;

impl PirFile {
    /// Parses alignment text and classifies its blocks.
    pub fn parse(text: &str) -> Result<(AlignmentSet, PirMetadata), AlignmentError> {
        let mut metadata = PirMetadata::default();
        let blocks = split_blocks(text, &mut metadata.warnings);
        for warning in &metadata.warnings {
            warn!("{}", warning);
        }
        let set = AlignmentSet::from_blocks(blocks)?;
        Ok((set, metadata))
    }

    pub fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(AlignmentSet, PirMetadata), AlignmentError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text)
    }

    pub fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(AlignmentSet, PirMetadata), AlignmentError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    pub fn write_to(set: &AlignmentSet, writer: &mut impl Write) -> Result<(), AlignmentError> {
        for (index, entry) in set.entries().iter().enumerate() {
            if index > 0 {
                writeln!(writer)?;
            }
            writeln!(writer, ">{};{}", entry.marker, entry.code)?;
            writeln!(writer, "{}", entry.description)?;

            let residues: Vec<char> = entry.sequence.chars().collect();
            if residues.is_empty() {
                writeln!(writer, "{}", BLOCK_TERMINATOR)?;
                continue;
            }
            let lines: Vec<String> = residues
                .chunks(SEQUENCE_LINE_WIDTH)
                .map(|chunk| chunk.iter().collect())
                .collect();
            let last = lines.len() - 1;
            for (line_index, line) in lines.iter().enumerate() {
                if line_index == last {
                    writeln!(writer, "{}{}", line, BLOCK_TERMINATOR)?;
                } else {
                    writeln!(writer, "{}", line)?;
                }
            }
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(set: &AlignmentSet, path: P) -> Result<(), AlignmentError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(set, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Renders the alignment exactly as [`Self::write_to`] would write it.
    pub fn to_text(set: &AlignmentSet) -> Result<String, AlignmentError> {
        let mut buffer = Vec::new();
        Self::write_to(set, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn split_blocks(text: &str, warnings: &mut Vec<ParseWarning>) -> Vec<AlignmentBlock> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks: Vec<AlignmentBlock> = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line_num = index + 1;
        let line = lines[index].trim();
        index += 1;

        let Some(header) = line.strip_prefix('>') else {
            if !line.is_empty() && !line.starts_with('#') {
                warnings.push(ParseWarning::new(
                    line_num,
                    "text outside of an alignment block ignored",
                ));
            }
            continue;
        };
        let Some((marker, rest)) = header.split_once(';') else {
            warnings.push(ParseWarning::new(
                line_num,
                format!("block header '{}' has no ';' separator; block skipped", line),
            ));
            continue;
        };
        let (code, inline_description) = match rest.split_once(':') {
            Some((code, inline)) => (code.trim(), inline.trim()),
            None => (rest.trim(), ""),
        };
        if code.is_empty() {
            warnings.push(ParseWarning::new(line_num, "block header has an empty code; block skipped"));
            continue;
        }

        let mut description = String::new();
        if let Some(next) = lines.get(index) {
            if !next.trim_start().starts_with('>') {
                description = next.trim().to_string();
                index += 1;
            }
        }
        if !inline_description.is_empty() {
            description = if description.is_empty() {
                inline_description.to_string()
            } else {
                format!("{} - {}", inline_description, description)
            };
        }

        let mut sequence = String::new();
        let mut terminated = false;
        while index < lines.len() {
            let current = lines[index].trim();
            if current.is_empty() || current.starts_with('>') {
                break;
            }
            index += 1;
            match current.split_once(BLOCK_TERMINATOR) {
                Some((residues, _)) => {
                    sequence.extend(residues.chars().filter(|c| !c.is_whitespace()));
                    terminated = true;
                    break;
                }
                None => sequence.extend(current.chars().filter(|c| !c.is_whitespace())),
            }
        }
        if !terminated {
            warnings.push(ParseWarning::new(
                line_num,
                format!("block '{}' is not closed by '{}'", code, BLOCK_TERMINATOR),
            ));
        }

        let block = AlignmentBlock {
            marker: marker.trim().to_string(),
            code: code.to_string(),
            description,
            sequence,
        };
        match blocks.iter().position(|existing| existing.code == block.code) {
            Some(position) => {
                warnings.push(ParseWarning::new(
                    line_num,
                    format!("duplicate block '{}' replaces the earlier one", block.code),
                ));
                blocks[position] = block;
            }
            None => blocks.push(block),
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::entry::{AlignmentRole, RoleEvidence};

    const TWO_BLOCKS: &str = "\
>P1;6MEJ_0001
structureX:6MEJ_0001:383:A:536:A::: 0.00: 0.00
MKVLAAG
IVG*

>P1;query
sequence:query:::::::0.00: 0.00
MKV--AG
IVG*
";

    #[test]
    fn parses_blocks_and_classifies_roles() {
        let (set, metadata) = PirFile::parse(TWO_BLOCKS).unwrap();
        assert!(metadata.warnings.is_empty());
        assert_eq!(set.len(), 2);

        let target = set.target();
        assert_eq!(target.code, "query");
        assert_eq!(target.sequence, "MKV--AGIVG");
        assert_eq!(target.evidence, RoleEvidence::SequenceKeyword);

        let template = set.get("6MEJ_0001").unwrap();
        assert_eq!(template.role, AlignmentRole::TemplateStructure);
        assert_eq!(template.sequence, "MKVLAAGIVG");
        assert_eq!(template.description_fields().unwrap().start, Some(383));
    }

    #[test]
    fn unterminated_block_stops_at_next_marker_with_warning() {
        let text = "\
>P1;tmpl
structureX:tmpl
ACDE
>P1;t_target
free text
ACDE*
";
        let (set, metadata) = PirFile::parse(text).unwrap();
        assert_eq!(set.get("tmpl").unwrap().sequence, "ACDE");
        assert_eq!(set.target().code, "t_target");
        assert_eq!(metadata.warnings.len(), 1);
        assert_eq!(metadata.warnings[0].line, 1);
    }

    #[test]
    fn fallback_assigns_first_unhinted_block_as_target() {
        let text = ">P1;first\nfree\nAC*\n>P1;second\nfree\nAC*\n";
        let (set, _) = PirFile::parse(text).unwrap();
        assert_eq!(set.target().code, "first");
        assert_eq!(set.target().evidence, RoleEvidence::Fallback);
        assert_eq!(set.template_codes(), vec!["second"]);
    }

    #[test]
    fn missing_template_is_a_validation_error() {
        let text = ">P1;only\nsequence:only\nAC*\n";
        assert!(matches!(
            PirFile::parse(text),
            Err(AlignmentError::MissingTemplate)
        ));
    }

    #[test]
    fn two_sequence_blocks_are_rejected() {
        let text = ">P1;a\nsequence:a\nAC*\n>P1;b\nsequence:b\nAC*\n>P1;c\nstructureX:c\nAC*\n";
        assert!(matches!(
            PirFile::parse(text),
            Err(AlignmentError::MultipleTargets(_))
        ));
    }

    #[test]
    fn write_wraps_sequences_and_terminates_blocks() {
        let long: String = "A".repeat(80);
        let text = format!(">P1;tmpl\nstructureX:tmpl\n{long}*\n>F1;query\nsequence:query\n{long}*\n");
        let (set, _) = PirFile::parse(&text).unwrap();

        let written = PirFile::to_text(&set).unwrap();
        let expected = format!(
            ">P1;tmpl\nstructureX:tmpl\n{}\n{}*\n\n>F1;query\nsequence:query\n{}\n{}*\n",
            "A".repeat(75),
            "A".repeat(5),
            "A".repeat(75),
            "A".repeat(5)
        );
        assert_eq!(written, expected);

        let (reparsed, _) = PirFile::parse(&written).unwrap();
        assert_eq!(reparsed, set);
    }
}
