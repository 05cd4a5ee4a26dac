use super::traits::{ParseWarning, StructureFile};
use crate::core::models::atom::{Atom, AtomRole};
use crate::core::models::chain::ChainType;
use crate::core::models::ids::ResidueSpecifier;
use crate::core::models::record::{ConnectivityRecord, LinkageEnd, LinkageRecord, Record};
use crate::core::models::structure::Structure;
use crate::core::utils::identifiers::is_backbone_atom;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

/// Options controlling which records [`PdbFile`] keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep `HETATM` records; when false they are dropped from the structure
    /// and from the record layout.
    pub keep_hetero: bool,
}

/// Per-atom text that is not part of the structural model but is needed to
/// reproduce the original line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdbAtomIoData {
    /// The untrimmed atom name field, columns 13-16.
    pub name_field: String,
    pub alt_loc: char,
    /// Everything after the z coordinate (occupancy, B-factor, element, ...).
    pub raw_suffix: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    pub atom_io_data: HashMap<usize, PdbAtomIoData>,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Format error on line {line}: {kind}")]
    Format {
        line: usize,
        kind: PdbFormatErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("{record} {field} '{value}' does not fit its fixed columns")]
    FieldOverflow {
        record: &'static str,
        field: &'static str,
        value: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PdbFormatErrorKind {
    #[error("Invalid atom serial in columns 7-11 (value: '{value}')")]
    InvalidSerial { value: String },
    #[error("Invalid {axis} coordinate in columns {columns} (value: '{value}')")]
    InvalidCoordinate {
        axis: char,
        columns: &'static str,
        value: String,
    },
    #[error("Coordinate record is too short (must reach column 54)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

fn char_at(line: &str, index: usize) -> char {
    line.as_bytes()
        .get(index)
        .map(|&b| b as char)
        .unwrap_or(' ')
}

fn parse_coordinate(
    line: &str,
    line_num: usize,
    axis: char,
    start: usize,
    columns: &'static str,
) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, start + 8);
    value.parse().map_err(|_| PdbError::Format {
        line: line_num,
        kind: PdbFormatErrorKind::InvalidCoordinate {
            axis,
            columns,
            value: value.into(),
        },
    })
}

/// Strips the line terminator and decodes the bytes; undecodable bytes are
/// replaced and reported as a warning.
fn decode_line(bytes: &[u8], line_num: usize, warnings: &mut Vec<ParseWarning>) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            warnings.push(ParseWarning::new(
                line_num,
                "line is not valid UTF-8; undecodable bytes replaced",
            ));
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn linkage_end(line: &str, name_at: usize) -> Option<LinkageEnd> {
    let number = slice_and_trim(line, name_at + 6, name_at + 10).parse().ok()?;
    Some(LinkageEnd {
        residue_name: slice_and_trim(line, name_at, name_at + 3).to_string(),
        residue: ResidueSpecifier::new(char_at(line, name_at + 4), number)
            .with_insertion_code(char_at(line, name_at + 10)),
    })
}

fn parse_linkage(line: &str) -> Option<LinkageRecord> {
    let serial_number = slice_and_trim(line, 7, 10).parse().ok()?;
    let first = linkage_end(line, 11)?;
    let second = linkage_end(line, 25)?;
    Some(LinkageRecord {
        serial_number,
        first,
        second,
        first_symmetry: slice_and_trim(line, 59, 65).to_string(),
        second_symmetry: slice_and_trim(line, 66, 72).to_string(),
        distance: slice_and_trim(line, 73, 78).parse().ok(),
    })
}

fn parse_connectivity(line: &str) -> Option<ConnectivityRecord> {
    let fixed_columns = || -> Option<Vec<usize>> {
        let mut serials = Vec::new();
        let mut start = 6;
        while start < line.len() {
            let field = slice_and_trim(line, start, start + 5);
            if !field.is_empty() {
                serials.push(field.parse().ok()?);
            }
            start += 5;
        }
        Some(serials)
    };
    let whitespace = || -> Option<Vec<usize>> {
        line.split_whitespace()
            .skip(1)
            .map(|field| field.parse().ok())
            .collect()
    };

    let serials = fixed_columns().or_else(whitespace)?;
    let (&origin, targets) = serials.split_first()?;
    if targets.is_empty() {
        return None;
    }
    Some(ConnectivityRecord::new(origin, targets.to_vec()))
}

/// Largest value each fixed-width `SSBOND` field can hold.
const MAX_LINKAGE_SERIAL: usize = 999;
const LINKAGE_RESIDUE_RANGE: std::ops::RangeInclusive<isize> = -999..=9999;
const MAX_LINKAGE_DISTANCE: f64 = 99.99;

fn overflow(field: &'static str, value: impl ToString) -> PdbError {
    PdbError::FieldOverflow {
        record: "SSBOND",
        field,
        value: value.to_string(),
    }
}

/// Formats a linkage record as a fixed-column `SSBOND` line.
///
/// Serials and residue numbers that need more columns than the format gives
/// them are errors. A distance above 99.99 A is written as 99.99.
pub fn format_linkage_record(linkage: &LinkageRecord) -> Result<String, PdbError> {
    if linkage.serial_number > MAX_LINKAGE_SERIAL {
        return Err(overflow("serial number", linkage.serial_number));
    }
    for end in [&linkage.first, &linkage.second] {
        if !LINKAGE_RESIDUE_RANGE.contains(&end.residue.residue_number) {
            return Err(overflow("residue number", end.residue));
        }
    }
    let distance = match linkage.distance {
        Some(d) if d > MAX_LINKAGE_DISTANCE => {
            warn!(
                "SSBOND {} distance {:.2} A written as {:.2} A",
                linkage.serial_number, d, MAX_LINKAGE_DISTANCE
            );
            format!("{:>5.2}", MAX_LINKAGE_DISTANCE)
        }
        Some(d) => format!("{:>5.2}", d),
        None => String::new(),
    };
    let line = format!(
        "SSBOND {:>3} {:>3} {} {:>4}{}   {:>3} {} {:>4}{}{:23}{:>6} {:>6} {}",
        linkage.serial_number,
        linkage.first.residue_name,
        linkage.first.residue.chain_id,
        linkage.first.residue.residue_number,
        linkage.first.residue.insertion_code,
        linkage.second.residue_name,
        linkage.second.residue.chain_id,
        linkage.second.residue.residue_number,
        linkage.second.residue.insertion_code,
        "",
        linkage.first_symmetry,
        linkage.second_symmetry,
        distance
    );
    Ok(line.trim_end().to_string())
}

/// Formats a connectivity record as a fixed-column `CONECT` line.
pub fn format_connectivity_record(connectivity: &ConnectivityRecord) -> String {
    let mut line = format!("CONECT{:>5}", connectivity.origin);
    for target in &connectivity.targets {
        line.push_str(&format!("{:>5}", target));
    }
    line
}

fn default_name_field(name: &str) -> String {
    if name.len() >= 4 {
        name.chars().take(4).collect()
    } else {
        format!(" {:<3}", name)
    }
}

fn default_suffix(name: &str) -> String {
    let element = name
        .trim()
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .unwrap_or(' ');
    format!("  1.00  0.00          {:>2}", element)
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Options = ParseOptions;
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut structure = Structure::new();
        let mut metadata = PdbMetadata::default();

        // Only the first model is kept. Later MODEL..ENDMDL blocks are
        // dropped whole; records between or after them stay in the layout.
        let mut first_model_closed = false;
        let mut in_later_model = false;
        let mut later_models = 0usize;
        let mut skipped_model_records = 0usize;
        let mut first_skipped_line = 0usize;
        let mut dropped_hetero = 0usize;

        let mut buffer = Vec::new();
        let mut line_num = 0usize;
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            line_num += 1;
            let line = decode_line(&buffer, line_num, &mut metadata.warnings);
            let record_type = slice_and_trim(&line, 0, 6).to_string();

            if in_later_model {
                match record_type.as_str() {
                    "ATOM" | "HETATM" => skipped_model_records += 1,
                    "ENDMDL" => in_later_model = false,
                    _ => {}
                }
                continue;
            }

            match record_type.as_str() {
                "MODEL" if first_model_closed => {
                    if later_models == 0 && skipped_model_records == 0 {
                        first_skipped_line = line_num;
                    }
                    later_models += 1;
                    in_later_model = true;
                }
                "ATOM" | "HETATM" => {
                    if first_model_closed {
                        if later_models == 0 && skipped_model_records == 0 {
                            first_skipped_line = line_num;
                        }
                        skipped_model_records += 1;
                        continue;
                    }
                    let is_hetero = record_type == "HETATM";
                    if is_hetero && !options.keep_hetero {
                        dropped_hetero += 1;
                        continue;
                    }

                    let serial_str = slice_and_trim(&line, 6, 11);
                    let serial: usize = serial_str
                        .parse()
                        .ok()
                        .filter(|&s| s > 0)
                        .ok_or_else(|| PdbError::Format {
                            line: line_num,
                            kind: PdbFormatErrorKind::InvalidSerial {
                                value: serial_str.into(),
                            },
                        })?;
                    if line.len() < 54 {
                        return Err(PdbError::Format {
                            line: line_num,
                            kind: PdbFormatErrorKind::LineTooShort,
                        });
                    }
                    let x = parse_coordinate(&line, line_num, 'x', 30, "31-38")?;
                    let y = parse_coordinate(&line, line_num, 'y', 38, "39-46")?;
                    let z = parse_coordinate(&line, line_num, 'z', 46, "47-54")?;

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        metadata.warnings.push(ParseWarning::new(
                            line_num,
                            format!("atom {} has no name; record skipped", serial),
                        ));
                        continue;
                    }
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let Ok(residue_number) = res_seq_str.parse::<isize>() else {
                        metadata.warnings.push(ParseWarning::new(
                            line_num,
                            format!(
                                "atom {} has unreadable residue number '{}'; record skipped",
                                serial, res_seq_str
                            ),
                        ));
                        continue;
                    };
                    if structure.atom_by_serial(serial).is_some() {
                        metadata.warnings.push(ParseWarning::new(
                            line_num,
                            format!("duplicate atom serial {}; record skipped", serial),
                        ));
                        continue;
                    }
                    let residue_name = slice_and_trim(&line, 17, 20);
                    let chain_char = char_at(&line, 21);
                    let insertion_code = char_at(&line, 26);

                    let chain_type = if is_hetero {
                        ChainType::Other
                    } else {
                        ChainType::Protein
                    };
                    let chain_id = structure.add_chain(chain_char, chain_type);
                    let residue_id = structure
                        .add_residue_at(chain_id, residue_number, insertion_code, residue_name)
                        .ok_or_else(|| {
                            PdbError::Inconsistency(format!(
                                "chain '{}' vanished while reading line {}",
                                chain_char, line_num
                            ))
                        })?;
                    if let Some(existing) = structure.residue(residue_id) {
                        if existing.name != residue_name {
                            metadata.warnings.push(ParseWarning::new(
                                line_num,
                                format!(
                                    "residue {} is named both {} and {}; keeping {}",
                                    ResidueSpecifier::new(chain_char, residue_number)
                                        .with_insertion_code(insertion_code),
                                    existing.name,
                                    residue_name,
                                    existing.name
                                ),
                            ));
                        }
                    }

                    let role = if is_hetero {
                        AtomRole::Hetero
                    } else if is_backbone_atom(name) {
                        AtomRole::Backbone
                    } else {
                        AtomRole::Sidechain
                    };
                    let atom = Atom::new(serial, name, residue_id, Point3::new(x, y, z))
                        .with_role(role);
                    let atom_id = structure
                        .add_atom_to_residue(residue_id, atom)
                        .ok_or_else(|| {
                            PdbError::Inconsistency(format!(
                                "atom {} could not be attached to its residue",
                                serial
                            ))
                        })?;

                    structure.push_record(Record::Coordinate(atom_id));
                    metadata.atom_io_data.insert(
                        serial,
                        PdbAtomIoData {
                            name_field: format!("{:<4}", line.get(12..16).unwrap_or(name)),
                            alt_loc: char_at(&line, 16),
                            raw_suffix: line.get(54..).unwrap_or("").to_string(),
                        },
                    );
                }
                "SSBOND" => match parse_linkage(&line) {
                    Some(linkage) => structure.push_record(Record::Linkage(linkage)),
                    None => {
                        metadata.warnings.push(ParseWarning::new(
                            line_num,
                            "unreadable SSBOND record kept verbatim",
                        ));
                        structure.push_record(Record::Raw(line));
                    }
                },
                "CONECT" => match parse_connectivity(&line) {
                    Some(connectivity) => {
                        structure.push_record(Record::Connectivity(connectivity))
                    }
                    None => {
                        metadata.warnings.push(ParseWarning::new(
                            line_num,
                            "unreadable CONECT record kept verbatim",
                        ));
                        structure.push_record(Record::Raw(line));
                    }
                },
                "ENDMDL" => {
                    first_model_closed = true;
                    structure.push_record(Record::Raw(line));
                }
                _ => structure.push_record(Record::Raw(line)),
            }
        }

        if later_models > 0 || skipped_model_records > 0 {
            metadata.warnings.push(ParseWarning::new(
                first_skipped_line,
                format!(
                    "{} later model(s) and {} coordinate record(s) past the first model skipped",
                    later_models, skipped_model_records
                ),
            ));
        }
        if dropped_hetero > 0 {
            debug!(count = dropped_hetero, "Dropped HETATM records");
        }
        for warning in &metadata.warnings {
            warn!("{}", warning);
        }

        if structure.atom_count() == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok((structure, metadata))
    }

    fn write_to(
        structure: &Structure,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for record in structure.records() {
            match record {
                Record::Coordinate(atom_id) => {
                    let atom = structure.atom(*atom_id).ok_or_else(|| {
                        PdbError::Inconsistency("coordinate record points to a removed atom".into())
                    })?;
                    let residue = structure.residue(atom.residue_id).ok_or_else(|| {
                        PdbError::Inconsistency(format!("atom {} has no residue", atom.serial))
                    })?;
                    let chain = structure.chain(residue.chain_id).ok_or_else(|| {
                        PdbError::Inconsistency(format!("residue {} has no chain", residue.number))
                    })?;
                    let io_data = metadata.atom_io_data.get(&atom.serial);

                    let record_type = if atom.is_hetero() { "HETATM" } else { "ATOM" };
                    let name_field = io_data
                        .map(|d| d.name_field.clone())
                        .unwrap_or_else(|| default_name_field(&atom.name));
                    let suffix = io_data
                        .map(|d| d.raw_suffix.clone())
                        .unwrap_or_else(|| default_suffix(&atom.name));

                    writeln!(
                        writer,
                        "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{}",
                        record_type,
                        atom.serial,
                        name_field,
                        io_data.map_or(' ', |d| d.alt_loc),
                        residue.name,
                        chain.id,
                        residue.number,
                        residue.insertion_code,
                        atom.position.x,
                        atom.position.y,
                        atom.position.z,
                        suffix
                    )?;
                }
                Record::Linkage(linkage) => {
                    writeln!(writer, "{}", format_linkage_record(linkage)?)?
                }
                Record::Connectivity(connectivity) => {
                    writeln!(writer, "{}", format_connectivity_record(connectivity))?
                }
                Record::Raw(line) => writeln!(writer, "{}", line)?,
            }
        }
        Ok(())
    }
}
