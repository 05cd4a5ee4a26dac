use super::coverage::CoverageReport;
use super::disulfide::{BondCandidate, Resolution};
use super::error::EngineError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// One row of the bond report: an accepted bond or a rejected candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondReportRow {
    pub pair: String,
    pub first_serial: usize,
    pub second_serial: usize,
    pub distance: f64,
    pub origin: String,
    pub status: String,
    pub reason: String,
    pub engine_argument: String,
}

impl BondReportRow {
    fn new(candidate: &BondCandidate, status: &str, reason: String) -> Self {
        Self {
            pair: candidate.pair.to_string(),
            first_serial: candidate.first_serial,
            second_serial: candidate.second_serial,
            distance: (candidate.distance * 1000.0).round() / 1000.0,
            origin: candidate.origin.to_string(),
            status: status.to_string(),
            reason,
            engine_argument: candidate.pair.engine_argument(),
        }
    }
}

/// Accepted bonds in acceptance order, then rejected candidates.
pub fn bond_report_rows(resolution: &Resolution) -> Vec<BondReportRow> {
    let accepted = resolution
        .bonds
        .iter()
        .map(|bond| BondReportRow::new(bond, "accepted", String::new()));
    let rejected = resolution
        .rejected
        .iter()
        .map(|entry| BondReportRow::new(&entry.candidate, "rejected", entry.reason.to_string()));
    accepted.chain(rejected).collect()
}

/// One missing run of one chain, tagged with the structure it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReportRow {
    pub structure: String,
    pub chain: char,
    pub gap_start: isize,
    pub gap_end: isize,
    pub length: usize,
    pub completeness_percent: f64,
}

pub fn gap_report_rows<'a>(
    structure: &str,
    reports: impl IntoIterator<Item = (&'a char, &'a CoverageReport)>,
) -> Vec<GapReportRow> {
    let mut rows = Vec::new();
    for (chain, report) in reports {
        let completeness = (report.completeness_percent() * 100.0).round() / 100.0;
        rows.extend(report.gaps.iter().map(|gap| GapReportRow {
            structure: structure.to_string(),
            chain: *chain,
            gap_start: gap.start,
            gap_end: gap.end,
            length: gap.length(),
            completeness_percent: completeness,
        }));
    }
    rows
}

/// Writes rows as CSV; the header line is taken from the row's field names.
pub fn write_rows<T: Serialize>(rows: &[T], writer: impl Write) -> Result<(), EngineError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_rows_to_path<T: Serialize>(rows: &[T], path: &Path) -> Result<(), EngineError> {
    let file = std::fs::File::create(path)?;
    write_rows(rows, std::io::BufWriter::new(file))
}
