pub mod alignment;
pub mod annotate;
pub mod gaps;
pub mod scan;
pub mod sequence;

use modelprep::engine::disulfide::Resolution;

/// Prints accepted bonds and rejected candidates, one per line.
fn print_resolution(resolution: &Resolution) {
    for bond in &resolution.bonds {
        println!(
            "  {:<16} {:>6.3} Å  {:<9}  --ss {}",
            bond.pair.to_string(),
            bond.distance,
            bond.origin,
            bond.pair.engine_argument()
        );
    }
    for rejected in &resolution.rejected {
        println!(
            "  {:<16} {:>6.3} Å  skipped ({})",
            rejected.candidate.pair.to_string(),
            rejected.candidate.distance,
            rejected.reason
        );
    }
}
