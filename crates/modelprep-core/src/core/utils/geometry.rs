use nalgebra::Point3;

/// Coordinates beyond this magnitude (Angstroms) are treated as placeholders.
pub const EXTREME_COORDINATE_LIMIT: f64 = 500.0;

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

/// Returns the distance between `a` and `b` if it does not exceed `cutoff`.
///
/// The comparison is done on squared distances, so a pair exactly at the
/// cutoff is accepted.
pub fn within_cutoff(a: &Point3<f64>, b: &Point3<f64>, cutoff: f64) -> Option<f64> {
    let squared = (a - b).norm_squared();
    (squared <= cutoff * cutoff).then(|| squared.sqrt())
}

pub fn is_extreme_position(position: &Point3<f64>) -> bool {
    position
        .iter()
        .any(|c| !c.is_finite() || c.abs() > EXTREME_COORDINATE_LIMIT)
}
