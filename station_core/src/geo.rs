//! Great-circle distance between two coordinates.

use crate::Coordinate;

/// Nautical miles per degree of arc, scaled to statute miles.
const MILES_PER_DEGREE: f64 = 60.0 * 1.1515;

/// Statute mile in kilometres.
const KM_PER_MILE: f64 = 1.609344;

/// Distance in kilometres between `a` and `b`, rounded to 2 decimals.
///
/// Uses the spherical law of cosines. The cosine sum is clamped to
/// `[-1, 1]` because rounding on identical or antipodal points can push it
/// just outside the domain of `acos`. Rounding is half-to-even.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let theta = (a.longitude - b.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let cos_sigma = lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * theta.cos();
    let degrees = cos_sigma.clamp(-1.0, 1.0).acos().to_degrees();

    round_2dp(degrees * MILES_PER_DEGREE * KM_PER_MILE)
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
