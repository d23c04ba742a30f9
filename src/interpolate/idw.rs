use crate::field::Sample;

/// Squared distances below this are treated as coincident with a sample
const COINCIDENT_EPS: f64 = 1e-24;

/// Inverse-distance-weighted estimate at `(x, y)`
///
/// Weight of sample i is `1 / d^power`. A query that coincides with a
/// sample returns the first such sample's z exactly.
pub fn idw_estimate(samples: &[Sample], x: f64, y: f64, power: f64) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for s in samples {
        let dx = x - s.x;
        let dy = y - s.y;
        let d2 = dx * dx + dy * dy;

        if d2 <= COINCIDENT_EPS {
            return Some(s.z);
        }

        // d^-power == (d^2)^(-power/2)
        let w = d2.powf(-power / 2.0);
        weighted_sum += w * s.z;
        weight_total += w;
    }

    if weight_total > 0.0 && weight_total.is_finite() {
        Some(weighted_sum / weight_total)
    } else {
        None
    }
}
