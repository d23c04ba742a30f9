//! Gaussian kernel smoothing (Nadaraya-Watson)

use crate::field::Sample;

/// Per-axis Gaussian bandwidths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bandwidth {
    pub hx: f64,
    pub hy: f64,
}

impl Bandwidth {
    /// Scott's rule for two dimensions: `h = sigma * n^(-1/6)`
    ///
    /// An axis with zero spread borrows the other axis' bandwidth; if both
    /// are zero the bandwidth is 1.
    pub fn scott(samples: &[Sample]) -> Self {
        let n = samples.len().max(1) as f64;
        let factor = n.powf(-1.0 / 6.0);

        let hx = std_dev(samples.iter().map(|s| s.x)) * factor;
        let hy = std_dev(samples.iter().map(|s| s.y)) * factor;

        match (hx > 0.0, hy > 0.0) {
            (true, true) => Self { hx, hy },
            (true, false) => Self { hx, hy: hx },
            (false, true) => Self { hx: hy, hy },
            (false, false) => Self { hx: 1.0, hy: 1.0 },
        }
    }
}

/// Kernel-weighted mean of sample values around `(x, y)`
///
/// Exponents are shifted by their maximum before exponentiation, so a
/// query far from every sample still gets the value of the nearest ones
/// instead of 0/0.
pub fn smooth_estimate(samples: &[Sample], x: f64, y: f64, bw: Bandwidth) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let exponents: Vec<f64> = samples
        .iter()
        .map(|s| {
            let u = (x - s.x) / bw.hx;
            let v = (y - s.y) / bw.hy;
            -0.5 * (u * u + v * v)
        })
        .collect();

    let shift = exponents.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for (s, e) in samples.iter().zip(&exponents) {
        let w = (e - shift).exp();
        weighted_sum += w * s.z;
        weight_total += w;
    }

    Some(weighted_sum / weight_total)
}

fn std_dev(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_samples() -> Vec<Sample> {
        (0..10)
            .map(|i| Sample::new(i as f64, (i % 3) as f64, i as f64))
            .collect()
    }

    #[test]
    fn test_scott_bandwidth() {
        let samples = line_samples();
        let bw = Bandwidth::scott(&samples);

        let sd_x = std_dev(samples.iter().map(|s| s.x));
        let expected = sd_x * 10f64.powf(-1.0 / 6.0);
        assert!((bw.hx - expected).abs() < 1e-12);
        assert!(bw.hy > 0.0);
    }

    #[test]
    fn test_zero_spread_axis_borrows() {
        let samples: Vec<Sample> = (0..4).map(|i| Sample::new(i as f64, 5.0, 0.0)).collect();
        let bw = Bandwidth::scott(&samples);
        assert_eq!(bw.hx, bw.hy);

        let single = [Sample::new(1.0, 1.0, 1.0)];
        assert_eq!(Bandwidth::scott(&single), Bandwidth { hx: 1.0, hy: 1.0 });
    }

    #[test]
    fn test_smoothing_is_not_exact() {
        let samples = line_samples();
        let bw = Bandwidth::scott(&samples);

        // The extreme sample is pulled towards its neighbours
        let v = smooth_estimate(&samples, 9.0, 0.0, bw).unwrap();
        assert!(v < 9.0);
        assert!(v > 0.0);
    }

    #[test]
    fn test_far_query_does_not_underflow() {
        let samples = line_samples();
        let bw = Bandwidth { hx: 0.01, hy: 0.01 };

        let v = smooth_estimate(&samples, 1e6, 0.0, bw).unwrap();
        assert!(v.is_finite());
        assert!((v - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_field_preserved() {
        let samples: Vec<Sample> = (0..5)
            .map(|i| Sample::new(i as f64, (i * i) as f64, 7.0))
            .collect();
        let bw = Bandwidth::scott(&samples);
        let v = smooth_estimate(&samples, 2.5, 3.0, bw).unwrap();
        assert!((v - 7.0).abs() < 1e-12);
    }
}
