//! Shared math and angular-statistics utilities.
//!
//! Angles are handled in degrees throughout the crate: wind and flux
//! directions live on the full circle [0°, 360°) and carry a sense, while
//! dune-crest orientations are periodic modulo 180° (a crest has no sense).
//!
//! The vector (circular) average is computed by summing `norm * exp(i*theta)`
//! and converting the resultant back to an angle and a magnitude, which
//! handles angular wraparound correctly where a naive arithmetic mean of
//! angles would not.

use num_complex::Complex64;

/// Sine with the argument in degrees.
pub fn sind(x: f64) -> f64 {
    x.to_radians().sin()
}

/// Cosine with the argument in degrees.
pub fn cosd(x: f64) -> f64 {
    x.to_radians().cos()
}

/// Tangent with the argument in degrees.
pub fn tand(x: f64) -> f64 {
    x.to_radians().tan()
}

/// Inverse sine returning degrees.
pub fn arcsind(x: f64) -> f64 {
    x.asin().to_degrees()
}

/// Inverse tangent returning degrees.
pub fn arctand(x: f64) -> f64 {
    x.atan().to_degrees()
}

/// Quadrant-aware inverse tangent of `y/x` returning degrees in [-180, 180].
pub fn arctan2d(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}

/// Sign function with `sign(0) = 0`.
///
/// `f64::signum` maps +0.0 to +1.0, which is the wrong convention for the
/// celerity compositions: a wind blowing exactly along the crest must
/// contribute no net migration.
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Fold an orientation into the crest-symmetric range (-90°, 90°].
///
/// Dune crests have no inherent sense, so any orientation is equivalent to
/// itself plus 180°.
pub fn fold_orientation(alpha: f64) -> f64 {
    let folded = (alpha + 90.0).rem_euclid(180.0) - 90.0;
    if folded == -90.0 { 90.0 } else { folded }
}

/// Vector (circular) average of a series of `(angle_deg, norm)` pairs.
///
/// Computes the mean of `norm * exp(i*angle)` over all entries whose angle
/// and norm are both finite, and returns the resultant direction in degrees
/// in [-180, 180] together with its magnitude. Non-finite entries are
/// skipped, reflecting "no data" semantics; if every entry is non-finite the
/// result is `(NaN, NaN)`.
pub fn vector_average(angles: &[f64], norms: &[f64]) -> (f64, f64) {
    debug_assert_eq!(angles.len(), norms.len());
    let mut sum = Complex64::new(0.0, 0.0);
    let mut count = 0usize;
    for (&a, &n) in angles.iter().zip(norms.iter()) {
        if a.is_finite() && n.is_finite() {
            sum += n * Complex64::new(0.0, a.to_radians()).exp();
            count += 1;
        }
    }
    if count == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = sum / count as f64;
    (mean.arg().to_degrees(), mean.norm())
}

/// Convert Cartesian coordinates to polar `(r, theta_deg)` with the angle in
/// [0°, 360°).
pub fn cartesian_to_polar(x: f64, y: f64) -> (f64, f64) {
    let r = x.hypot(y);
    let theta = arctan2d(y, x).rem_euclid(360.0);
    (r, theta)
}

/// Uniformly spaced bin edges over [start, stop] with `n_bins` bins.
///
/// The default angular grid used by the orientation models is
/// `linear_bins(0.0, 360.0, 360)`, i.e. 1° resolution.
pub fn linear_bins(start: f64, stop: f64, n_bins: usize) -> Vec<f64> {
    let width = (stop - start) / n_bins as f64;
    (0..=n_bins).map(|i| start + i as f64 * width).collect()
}

fn bin_index(value: f64, edges: &[f64]) -> Option<usize> {
    let n_bins = edges.len() - 1;
    let (start, stop) = (edges[0], edges[n_bins]);
    if !value.is_finite() || value < start || value > stop {
        return None;
    }
    let width = (stop - start) / n_bins as f64;
    // Right edge of the last bin is inclusive, matching np.histogram.
    let idx = ((value - start) / width) as usize;
    Some(idx.min(n_bins - 1))
}

fn bin_centers(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Weighted angular probability density over fixed-width bins.
///
/// Bins the `(angle, weight)` samples into the bins defined by `bin_edges`
/// and normalizes so that the sum of the density times the bin width is one
/// (for finite weights). Samples with a non-finite angle are skipped.
///
/// Returns the density values and the bin centers.
///
/// # Panics
///
/// Panics if `bin_edges` has fewer than two entries (no bin is defined).
pub fn angular_pdf(angles: &[f64], weights: &[f64], bin_edges: &[f64]) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(angles.len(), weights.len());
    assert!(bin_edges.len() >= 2, "bin_edges must define at least one bin");
    let n_bins = bin_edges.len() - 1;
    let width = (bin_edges[n_bins] - bin_edges[0]) / n_bins as f64;
    let mut hist = vec![0.0; n_bins];
    let mut total = 0.0;
    for (&a, &w) in angles.iter().zip(weights.iter()) {
        if let Some(i) = bin_index(a, bin_edges) {
            hist[i] += w;
            total += w;
        }
    }
    if total != 0.0 {
        for h in hist.iter_mut() {
            *h /= total * width;
        }
    }
    (hist, bin_centers(bin_edges))
}

/// Weighted angular average over fixed-width bins.
///
/// For each bin, sums the weights of the samples falling into it and divides
/// by the sample count. Empty bins are assigned the placeholder value 1/1
/// (sum 1 over count 1) rather than 0/0: downstream consumers rely on a
/// finite neutral value for angle bins with no data, at the cost of slightly
/// biasing sparse bins.
///
/// Returns the per-bin averages and the bin centers.
///
/// # Panics
///
/// Panics if `bin_edges` has fewer than two entries (no bin is defined).
pub fn angular_average(angles: &[f64], weights: &[f64], bin_edges: &[f64]) -> (Vec<f64>, Vec<f64>) {
    debug_assert_eq!(angles.len(), weights.len());
    assert!(bin_edges.len() >= 2, "bin_edges must define at least one bin");
    let n_bins = bin_edges.len() - 1;
    let mut hist = vec![0.0; n_bins];
    let mut counts = vec![0usize; n_bins];
    for (&a, &w) in angles.iter().zip(weights.iter()) {
        if let Some(i) = bin_index(a, bin_edges) {
            hist[i] += w;
            counts[i] += 1;
        }
    }
    let avg = hist
        .iter()
        .zip(counts.iter())
        .map(|(&h, &c)| if c == 0 { 1.0 } else { h / c as f64 })
        .collect();
    (avg, bin_centers(bin_edges))
}
