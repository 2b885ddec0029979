use glam::Vec3;

/// Three-tap low-pass filter over consecutive control points.
///
/// Interior point `i` becomes
/// `(n * p[i-1] + c * p[i] + n * p[i+1]) / (2n + c)`.
/// The default is an unweighted box filter; raising `center_weight` smooths
/// less aggressively.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SmoothingFilter {
    pub neighbor_weight: f32,
    pub center_weight: f32,
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::BOX
    }
}

impl SmoothingFilter {
    /// Equal weights for the point and both neighbors.
    pub const BOX: Self = Self { neighbor_weight: 1.0, center_weight: 1.0 };

    /// Binomial `1 2 1` kernel.
    pub const BINOMIAL: Self = Self { neighbor_weight: 1.0, center_weight: 2.0 };

    /// Filters one interior point.
    ///
    /// A non-positive total weight leaves the point untouched.
    #[inline]
    pub fn apply(&self, prev: Vec3, curr: Vec3, next: Vec3) -> Vec3 {
        let total = 2.0 * self.neighbor_weight + self.center_weight;
        if total <= f32::EPSILON || !total.is_finite() {
            return curr;
        }
        ((prev + next) * self.neighbor_weight + curr * self.center_weight) / total
    }
}

/// Smooths a polyline, keeping its length and both end points.
///
/// Fewer than three points are returned unchanged.
pub fn smooth(points: &[Vec3], filter: SmoothingFilter) -> Vec<Vec3> {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    out.push(first);
    out.extend(points.windows(3).map(|w| filter.apply(w[0], w[1], w[2])));
    out.push(last);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<Vec3> {
        (0..n)
            .map(|i| Vec3::new(i as f32, if i % 2 == 0 { 0.0 } else { 1.0 }, 0.0))
            .collect()
    }

    // ── short input ───────────────────────────────────────────────────────

    #[test]
    fn empty_and_short_inputs_are_unchanged() {
        assert!(smooth(&[], SmoothingFilter::BOX).is_empty());

        let one = [Vec3::ONE];
        assert_eq!(smooth(&one, SmoothingFilter::BOX), one.to_vec());

        let two = [Vec3::ZERO, Vec3::X];
        assert_eq!(smooth(&two, SmoothingFilter::BOX), two.to_vec());
    }

    // ── invariants ────────────────────────────────────────────────────────

    #[test]
    fn preserves_length_and_endpoints() {
        for n in 3..12 {
            let pts = zigzag(n);
            let out = smooth(&pts, SmoothingFilter::BOX);
            assert_eq!(out.len(), n);
            assert_eq!(out[0], pts[0]);
            assert_eq!(out[n - 1], pts[n - 1]);
        }
    }

    #[test]
    fn box_filter_averages_three_points() {
        let pts = [Vec3::ZERO, Vec3::new(1.0, 3.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let out = smooth(&pts, SmoothingFilter::BOX);
        assert!(out[1].abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn straight_evenly_spaced_line_is_fixed_point() {
        let pts: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let out = smooth(&pts, SmoothingFilter::BINOMIAL);
        for (a, b) in pts.iter().zip(&out) {
            assert!(a.abs_diff_eq(*b, 1e-6));
        }
    }

    #[test]
    fn reduces_zigzag_amplitude() {
        let pts = zigzag(9);
        let out = smooth(&pts, SmoothingFilter::BOX);
        let amplitude = |v: &[Vec3]| {
            v[1..v.len() - 1]
                .windows(2)
                .map(|w| (w[1].y - w[0].y).abs())
                .fold(0.0f32, f32::max)
        };
        assert!(amplitude(&out) < amplitude(&pts));
    }

    #[test]
    fn heavier_center_moves_points_less() {
        let pts = zigzag(5);
        let light = smooth(&pts, SmoothingFilter::BOX);
        let heavy = smooth(&pts, SmoothingFilter::BINOMIAL);
        assert!((heavy[2] - pts[2]).length() < (light[2] - pts[2]).length());
    }

    #[test]
    fn zero_weights_leave_points_untouched() {
        let pts = zigzag(4);
        let filter = SmoothingFilter { neighbor_weight: 0.0, center_weight: 0.0 };
        assert_eq!(smooth(&pts, filter), pts);
    }
}
