/// A CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Curve used for every snap animation (an ease-out with a soft landing).
pub const SETTLE_EASING: CubicBezier = CubicBezier {
    x1: 0.25,
    y1: 0.46,
    x2: 0.45,
    y2: 0.94,
};

impl CubicBezier {
    fn coord(t: f64, p1: f64, p2: f64) -> f64 {
        // Bernstein form with P0 = 0 and P3 = 1
        let u = 1.0 - t;
        3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
    }

    fn coord_slope(t: f64, p1: f64, p2: f64) -> f64 {
        let u = 1.0 - t;
        3.0 * u * u * p1 + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
    }

    /// Eased progress for linear time progress `x` in `[0, 1]`.
    pub fn sample(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        // Solve x(t) = x with Newton's method, falling back to bisection
        let mut t = x;
        for _ in 0..8 {
            let err = Self::coord(t, self.x1, self.x2) - x;
            if err.abs() < 1e-6 {
                return Self::coord(t, self.y1, self.y2);
            }
            let slope = Self::coord_slope(t, self.x1, self.x2);
            if slope.abs() < 1e-6 {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..32 {
            let value = Self::coord(t, self.x1, self.x2);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        Self::coord(t, self.y1, self.y2)
    }
}
