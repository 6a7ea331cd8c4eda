//! Spatial and central moments of a polygon, up to second order.
//!
//! Moments are integrated over the polygon interior with Green's theorem, so a
//! contour's moments depend only on its vertices and not on how densely the
//! boundary is sampled.

use imageproc::point::Point;

/// Area, first and second order moments of a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
}

impl Moments {
    /// Computes the moments of the polygon through `points`.
    ///
    /// Vertex order does not matter: clockwise polygons are integrated as if
    /// counter-clockwise. Polygons that enclose no area (fewer than three
    /// points, or collinear points) have all moments equal to zero.
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        let Some(last) = points.last() else {
            return Self::default();
        };

        let (mut a00, mut a10, mut a01) = (0.0, 0.0, 0.0);
        let (mut a20, mut a11, mut a02) = (0.0, 0.0, 0.0);
        let (mut xp, mut yp) = (f64::from(last.x), f64::from(last.y));

        for p in points {
            let (x, y) = (f64::from(p.x), f64::from(p.y));
            let cross = xp * y - x * yp;
            let xs = xp + x;
            let ys = yp + y;

            a00 += cross;
            a10 += cross * xs;
            a01 += cross * ys;
            a20 += cross * (xp * xs + x * x);
            a11 += cross * (xp * (ys + yp) + x * (ys + y));
            a02 += cross * (yp * ys + y * y);

            xp = x;
            yp = y;
        }

        if a00.abs() <= f64::from(f32::EPSILON) {
            return Self::default();
        }

        let sign = a00.signum();
        let m00 = sign * a00 / 2.0;
        let m10 = sign * a10 / 6.0;
        let m01 = sign * a01 / 6.0;
        let m20 = sign * a20 / 12.0;
        let m11 = sign * a11 / 24.0;
        let m02 = sign * a02 / 12.0;

        let cx = m10 / m00;
        let cy = m01 / m00;

        Self {
            m00,
            m10,
            m01,
            m20,
            m11,
            m02,
            mu20: m20 - m10 * cx,
            mu11: m11 - m10 * cy,
            mu02: m02 - m01 * cy,
        }
    }

    /// `sqrt((mu20 + mu02)^2 - 4 mu11^2) / (mu20 + mu02)`.
    ///
    /// `None` when the second order moments vanish.
    pub fn eccentricity(&self) -> Option<f64> {
        let trace = self.mu20 + self.mu02;
        guarded_ratio((trace * trace - 4.0 * self.mu11 * self.mu11).sqrt(), trace)
    }

    /// `sqrt((mu20 - mu02)^2 + 4 mu11^2) / (mu20 + mu02)`.
    ///
    /// `None` when the second order moments vanish.
    pub fn elongation(&self) -> Option<f64> {
        let diff = self.mu20 - self.mu02;
        guarded_ratio(
            (diff * diff + 4.0 * self.mu11 * self.mu11).sqrt(),
            self.mu20 + self.mu02,
        )
    }
}

fn guarded_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let ratio = numerator / denominator;
    ratio.is_finite().then_some(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(w: i32, h: i32) -> Vec<Point<i32>> {
        vec![
            Point::new(0, 0),
            Point::new(w, 0),
            Point::new(w, h),
            Point::new(0, h),
        ]
    }

    #[test]
    fn rectangle_moments() {
        let m = Moments::of_polygon(&rect(4, 2));
        assert_relative_eq!(m.m00, 8.0);
        assert_relative_eq!(m.m10, 16.0);
        assert_relative_eq!(m.m01, 8.0);
        // mu20 = w^3 h / 12, mu02 = w h^3 / 12
        assert_relative_eq!(m.mu20, 64.0 * 2.0 / 12.0, epsilon = 1e-9);
        assert_relative_eq!(m.mu02, 4.0 * 8.0 / 12.0, epsilon = 1e-9);
        assert_relative_eq!(m.mu11, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn orientation_does_not_change_moments() {
        let ccw = rect(6, 3);
        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(Moments::of_polygon(&ccw), Moments::of_polygon(&cw));
    }

    #[test]
    fn square_is_not_elongated() {
        let m = Moments::of_polygon(&rect(10, 10));
        assert_relative_eq!(m.elongation().unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(m.eccentricity().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn thin_rectangle_is_elongated() {
        let m = Moments::of_polygon(&rect(100, 2));
        let elongation = m.elongation().unwrap();
        assert!(elongation > 0.99 && elongation <= 1.0, "{elongation}");
    }

    #[test]
    fn sheared_shape_has_cross_moment() {
        let parallelogram = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(20, 10),
            Point::new(10, 10),
        ];
        let m = Moments::of_polygon(&parallelogram);
        assert!(m.mu11 > 0.0);
        let ecc = m.eccentricity().unwrap();
        assert!(ecc > 0.0 && ecc < 1.0, "{ecc}");
    }

    #[test]
    fn degenerate_polygons_have_undefined_ratios() {
        for points in [
            Vec::new(),
            vec![Point::new(3, 3)],
            vec![Point::new(0, 0), Point::new(5, 5)],
            vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)],
        ] {
            let m = Moments::of_polygon(&points);
            assert_eq!(m, Moments::default());
            assert_eq!(m.eccentricity(), None);
            assert_eq!(m.elongation(), None);
        }
    }
}
