use imageproc::{
    contours::{BorderType, Contour},
    geometry::{approximate_polygon_dp, convex_hull},
    point::Point,
};
use num::{Num, NumCast};
use num_traits::AsPrimitive;

/// Keeps only the outermost borders: outer borders that have no parent.
///
/// `imageproc::contours::find_contours` reports every border in the image,
/// including the borders of holes and of objects nested inside holes. After
/// this call only the borders of top-level foreground regions remain, in their
/// original order.
pub fn retain_external(contours: &mut Vec<Contour<i32>>) {
    contours.retain(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none());
}

/// Removes every point that lies on a straight run between its neighbours.
///
/// Border tracing yields one point per boundary pixel. Only the vertices at
/// which the step direction changes are needed to describe the polygon, so a
/// point is dropped when the step into it equals the step out of it. The
/// perimeter and area of the polygon are unchanged.
///
/// Contours with fewer than three points are returned as is.
pub fn compress_chain(points: Vec<Point<i32>>) -> Vec<Point<i32>> {
    let n = points.len();
    if n < 3 {
        return points;
    }

    let compressed: Vec<Point<i32>> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let cur = points[i];
            let next = points[(i + 1) % n];
            (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
        })
        .map(|i| points[i])
        .collect();

    if compressed.is_empty() {
        points
    } else {
        compressed
    }
}

/// Length of the closed polygon through `points`.
///
/// The sum of Euclidean distances between consecutive points, closing the loop
/// from the last point back to the first. Contours with 0 or 1 point have a
/// perimeter of `0.0`; two points count the segment twice.
pub fn closed_perimeter<T>(points: &[Point<T>]) -> f64
where
    T: Num + NumCast + Copy + PartialEq + Eq + AsPrimitive<f64>,
{
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p1, p2)| {
            let dx: f64 = p2.x.as_() - p1.x.as_();
            let dy: f64 = p2.y.as_() - p1.y.as_();
            dx.hypot(dy)
        })
        .sum()
}

/// Unsigned area of the polygon through `points` (shoelace formula).
pub fn polygon_area<T>(points: &[Point<T>]) -> f64
where
    T: Num + NumCast + Copy + PartialEq + Eq + AsPrimitive<f64>,
{
    let twice_signed: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p1, p2)| {
            let (x1, y1): (f64, f64) = (p1.x.as_(), p1.y.as_());
            let (x2, y2): (f64, f64) = (p2.x.as_(), p2.y.as_());
            x1 * y2 - x2 * y1
        })
        .sum();

    (twice_signed * 0.5).abs()
}

/// Area of the convex hull of `points`, in raw pixel units.
pub fn convex_hull_area(points: &[Point<i32>]) -> f64 {
    let hull = convex_hull(points);
    polygon_area(&hull)
}

/// Douglas-Peucker simplification of the closed contour with tolerance `epsilon`.
///
/// The result never repeats its first point at the end. Inputs with fewer than
/// three points, or a non-positive `epsilon`, are returned unchanged.
pub fn approximate_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 || epsilon.is_nan() || epsilon <= 0.0 {
        return points.to_vec();
    }

    let mut approx = approximate_polygon_dp(points, epsilon, true);
    while approx.len() > 1 && approx.first() == approx.last() {
        approx.pop();
    }
    approx
}
