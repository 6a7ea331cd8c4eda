use image::math::Rect;
use imageproc::point::Point;
use num_traits::{Num, ToPrimitive};

/// Calculates the axis-aligned bounding box of a contour, clipped to an image.
///
/// The box is inclusive of every point: a contour spanning columns 10..=20
/// yields `x = 10, width = 11`. Coordinates outside `0..width` / `0..height`
/// are clipped, with negative values clamped to zero.
///
/// This version is generic over numeric types that implement `PartialOrd`, making it
/// suitable for both integer and floating-point coordinates.
///
/// # Returns
///
/// `None` when `points` is empty or the box lies entirely outside the image.
///
/// # Examples
///
/// ```
/// use imageproc::point::Point;
/// use cell_morphometry::rect::bounding_rect;
///
/// let points = [Point::new(10, 5), Point::new(20, 5), Point::new(15, 30)];
/// let rect = bounding_rect(&points, 100, 100).unwrap();
///
/// assert_eq!((rect.x, rect.y, rect.width, rect.height), (10, 5, 11, 26));
/// ```
pub fn bounding_rect<T>(points: &[Point<T>], width: u32, height: u32) -> Option<Rect>
where
    T: Copy + PartialOrd + Num + ToPrimitive,
{
    let (first, rest) = points.split_first()?;
    let mut min_x = first.x;
    let mut max_x = first.x;
    let mut min_y = first.y;
    let mut max_y = first.y;

    // `T` only has `PartialOrd`, so no `min`/`max`.
    for p in rest {
        if p.x < min_x {
            min_x = p.x;
        }
        if p.x > max_x {
            max_x = p.x;
        }
        if p.y < min_y {
            min_y = p.y;
        }
        if p.y > max_y {
            max_y = p.y;
        }
    }

    let max_x = max_x.to_i64()?;
    let max_y = max_y.to_i64()?;
    if max_x < 0 || max_y < 0 || width == 0 || height == 0 {
        return None;
    }

    let x = min_x.to_u32().unwrap_or(0);
    let y = min_y.to_u32().unwrap_or(0);
    if x >= width || y >= height {
        return None;
    }

    let right = (max_x as u64).min(u64::from(width) - 1) as u32;
    let bottom = (max_y as u64).min(u64::from(height) - 1) as u32;

    Some(Rect {
        x,
        y,
        width: right - x + 1,
        height: bottom - y + 1,
    })
}
