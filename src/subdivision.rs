// Interior subdivision points
//
// Starting from the three corners, each new point is placed 1/ratio of the
// way from point k-3 towards point k-2. The chain of segments this produces
// winds inward, shrinking geometrically towards a point inside the triangle.

use crate::error::ConfigError;
use crate::geometry::Point;

/// The point `1/ratio` of the way from `a` to `b`
///
/// Equivalent to dividing the segment in the ratio 1 : (ratio - 1).
pub fn interpolate(a: Point, b: Point, ratio: u32) -> Point {
    let m = 1.0;
    let n = ratio as f64 - m;

    Point::new((n * a.x + m * b.x) / (m + n), (n * a.y + m * b.y) / (m + n))
}

/// Extend three corners to a sequence of `target_count` points
///
/// The corners are kept unchanged at the front. The function is pure, so
/// identical inputs always give identical sequences.
///
/// # Errors
/// `ConfigError::TooSmall` when `target_count < 3` or `ratio < 2`.
pub fn subdivide(
    corners: [Point; 3],
    target_count: usize,
    ratio: u32,
) -> Result<Vec<Point>, ConfigError> {
    if target_count < 3 {
        return Err(ConfigError::TooSmall {
            name: "fillDensity",
            min: 3,
            value: target_count as u64,
        });
    }
    if ratio < 2 {
        return Err(ConfigError::TooSmall {
            name: "sideRatio",
            min: 2,
            value: ratio as u64,
        });
    }

    let mut points = Vec::with_capacity(target_count);
    points.extend_from_slice(&corners);

    while points.len() < target_count {
        let k = points.len();
        let next = interpolate(points[k - 3], points[k - 2], ratio);
        points.push(next);
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORNERS: [Point; 3] = [
        Point::new(0.0, 0.0),
        Point::new(200.0, 0.0),
        Point::new(100.0, 173.2),
    ];

    // Barycentric containment check with a small tolerance
    fn inside(point: Point, [a, b, c]: [Point; 3]) -> bool {
        let det = (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y);
        let l1 = ((b.y - c.y) * (point.x - c.x) + (c.x - b.x) * (point.y - c.y)) / det;
        let l2 = ((c.y - a.y) * (point.x - c.x) + (a.x - c.x) * (point.y - c.y)) / det;
        let l3 = 1.0 - l1 - l2;
        let eps = 1e-9;
        l1 >= -eps && l2 >= -eps && l3 >= -eps
    }

    #[test]
    fn test_interpolate() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 50.0);

        assert_eq!(interpolate(a, b, 10), Point::new(10.0, 5.0));
        assert_eq!(interpolate(a, b, 2), Point::new(50.0, 25.0));
        assert_eq!(interpolate(b, a, 4), Point::new(75.0, 37.5));
    }

    #[test]
    fn test_corners_only() {
        let points = subdivide(CORNERS, 3, 10).unwrap();
        assert_eq!(points, CORNERS.to_vec());
    }

    #[test]
    fn test_recurrence() {
        let points = subdivide(CORNERS, 6, 10).unwrap();

        assert_eq!(points.len(), 6);
        assert_eq!(&points[..3], &CORNERS);
        assert_eq!(points[3], interpolate(points[0], points[1], 10));
        assert_eq!(points[4], interpolate(points[1], points[2], 10));
        assert_eq!(points[5], interpolate(points[2], points[3], 10));
        // First interior point sits a tenth of the way along the first side
        assert_eq!(points[3], Point::new(20.0, 0.0));
    }

    #[test]
    fn test_deterministic() {
        let first = subdivide(CORNERS, 90, 10).unwrap();
        let second = subdivide(CORNERS, 90, 10).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_points_stay_inside_and_converge() {
        for ratio in [2, 3, 10] {
            let points = subdivide(CORNERS, 90, ratio).unwrap();

            for point in &points {
                assert!(inside(*point, CORNERS), "ratio {ratio}: {point:?} escaped");
            }

            // Each new point lies on the segment between its generators
            for k in 3..points.len() {
                let (a, b) = (points[k - 3], points[k - 2]);
                let along = a.distance(&points[k]) + points[k].distance(&b);
                assert!((along - a.distance(&b)).abs() < 1e-9);
            }

            let first_side = points[0].distance(&points[1]);
            let last_link = points[88].distance(&points[89]);
            assert!(last_link < first_side / 10.0, "ratio {ratio}: {last_link}");
        }
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(matches!(
            subdivide(CORNERS, 2, 10),
            Err(ConfigError::TooSmall { name: "fillDensity", .. })
        ));
        assert!(matches!(
            subdivide(CORNERS, 10, 1),
            Err(ConfigError::TooSmall { name: "sideRatio", .. })
        ));
    }
}
