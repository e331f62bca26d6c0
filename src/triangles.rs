// Cutting the grid into triangles
//
// Each quad (i,j)-(i+1,j)-(i+1,j+1)-(i,j+1) is split along its
// (i,j)-(i+1,j+1) diagonal. Triangles do not share storage: a corner used by
// six neighbours is copied six times.

use crate::error::ConfigError;
use crate::geometry::Point;
use crate::grid::Grid;
use crate::random::RandomSource;
use crate::subdivision::subdivide;

/// Corner triple of one triangle, in drawing order
pub type Corners = [Point; 3];

/// Emit two corner triples per grid cell
///
/// Columns are walked outermost, rows innermost. For every cell triangle A
/// `{(i,j), (i+1,j), (i+1,j+1)}` comes before triangle B
/// `{(i,j), (i+1,j+1), (i,j+1)}`.
///
/// With `shuffle_corners` the order inside each triple is randomly permuted.
/// That changes where subdivision starts, never which cells are covered.
pub fn extract(grid: &Grid, shuffle_corners: bool, rng: &mut RandomSource) -> Vec<Corners> {
    let columns = grid.column_count();
    let rows = grid.row_count();
    let mut triangles = Vec::with_capacity(2 * columns.saturating_sub(1) * rows.saturating_sub(1));

    for i in 0..columns.saturating_sub(1) {
        for j in 0..rows.saturating_sub(1) {
            triangles.push([grid.get(i, j), grid.get(i + 1, j), grid.get(i + 1, j + 1)]);
            triangles.push([grid.get(i, j), grid.get(i + 1, j + 1), grid.get(i, j + 1)]);
        }
    }

    if shuffle_corners {
        for corners in &mut triangles {
            rng.shuffle(corners);
        }
    }

    triangles
}

/// A triangle together with its interior subdivision points
///
/// `points[0..3]` are the corners taken from the grid; everything after is
/// filled in by [`Triangle::fill`]. A triangle belongs to exactly one
/// animation task.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    points: Vec<Point>,
}

impl Triangle {
    pub fn new(corners: Corners) -> Self {
        Self {
            points: corners.to_vec(),
        }
    }

    /// Replace the point list with `target_count` subdivision points
    ///
    /// On error the triangle keeps its current points.
    pub fn fill(&mut self, target_count: usize, side_ratio: u32) -> Result<(), ConfigError> {
        self.points = subdivide(self.corners(), target_count, side_ratio)?;
        Ok(())
    }

    pub fn corners(&self) -> Corners {
        [self.points[0], self.points[1], self.points[2]]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a triangle has at least its three corners
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridLayout;

    fn regular_grid(width: u32, height: u32, weight: u32) -> Grid {
        let layout = GridLayout::plan(width, height, weight, 0).unwrap();
        let layout = GridLayout {
            jitter_radius: 0,
            ..layout
        };
        Grid::build(&layout, &mut RandomSource::seeded(0))
    }

    fn occurrences(triangles: &[Corners], point: Point) -> usize {
        triangles
            .iter()
            .flat_map(|corners| corners.iter())
            .filter(|&&corner| corner == point)
            .count()
    }

    #[test]
    fn test_two_triangles_per_cell() {
        let grid = regular_grid(1000, 600, 100);
        let triangles = extract(&grid, false, &mut RandomSource::seeded(0));

        // 5 x 3 cells
        assert_eq!(triangles.len(), 2 * 5 * 3);
    }

    #[test]
    fn test_first_cell_order() {
        let grid = regular_grid(1000, 600, 100);
        let triangles = extract(&grid, false, &mut RandomSource::seeded(0));

        let (p00, p10, p11, p01) = (
            grid.get(0, 0),
            grid.get(1, 0),
            grid.get(1, 1),
            grid.get(0, 1),
        );
        assert_eq!(triangles[0], [p00, p10, p11]);
        assert_eq!(triangles[1], [p00, p11, p01]);
        // Rows are walked before columns
        assert_eq!(triangles[2][0], grid.get(0, 1));
    }

    #[test]
    fn test_corner_sharing() {
        let grid = regular_grid(1000, 600, 100);
        let triangles = extract(&grid, false, &mut RandomSource::seeded(0));
        let last_i = grid.column_count() - 1;
        let last_j = grid.row_count() - 1;

        for i in 0..=last_i {
            for j in 0..=last_j {
                let count = occurrences(&triangles, grid.get(i, j));
                let on_frame = i == 0 || j == 0 || i == last_i || j == last_j;

                if on_frame {
                    assert!((1..6).contains(&count), "frame point ({i},{j}) used {count} times");
                } else {
                    assert_eq!(count, 6, "interior point ({i},{j})");
                }
            }
        }

        // The diagonal corners sit on both halves of their cell
        assert_eq!(occurrences(&triangles, grid.get(0, 0)), 2);
        assert_eq!(occurrences(&triangles, grid.get(last_i, last_j)), 2);
        assert_eq!(occurrences(&triangles, grid.get(last_i, 0)), 1);
        assert_eq!(occurrences(&triangles, grid.get(0, last_j)), 1);

        // Every corner is a grid point
        for corner in triangles.iter().flatten() {
            assert!(grid.points().any(|point| point == corner));
        }
    }

    #[test]
    fn test_shuffle_keeps_corner_sets() {
        let grid = regular_grid(1000, 600, 100);
        let plain = extract(&grid, false, &mut RandomSource::seeded(5));
        let shuffled = extract(&grid, true, &mut RandomSource::seeded(5));

        assert_eq!(plain.len(), shuffled.len());
        for (a, b) in plain.iter().zip(&shuffled) {
            for corner in a {
                assert!(b.contains(corner));
            }
        }
    }

    #[test]
    fn test_triangle_fill() {
        let mut triangle = Triangle::new([
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(0.0, 100.0),
        ]);
        assert_eq!(triangle.len(), 3);

        triangle.fill(10, 4).unwrap();
        assert_eq!(triangle.len(), 10);
        assert_eq!(triangle.corners()[1], Point::new(100.0, 0.0));
        assert!(!triangle.is_empty());
    }
}
