// The jittered grid of divider points
//
// The surface is cut into divCountX × divCountY cells. Every cell corner is
// nudged by a random amount, except along the frame: points on the outer
// columns and rows keep exact coordinates on the constrained axis so the
// finished art always covers the whole surface.

use crate::config::CORNER_RANGE_WEIGHT;
use crate::error::ConfigError;
use crate::geometry::Point;
use crate::random::RandomSource;

/// Grid dimensions derived from the surface size, before any sampling
///
/// Planning is separate from building so a bad configuration is reported
/// before anything random or visible happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub width: u32,
    pub height: u32,

    /// Number of cells along each axis (always at least 1)
    pub div_count_x: u32,
    pub div_count_y: u32,

    /// Nominal distance between neighbouring divider points
    pub step_x: u32,
    pub step_y: u32,

    /// Full width of the jitter window applied to each coordinate
    pub jitter_radius: u32,
}

impl GridLayout {
    /// Compute cell counts, steps and jitter radius
    ///
    /// # Arguments
    /// * `width`, `height` - Surface size in pixels
    /// * `weight` - Target spacing between divider points
    /// * `corner_range` - Jitter radius, or 0 to derive it from the steps
    ///
    /// # Errors
    /// `ConfigError::NoDividerPoints` when either axis would get zero cells.
    pub fn plan(
        width: u32,
        height: u32,
        weight: u32,
        corner_range: u32,
    ) -> Result<Self, ConfigError> {
        let div_count_x = divider_count("x", width, weight)?;
        let div_count_y = divider_count("y", height, weight)?;

        let step_x = width / div_count_x;
        let step_y = height / div_count_y;

        let jitter_radius = if corner_range == 0 {
            (step_x.min(step_y) as f64 * CORNER_RANGE_WEIGHT).floor() as u32
        } else {
            corner_range
        };

        Ok(Self {
            width,
            height,
            div_count_x,
            div_count_y,
            step_x,
            step_y,
            jitter_radius,
        })
    }

    /// Number of quads the grid will contain
    pub fn cell_count(&self) -> usize {
        self.div_count_x as usize * self.div_count_y as usize
    }
}

// Half the number of whole weights that fit on the axis
fn divider_count(axis: &'static str, extent: u32, weight: u32) -> Result<u32, ConfigError> {
    let count = if weight == 0 { 0 } else { extent / weight / 2 };
    if count == 0 {
        return Err(ConfigError::NoDividerPoints {
            axis,
            extent,
            weight,
        });
    }
    Ok(count)
}

/// Divider points indexed `[column][row]`
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    columns: Vec<Vec<Point>>,
}

impl Grid {
    /// Sample a jittered grid for `layout`
    ///
    /// Each coordinate is a uniform integer inside
    /// `[nominal - r/2, nominal + r/2]`, clipped to the surface. Frame points
    /// are then overwritten with their exact border values.
    pub fn build(layout: &GridLayout, rng: &mut RandomSource) -> Self {
        let last_i = layout.div_count_x;
        let last_j = layout.div_count_y;
        let half = layout.jitter_radius as f64 / 2.0;

        let columns = (0..=last_i)
            .map(|i| {
                (0..=last_j)
                    .map(|j| {
                        let nominal_x = (i * layout.step_x) as f64;
                        let nominal_y = (j * layout.step_y) as f64;

                        let mut x = jitter(nominal_x, half, layout.width, rng);
                        let mut y = jitter(nominal_y, half, layout.height, rng);

                        // Frame points keep exact values on the constrained axis
                        if i == 0 {
                            x = 0.0;
                        }
                        if j == 0 {
                            y = 0.0;
                        }
                        if i == last_i {
                            x = layout.width as f64;
                        }
                        if j == last_j {
                            y = layout.height as f64;
                        }

                        Point::new(x, y)
                    })
                    .collect()
            })
            .collect();

        Self { columns }
    }

    /// Number of point columns (divCountX + 1)
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of point rows (divCountY + 1)
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn get(&self, column: usize, row: usize) -> Point {
        self.columns[column][row]
    }

    /// Every point, column by column
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.columns.iter().flatten()
    }
}

fn jitter(nominal: f64, half: f64, limit: u32, rng: &mut RandomSource) -> f64 {
    // Round inward so integer samples never leave the window
    let min = (nominal - half).max(0.0).ceil() as i64;
    let max = (nominal + half).min(limit as f64).floor() as i64;
    rng.int_in(min, max) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_default_surface() {
        let layout = GridLayout::plan(1000, 600, 100, 0).unwrap();

        assert_eq!(layout.div_count_x, 5);
        assert_eq!(layout.div_count_y, 3);
        assert_eq!(layout.step_x, 200);
        assert_eq!(layout.step_y, 200);
        // floor(0.6 * 200)
        assert_eq!(layout.jitter_radius, 120);
        assert_eq!(layout.cell_count(), 15);
    }

    #[test]
    fn test_plan_keeps_explicit_corner_range() {
        let layout = GridLayout::plan(1000, 600, 100, 17).unwrap();
        assert_eq!(layout.jitter_radius, 17);
    }

    #[test]
    fn test_plan_single_cell() {
        let layout = GridLayout::plan(100, 100, 50, 0).unwrap();
        assert_eq!(layout.div_count_x, 1);
        assert_eq!(layout.div_count_y, 1);
        assert_eq!(layout.step_x, 100);
        assert_eq!(layout.jitter_radius, 60);
    }

    #[test]
    fn test_plan_rejects_degenerate_axis() {
        // floor(floor(100 / 100) / 2) == 0
        assert_eq!(
            GridLayout::plan(1000, 100, 100, 0),
            Err(ConfigError::NoDividerPoints {
                axis: "y",
                extent: 100,
                weight: 100
            })
        );
        assert!(GridLayout::plan(100, 1000, 100, 0).is_err());
        assert!(GridLayout::plan(1000, 1000, 0, 0).is_err());
    }

    #[test]
    fn test_grid_shape() {
        let layout = GridLayout::plan(1000, 600, 100, 0).unwrap();
        let grid = Grid::build(&layout, &mut RandomSource::seeded(1));

        assert_eq!(grid.column_count(), 6);
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.points().count(), 24);
    }

    #[test]
    fn test_border_points_are_exact() {
        // Large jitter radii would push points past the frame if the
        // overrides were missing
        for corner_range in [0, 1, 50, 400, 5000] {
            let layout = GridLayout::plan(1000, 600, 100, corner_range).unwrap();
            let grid = Grid::build(&layout, &mut RandomSource::seeded(corner_range as u64));
            let last_i = grid.column_count() - 1;
            let last_j = grid.row_count() - 1;

            for j in 0..=last_j {
                assert_eq!(grid.get(0, j).x, 0.0);
                assert_eq!(grid.get(last_i, j).x, 1000.0);
            }
            for i in 0..=last_i {
                assert_eq!(grid.get(i, 0).y, 0.0);
                assert_eq!(grid.get(i, last_j).y, 600.0);
            }
        }
    }

    #[test]
    fn test_interior_points_stay_in_jitter_window() {
        let layout = GridLayout::plan(1000, 600, 100, 0).unwrap();
        let half = layout.jitter_radius as f64 / 2.0;

        for seed in 0..20 {
            let grid = Grid::build(&layout, &mut RandomSource::seeded(seed));

            for i in 0..grid.column_count() {
                for j in 0..grid.row_count() {
                    let point = grid.get(i, j);
                    let nominal_x = (i as u32 * layout.step_x) as f64;
                    let nominal_y = (j as u32 * layout.step_y) as f64;

                    if i != 0 && i != grid.column_count() - 1 {
                        assert!(point.x >= (nominal_x - half).max(0.0));
                        assert!(point.x <= (nominal_x + half).min(1000.0));
                    }
                    if j != 0 && j != grid.row_count() - 1 {
                        assert!(point.y >= (nominal_y - half).max(0.0));
                        assert!(point.y <= (nominal_y + half).min(600.0));
                    }

                    // Grid corners are always whole pixels
                    assert_eq!(point.x.fract(), 0.0);
                    assert_eq!(point.y.fract(), 0.0);
                }
            }
        }
    }

    #[test]
    fn test_zero_radius_is_regular() {
        let layout = GridLayout::plan(1000, 600, 100, 0).unwrap();
        let layout = GridLayout {
            jitter_radius: 0,
            ..layout
        };
        let grid = Grid::build(&layout, &mut RandomSource::seeded(9));

        assert_eq!(grid.get(2, 1), Point::new(400.0, 200.0));
        assert_eq!(grid.get(4, 2), Point::new(800.0, 400.0));
    }
}
