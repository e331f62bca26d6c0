// One generation from options to finished drawing
//
// A `Session` owns everything a single invocation needs: the resolved
// configuration and its random source. Nothing is global, so independent
// sessions can run side by side without seeing each other.
//
// Order of work:
// 1. resolve and validate options, plan the grid (no side effects yet)
// 2. find the surface; a missing surface stops here
// 3. size the surface, build the grid, extract and fill triangles
// 4. start one timer task per triangle and run the loop dry

use crate::config::{Config, Options};
use crate::error::{Result, WeaveError};
use crate::grid::{Grid, GridLayout};
use crate::random::RandomSource;
use crate::scheduler::{schedule, EventLoop, Pacing, RunReport, SegmentTask, Tick};
use crate::surface::{DrawingContext, SurfaceProvider};
use crate::triangles::{extract, Triangle};
use rayon::prelude::*;

/// Sizes of what a session generated
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationStats {
    pub layout: GridLayout,
    pub triangles: usize,
    pub segments: usize,
}

/// Everything known after a completed run
#[derive(Clone, Debug, PartialEq)]
pub struct Generation {
    pub stats: GenerationStats,
    pub report: RunReport,
}

/// Per-invocation context replacing module-level state
pub struct Session {
    config: Config,
    layout: GridLayout,
    rng: RandomSource,
    stats: Option<GenerationStats>,
}

impl Session {
    /// Resolve `options` and plan the grid
    ///
    /// # Errors
    /// `WeaveError::Configuration` for any invalid value or a surface too
    /// small for the divider point weight.
    pub fn new(options: &Options) -> Result<Self> {
        let config = Config::resolve(options)?;
        let layout = GridLayout::plan(
            config.width,
            config.height,
            config.divider_point_weight,
            config.corner_range,
        )?;
        let rng = RandomSource::from_seed_option(config.seed);

        Ok(Self {
            config,
            layout,
            rng,
            stats: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Stats of the last generation, `None` before any grid was built
    pub fn stats(&self) -> Option<&GenerationStats> {
        self.stats.as_ref()
    }

    // Build the grid and turn every triangle into a ready-to-run task.
    // Subdivision is pure, so triangles are filled in parallel; everything
    // that consumes randomness runs in a fixed order on this thread.
    fn build_tasks(&mut self) -> Result<(Vec<SegmentTask>, GenerationStats)> {
        let grid = Grid::build(&self.layout, &mut self.rng);
        let corners = extract(&grid, self.config.shuffle_corners, &mut self.rng);
        let mut triangles: Vec<Triangle> = corners
            .into_iter()
            .map(Triangle::new)
            .collect();

        let fill_density = self.config.fill_density;
        let side_ratio = self.config.side_ratio;
        triangles
            .par_iter_mut()
            .try_for_each(|triangle| triangle.fill(fill_density, side_ratio))?;

        let tasks: Vec<SegmentTask> = triangles
            .into_iter()
            .map(|triangle| {
                // One colour per triangle, sampled whether or not it is used
                let color = self.rng.color();
                SegmentTask::new(schedule(&triangle, color), self.config.use_color)
            })
            .collect();

        let stats = GenerationStats {
            layout: self.layout,
            triangles: tasks.len(),
            segments: tasks.iter().map(SegmentTask::remaining).sum(),
        };
        log::info!(
            "{}x{} grid: {} triangles, {} segments",
            stats.layout.div_count_x,
            stats.layout.div_count_y,
            stats.triangles,
            stats.segments
        );
        self.stats = Some(stats.clone());

        Ok((tasks, stats))
    }

    /// Draw on the surface `provider` resolves for the configured selector
    ///
    /// # Errors
    /// `WeaveError::SurfaceNotFound` before anything is built or drawn.
    /// Draw failures during the animation are not errors here: they end
    /// the affected triangle only and are listed in the report.
    pub fn run<P, F>(
        &mut self,
        provider: &mut P,
        pacing: Pacing,
        observer: F,
    ) -> Result<Generation>
    where
        P: SurfaceProvider + ?Sized,
        F: FnMut(&Tick, &dyn DrawingContext),
    {
        let selector = self.config.selector.clone();
        let Some(surface) = provider.locate_surface(&selector) else {
            log::error!("missing canvas element: {:?}", selector);
            return Err(WeaveError::SurfaceNotFound { selector });
        };

        let ctx = surface.drawing_context();
        ctx.set_size(self.config.width, self.config.height);

        let (tasks, stats) = self.build_tasks()?;
        let report = animate(tasks, self.config.fill_speed, ctx, pacing, observer);

        if !report.failures.is_empty() {
            log::warn!("{} triangle(s) stopped early", report.failures.len());
        }

        Ok(Generation { stats, report })
    }
}

/// Start every task in the same pass and run the loop until all are done
pub fn animate<F>(
    tasks: Vec<SegmentTask>,
    interval_ms: u64,
    ctx: &mut dyn DrawingContext,
    pacing: Pacing,
    observer: F,
) -> RunReport
where
    F: FnMut(&Tick, &dyn DrawingContext),
{
    let mut event_loop = EventLoop::new();
    for task in tasks {
        event_loop.set_interval(task, interval_ms);
    }
    event_loop.run(ctx, pacing, observer)
}

/// Generate and draw one art piece
///
/// Lays `options` over the defaults, resolves the selector through
/// `provider`, and runs the whole animation with a virtual clock.
///
/// Only the grid dimensions are computed before the surface lookup, so that
/// impossible layouts are reported first; that step samples nothing and
/// draws nothing. No grid points exist until the surface has been found.
pub fn init_canvas<P>(provider: &mut P, options: &Options) -> Result<Generation>
where
    P: SurfaceProvider + ?Sized,
{
    let mut session = Session::new(options)?;
    session.run(provider, Pacing::Virtual, |_, _| {})
}
