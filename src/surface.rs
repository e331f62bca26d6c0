// Drawing surfaces
//
// The generator never owns a window or a file. It asks a `SurfaceProvider`
// for a surface by selector, takes that surface's `DrawingContext`, and
// issues canvas-style path calls against it. `RasterSurface` is the bundled
// implementation: an `RgbaImage` that strokes antialiased lines with
// imageproc and can be saved as PNG.

use crate::error::DrawError;
use crate::geometry::{Color, Point};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_antialiased_line_segment_mut;
use imageproc::pixelops::interpolate;
use std::path::Path;

/// Canvas-style path drawing
///
/// Mirrors the small subset of a 2D canvas API the generator needs. A path is
/// opened with `begin_path`, built with `move_to`/`line_to`, and committed
/// with `stroke`. Only `stroke` touches pixels, so only `stroke` can fail.
pub trait DrawingContext {
    /// Resize the logical surface, clearing it
    fn set_size(&mut self, width: u32, height: u32);

    fn begin_path(&mut self);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// Colour used by subsequent strokes
    fn set_stroke_color(&mut self, color: Color);

    /// Draw the current path
    fn stroke(&mut self) -> Result<(), DrawError>;

    /// Copy of the pixels drawn so far, for surfaces that have any
    fn snapshot(&self) -> Option<RgbaImage> {
        None
    }
}

/// Something a selector can resolve to
pub trait SurfaceHandle {
    fn drawing_context(&mut self) -> &mut dyn DrawingContext;
}

/// Resolves selectors to surfaces
pub trait SurfaceProvider {
    fn locate_surface(&mut self, selector: &str) -> Option<&mut dyn SurfaceHandle>;
}

/// Draw one line from `from` to `to` as a single path
///
/// The stroke colour is only changed when `color` is given, otherwise the
/// context keeps whatever colour it had (black on a fresh surface).
pub fn draw_line(
    ctx: &mut dyn DrawingContext,
    from: Point,
    to: Point,
    color: Option<Color>,
) -> Result<(), DrawError> {
    ctx.begin_path();
    ctx.move_to(from.x, from.y);
    ctx.line_to(to.x, to.y);

    if let Some(color) = color {
        ctx.set_stroke_color(color);
    }

    ctx.stroke()
}

/// An in-memory raster canvas
///
/// Starts opaque white with a black stroke, like a freshly created canvas
/// element shown on a white page.
pub struct RasterSurface {
    image: RgbaImage,
    stroke_color: Rgba<u8>,

    /// Sub-paths of the path being built; each `move_to` starts a new one
    path: Vec<Vec<(f64, f64)>>,

    detached: bool,
    strokes: usize,
}

impl RasterSurface {
    const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Self::BACKGROUND),
            stroke_color: Rgba(Color::BLACK.to_rgba()),
            path: Vec::new(),
            detached: false,
            strokes: 0,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Number of successful strokes since creation
    pub fn stroke_count(&self) -> usize {
        self.strokes
    }

    /// Simulate the surface going away: every later stroke fails
    #[cfg(test)]
    pub(crate) fn detach(&mut self) {
        self.detached = true;
    }

    /// Write the current pixels as a PNG file
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }
}

impl DrawingContext for RasterSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::from_pixel(width, height, Self::BACKGROUND);
        self.path.clear();
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(vec![(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        match self.path.last_mut() {
            Some(sub_path) => sub_path.push((x, y)),
            // A line with no current point behaves like a move
            None => self.path.push(vec![(x, y)]),
        }
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = Rgba(color.to_rgba());
    }

    fn stroke(&mut self) -> Result<(), DrawError> {
        if self.detached {
            return Err(DrawError::Detached);
        }

        for sub_path in &self.path {
            for pair in sub_path.windows(2) {
                let start = (pair[0].0.round() as i32, pair[0].1.round() as i32);
                let end = (pair[1].0.round() as i32, pair[1].1.round() as i32);
                // Off-surface pixels are skipped by imageproc
                draw_antialiased_line_segment_mut(
                    &mut self.image,
                    start,
                    end,
                    self.stroke_color,
                    interpolate,
                );
            }
        }

        self.strokes += 1;
        Ok(())
    }

    fn snapshot(&self) -> Option<RgbaImage> {
        Some(self.image.clone())
    }
}

impl SurfaceHandle for RasterSurface {
    fn drawing_context(&mut self) -> &mut dyn DrawingContext {
        self
    }
}

/// Selector → surface lookup table
///
/// Selectors match exactly. The empty selector never matches anything.
pub struct SurfaceRegistry<S = RasterSurface> {
    surfaces: Vec<(String, S)>,
}

impl<S> Default for SurfaceRegistry<S> {
    fn default() -> Self {
        Self {
            surfaces: Vec::new(),
        }
    }
}

impl<S> SurfaceRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `surface` under `selector`, replacing any previous one
    pub fn insert(&mut self, selector: impl Into<String>, surface: S) {
        let selector = selector.into();
        self.surfaces.retain(|(existing, _)| *existing != selector);
        self.surfaces.push((selector, surface));
    }

    pub fn get(&self, selector: &str) -> Option<&S> {
        self.surfaces
            .iter()
            .find(|(existing, _)| existing == selector)
            .map(|(_, surface)| surface)
    }

    pub fn get_mut(&mut self, selector: &str) -> Option<&mut S> {
        self.surfaces
            .iter_mut()
            .find(|(existing, _)| existing == selector)
            .map(|(_, surface)| surface)
    }

    pub fn remove(&mut self, selector: &str) -> Option<S> {
        let index = self
            .surfaces
            .iter()
            .position(|(existing, _)| existing == selector)?;
        Some(self.surfaces.remove(index).1)
    }
}

impl<S: SurfaceHandle> SurfaceProvider for SurfaceRegistry<S> {
    fn locate_surface(&mut self, selector: &str) -> Option<&mut dyn SurfaceHandle> {
        if selector.is_empty() {
            return None;
        }
        self.get_mut(selector)
            .map(|surface| surface as &mut dyn SurfaceHandle)
    }
}
