// Library root for triangle-weave
//
// The pipeline runs leaf to root through these modules:
//   grid -> triangles -> subdivision -> scheduler -> surface
// with `session` tying them together behind `init_canvas`.

pub mod config;
pub mod error;
pub mod geometry;
pub mod random;

// Generation stages
pub mod grid;
pub mod subdivision;
pub mod triangles;

// Animation and output
pub mod scheduler;
pub mod session;
pub mod surface;

// Re-export the types most callers need at the crate root, so they can write
//   use triangle_weave::{init_canvas, Options};
pub use config::{Config, Options};
pub use error::{ConfigError, DrawError, WeaveError};
pub use geometry::{Color, Point};
pub use scheduler::{Pacing, RunReport, Segment};
pub use session::{init_canvas, Generation, Session};
pub use surface::{DrawingContext, RasterSurface, SurfaceHandle, SurfaceProvider, SurfaceRegistry};
