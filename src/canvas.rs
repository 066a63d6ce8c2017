//! Freehand drawing surface and the raster it paints into.

mod raster;
mod surface;

pub use raster::{CanvasError, CanvasRaster, DEFAULT_HEIGHT, DEFAULT_WIDTH, Pen, Point, parse_hex_color};
pub use surface::DrawingSurface;
