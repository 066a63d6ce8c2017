use image::RgbaImage;

use super::raster::{CanvasRaster, Pen, Point};

/// Progress of the stroke under the pointer; only the last point is kept.
#[derive(Clone, Copy, Debug)]
struct ActiveStroke {
    last: Point,
    segments: usize,
}

/// Turns pointer drags into line segments painted onto a [`CanvasRaster`].
#[derive(Clone, Debug)]
pub struct DrawingSurface {
    raster: CanvasRaster,
    pen: Pen,
    stroke: Option<ActiveStroke>,
}

impl DrawingSurface {
    pub fn new(raster: CanvasRaster, pen: Pen) -> Self {
        Self {
            raster,
            pen,
            stroke: None,
        }
    }

    pub fn raster(&self) -> &CanvasRaster {
        &self.raster
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    /// Start a new stroke at `point`. Nothing is painted until the pointer moves.
    pub fn pointer_down(&mut self, point: Point) {
        self.stroke = Some(ActiveStroke {
            last: point,
            segments: 0,
        });
    }

    /// Extend the active stroke to `point`; returns false when no stroke is active.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        let Some(stroke) = self.stroke.as_mut() else {
            return false;
        };
        self.raster.draw_segment(stroke.last, point, &self.pen);
        stroke.last = point;
        stroke.segments += 1;
        true
    }

    pub fn pointer_up(&mut self) {
        self.end_stroke();
    }

    pub fn pointer_leave(&mut self) {
        self.end_stroke();
    }

    /// Wipe the raster and drop any stroke in progress.
    pub fn clear(&mut self) {
        self.stroke = None;
        self.raster.clear();
    }

    /// Replace the raster content with a decoded upload scaled to fit.
    pub fn load_image(&mut self, image: &RgbaImage) {
        self.stroke = None;
        self.raster.draw_scaled(image);
    }

    fn end_stroke(&mut self) {
        if let Some(stroke) = self.stroke.take() {
            tracing::trace!(segments = stroke.segments, "Stroke finished");
        }
    }
}
