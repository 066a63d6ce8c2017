use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage, imageops};

/// Default raster width in pixels.
pub const DEFAULT_WIDTH: u32 = 320;
/// Default raster height in pixels.
pub const DEFAULT_HEIGHT: u32 = 384;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Position relative to the raster's top-left corner, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Stroke width and colour used for freehand lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub width: f32,
    pub color: Rgba<u8>,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            width: 4.0,
            color: Rgba([0x6b, 0x21, 0xa8, 0xff]),
        }
    }
}

/// Parse `#rrggbb` or `#rrggbbaa` into an RGBA colour.
pub fn parse_hex_color(text: &str) -> Option<Rgba<u8>> {
    let hex = text.trim().strip_prefix('#')?;
    if !hex.is_ascii() || !matches!(hex.len(), 6 | 8) {
        return None;
    }
    let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Failed to encode canvas as PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Fixed-size pixel buffer holding the current handwriting sample.
#[derive(Clone, Debug)]
pub struct CanvasRaster {
    pixels: RgbaImage,
    has_content: bool,
    revision: u64,
}

impl CanvasRaster {
    /// Create a blank raster; zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width.max(1), height.max(1), BACKGROUND),
            has_content: false,
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// True when nothing has been drawn or loaded since the last clear.
    pub fn is_blank(&self) -> bool {
        !self.has_content
    }

    /// Monotonic counter bumped on every mutation; lets renderers skip re-uploads.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.width() && y < self.height()).then(|| *self.pixels.get_pixel(x, y))
    }

    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Wipe the raster back to the blank background.
    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = BACKGROUND;
        }
        self.has_content = false;
        self.revision += 1;
    }

    /// Paint a round-capped line from `from` to `to`, clipped to the raster.
    pub fn draw_segment(&mut self, from: Point, to: Point, pen: &Pen) {
        let radius = (pen.width / 2.0).max(0.5);
        let reach = radius + 1.0;
        let min_x = (from.x.min(to.x) - reach).floor().max(0.0);
        let min_y = (from.y.min(to.y) - reach).floor().max(0.0);
        let max_x = (from.x.max(to.x) + reach).ceil().min(self.width() as f32 - 1.0);
        let max_y = (from.y.max(to.y) + reach).ceil().min(self.height() as f32 - 1.0);
        if !(min_x <= max_x && min_y <= max_y) {
            return;
        }
        for y in min_y as u32..=max_y as u32 {
            for x in min_x as u32..=max_x as u32 {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = distance_to_segment(center, from, to);
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    blend(self.pixels.get_pixel_mut(x, y), pen.color, coverage);
                }
            }
        }
        self.has_content = true;
        self.revision += 1;
    }

    /// Replace the raster content with `image` scaled to the raster's dimensions.
    pub fn draw_scaled(&mut self, image: &RgbaImage) {
        let scaled = imageops::resize(
            image,
            self.width(),
            self.height(),
            imageops::FilterType::Triangle,
        );
        for (dst, src) in self.pixels.pixels_mut().zip(scaled.pixels()) {
            *dst = BACKGROUND;
            blend(dst, *src, 1.0);
        }
        self.has_content = true;
        self.revision += 1;
    }

    /// Serialize the current pixels as a PNG file.
    pub fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

fn distance_to_segment(point: Point, from: Point, to: Point) -> f32 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq <= f32::EPSILON {
        0.0
    } else {
        (((point.x - from.x) * dx + (point.y - from.y) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let nearest_x = from.x + t * dx;
    let nearest_y = from.y + t * dy;
    ((point.x - nearest_x).powi(2) + (point.y - nearest_y).powi(2)).sqrt()
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let alpha = coverage * src[3] as f32 / 255.0;
    for channel in 0..3 {
        let mixed = src[channel] as f32 * alpha + dst[channel] as f32 * (1.0 - alpha);
        dst[channel] = mixed.round() as u8;
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    dst[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round() as u8;
}
