//! Drawing surface abstraction
//!
//! The simulation only ever needs four primitives: wipe, fill a rectangle,
//! stroke a line, and the surface size. Hosts implement [`Canvas`] over
//! whatever they draw on; [`RasterCanvas`] is a software target backed by an
//! `image::RgbaImage`, used by the headless runner and the tests.

use glam::Vec2;
use image::{Pixel, RgbaImage};

use crate::palette::Rgba;

/// Drawing primitives consumed by the simulation
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill the whole surface with `color`
    fn clear(&mut self, color: Rgba);

    /// Fill an axis-aligned rectangle. Parts outside the surface are clipped.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba);

    /// Stroke a straight line of the given pen width
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// CPU canvas with source-over alpha blending
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    image: RgbaImage,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Color at (x, y), or None outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
    }

    /// Save as PNG (format picked from the path extension)
    pub fn save_png(&self, path: &std::path::Path) -> Result<(), image::ImageError> {
        self.image.save(path)
    }

    /// Blend `color` over one pixel (source-over). Out-of-range coordinates
    /// are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        if let Some(dst) = self.image.get_pixel_mut_checked(x as u32, y as u32) {
            dst.blend(&image::Rgba::from(color));
        }
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self, color: Rgba) {
        let px = image::Rgba::from(color);
        for p in self.image.pixels_mut() {
            *p = px;
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w as i32).min(self.width() as i32);
        let y1 = y.saturating_add(h as i32).min(self.height() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        // Stamp a pen-sized square at every pixel step along the segment.
        // Overlapping stamps blend twice, which only matters for translucent pens.
        let pen = width.max(1.0).round() as u32;
        let half = pen as f32 / 2.0;
        let delta = to - from;
        let steps = delta.abs().max_element().ceil().max(1.0) as u32;
        for i in 0..=steps {
            let p = from + delta * (i as f32 / steps as f32);
            self.fill_rect(
                (p.x - half).round() as i32,
                (p.y - half).round() as i32,
                pen,
                pen,
                color,
            );
        }
    }
}
