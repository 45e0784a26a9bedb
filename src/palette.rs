//! Crack colors
//!
//! Earthy browns, ochres and creams. Grains are painted with a very low alpha
//! so the sand builds up gradually where bands overlap.

use rand::Rng;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// Alpha as a 0-1 fraction
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// CSS `rgba()` string for 2D canvas contexts
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {:.4})", self.r, self.g, self.b, self.alpha())
    }
}

impl From<Rgba> for image::Rgba<u8> {
    fn from(c: Rgba) -> Self {
        image::Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Crack line color
pub const CRACK_COLOR: Rgba = Rgba::opaque(0x00, 0x00, 0x00);
/// Canvas color after a restart
pub const BACKGROUND_COLOR: Rgba = Rgba::opaque(0xff, 0xfd, 0xe6);
/// Alpha of every sand grain
pub const GRAIN_ALPHA: u8 = 0x0f;

const PALETTE_RGB: [[u8; 3]; 120] = [
    [0x20, 0x1f, 0x21], [0x26, 0x2c, 0x2e], [0x35, 0x26, 0x26], [0x37, 0x2b, 0x27], [0x30, 0x2c, 0x2e],
    [0x39, 0x2b, 0x2d], [0x32, 0x32, 0x29], [0x3f, 0x32, 0x29], [0x38, 0x32, 0x2e], [0x2e, 0x33, 0x3d],
    [0x33, 0x3a, 0x3d], [0x47, 0x33, 0x29], [0x40, 0x39, 0x2c], [0x40, 0x39, 0x2e], [0x47, 0x40, 0x2c],
    [0x47, 0x40, 0x2e], [0x4e, 0x40, 0x2c], [0x4f, 0x40, 0x2e], [0x4e, 0x47, 0x38], [0x58, 0x40, 0x37],
    [0x65, 0x47, 0x2d], [0x6d, 0x5d, 0x3d], [0x74, 0x55, 0x30], [0x75, 0x55, 0x32], [0x74, 0x5d, 0x32],
    [0x74, 0x64, 0x33], [0x7c, 0x6c, 0x36], [0x52, 0x31, 0x52], [0x44, 0x48, 0x42], [0x4c, 0x56, 0x47],
    [0x65, 0x5d, 0x45], [0x6d, 0x5d, 0x44], [0x6c, 0x5d, 0x4e], [0x74, 0x6c, 0x43], [0x7c, 0x6c, 0x42],
    [0x7c, 0x6c, 0x4b], [0x6b, 0x73, 0x4b], [0x73, 0x73, 0x4b], [0x7b, 0x7b, 0x4a], [0x6b, 0x6c, 0x55],
    [0x69, 0x6d, 0x5e], [0x7b, 0x6c, 0x5d], [0x6b, 0x73, 0x53], [0x6a, 0x74, 0x5d], [0x72, 0x7b, 0x52],
    [0x7b, 0x7b, 0x52], [0x57, 0x74, 0x6e], [0x68, 0x74, 0x66], [0x9c, 0x54, 0x2b], [0x9d, 0x54, 0x32],
    [0x9d, 0x5b, 0x35], [0x93, 0x6b, 0x36], [0xaa, 0x73, 0x30], [0xc4, 0x5a, 0x27], [0xd9, 0x52, 0x23],
    [0xd8, 0x5a, 0x20], [0xdb, 0x5a, 0x23], [0xe5, 0x70, 0x37], [0x83, 0x6c, 0x4b], [0x8c, 0x6b, 0x4b],
    [0x82, 0x73, 0x5c], [0x93, 0x73, 0x52], [0x81, 0x7b, 0x63], [0x81, 0x7b, 0x6d], [0x92, 0x7b, 0x63],
    [0xd9, 0x89, 0x3b], [0xe4, 0x98, 0x32], [0xdf, 0xa1, 0x33], [0xe5, 0xa0, 0x37], [0xf0, 0xab, 0x3b],
    [0x8a, 0x8a, 0x59], [0xb2, 0x9a, 0x58], [0x89, 0x82, 0x6b], [0x9a, 0x82, 0x62], [0x88, 0x8b, 0x7c],
    [0x90, 0x9a, 0x7a], [0xa2, 0x82, 0x62], [0xa1, 0x8a, 0x69], [0xa9, 0x99, 0x68], [0x99, 0xa1, 0x60],
    [0x99, 0xa1, 0x68], [0xca, 0x81, 0x48], [0xeb, 0x8d, 0x43], [0xc2, 0x91, 0x60], [0xc2, 0x91, 0x68],
    [0xd1, 0xa9, 0x77], [0xc9, 0xb9, 0x7f], [0xf0, 0xe2, 0x7b], [0x9f, 0x92, 0x8b], [0xc0, 0xb9, 0x99],
    [0xe6, 0xb8, 0x8f], [0xc8, 0xc1, 0x87], [0xe0, 0xc8, 0x86], [0xf2, 0xcc, 0x85], [0xf5, 0xda, 0x83],
    [0xec, 0xde, 0x9d], [0xf5, 0xd2, 0x94], [0xf5, 0xda, 0x94], [0xf4, 0xe7, 0x84], [0xf4, 0xe1, 0x8a],
    [0xf4, 0xe1, 0x93], [0xe7, 0xd8, 0xa7], [0xf1, 0xd4, 0xa5], [0xf1, 0xdc, 0xa5], [0xf4, 0xdb, 0xad],
    [0xf1, 0xdc, 0xae], [0xf4, 0xdb, 0xb5], [0xf5, 0xdb, 0xbd], [0xf4, 0xe2, 0xad], [0xf5, 0xe9, 0xad],
    [0xf4, 0xe3, 0xbe], [0xf5, 0xea, 0xbe], [0xf7, 0xf0, 0xb6], [0xd9, 0xd1, 0xc1], [0xe0, 0xd0, 0xc0],
    [0xe7, 0xd8, 0xc0], [0xf1, 0xdd, 0xc6], [0xe8, 0xe1, 0xc0], [0xf3, 0xed, 0xc7], [0xf6, 0xec, 0xce],
];

/// Number of palette entries
pub const PALETTE_LEN: usize = PALETTE_RGB.len();

/// Palette entry `index` with the grain alpha applied
pub fn color(index: usize) -> Rgba {
    let [r, g, b] = PALETTE_RGB[index % PALETTE_LEN];
    Rgba::new(r, g, b, GRAIN_ALPHA)
}

/// Uniformly random palette entry
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgba {
    color(rng.random_range(0..PALETTE_LEN))
}
