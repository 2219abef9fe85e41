//! Text rasterization onto an RGBA canvas.
//!
//! The compositor never talks to a font engine directly; it hands each
//! resolved string to a [`TextPainter`]. [`FontPainter`] is the production
//! implementation, backed by a TrueType font read from the configured font
//! directory.

use image::{ImageBuffer, Rgba, RgbaImage};
use log::{debug, warn};
use rusttype::{point, Font, Scale};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Largest glyph box, in pixels, that is handed to the rasterizer.
const MAX_GLYPH_PIXELS: i64 = 16 * 1024 * 1024;

/// Pen advance, relative to the anchor, past which the rest of a line is dropped.
const MAX_PEN_OFFSET: f32 = (1 << 30) as f32;

/// Families tried after the configured one, in order.
const FALLBACK_FAMILIES: [&str; 2] = ["LiberationSans", "DejaVuSans"];

/// Draws a single line of text onto a canvas.
///
/// `anchor` is the left end of the baseline. Implementations must clip
/// anything that falls outside the canvas and must be deterministic.
pub trait TextPainter: Send + Sync {
    fn paint(&self, canvas: &mut RgbaImage, text: &str, anchor: (i32, i32), size: f32, color: Rgba<u8>);
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("no usable font for family {family:?} in {dir}")]
    NotFound { family: String, dir: PathBuf },
    #[error("{0} is not a valid TrueType/OpenType font")]
    Invalid(String),
    #[error("failed to read font: {0}")]
    Io(#[from] io::Error),
}

/// Anti-aliased painter backed by a `rusttype` font.
pub struct FontPainter {
    font: Font<'static>,
    family: String,
}

impl FontPainter {
    pub fn from_bytes(bytes: Vec<u8>, family: impl Into<String>) -> Result<Self, FontError> {
        let family = family.into();
        let font = Font::try_from_vec(bytes).ok_or_else(|| FontError::Invalid(family.clone()))?;
        Ok(Self { font, family })
    }

    /// Loads `{family}-Regular.ttf` or `{family}.ttf` from `dir`, falling back
    /// to LiberationSans and then DejaVuSans when the requested family is absent.
    pub fn from_dir(dir: &Path, family: &str) -> Result<Self, FontError> {
        let families = std::iter::once(family).chain(FALLBACK_FAMILIES);
        for candidate in families {
            for file_name in [format!("{candidate}-Regular.ttf"), format!("{candidate}.ttf")] {
                let path = dir.join(&file_name);
                if !path.is_file() {
                    continue;
                }
                debug!("Loading font {:?}", path);
                let bytes = fs::read(&path)?;
                return Self::from_bytes(bytes, candidate);
            }
        }
        Err(FontError::NotFound {
            family: family.to_string(),
            dir: dir.to_path_buf(),
        })
    }

    /// Family that was actually loaded, which may be a fallback.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// `Scale` whose em square is `size` pixels tall.
    ///
    /// `Scale::uniform` sizes the ascent-to-descent box instead, which would
    /// draw noticeably smaller glyphs than a point size suggests.
    fn em_scale(&self, size: f32) -> Scale {
        let metrics = self.font.v_metrics_unscaled();
        let units_per_em = f32::from(self.font.units_per_em());
        let line_height = metrics.ascent - metrics.descent;
        if units_per_em <= 0.0 || line_height <= 0.0 {
            return Scale::uniform(size);
        }
        Scale::uniform(size * line_height / units_per_em)
    }
}

impl TextPainter for FontPainter {
    fn paint(&self, canvas: &mut RgbaImage, text: &str, anchor: (i32, i32), size: f32, color: Rgba<u8>) {
        let scale = self.em_scale(size);
        let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
        // Glyphs are laid out around the origin and shifted in i64, so anchors
        // anywhere in the i32 range cannot overflow.
        for glyph in self.font.layout(text, scale, point(0.0, 0.0)) {
            let pen_x = glyph.position().x;
            if pen_x > MAX_PEN_OFFSET || f64::from(anchor.0) + f64::from(pen_x) > width as f64 + f64::from(scale.x) {
                break;
            }
            let Some(bounds) = glyph.pixel_bounding_box() else {
                continue;
            };
            let left = i64::from(anchor.0) + i64::from(bounds.min.x);
            let top = i64::from(anchor.1) + i64::from(bounds.min.y);
            let right = i64::from(anchor.0) + i64::from(bounds.max.x);
            let bottom = i64::from(anchor.1) + i64::from(bounds.max.y);
            if right <= 0 || bottom <= 0 || left >= width || top >= height {
                continue;
            }
            let area = i64::from(bounds.width()) * i64::from(bounds.height());
            if area > MAX_GLYPH_PIXELS {
                warn!("Skipping {}x{} px glyph, too large to rasterize", bounds.width(), bounds.height());
                continue;
            }
            glyph.draw(|gx, gy, coverage| {
                let x = left + i64::from(gx);
                let y = top + i64::from(gy);
                if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
                    blend_coverage(canvas, x, y, color, coverage);
                }
            });
        }
    }
}

/// Source-over blends `color` into one pixel, weighted by `coverage` in `0..=1`.
///
/// Coordinates outside the canvas are ignored.
pub fn blend_coverage(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let src_a = coverage.clamp(0.0, 1.0) * f32::from(color[3]) / 255.0;
    if src_a <= 0.0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x, y);
    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    for c in 0..3 {
        let src = f32::from(color[c]);
        let under = f32::from(dst[c]);
        let value = (src * src_a + under * dst_a * (1.0 - src_a)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Source-over blends an 8-bit `layer` onto a 16-bit canvas of the same size.
///
/// Fully transparent layer pixels leave the canvas untouched.
pub fn blend_layer_16(canvas: &mut ImageBuffer<Rgba<u16>, Vec<u16>>, layer: &RgbaImage) {
    for (dst, src) in canvas.pixels_mut().zip(layer.pixels()) {
        let src_a = f32::from(src[3]) / 255.0;
        if src_a <= 0.0 {
            continue;
        }
        let dst_a = f32::from(dst[3]) / 65535.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        for c in 0..3 {
            let over = f32::from(src[c]) * 257.0;
            let under = f32::from(dst[c]);
            let value = (over * src_a + under * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = value.round().clamp(0.0, 65535.0) as u16;
        }
        dst[3] = (out_a * 65535.0).round().clamp(0.0, 65535.0) as u16;
    }
}
