//! # Image Compositor
//!
//! Renders a personalized image from a template's base image, its text
//! elements, and the runtime values supplied by the caller.
//!
//! ## Workflow
//!
//! 1.  **Decode**: the base bytes are decoded by content sniffing (PNG or JPEG)
//!     into an owned RGBA buffer. The caller's bytes are never touched.
//!
//! 2.  **Plan**: every element is resolved up front into a [`DrawCommand`]:
//!     the text to draw (substitution or default), the pixel size and the
//!     parsed colour. Sizes outside `1..=MAX_FONT_SIZE` and malformed colours
//!     are style errors. The first one aborts the whole render, so a
//!     half-stamped image is never produced.
//!
//! 3.  **Paint**: commands are handed to the [`TextPainter`] in element order.
//!     Later elements paint over earlier ones.
//!
//! 4.  **Encode**: the canvas is written back out as PNG, keeping an alpha
//!     channel only if the source had one. 16-bit sources stay 16-bit: text
//!     goes onto an 8-bit layer that is blended into the wide canvas.
//!
//! The whole pipeline is a pure function of its inputs and holds no state, so
//! any number of renders may run at the same time.

mod color;
mod encode;
mod painter;
mod resolve;

pub use color::parse_hex_color;
pub use encode::{encode_png, encode_png16};
pub use painter::{blend_coverage, blend_layer_16, FontError, FontPainter, TextPainter};
pub use resolve::{resolve_text, Substitutions};

use common::model::template::TextElement;
use image::{ColorType, Rgba, RgbaImage};
use log::debug;

/// Largest accepted `fontSize`, in pixels per em.
pub const MAX_FONT_SIZE: u32 = 2048;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("failed to decode base image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("element {index} has invalid color {value:?}, expected #RRGGBB")]
    InvalidColor { index: usize, value: String },
    #[error("element {index} has invalid style: {reason}")]
    InvalidStyle { index: usize, reason: String },
    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),
}

/// One fully resolved text stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand<'a> {
    pub text: &'a str,
    pub anchor: (i32, i32),
    pub size: f32,
    pub color: Rgba<u8>,
}

/// Resolves every element into a [`DrawCommand`], failing on the first bad style.
pub fn plan<'a>(
    elements: &'a [TextElement],
    substitutions: &'a Substitutions,
) -> Result<Vec<DrawCommand<'a>>, ComposeError> {
    elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            if element.font_size == 0 {
                return Err(ComposeError::InvalidStyle {
                    index,
                    reason: "font size must be positive".to_string(),
                });
            }
            if element.font_size > MAX_FONT_SIZE {
                return Err(ComposeError::InvalidStyle {
                    index,
                    reason: format!("font size {} exceeds {}", element.font_size, MAX_FONT_SIZE),
                });
            }
            let color = parse_hex_color(&element.color).ok_or_else(|| ComposeError::InvalidColor {
                index,
                value: element.color.clone(),
            })?;
            Ok(DrawCommand {
                text: resolve_text(element, substitutions),
                anchor: (element.x, element.y),
                size: element.font_size as f32,
                color,
            })
        })
        .collect()
}

/// Stamps `elements` onto the image in `base` and returns the result as PNG.
pub fn compose(
    painter: &dyn TextPainter,
    base: &[u8],
    elements: &[TextElement],
    substitutions: &Substitutions,
) -> Result<Vec<u8>, ComposeError> {
    let decoded = image::load_from_memory(base).map_err(ComposeError::Decode)?;
    let source = decoded.color();
    let keep_alpha = source.has_alpha();

    let commands = plan(elements, substitutions)?;
    debug!(
        "Compositing {} element(s) onto {}x{} {:?} canvas",
        commands.len(),
        decoded.width(),
        decoded.height(),
        source
    );

    if is_wide(source) {
        // Text is painted onto an 8-bit layer and blended in, so untouched
        // pixels keep their full 16-bit values.
        let mut canvas = decoded.into_rgba16();
        if !commands.is_empty() {
            let mut layer = RgbaImage::new(canvas.width(), canvas.height());
            paint_all(painter, &mut layer, &commands);
            blend_layer_16(&mut canvas, &layer);
        }
        return encode_png16(&canvas, keep_alpha);
    }

    let mut canvas = decoded.into_rgba8();
    paint_all(painter, &mut canvas, &commands);
    encode_png(&canvas, keep_alpha)
}

fn paint_all(painter: &dyn TextPainter, canvas: &mut RgbaImage, commands: &[DrawCommand<'_>]) {
    for command in commands {
        painter.paint(canvas, command.text, command.anchor, command.size, command.color);
    }
}

/// More than one byte per channel.
fn is_wide(color: ColorType) -> bool {
    color.bytes_per_pixel() > color.channel_count()
}
