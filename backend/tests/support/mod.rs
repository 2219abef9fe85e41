#![allow(dead_code)]

use common::model::template::TextElement;
use greetcraft::compositor::{blend_coverage, TextPainter};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Mutex;

/// One call received by [`BlockPainter`].
#[derive(Debug, Clone, PartialEq)]
pub struct PaintCall {
    pub text: String,
    pub anchor: (i32, i32),
    pub size: f32,
    pub color: Rgba<u8>,
}

/// Font-free painter: every string becomes a solid block `size / 2` pixels
/// wide per character and `size` pixels tall, sitting on the baseline.
#[derive(Default)]
pub struct BlockPainter {
    calls: Mutex<Vec<PaintCall>>,
}

impl BlockPainter {
    pub fn calls(&self) -> Vec<PaintCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.text).collect()
    }
}

impl TextPainter for BlockPainter {
    fn paint(&self, canvas: &mut RgbaImage, text: &str, anchor: (i32, i32), size: f32, color: Rgba<u8>) {
        self.calls.lock().unwrap().push(PaintCall {
            text: text.to_string(),
            anchor,
            size,
            color,
        });
        let width = (text.chars().count() as f32 * size / 2.0).ceil() as i32;
        let height = size.ceil() as i32;
        for y in anchor.1 - height..anchor.1 {
            for x in anchor.0..anchor.0 + width {
                blend_coverage(canvas, x, y, color, 1.0);
            }
        }
    }
}

pub fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Opaque RGB PNG with a gradient, so pixel comparisons are meaningful.
pub fn gradient_rgb_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
    });
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

/// RGBA PNG with varying alpha.
pub fn gradient_rgba_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 90, ((x * y) % 256) as u8])
    });
    encode(DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

pub fn white_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

pub fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes).unwrap().into_rgba8()
}

pub fn element(element_type: &str, text: &str, color: &str, font_size: u32, x: i32, y: i32) -> TextElement {
    TextElement {
        element_type: element_type.to_string(),
        text: text.to_string(),
        font_size,
        color: color.to_string(),
        x,
        y,
    }
}

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
