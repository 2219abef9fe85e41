use super::ComposeError;
use image::{ImageBuffer, Rgba, RgbaImage};
use png::{BitDepth, ColorType, Encoder};

/// Encodes the canvas as an 8-bit PNG.
///
/// With `keep_alpha == false` the alpha channel is dropped and the file is
/// written as RGB, matching an opaque source image.
pub fn encode_png(canvas: &RgbaImage, keep_alpha: bool) -> Result<Vec<u8>, ComposeError> {
    let (width, height) = canvas.dimensions();
    let rgb;
    let (color_type, data): (ColorType, &[u8]) = if keep_alpha {
        (ColorType::Rgba, canvas.as_raw().as_slice())
    } else {
        rgb = canvas
            .as_raw()
            .chunks_exact(4)
            .flat_map(|px| px[..3].iter().copied())
            .collect::<Vec<u8>>();
        (ColorType::Rgb, rgb.as_slice())
    };
    write_png(width, height, color_type, BitDepth::Eight, data)
}

/// Encodes a 16-bit canvas as a 16-bit PNG, samples in network byte order.
pub fn encode_png16(canvas: &ImageBuffer<Rgba<u16>, Vec<u16>>, keep_alpha: bool) -> Result<Vec<u8>, ComposeError> {
    let (width, height) = canvas.dimensions();
    let (color_type, channels) = if keep_alpha {
        (ColorType::Rgba, 4)
    } else {
        (ColorType::Rgb, 3)
    };
    let data: Vec<u8> = canvas
        .pixels()
        .flat_map(|px| px.0[..channels].iter().flat_map(|sample| sample.to_be_bytes()))
        .collect();
    write_png(width, height, color_type, BitDepth::Sixteen, &data)
}

fn write_png(
    width: u32,
    height: u32,
    color_type: ColorType,
    depth: BitDepth,
    data: &[u8],
) -> Result<Vec<u8>, ComposeError> {
    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(depth);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
        writer.finish()?;
    }
    Ok(out)
}
