use image::Rgba;

/// Parses `#RRGGBB` (case-insensitive, `#` optional) into an opaque colour.
///
/// Shorthand (`#fff`), alpha (`#RRGGBBAA`), named colours and surrounding
/// whitespace are all rejected.
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Rgba([channel(0..2)?, channel(2..4)?, channel(4..6)?, 255]))
}
