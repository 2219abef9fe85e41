//! Renders with a real TrueType font when the machine has one.
//!
//! No font ships with the repository, so each test looks in the usual system
//! locations and returns early (with a note on stderr) when nothing is found.

mod support;

use common::model::role::Role;
use greetcraft::compositor::{compose, FontPainter, Substitutions, TextPainter, MAX_FONT_SIZE};
use std::fs;
use std::path::{Path, PathBuf};
use image::{Rgba, RgbaImage};
use support::{decode, element, WHITE};

const CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/liberation2/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_font() -> Option<PathBuf> {
    let found = CANDIDATES.iter().map(Path::new).find(|p| p.is_file()).map(Path::to_path_buf);
    if found.is_none() {
        eprintln!("no system TrueType font found, skipping");
    }
    found
}

fn painter(path: &Path) -> FontPainter {
    FontPainter::from_bytes(fs::read(path).unwrap(), "system").unwrap()
}

#[test]
fn stamps_antialiased_text_above_the_baseline() {
    let Some(path) = system_font() else { return };
    let painter = painter(&path);
    let elements = vec![element("name", "Jane Doe", "#ff0000", 32, 10, 50)];
    let subs = Substitutions::new().with(Role::Name, "Alex");

    let out = compose(&painter, &support::white_png(200, 80), &elements, &subs).unwrap();
    let img = decode(&out);

    let mut solid = 0;
    let mut partial = 0;
    for y in 10..50 {
        for x in 10..120 {
            let px = img.get_pixel(x, y);
            if px[0] == 255 && px[1] == 0 && px[2] == 0 {
                solid += 1;
            } else if px[1] < 255 {
                partial += 1;
            }
        }
    }
    assert!(solid > 0, "expected fully covered glyph pixels");
    assert!(partial > 0, "expected anti-aliased edge pixels");

    // "Alex" has no descenders: nothing well below the baseline, nothing left of the anchor.
    for x in 0..200 {
        assert_eq!(*img.get_pixel(x, 60), WHITE);
    }
    for y in 0..80 {
        assert_eq!(*img.get_pixel(5, y), WHITE);
    }
}

#[test]
fn real_font_output_is_deterministic() {
    let Some(path) = system_font() else { return };
    let painter = painter(&path);
    let base = support::gradient_rgb_png(120, 60);
    let elements = vec![
        element("name", "Jane Doe", "#102030", 20, 4, 25),
        element("quote", "Carpe diem", "#ffffff", 14, 4, 50),
    ];
    let subs = Substitutions::new().with(Role::Quote, "Make a wish");

    let first = compose(&painter, &base, &elements, &subs).unwrap();
    let second = compose(&painter, &base, &elements, &subs).unwrap();
    assert_eq!(first, second);
    assert_ne!(decode(&first), decode(&base));
}

#[test]
fn font_directory_falls_back_to_known_families() {
    let Some(path) = system_font() else { return };
    let dir = tempfile::tempdir().unwrap();
    fs::copy(&path, dir.path().join("DejaVuSans.ttf")).unwrap();

    let painter = FontPainter::from_dir(dir.path(), "Arial").unwrap();
    assert_eq!(painter.family(), "DejaVuSans");

    fs::copy(&path, dir.path().join("Arial-Regular.ttf")).unwrap();
    let painter = FontPainter::from_dir(dir.path(), "Arial").unwrap();
    assert_eq!(painter.family(), "Arial");
}

#[test]
fn glyphs_too_large_to_rasterize_are_skipped() {
    let Some(path) = system_font() else { return };
    let painter = painter(&path);
    let mut canvas = RgbaImage::from_pixel(20, 20, WHITE);

    painter.paint(&mut canvas, "W", (0, 10), 60_000.0, Rgba([0, 0, 0, 255]));

    assert!(canvas.pixels().all(|px| *px == WHITE));
}

#[test]
fn largest_accepted_font_size_renders_on_a_small_canvas() {
    let Some(path) = system_font() else { return };
    let painter = painter(&path);
    let elements = vec![element("name", "W", "#000000", MAX_FONT_SIZE, -500, 1500)];

    let out = compose(&painter, &support::white_png(20, 20), &elements, &Substitutions::new()).unwrap();
    assert_eq!(decode(&out).dimensions(), (20, 20));
}

#[test]
fn extreme_anchors_are_clipped_without_overflow() {
    let Some(path) = system_font() else { return };
    let painter = painter(&path);
    let base = support::white_png(30, 30);
    let elements = vec![
        element("name", "Hi", "#000000", 20, i32::MAX - 5, 10),
        element("quote", "Hi", "#000000", 20, i32::MIN, i32::MIN),
        element("birthdate", "Hi", "#000000", 20, 5, i32::MAX),
        element("greeting", "Hi", "#000000", 20, i32::MIN + 3, i32::MAX - 1),
    ];

    let out = compose(&painter, &base, &elements, &Substitutions::new()).unwrap();
    assert_eq!(decode(&out), decode(&base));
}
