use chrono::{Datelike, NaiveDate};
use image::{ImageBuffer, Rgba, RgbaImage};
use log::warn;

use crate::collage_layout::{layout_collage, DrawOp, LayoutParams, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::diary_types::DiaryCollection;
use crate::fonts::{draw_text, FontRole, FontSet, TextMeasure};

const COLOR_BACKGROUND: [u8; 4] = [0x15, 0x18, 0x1d, 255];
const COLOR_DATE_HEADING: [u8; 4] = [255, 255, 255, 255];
const COLOR_HEART: [u8; 4] = [0xff, 0x80, 0x00, 255];

const DATE_HEADING_Y: f32 = 80.0;
const HEART_SIZE: u32 = 36;

/// Render the primary collage: template (or solid) canvas, the laid-out
/// diary entries, and the centered date heading.
pub fn render_collage(
    collection: &DiaryCollection,
    reference_date: NaiveDate,
    fonts: &FontSet,
    template_path: Option<&str>,
) -> RgbaImage {
    let mut canvas = load_canvas(template_path);
    let params = LayoutParams::default();

    for op in layout_collage(collection, &params, fonts) {
        match op {
            DrawOp::Text { x, y, text, role, color } => {
                draw_text(&mut canvas, fonts, &text, x, y, role, color);
            }
            DrawOp::Heart { x, y } => draw_heart(&mut canvas, x as i64, y as i64),
        }
    }

    draw_date_heading(&mut canvas, reference_date, fonts);
    canvas
}

fn load_canvas(template_path: Option<&str>) -> RgbaImage {
    if let Some(path) = template_path {
        match image::open(path) {
            Ok(template) => {
                let template = template.to_rgba8();
                if template.dimensions() == (CANVAS_WIDTH, CANVAS_HEIGHT) {
                    return template;
                }
                warn!(
                    "Template {} is {:?}, expected {}x{}; using blank canvas",
                    path,
                    template.dimensions(),
                    CANVAS_WIDTH,
                    CANVAS_HEIGHT
                );
            }
            Err(e) => warn!("Failed to load template {}: {}", path, e),
        }
    }
    ImageBuffer::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, Rgba(COLOR_BACKGROUND))
}

/// "<Month> <day>", day without a leading zero, centered near the top.
fn draw_date_heading(canvas: &mut RgbaImage, reference_date: NaiveDate, fonts: &FontSet) {
    let heading = format!("{} {}", reference_date.format("%B"), reference_date.day());
    let (text_width, _) = fonts.text_extent(&heading, FontRole::DateHeading);
    let x = canvas.width() as f32 / 2.0 - text_width / 2.0;
    draw_text(
        canvas,
        fonts,
        &heading,
        x,
        DATE_HEADING_Y,
        FontRole::DateHeading,
        COLOR_DATE_HEADING,
    );
}

/// Procedural heart glyph from the implicit curve
/// (x^2 + y^2 - 1)^3 - x^2 * y^3 <= 0.
fn draw_heart(canvas: &mut RgbaImage, x: i64, y: i64) {
    let (width, height) = canvas.dimensions();
    for py in 0..HEART_SIZE {
        for px in 0..HEART_SIZE {
            let nx = (px as f64 / (HEART_SIZE - 1) as f64) * 3.0 - 1.5;
            let ny = 1.4 - (py as f64 / (HEART_SIZE - 1) as f64) * 2.9;
            let base = nx * nx + ny * ny - 1.0;
            if base * base * base - nx * nx * ny * ny * ny <= 0.0 {
                let cx = x + px as i64;
                let cy = y + py as i64;
                if cx >= 0 && cy >= 0 && (cx as u32) < width && (cy as u32) < height {
                    canvas.put_pixel(cx as u32, cy as u32, Rgba(COLOR_HEART));
                }
            }
        }
    }
}
