use image::RgbaImage;

use crate::fonts::{draw_text, FontRole, FontSet, TextMeasure};

pub const OUTER_RADIUS: f32 = 24.0;
pub const OUTER_HEIGHT: f32 = 38.0;
pub const INNER_HEIGHT: f32 = 18.0;
pub const SCALE_FACTOR: f32 = 1.02;
/// Text is nudged up by 10% of its height inside the badge.
pub const VERTICAL_ADJUST: f32 = -0.1;
/// Distance kept between the text box and the bottom edge.
const BOTTOM_MARGIN: i32 = 60;

pub const COLOR_BADGE: [u8; 4] = [169, 169, 169, 255];
pub const COLOR_BADGE_FILL: [u8; 4] = [0x15, 0x18, 0x1d, 255];
pub const COLOR_CAPTION_TEXT: [u8; 4] = [255, 255, 255, 255];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectBounds {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// Badge geometry, derived from the measured text box and the fixed badge
/// constants. Pure so the arithmetic is testable without fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionGeometry {
    pub outer: RectBounds,
    pub inner: RectBounds,
    pub outer_radius: i32,
    pub inner_radius: i32,
    pub text_x: i32,
    pub text_y: i32,
}

impl CaptionGeometry {
    pub fn compute(text_width: f32, text_height: f32, img_width: u32, img_height: u32) -> Self {
        let center_x = img_width as i32 / 2;
        let center_y = img_height as i32 - text_height as i32 - BOTTOM_MARGIN;

        let padding = (OUTER_HEIGHT - INNER_HEIGHT) / 2.0;
        let inner_radius = OUTER_RADIUS - padding;

        let outer = centered_rect(center_x, center_y, text_width, text_height, OUTER_HEIGHT);
        let inner = centered_rect(center_x, center_y, text_width, text_height, INNER_HEIGHT);

        let mut text_y = center_y - text_height as i32 / 2;
        text_y -= (text_height * VERTICAL_ADJUST) as i32;

        CaptionGeometry {
            outer,
            inner,
            outer_radius: (OUTER_RADIUS * SCALE_FACTOR) as i32,
            inner_radius: (inner_radius * SCALE_FACTOR) as i32,
            text_x: center_x - text_width as i32 / 2,
            text_y,
        }
    }
}

fn centered_rect(
    center_x: i32,
    center_y: i32,
    text_width: f32,
    text_height: f32,
    inset: f32,
) -> RectBounds {
    let half_w = ((text_width + inset) * SCALE_FACTOR) as i32 / 2;
    let half_h = ((text_height + inset) * SCALE_FACTOR) as i32 / 2;
    RectBounds {
        x0: center_x - half_w,
        y0: center_y - half_h,
        x1: center_x + half_w,
        y1: center_y + half_h,
    }
}

/// Draw the caption badge and its two text runs onto the still: the outer
/// grey rounded rect, the inner dark one, the white title and the grey year
/// immediately after the title's measured width.
pub fn compose_caption(image: &mut RgbaImage, title_text: &str, year_text: &str, fonts: &FontSet) {
    let combined = format!("{}{}", title_text, year_text);
    let (text_width, text_height) = fonts.text_extent(&combined, FontRole::Caption);
    let (img_width, img_height) = image.dimensions();

    let geometry = CaptionGeometry::compute(text_width, text_height, img_width, img_height);

    fill_rounded_rect(image, &geometry.outer, geometry.outer_radius, COLOR_BADGE);
    fill_rounded_rect(image, &geometry.inner, geometry.inner_radius, COLOR_BADGE_FILL);

    draw_text(
        image,
        fonts,
        title_text,
        geometry.text_x as f32,
        geometry.text_y as f32,
        FontRole::Caption,
        COLOR_CAPTION_TEXT,
    );

    let (title_width, _) = fonts.text_extent(title_text, FontRole::Caption);
    draw_text(
        image,
        fonts,
        year_text,
        geometry.text_x as f32 + title_width,
        geometry.text_y as f32,
        FontRole::Caption,
        COLOR_BADGE,
    );
}

fn fill_rounded_rect(image: &mut RgbaImage, bounds: &RectBounds, radius: i32, color: [u8; 4]) {
    let (width, height) = image.dimensions();
    let y_start = bounds.y0.max(0);
    let y_end = bounds.y1.min(height as i32 - 1);
    let x_start = bounds.x0.max(0);
    let x_end = bounds.x1.min(width as i32 - 1);
    for y in y_start..=y_end {
        for x in x_start..=x_end {
            if inside_rounded(x, y, bounds, radius) {
                image.put_pixel(x as u32, y as u32, image::Rgba(color));
            }
        }
    }
}

fn inside_rounded(x: i32, y: i32, bounds: &RectBounds, radius: i32) -> bool {
    let left = bounds.x0 + radius;
    let right = bounds.x1 - radius;
    let top = bounds.y0 + radius;
    let bottom = bounds.y1 - radius;

    // Pixels in the cross-shaped body are always inside; corner pixels must
    // fall within the corner circle.
    if (x >= left && x <= right) || (y >= top && y <= bottom) {
        return true;
    }
    let corner_x = if x < left { left } else { right };
    let corner_y = if y < top { top } else { bottom };
    let dx = (x - corner_x) as i64;
    let dy = (y - corner_y) as i64;
    dx * dx + dy * dy <= (radius as i64) * (radius as i64)
}
