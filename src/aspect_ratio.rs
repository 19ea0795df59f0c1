use image::{imageops, DynamicImage, ImageBuffer, Rgba, RgbaImage};

pub const TARGET_ASPECT: f64 = 4.0 / 3.0;

/// Ratios this close to the target count as already conforming.
const EXACT_TOLERANCE: f64 = 1e-5;
/// Slack around the target before padding switches to cropping.
const PAD_TOLERANCE: f64 = 0.05;

/// Which reshaping was applied, kept for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectTransform {
    Unchanged,
    PadHorizontal,
    PadVertical,
    CropHorizontal,
}

pub struct NormalizedStill {
    pub image: RgbaImage,
    pub transform: AspectTransform,
}

/// Fit an arbitrary image into a 4:3 frame.
///
/// Narrow images are letterboxed onto a wider black canvas; widescreen
/// formats (scope, 16:9 and anything past 1.6) keep their full width and
/// gain bars above and below; the in-between band is center-cropped.
pub fn normalize(image: &DynamicImage) -> NormalizedStill {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let actual = width as f64 / height as f64;

    if (actual - TARGET_ASPECT).abs() < EXACT_TOLERANCE {
        return NormalizedStill {
            image: rgba,
            transform: AspectTransform::Unchanged,
        };
    }

    let width_for_height = (height as f64 * TARGET_ASPECT).round() as u32;
    let height_for_width = (width as f64 / TARGET_ASPECT).round() as u32;

    if actual <= TARGET_ASPECT + PAD_TOLERANCE {
        NormalizedStill {
            image: pad_onto(&rgba, width_for_height, height),
            transform: AspectTransform::PadHorizontal,
        }
    } else if actual > 1.6
        || (actual - 2.39).abs() < PAD_TOLERANCE
        || (actual - 16.0 / 9.0).abs() < PAD_TOLERANCE
    {
        NormalizedStill {
            image: pad_onto(&rgba, width, height_for_width),
            transform: AspectTransform::PadVertical,
        }
    } else {
        let left = (width - width_for_height) / 2;
        NormalizedStill {
            image: imageops::crop_imm(&rgba, left, 0, width_for_height, height).to_image(),
            transform: AspectTransform::CropHorizontal,
        }
    }
}

/// Center the image on a black canvas of the given size. The offset is
/// signed: a canvas narrower than the image trims the overhang from both
/// edges evenly.
fn pad_onto(img: &RgbaImage, canvas_width: u32, canvas_height: u32) -> RgbaImage {
    let mut canvas: RgbaImage =
        ImageBuffer::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 255]));
    let x = (canvas_width as i64 - img.width() as i64) / 2;
    let y = (canvas_height as i64 - img.height() as i64) / 2;
    imageops::overlay(&mut canvas, img, x, y);
    canvas
}
