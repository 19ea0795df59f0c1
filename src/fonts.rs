use image::RgbaImage;
use rusttype::{point, Font, Scale};

use crate::config::Config;

/// Which face/size a piece of text is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    YearLabel,
    EntryTitle,
    Caption,
    DateHeading,
}

impl FontRole {
    pub fn size(self) -> f32 {
        match self {
            FontRole::YearLabel => 30.0,
            FontRole::EntryTitle => 37.0,
            FontRole::Caption => 48.0,
            FontRole::DateHeading => 200.0,
        }
    }
}

/// Text bounding-box measurement capability. Layout and caption code consume
/// this seam so tests can run against fixed-width metrics.
pub trait TextMeasure {
    /// Advance width of a single line.
    fn line_width(&self, text: &str, role: FontRole) -> f32;

    /// Inked bounding box (width, height), the way PIL-style `textbbox`
    /// reports it.
    fn text_extent(&self, text: &str, role: FontRole) -> (f32, f32);
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("IO error reading font: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid font data in {0}")]
    InvalidData(String),
}

pub struct FontSet {
    display: Font<'static>,
    heading: Font<'static>,
}

impl FontSet {
    pub fn load(config: &Config) -> Result<Self, FontError> {
        Ok(FontSet {
            display: load_font(&config.fonts.display_path)?,
            heading: load_font(&config.fonts.heading_path)?,
        })
    }

    fn face(&self, role: FontRole) -> (&Font<'static>, Scale) {
        let font = match role {
            FontRole::YearLabel | FontRole::EntryTitle => &self.display,
            FontRole::Caption | FontRole::DateHeading => &self.heading,
        };
        (font, Scale::uniform(role.size()))
    }
}

fn load_font(path: &str) -> Result<Font<'static>, FontError> {
    let data = std::fs::read(path)?;
    Font::try_from_vec(data).ok_or_else(|| FontError::InvalidData(path.to_string()))
}

impl TextMeasure for FontSet {
    fn line_width(&self, text: &str, role: FontRole) -> f32 {
        let (font, scale) = self.face(role);
        font.layout(text, scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn text_extent(&self, text: &str, role: FontRole) -> (f32, f32) {
        let (font, scale) = self.face(role);
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for glyph in font.layout(text, scale, point(0.0, 0.0)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                min_x = min_x.min(bb.min.x);
                min_y = min_y.min(bb.min.y);
                max_x = max_x.max(bb.max.x);
                max_y = max_y.max(bb.max.y);
            }
        }
        if min_x == i32::MAX {
            (0.0, 0.0)
        } else {
            ((max_x - min_x) as f32, (max_y - min_y) as f32)
        }
    }
}

/// Rasterize one line of text onto the canvas. `y` is the top of the line
/// box; the baseline sits at `y + ascent`.
pub fn draw_text(
    canvas: &mut RgbaImage,
    fonts: &FontSet,
    text: &str,
    x: f32,
    y: f32,
    role: FontRole,
    color: [u8; 4],
) {
    let (font, scale) = fonts.face(role);
    let ascent = font.v_metrics(scale).ascent;
    let (width, height) = canvas.dimensions();
    for glyph in font.layout(text, scale, point(x, y + ascent)) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                    let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                    for channel in 0..3 {
                        let base = pixel.0[channel] as f32;
                        let ink = color[channel] as f32;
                        pixel.0[channel] = (base + (ink - base) * coverage) as u8;
                    }
                    pixel.0[3] = 255;
                }
            });
        }
    }
}
