//! Placeholder image stamping
//!
//! Copies the placeholder template once per page and renders the page
//! number into the fixed band near the bottom edge. Output files are named
//! by 8-digit zero-padded sequence.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use log::info;
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::ImageFormat;
use crate::error::{Error, Result};
use crate::layout;

/// Well-known TTF locations tried when no font is configured
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/DejaVu Sans.ttf",
    "C:/Windows/Fonts/DejaVuSans.ttf",
    "C:/Windows/Fonts/arial.ttf",
];

/// Options for stamping one image folder
#[derive(Debug, Clone)]
pub struct StampOptions {
    /// Path of the placeholder template image
    pub template: PathBuf,
    /// Output encoding of the generated pages
    pub format: ImageFormat,
    /// Explicit TTF path; system locations are searched when unset
    pub font: Option<PathBuf>,
}

/// File name of the page with the given 1-based index
pub fn page_file_name(index: u32, format: ImageFormat) -> String {
    format!("{:08}.{}", index, format.extension())
}

/// Load the stamp font, preferring the configured path over the search list
pub fn load_font(configured: Option<&Path>) -> Result<Font<'static>> {
    if let Some(path) = configured {
        let data = fs::read(path)
            .map_err(|e| Error::Font(format!("cannot read {}: {}", path.display(), e)))?;
        return Font::try_from_vec(data)
            .ok_or_else(|| Error::Font(format!("not a usable TTF: {}", path.display())));
    }

    for candidate in FONT_SEARCH_PATHS {
        let path = Path::new(candidate);
        if !path.exists() {
            continue;
        }
        if let Ok(data) = fs::read(path) {
            if let Some(font) = Font::try_from_vec(data) {
                return Ok(font);
            }
        }
    }

    Err(Error::Font(
        "no usable TTF found; configure a font path".to_string(),
    ))
}

/// Load the placeholder template image
pub fn load_template(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(Error::TemplateNotFound(path.to_path_buf()));
    }
    Ok(image::open(path)?.to_rgba8())
}

/// Render one page: a copy of the template with the page number centered in
/// the band near the bottom edge.
pub fn render_page_number(template: &RgbaImage, number: u32, font: &Font) -> RgbaImage {
    let mut page = template.clone();
    let (width, height) = page.dimensions();

    let band = layout::band_rect(width, height);
    let band_pixel = Rgba([
        layout::BAND_COLOR[0],
        layout::BAND_COLOR[1],
        layout::BAND_COLOR[2],
        255,
    ]);
    for y in band.y0..band.y1 {
        for x in band.x0..band.x1 {
            page.put_pixel(x, y, band_pixel);
        }
    }

    let text = number.to_string();
    let scale = Scale::uniform(layout::FONT_SIZE);
    let baseline = layout::baseline_y(height) as f32;
    let glyphs: Vec<PositionedGlyph> = font.layout(&text, scale, point(0.0, baseline)).collect();

    // Measured horizontal extent of the digits, laid out from x = 0
    let (min_x, max_x) = glyphs
        .iter()
        .filter_map(|g| g.pixel_bounding_box())
        .fold((i32::MAX, i32::MIN), |(lo, hi), bb| {
            (lo.min(bb.min.x), hi.max(bb.max.x))
        });
    if max_x < min_x {
        return page;
    }
    let text_width = (max_x - min_x) as u32;
    let x_offset = layout::centered_x(width, text_width) as i32 - min_x;

    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32 + x_offset;
                let py = bb.min.y + gy as i32;
                if px >= 0 && (px as u32) < width && py >= 0 && (py as u32) < height {
                    let pixel = page.get_pixel_mut(px as u32, py as u32);
                    for channel in 0..3 {
                        let text_value = layout::TEXT_COLOR[channel] as f32;
                        let background = pixel[channel] as f32;
                        pixel[channel] =
                            (text_value * coverage + background * (1.0 - coverage)).round() as u8;
                    }
                    pixel[3] = 255;
                }
            });
        }
    }

    page
}

/// Stamp `count` placeholder pages into the folder.
///
/// The template is loaded fresh for each folder-fill operation. Existing
/// files with the same names are overwritten; clearing the folder first is
/// the caller's choice.
pub fn stamp_folder(folder: &Path, count: u32, options: &StampOptions) -> Result<usize> {
    let template = load_template(&options.template)?;
    let font = load_font(options.font.as_deref())?;

    for index in 1..=count {
        info!("create image {}", index);
        let page = render_page_number(&template, index, &font);
        let target = folder.join(page_file_name(index, options.format));
        page.save(&target)?;
    }

    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn blank_template(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([230, 230, 230, 255]))
    }

    /// Tests that rasterize text need a system font; skip without one, like
    /// integration tests skip missing fixtures.
    fn test_font() -> Option<Font<'static>> {
        match load_font(None) {
            Ok(font) => Some(font),
            Err(_) => {
                eprintln!("Skipping stamp test: no system TTF available");
                None
            }
        }
    }

    #[test]
    fn test_page_file_name() {
        assert_eq!(page_file_name(1, ImageFormat::Png), "00000001.png");
        assert_eq!(page_file_name(42, ImageFormat::Tif), "00000042.tif");
        assert_eq!(page_file_name(12345678, ImageFormat::Png), "12345678.png");
    }

    #[test]
    fn test_load_template_missing() {
        let result = load_template(Path::new("no-such-template.png"));
        assert!(matches!(result, Err(Error::TemplateNotFound(_))));
    }

    #[test]
    fn test_render_draws_band_and_digits() {
        let Some(font) = test_font() else { return };

        let template = blank_template(600, 800);
        let page = render_page_number(&template, 7, &font);

        // Template itself is untouched
        assert_eq!(template.get_pixel(300, 700), &Rgba([230, 230, 230, 255]));

        // Band color inside the band area
        let band = layout::band_rect(600, 800);
        assert_eq!(
            page.get_pixel(10, band.y0 + 5),
            &Rgba([
                layout::BAND_COLOR[0],
                layout::BAND_COLOR[1],
                layout::BAND_COLOR[2],
                255
            ])
        );

        // Some near-white text pixel above the baseline, near the center
        let baseline = layout::baseline_y(800);
        let found_text = (250..350).any(|x| {
            (baseline - 50..baseline).any(|y| {
                let p = page.get_pixel(x, y);
                p[0] > 220 && p[1] > 220 && p[2] > 220
            })
        });
        assert!(found_text, "expected rendered digits near the baseline");
    }

    #[test]
    fn test_render_clamps_on_tiny_template() {
        let Some(font) = test_font() else { return };

        // Smaller than every fixed constant; must not panic
        let template = blank_template(40, 60);
        let page = render_page_number(&template, 99, &font);
        assert_eq!(page.dimensions(), (40, 60));
    }

    #[test]
    fn test_stamp_folder_writes_sequence() {
        if test_font().is_none() {
            return;
        }

        let tmp = TempDir::new().unwrap();
        let template_path = tmp.path().join("placeholder.png");
        blank_template(300, 450).save(&template_path).unwrap();

        let folder = tmp.path().join("pages");
        std::fs::create_dir(&folder).unwrap();

        let options = StampOptions {
            template: template_path,
            format: ImageFormat::Png,
            font: None,
        };
        let written = stamp_folder(&folder, 3, &options).unwrap();
        assert_eq!(written, 3);

        for index in 1..=3 {
            let path = folder.join(page_file_name(index, ImageFormat::Png));
            assert!(path.exists(), "missing {}", path.display());
        }
        assert!(!folder.join("00000004.png").exists());
    }
}
