//! Face outline drawing for debug and preview output.
//!
//! Text rendering needs a font, which callers bring through [`LabelPainter`].

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use tinyface_core::Rect;

pub const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const OUTLINE_WIDTH: i32 = 4;

/// Renders one label onto the canvas with its top-left corner at `(x, y)`.
///
/// Closures work, e.g. one wrapping `imageproc::drawing::draw_text_mut` with a loaded font.
pub trait LabelPainter {
    fn paint(&mut self, canvas: &mut RgbImage, x: i32, y: i32, label: &str);
}

impl<F> LabelPainter for F
where
    F: FnMut(&mut RgbImage, i32, i32, &str),
{
    fn paint(&mut self, canvas: &mut RgbImage, x: i32, y: i32, label: &str) {
        self(canvas, x, y, label)
    }
}

/// Copy `img` to RGB and outline every rectangle on it.
///
/// Outlines grow outward from the face box; anything past the image edge is clipped.
pub fn draw_outlines(img: &DynamicImage, rects: &[Rect]) -> RgbImage {
    let mut canvas = img.to_rgb8();
    for rect in rects {
        outline(&mut canvas, rect);
    }
    canvas
}

/// Like [`draw_outlines`], then hand each label to `painter`, placed under its box.
pub fn draw_labeled(img: &DynamicImage, faces: &[(Rect, &str)], painter: &mut impl LabelPainter) -> RgbImage {
    let mut canvas = img.to_rgb8();
    for (rect, label) in faces {
        if outline(&mut canvas, rect) {
            painter.paint(&mut canvas, rect.left, rect.bottom.saturating_add(OUTLINE_WIDTH), label);
        }
    }
    canvas
}

/// Returns false when nothing was drawn.
fn outline(canvas: &mut RgbImage, rect: &Rect) -> bool {
    // Engines may report boxes far off the canvas; pull them in to just past the edge
    // so the outline stays where it was and line lengths stay bounded.
    let (w, h) = canvas.dimensions();
    let max_x = i32::try_from(w).unwrap_or(i32::MAX).saturating_add(OUTLINE_WIDTH);
    let max_y = i32::try_from(h).unwrap_or(i32::MAX).saturating_add(OUTLINE_WIDTH);
    let r = Rect::new(
        rect.left.clamp(-OUTLINE_WIDTH, max_x),
        rect.top.clamp(-OUTLINE_WIDTH, max_y),
        rect.right.clamp(-OUTLINE_WIDTH, max_x),
        rect.bottom.clamp(-OUTLINE_WIDTH, max_y),
    );
    if rect.is_empty() || r.is_empty() {
        return false;
    }

    for inset in 0..OUTLINE_WIDTH {
        let outline = imageproc::rect::Rect::at(r.left - inset, r.top - inset)
            .of_size((r.width() + 2 * inset) as u32, (r.height() + 2 * inset) as u32);
        draw_hollow_rect_mut(canvas, outline, OUTLINE_COLOR);
    }
    true
}
