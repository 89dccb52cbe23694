//! Page number stamps
//!
//! A stamp sits centered under the placed page, a fixed distance above its
//! bottom edge. The font size does not follow the page's scale.

use crate::constants::{HELVETICA_CHAR_WIDTH_RATIO, PAGE_NUMBER_FONT_SIZE, PAGE_NUMBER_OFFSET};
use crate::layout::Rect;
use crate::types::{NumberStyle, PageRef};

/// A page number ready to be drawn on an output side
#[derive(Debug, Clone, PartialEq)]
pub struct PageNumberOverlay {
    pub text: String,
    /// Baseline start, in output points
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
}

impl PageNumberOverlay {
    /// Content stream operators drawing the number with font resource `font`
    pub fn to_operations(&self, font: &str) -> String {
        format!(
            "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
            font, self.font_size, self.x, self.y, self.text
        )
    }
}

/// The 1-based number printed for `page`
pub fn page_number(page: &PageRef, style: NumberStyle) -> usize {
    match style {
        NumberStyle::Merged => page.merged_index + 1,
        NumberStyle::Source => page.page_index + 1,
    }
}

/// Compute the stamp for `page` placed at `rect`
pub fn page_number_overlay(page: &PageRef, rect: &Rect, style: NumberStyle) -> PageNumberOverlay {
    let text = page_number(page, style).to_string();
    let text_width = text.len() as f32 * PAGE_NUMBER_FONT_SIZE * HELVETICA_CHAR_WIDTH_RATIO;

    PageNumberOverlay {
        x: rect.center_x() - text_width / 2.0,
        y: rect.y + PAGE_NUMBER_OFFSET.min(rect.height / 2.0),
        font_size: PAGE_NUMBER_FONT_SIZE,
        text,
    }
}
