//! Content placement within output sides
//!
//! Every output side is split into a left and a right half. A page is
//! scaled to fit 90% of its half (never enlarged past its intrinsic size)
//! and centered in it.

use crate::constants::{FIT_RATIO, PAGES_PER_SIDE};
use crate::types::{PageRef, Result};

use super::{Placement, Rect, SideLayout, SlotPosition};

/// Scale factor for a page of `source_width × source_height` in a cell
/// allowing `max_width × max_height`. Never above 1.0.
pub fn fit_scale(source_width: f32, source_height: f32, max_width: f32, max_height: f32) -> f32 {
    (max_width / source_width)
        .min(max_height / source_height)
        .min(1.0)
}

/// Place one page in the given half of an output side.
pub fn place_in_half(
    page: PageRef,
    source_size: (f32, f32),
    slot: SlotPosition,
    side: usize,
    output_width: f32,
    output_height: f32,
) -> Placement {
    let (source_width, source_height) = source_size;
    let half_width = output_width / 2.0;

    let scale = fit_scale(
        source_width,
        source_height,
        half_width * FIT_RATIO,
        output_height * FIT_RATIO,
    );

    let width = source_width * scale;
    let height = source_height * scale;

    let half_origin = match slot {
        SlotPosition::Left => 0.0,
        SlotPosition::Right => half_width,
    };

    Placement {
        page,
        rect: Rect::new(
            half_origin + (half_width - width) / 2.0,
            (output_height - height) / 2.0,
            width,
            height,
        ),
        scale,
        side,
        slot,
    }
}

/// Lay out a signature order as output sides.
///
/// `size_of` returns the intrinsic size of a page (points for vector
/// rendering, pixels for raster rendering). Blank slots produce no
/// placement.
pub fn layout_sides<F>(
    order: &[Option<PageRef>],
    output_width: f32,
    output_height: f32,
    mut size_of: F,
) -> Result<Vec<SideLayout>>
where
    F: FnMut(&PageRef) -> Result<(f32, f32)>,
{
    let mut sides = Vec::with_capacity(order.len().div_ceil(PAGES_PER_SIDE));

    for (index, pair) in order.chunks(PAGES_PER_SIDE).enumerate() {
        let mut place = |slot: Option<&Option<PageRef>>, position| -> Result<Option<Placement>> {
            match slot.copied().flatten() {
                Some(page) => {
                    let size = size_of(&page)?;
                    Ok(Some(place_in_half(
                        page,
                        size,
                        position,
                        index,
                        output_width,
                        output_height,
                    )))
                }
                None => Ok(None),
            }
        };

        let left = place(pair.first(), SlotPosition::Left)?;
        let right = place(pair.get(1), SlotPosition::Right)?;
        sides.push(SideLayout { index, left, right });
    }

    Ok(sides)
}
