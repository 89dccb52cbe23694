//! Signature ordering
//!
//! A saddle-stitched booklet is a stack of sheets folded once. Each sheet
//! carries four logical pages, two per side. For a booklet of `n` pages the
//! outermost sheet holds the first two and the last two pages, the next sheet
//! the following two and the two before those, and so on.
//!
//! ```text
//! LTR, 8 pages:   front [8 | 1]   back [2 | 7]     (sheet 1)
//!                 front [6 | 3]   back [4 | 5]     (sheet 2)
//!
//! RTL, 8 pages:   front [1 | 8]   back [7 | 2]
//!                 front [3 | 6]   back [5 | 4]
//! ```
//!
//! The order is produced by taking alternately from the back and the front of
//! the padded page list through two cursors.

use crate::constants::PAGES_PER_SHEET;
use crate::types::*;

/// End of the remaining page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Front,
    Back,
}

/// Head/tail cursors over a fixed buffer. `head..tail` is what remains.
struct Cursors {
    head: usize,
    tail: usize,
}

impl Cursors {
    fn new(len: usize) -> Self {
        Self { head: 0, tail: len }
    }

    fn is_empty(&self) -> bool {
        self.head >= self.tail
    }

    /// Index of the element taken from `end`. Callers check `is_empty` first.
    fn take(&mut self, end: End) -> usize {
        match end {
            End::Front => {
                self.head += 1;
                self.head - 1
            }
            End::Back => {
                self.tail -= 1;
                self.tail
            }
        }
    }
}

/// Number of blank pages needed to fill the last sheet
pub fn padding_for(page_count: usize) -> usize {
    (PAGES_PER_SHEET - page_count % PAGES_PER_SHEET) % PAGES_PER_SHEET
}

/// Compute the physical draw order for one booklet.
///
/// Returns `pages.len() + padding_for(pages.len())` slots; `None` marks a
/// blank. Consecutive pairs are output sides (left, right) and consecutive
/// groups of four are sheets (front side, back side).
pub fn reorder<T: Copy>(pages: &[T], direction: Direction) -> Result<Vec<Option<T>>> {
    if pages.is_empty() {
        return Err(BookletError::EmptySelection);
    }

    let padded: Vec<Option<T>> = pages
        .iter()
        .copied()
        .map(Some)
        .chain(std::iter::repeat_n(None, padding_for(pages.len())))
        .collect();

    // LTR: back, front, front, back. RTL mirrors it.
    let (outer, inner) = match direction {
        Direction::Ltr => (End::Back, End::Front),
        Direction::Rtl => (End::Front, End::Back),
    };

    let mut cursors = Cursors::new(padded.len());
    let mut order = Vec::with_capacity(padded.len());

    while !cursors.is_empty() {
        order.push(padded[cursors.take(outer)]);
        order.push(padded[cursors.take(inner)]);
        if !cursors.is_empty() {
            order.push(padded[cursors.take(inner)]);
            order.push(padded[cursors.take(outer)]);
        }
    }

    Ok(order)
}

// =============================================================================
// Tests
// =============================================================================
