//! Splitting a page selection into sub-booklets

use crate::constants::PAGES_PER_SHEET;
use crate::types::*;

/// Split `pages` into consecutive chunks of `sheets_per_booklet` sheets.
///
/// `None` keeps everything in a single chunk. The last chunk may be shorter;
/// padding happens later, per chunk, when the signature order is computed.
pub fn chunk_pages<T: Clone>(pages: &[T], sheets_per_booklet: Option<usize>) -> Result<Vec<Vec<T>>> {
    let Some(sheets) = sheets_per_booklet else {
        return Ok(vec![pages.to_vec()]);
    };

    if sheets == 0 {
        return Err(BookletError::config("sheets_per_booklet"));
    }

    let pages_per_booklet = sheets * PAGES_PER_SHEET;
    Ok(pages
        .chunks(pages_per_booklet)
        .map(|chunk| chunk.to_vec())
        .collect())
}
