//! Shared constants for booklet creation
//!
//! This module centralizes magic numbers and constants used throughout
//! the booklet pipeline.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Signatures and Layout
// =============================================================================

/// Logical pages on one folded sheet (two per side)
pub const PAGES_PER_SHEET: usize = 4;

/// Logical pages on one side of a sheet
pub const PAGES_PER_SIDE: usize = 2;

/// Fraction of each half-sheet cell a page may occupy
pub const FIT_RATIO: f32 = 0.9;

/// Default number of sheets per sub-booklet when splitting
pub const DEFAULT_SHEETS_PER_BOOKLET: usize = 10;

/// Default rasterization resolution
pub const DEFAULT_RASTER_DPI: u32 = 300;

/// JPEG quality for rasterized pages
pub const RASTER_JPEG_QUALITY: u8 = 90;

// =============================================================================
// Page Numbers
// =============================================================================

/// Font size for page numbers (points)
pub const PAGE_NUMBER_FONT_SIZE: f32 = 9.0;

/// Distance of the page number baseline above the page's bottom edge (0.25")
pub const PAGE_NUMBER_OFFSET: f32 = 0.25 * POINTS_PER_INCH;

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

// =============================================================================
// Progress Checkpoints
// =============================================================================

pub const PROGRESS_STARTED: u8 = 5;
pub const PROGRESS_MERGED: u8 = 20;
pub const PROGRESS_PLANNED: u8 = 40;
pub const PROGRESS_DONE: u8 = 100;
