mod booklet;
mod chunk;
pub mod constants;
pub mod layout;
mod merge;
pub mod overlay;
mod options;
mod progress;
mod range;
pub mod raster;
pub mod render;
mod stats;
pub mod store;
mod types;

pub use booklet::{
    BookletPlan, create_booklet, create_booklet_with, output_paths, plan_booklet, render_chunk,
};
pub use chunk::chunk_pages;
pub use merge::{MergedSource, merge_documents};
pub use options::*;
pub use progress::{BookletUpdate, CallbackProgress, NoProgress, ProgressSink};
pub use range::{PageRange, RangeItem, parse_page_range};
pub use raster::{PageRasterizer, RasterSource};
pub use stats::{booklet_statistics, calculate_statistics};
pub use store::{open_document, save_pdf};
pub use types::*;

#[cfg(feature = "pdfium")]
pub use raster::PdfiumRasterizer;
