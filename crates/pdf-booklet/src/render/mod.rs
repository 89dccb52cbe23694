//! PDF output for booklets
//!
//! - Form XObjects from source pages (vector mode)
//! - JPEG image XObjects from rasterized pages (raster mode)
//! - Output sides with placement transforms and page numbers

mod bitmap;
mod side;
mod xobject;

pub use bitmap::create_image_xobject;
pub use side::{Graphic, SideWriter};
pub use xobject::{CopyCache, copy_object_deep, create_page_xobject};
