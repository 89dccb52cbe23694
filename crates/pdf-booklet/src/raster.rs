//! Page rasterization for [`RenderMode::Raster`](crate::RenderMode::Raster)
//!
//! The pipeline only needs "page `i` of this file as an image"; the
//! [`PageRasterizer`] trait is that seam. [`PdfiumRasterizer`] implements it
//! on top of pdfium (feature `pdfium`).

use crate::types::*;
use image::DynamicImage;
use std::path::PathBuf;

/// A PDF on disk a rasterizer can open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSource {
    pub path: PathBuf,
    pub password: Option<String>,
}

impl RasterSource {
    /// Build a [`BookletError::Rasterization`] for page `page_index` of this file
    pub fn error(&self, page_index: usize, message: impl ToString) -> BookletError {
        BookletError::Rasterization {
            path: self.path.clone(),
            page_index,
            message: message.to_string(),
        }
    }
}

/// Renders PDF pages to images
pub trait PageRasterizer: Send + Sync {
    /// Render one page (0-based) at `dpi`
    fn rasterize(&self, source: &RasterSource, page_index: usize, dpi: u32) -> Result<DynamicImage>;

    /// Render several pages, in the given order.
    ///
    /// Implementations that pay a per-open cost should override this.
    fn rasterize_pages(
        &self,
        source: &RasterSource,
        page_indices: &[usize],
        dpi: u32,
    ) -> Result<Vec<DynamicImage>> {
        page_indices
            .iter()
            .map(|&page_index| self.rasterize(source, page_index, dpi))
            .collect()
    }
}

#[cfg(feature = "pdfium")]
pub use self::pdfium::PdfiumRasterizer;

#[cfg(feature = "pdfium")]
mod pdfium {
    use super::{PageRasterizer, RasterSource};
    use crate::constants::POINTS_PER_INCH;
    use crate::types::*;
    use image::DynamicImage;
    use pdfium_render::prelude::*;
    use std::path::PathBuf;

    /// Rasterizer backed by the pdfium library
    #[derive(Debug, Clone, Default)]
    pub struct PdfiumRasterizer {
        library_dir: Option<PathBuf>,
    }

    impl PdfiumRasterizer {
        /// Bind to the system pdfium library
        pub fn new() -> Self {
            Self::default()
        }

        /// Try the pdfium library in `dir` before the system one
        pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
            Self {
                library_dir: Some(dir.into()),
            }
        }

        fn bind(&self) -> std::result::Result<Pdfium, PdfiumError> {
            if let Some(dir) = &self.library_dir {
                match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)) {
                    Ok(binding) => return Ok(Pdfium::new(binding)),
                    Err(e) => log::warn!("No pdfium in {}: {}, trying system library", dir.display(), e),
                }
            }
            Pdfium::bind_to_system_library().map(Pdfium::new)
        }
    }

    impl PageRasterizer for PdfiumRasterizer {
        fn rasterize(&self, source: &RasterSource, page_index: usize, dpi: u32) -> Result<DynamicImage> {
            self.rasterize_pages(source, &[page_index], dpi)?
                .pop()
                .ok_or_else(|| source.error(page_index, "no image produced"))
        }

        fn rasterize_pages(
            &self,
            source: &RasterSource,
            page_indices: &[usize],
            dpi: u32,
        ) -> Result<Vec<DynamicImage>> {
            let first = page_indices.first().copied().unwrap_or_default();
            let pdfium = self.bind().map_err(|e| source.error(first, e))?;
            let document = pdfium
                .load_pdf_from_file(&source.path, source.password.as_deref())
                .map_err(|e| source.error(first, e))?;
            let pages = document.pages();

            page_indices
                .iter()
                .map(|&page_index| {
                    let page = pages
                        .get(page_index as u16)
                        .map_err(|e| source.error(page_index, e))?;

                    let target_width =
                        (page.width().value / POINTS_PER_INCH * dpi as f32).round() as i32;
                    let config = PdfRenderConfig::new().set_target_width(target_width.max(1));

                    let bitmap = page
                        .render_with_config(&config)
                        .map_err(|e| source.error(page_index, e))?;
                    Ok(bitmap.as_image())
                })
                .collect()
        }
    }
}
