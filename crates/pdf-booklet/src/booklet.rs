//! Booklet creation pipeline
//!
//! 1. Validate options
//! 2. Open and merge the sources
//! 3. Select pages, split into sub-booklets, compute signature orders
//! 4. Compose and save each sub-booklet, in order
//!
//! [`create_booklet`] runs everything. Callers that want to stop between
//! sub-booklets drive [`plan_booklet`] and [`render_chunk`] themselves.

use crate::chunk::chunk_pages;
use crate::constants::{PROGRESS_DONE, PROGRESS_MERGED, PROGRESS_PLANNED, PROGRESS_STARTED};
use crate::layout::{SignatureOrder, layout_sides, reorder};
use crate::merge::{MergedSource, merge_documents};
use crate::options::{BookletOptions, SourceFile};
use crate::progress::{ProgressSink, chunk_checkpoint};
use crate::range::PageRange;
use crate::raster::{PageRasterizer, RasterSource};
use crate::render::{CopyCache, Graphic, SideWriter, create_image_xobject, create_page_xobject};
use crate::store::{self, page_dimensions};
use crate::types::*;
use image::DynamicImage;
use lopdf::{Document, ObjectId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything decided before any output is written
#[derive(Debug, Clone, PartialEq)]
pub struct BookletPlan {
    /// Pages in the merged sequence
    pub source_pages: usize,
    /// Selected pages, one list per sub-booklet
    pub chunks: Vec<Vec<PageRef>>,
    /// Physical draw order of each sub-booklet
    pub orders: Vec<SignatureOrder>,
    /// Output file of each sub-booklet
    pub output_paths: Vec<PathBuf>,
    /// Output side size in points
    pub page_size: (f32, f32),
}

impl BookletPlan {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn selected_pages(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}

/// Create a booklet from `sources`.
///
/// Returns the written files in order. Raster rendering uses pdfium when the
/// `pdfium` feature is enabled; otherwise use [`create_booklet_with`].
pub async fn create_booklet(
    sources: &[SourceFile],
    options: &BookletOptions,
    progress: &dyn ProgressSink,
) -> Result<Vec<PathBuf>> {
    run(sources, options, default_rasterizer(), progress).await
}

/// Create a booklet, rasterizing pages with `rasterizer` in raster mode
pub async fn create_booklet_with(
    sources: &[SourceFile],
    options: &BookletOptions,
    rasterizer: Arc<dyn PageRasterizer>,
    progress: &dyn ProgressSink,
) -> Result<Vec<PathBuf>> {
    run(sources, options, Some(rasterizer), progress).await
}

#[cfg(feature = "pdfium")]
fn default_rasterizer() -> Option<Arc<dyn PageRasterizer>> {
    Some(Arc::new(crate::raster::PdfiumRasterizer::new()))
}

#[cfg(not(feature = "pdfium"))]
fn default_rasterizer() -> Option<Arc<dyn PageRasterizer>> {
    None
}

async fn run(
    sources: &[SourceFile],
    options: &BookletOptions,
    rasterizer: Option<Arc<dyn PageRasterizer>>,
    progress: &dyn ProgressSink,
) -> Result<Vec<PathBuf>> {
    options.validate()?;
    if matches!(options.render_mode, RenderMode::Raster { .. }) && rasterizer.is_none() {
        return Err(BookletError::config("render_mode"));
    }

    progress.progress(PROGRESS_STARTED);
    progress.status("Merging documents...");
    log::info!("Creating booklet from {} document(s)", sources.len());

    // Dropping `merged` removes the merge artifact on every path out of here
    let merged = merge_documents(sources, options.password.as_deref()).await?;

    progress.progress(PROGRESS_MERGED);
    progress.status("Planning booklet...");

    let plan = plan_booklet(&merged, options)?;
    let total = plan.chunk_count();
    log::info!(
        "{} of {} pages selected, {} booklet(s)",
        plan.selected_pages(),
        plan.source_pages,
        total
    );

    progress.progress(PROGRESS_PLANNED);

    let mut written = Vec::with_capacity(total);
    for index in 0..total {
        progress.status(&format!("Processing booklet {} of {}...", index + 1, total));

        match render_chunk(&merged, &plan, index, options, rasterizer.clone()).await {
            Ok(path) => {
                written.push(path);
                progress.progress(chunk_checkpoint(index, total));
            }
            Err(e) => {
                log::warn!("Booklet {} of {} failed: {}", index + 1, total, e);
                remove_outputs(&written).await;
                return Err(BookletError::Chunk {
                    chunk: index + 1,
                    source: Box::new(e),
                });
            }
        }
    }

    progress.progress(PROGRESS_DONE);
    progress.status("Booklet created");
    log::info!("Wrote {} file(s)", written.len());

    Ok(written)
}

/// Select, split and order the pages of `merged`. Writes nothing.
pub fn plan_booklet(merged: &MergedSource, options: &BookletOptions) -> Result<BookletPlan> {
    let range = PageRange::parse(&options.page_range)?;
    let selected = merged.select(&range)?;

    let chunks = chunk_pages(&selected, options.chunk_sheets())?;
    let orders = chunks
        .iter()
        .map(|chunk| reorder(chunk, options.direction))
        .collect::<Result<Vec<_>>>()?;

    Ok(BookletPlan {
        source_pages: merged.page_count(),
        output_paths: output_paths(&options.output_path, chunks.len()),
        page_size: options.output_size_pt(),
        chunks,
        orders,
    })
}

/// Output file names for `count` sub-booklets.
///
/// A single booklet is written to `output` itself; several get
/// `{stem}_part_{i}{.ext}` (1-based) next to it.
pub fn output_paths(output: &Path, count: usize) -> Vec<PathBuf> {
    if count == 1 {
        return vec![output.to_path_buf()];
    }

    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = output
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    (1..=count)
        .map(|i| output.with_file_name(format!("{}_part_{}{}", stem, i, extension)))
        .collect()
}

/// Compose sub-booklet `index` of `plan` and save it. Returns the written path.
pub async fn render_chunk(
    merged: &MergedSource,
    plan: &BookletPlan,
    index: usize,
    options: &BookletOptions,
    rasterizer: Option<Arc<dyn PageRasterizer>>,
) -> Result<PathBuf> {
    let (Some(chunk), Some(order), Some(path)) = (
        plan.chunks.get(index),
        plan.orders.get(index),
        plan.output_paths.get(index),
    ) else {
        return Err(BookletError::config("chunk index"));
    };

    let graphics = match options.render_mode {
        RenderMode::Vector => {
            let page_ids = chunk
                .iter()
                .map(|page| {
                    merged
                        .page_id(page)
                        .map(|id| (page.merged_index, id))
                        .ok_or_else(|| missing_page(page))
                })
                .collect::<Result<_>>()?;
            ChunkGraphics::Vector {
                source: merged.shared_document(),
                page_ids,
            }
        }
        RenderMode::Raster { dpi } => ChunkGraphics::Raster {
            rasterizer: rasterizer.ok_or_else(|| BookletError::config("render_mode"))?,
            source: merged.raster_source().clone(),
            pages: chunk.clone(),
            dpi,
        },
    };

    let job = ChunkJob {
        order: order.clone(),
        page_size: plan.page_size,
        number_style: options.add_page_numbers.then_some(options.number_style),
        graphics,
    };

    log::debug!(
        "Composing booklet {} ({} pages, {} sides) -> {}",
        index + 1,
        chunk.len(),
        order.len() / 2,
        path.display()
    );

    let doc = tokio::task::spawn_blocking(move || job.compose()).await??;
    store::save_pdf(doc, path).await?;
    Ok(path.clone())
}

/// A planned page that the merged document does not have
fn missing_page(page: &PageRef) -> BookletError {
    BookletError::InvalidConfiguration(format!(
        "planned page {} is not in the merged document",
        page.merged_index + 1
    ))
}

/// How the pages of one sub-booklet get into the output
enum ChunkGraphics {
    Vector {
        source: Arc<Document>,
        page_ids: HashMap<usize, ObjectId>,
    },
    Raster {
        rasterizer: Arc<dyn PageRasterizer>,
        source: RasterSource,
        pages: Vec<PageRef>,
        dpi: u32,
    },
}

/// One sub-booklet's composition, ready to run off the async runtime
struct ChunkJob {
    order: SignatureOrder,
    page_size: (f32, f32),
    number_style: Option<NumberStyle>,
    graphics: ChunkGraphics,
}

impl ChunkJob {
    fn compose(self) -> Result<Document> {
        let (width, height) = self.page_size;
        let mut writer = SideWriter::new(width, height, self.number_style);

        match self.graphics {
            ChunkGraphics::Vector { source, page_ids } => {
                let page_id = |page: &PageRef| {
                    page_ids
                        .get(&page.merged_index)
                        .copied()
                        .ok_or_else(|| missing_page(page))
                };

                // Vector pages are sized in points
                let sides = layout_sides(&self.order, width, height, |page| {
                    Ok(page_dimensions(&source, page_id(page)?))
                })?;

                let mut cache = CopyCache::new();
                for side in &sides {
                    let mut graphics = [None, None];
                    for placement in side.placements() {
                        let id = create_page_xobject(
                            writer.document_mut(),
                            &source,
                            page_id(&placement.page)?,
                            &mut cache,
                        )?;
                        graphics[placement.slot.index()] = Some(Graphic::Form(id));
                    }
                    writer.add_side(side, graphics);
                }
            }
            ChunkGraphics::Raster {
                rasterizer,
                source,
                pages,
                dpi,
            } => {
                let indices: Vec<usize> = pages.iter().map(|page| page.merged_index).collect();
                let rendered = rasterizer.rasterize_pages(&source, &indices, dpi)?;
                if rendered.len() != indices.len() {
                    let missing = indices.get(rendered.len()).copied().unwrap_or_default();
                    return Err(source.error(missing, "rasterizer returned too few pages"));
                }
                let images: HashMap<usize, DynamicImage> =
                    indices.into_iter().zip(rendered).collect();
                let image_of = |page: &PageRef| {
                    images
                        .get(&page.merged_index)
                        .ok_or_else(|| source.error(page.merged_index, "page was not rasterized"))
                };

                // Raster pages are sized in pixels
                let sides = layout_sides(&self.order, width, height, |page| {
                    let image = image_of(page)?;
                    Ok((image.width() as f32, image.height() as f32))
                })?;

                for side in &sides {
                    let mut graphics = [None, None];
                    for placement in side.placements() {
                        let page = &placement.page;
                        let id = create_image_xobject(writer.document_mut(), image_of(page)?)
                            .map_err(|e| source.error(page.merged_index, e))?;
                        graphics[placement.slot.index()] = Some(Graphic::Image(id));
                    }
                    writer.add_side(side, graphics);
                }
            }
        }

        Ok(writer.finish())
    }
}

/// Remove files written earlier in a failed run
async fn remove_outputs(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => log::debug!("Removed partial output {}", path.display()),
            Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}
