use crate::booklet::{BookletPlan, plan_booklet};
use crate::constants::{PAGES_PER_SHEET, PAGES_PER_SIDE};
use crate::merge::merge_documents;
use crate::options::{BookletOptions, SourceFile};
use crate::types::*;

/// Calculate statistics for a planned booklet
pub fn calculate_statistics(plan: &BookletPlan) -> BookletStatistics {
    let pages_per_booklet: Vec<usize> = plan.chunks.iter().map(Vec::len).collect();
    let selected_pages = pages_per_booklet.iter().sum();

    // Each sub-booklet is padded on its own
    let padded_pages: usize = plan.orders.iter().map(Vec::len).sum();
    let output_sheets = padded_pages / PAGES_PER_SHEET;

    BookletStatistics {
        source_pages: plan.source_pages,
        selected_pages,
        booklets: plan.chunk_count(),
        pages_per_booklet,
        output_sheets,
        output_pages: padded_pages / PAGES_PER_SIDE,
        blank_pages_added: padded_pages - selected_pages,
    }
}

/// Open the sources and report what [`create_booklet`](crate::create_booklet)
/// would produce, without writing anything.
pub async fn booklet_statistics(
    sources: &[SourceFile],
    options: &BookletOptions,
) -> Result<BookletStatistics> {
    options.validate()?;
    let merged = merge_documents(sources, options.password.as_deref()).await?;
    let plan = plan_booklet(&merged, options)?;
    Ok(calculate_statistics(&plan))
}
