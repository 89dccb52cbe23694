//! Merging source documents into one page sequence

use crate::options::SourceFile;
use crate::range::PageRange;
use crate::raster::RasterSource;
use crate::store::{self, INHERITABLE_KEYS, finalize_document, inherited_attribute};
use crate::types::*;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempPath;

/// The merged page sequence of all sources.
///
/// With several sources the merged document is also written to a temporary
/// file (the rasterizer reads from disk). That file lives exactly as long as
/// this value.
#[derive(Debug)]
pub struct MergedSource {
    document: Arc<Document>,
    page_ids: Vec<ObjectId>,
    pages: Vec<PageRef>,
    raster: RasterSource,
    artifact: Option<TempPath>,
}

impl MergedSource {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Shared handle for work moved off the async runtime
    pub(crate) fn shared_document(&self) -> Arc<Document> {
        Arc::clone(&self.document)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every page in merged order
    pub fn pages(&self) -> &[PageRef] {
        &self.pages
    }

    /// Object id of `page` in [`MergedSource::document`]
    pub fn page_id(&self, page: &PageRef) -> Option<ObjectId> {
        self.page_ids.get(page.merged_index).copied()
    }

    /// Where a rasterizer reads the merged pages from
    pub fn raster_source(&self) -> &RasterSource {
        &self.raster
    }

    /// Path of the temporary merged file, if one was needed
    pub fn artifact_path(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    /// Pages picked by `range`, in ascending merged order
    pub fn select(&self, range: &PageRange) -> Result<Vec<PageRef>> {
        let indices = range.resolve(self.page_count())?;
        Ok(indices.into_iter().map(|i| self.pages[i]).collect())
    }
}

impl Drop for MergedSource {
    fn drop(&mut self) {
        if let Some(artifact) = self.artifact.take() {
            let path = artifact.to_path_buf();
            match artifact.close() {
                Ok(()) => log::debug!("Removed merge artifact {}", path.display()),
                Err(e) => log::warn!("Failed to remove merge artifact {}: {}", path.display(), e),
            }
        }
    }
}

/// Open every source and merge their pages in input order.
///
/// Each source is unlocked with its own password, falling back to
/// `shared_password`. Nothing is returned unless every source opens.
pub async fn merge_documents(
    sources: &[SourceFile],
    shared_password: Option<&str>,
) -> Result<MergedSource> {
    if sources.is_empty() {
        return Err(BookletError::EmptySelection);
    }

    let mut documents = Vec::with_capacity(sources.len());
    for source in sources {
        let password = source.password.as_deref().or(shared_password);
        let doc = store::open_document(&source.path, password).await?;
        log::debug!(
            "Opened {} ({} pages)",
            source.display_name(),
            store::page_count(&doc)
        );
        documents.push(doc);
    }

    if let [source] = sources {
        // Single source: use it as is
        let document = documents.remove(0);
        let page_ids = store::page_ids(&document);
        let pages = (0..page_ids.len())
            .map(|i| PageRef {
                document: 0,
                page_index: i,
                merged_index: i,
            })
            .collect();
        let password = source.password.as_deref().or(shared_password);

        return Ok(MergedSource {
            document: Arc::new(document),
            page_ids,
            pages,
            raster: RasterSource {
                path: source.path.clone(),
                password: password.map(str::to_owned),
            },
            artifact: None,
        });
    }

    let (document, page_ids, pages, artifact) = tokio::task::spawn_blocking(move || {
        let (mut document, page_ids, pages) = combine(documents)?;

        let mut file = tempfile::Builder::new()
            .prefix("booklet-merge-")
            .suffix(".pdf")
            .tempfile()?;
        document.save_to(file.as_file_mut())?;
        Ok::<_, BookletError>((document, page_ids, pages, file.into_temp_path()))
    })
    .await??;

    log::info!(
        "Merged {} documents into {} pages",
        sources.len(),
        pages.len()
    );

    Ok(MergedSource {
        document: Arc::new(document),
        page_ids,
        pages,
        raster: RasterSource {
            path: artifact.to_path_buf(),
            password: None,
        },
        artifact: Some(artifact),
    })
}

/// Append the pages of `documents` into one fresh document
fn combine(documents: Vec<Document>) -> Result<(Document, Vec<ObjectId>, Vec<PageRef>)> {
    let mut merged = Document::with_version("1.7");
    let mut page_ids = Vec::new();
    let mut pages = Vec::new();
    let mut next_id = 1;

    for (doc_index, mut doc) in documents.into_iter().enumerate() {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        let ids = store::page_ids(&doc);
        for &id in &ids {
            materialize_inherited(&mut doc, id)?;
        }

        for (page_index, id) in ids.into_iter().enumerate() {
            pages.push(PageRef {
                document: doc_index,
                page_index,
                merged_index: page_ids.len(),
            });
            page_ids.push(id);
        }

        // The old page trees are replaced below
        for (id, object) in doc.objects {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Outlines" | b"Outline" => {}
                _ => {
                    merged.objects.insert(id, object);
                }
            }
        }
    }

    merged.max_id = next_id - 1;
    let pages_tree_id = merged.new_object_id();
    for &id in &page_ids {
        merged
            .get_dictionary_mut(id)?
            .set("Parent", Object::Reference(pages_tree_id));
    }
    finalize_document(&mut merged, pages_tree_id, &page_ids);
    merged.prune_objects();

    Ok((merged, page_ids, pages))
}

/// Copy inherited page attributes onto the page itself
fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc.get_dictionary(page_id)?;
    let missing: Vec<(&[u8], Object)> = INHERITABLE_KEYS
        .iter()
        .filter(|key| !page.has(key))
        .filter_map(|&key| inherited_attribute(doc, page_id, key).map(|value| (key, value)))
        .collect();

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in missing {
        page.set(key, value);
    }
    Ok(())
}
