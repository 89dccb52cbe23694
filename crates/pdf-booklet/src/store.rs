//! Document store: loading, unlocking and saving PDFs

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::io::Write;
use std::path::Path;

/// Page attributes a page may inherit from its ancestors in the page tree
pub(crate) const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Load a PDF and unlock it with `password` (empty when `None`).
///
/// An encrypted document that cannot be unlocked fails with
/// [`BookletError::IncorrectPassword`] naming the file.
pub async fn open_document(path: impl AsRef<Path>, password: Option<&str>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| BookletError::document_io(&path, e))?;
    let password = password.unwrap_or_default().to_owned();

    tokio::task::spawn_blocking(move || load_and_unlock(&path, &bytes, &password)).await?
}

fn load_and_unlock(path: &Path, bytes: &[u8], password: &str) -> Result<Document> {
    let name = file_name(path);

    let mut doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(lopdf::Error::Decryption(_)) => return Err(BookletError::IncorrectPassword(name)),
        Err(e) => return Err(BookletError::document_io(path, e)),
    };

    if doc.is_encrypted() {
        log::debug!("Unlocking {}", name);
        doc.decrypt(password)
            .map_err(|_| BookletError::IncorrectPassword(name))?;
    }

    Ok(doc)
}

/// Number of pages in a loaded document
pub fn page_count(doc: &Document) -> usize {
    doc.get_pages().len()
}

/// Page object ids in page order
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Look up a page attribute, walking up the page tree for inherited values
pub(crate) fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    // Bounded walk; malformed files can contain Parent cycles
    for _ in 0..64 {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Visible region of a page and how a viewer turns it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Effective CropBox (MediaBox when absent) as `[llx, lly, urx, ury]`
    pub bounds: [f32; 4],
    /// Clockwise display rotation: 0, 90, 180 or 270
    pub rotation: u16,
}

impl PageGeometry {
    /// Size of the page as displayed, rotation applied
    pub fn displayed_size(&self) -> (f32, f32) {
        let [llx, lly, urx, ury] = self.bounds;
        let (width, height) = (urx - llx, ury - lly);
        match self.rotation {
            90 | 270 => (height, width),
            _ => (width, height),
        }
    }

    /// Matrix `[a b c d e f]` taking page space to the displayed page, with
    /// the displayed lower-left corner at the origin
    pub fn display_matrix(&self) -> [f32; 6] {
        let [llx, lly, urx, ury] = self.bounds;
        match self.rotation {
            90 => [0.0, -1.0, 1.0, 0.0, -lly, urx],
            180 => [-1.0, 0.0, 0.0, -1.0, urx, ury],
            270 => [0.0, 1.0, -1.0, 0.0, ury, -llx],
            _ => [1.0, 0.0, 0.0, 1.0, -llx, -lly],
        }
    }
}

/// Effective crop box and rotation of a page.
///
/// Pages without a usable CropBox or MediaBox get [`DEFAULT_PAGE_DIMENSIONS`].
pub fn page_geometry(doc: &Document, page_id: ObjectId) -> PageGeometry {
    let usable_box = |key: &[u8]| {
        inherited_attribute(doc, page_id, key)
            .and_then(|value| box_rect(doc, &value))
            .filter(|[llx, lly, urx, ury]| urx > llx && ury > lly)
    };
    let (width, height) = DEFAULT_PAGE_DIMENSIONS;
    let bounds = usable_box(b"CropBox")
        .or_else(|| usable_box(b"MediaBox"))
        .unwrap_or([0.0, 0.0, width, height]);

    let rotation = inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|value| match value {
            Object::Reference(id) => doc.get_object(id).ok().and_then(extract_number),
            other => extract_number(&other),
        })
        .map(|degrees| match (degrees.round() as i64).rem_euclid(360) {
            90 => 90,
            180 => 180,
            270 => 270,
            _ => 0,
        })
        .unwrap_or(0);

    PageGeometry { bounds, rotation }
}

/// Displayed page size (width, height) in points.
///
/// Uses the effective CropBox and swaps the sides for pages rotated by 90
/// or 270 degrees.
pub fn page_dimensions(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    page_geometry(doc, page_id).displayed_size()
}

/// Resolve a page box object to `[llx, lly, urx, ury]`, corners normalised
pub(crate) fn box_rect(doc: &Document, page_box: &Object) -> Option<[f32; 4]> {
    let array = match page_box {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };
    if array.len() != 4 {
        return None;
    }

    let mut rect = [0.0; 4];
    for (slot, value) in rect.iter_mut().zip(array) {
        *slot = extract_number(value)?;
    }
    let [x0, y0, x1, y1] = rect;
    Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
}

/// Extract numeric value from a PDF object
pub(crate) fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Save a document.
///
/// The file is written next to `path` under a temporary name and renamed into
/// place once complete, so a failed save never leaves a truncated file.
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        write_atomically(&path, &writer).map_err(|e| BookletError::document_io(&path, e))
    })
    .await?
}

fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::Builder::new()
        .prefix(".booklet-")
        .suffix(".partial")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    // Dropping the temp file on error removes it
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Install the page tree and catalog. `pages_tree_id` must be reserved
/// already and referenced as `Parent` by every page in `page_ids`.
pub(crate) fn finalize_document(output: &mut Document, pages_tree_id: ObjectId, page_ids: &[ObjectId]) {
    let kids: Vec<Object> = page_ids.iter().copied().map(Object::Reference).collect();
    let count = kids.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Stream;

    fn doc_with_inherited_media_box() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));
        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]));
        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter([
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(10),
                        Object::Integer(20),
                        Object::Integer(310),
                        Object::Real(420.0),
                    ]),
                ),
            ])),
        );
        let catalog_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));
        (doc, page_id)
    }

    #[test]
    fn test_inherited_media_box() {
        let (doc, page_id) = doc_with_inherited_media_box();
        assert_eq!(page_dimensions(&doc, page_id), (300.0, 400.0));
        assert_eq!(page_count(&doc), 1);
        assert_eq!(page_ids(&doc), vec![page_id]);
    }

    #[test]
    fn test_missing_media_box_uses_default() {
        let (mut doc, page_id) = doc_with_inherited_media_box();
        let pages_id = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Parent")
            .unwrap()
            .as_reference()
            .unwrap();
        doc.get_dictionary_mut(pages_id).unwrap().remove(b"MediaBox");
        assert_eq!(page_dimensions(&doc, page_id), DEFAULT_PAGE_DIMENSIONS);
    }

    #[test]
    fn test_rotation_swaps_displayed_size() {
        let (mut doc, page_id) = doc_with_inherited_media_box();
        for (rotate, expected) in [
            (90, (400.0, 300.0)),
            (180, (300.0, 400.0)),
            (-90, (400.0, 300.0)),
            (450, (400.0, 300.0)),
            (45, (300.0, 400.0)),
        ] {
            doc.get_dictionary_mut(page_id)
                .unwrap()
                .set("Rotate", Object::Integer(rotate));
            assert_eq!(page_dimensions(&doc, page_id), expected, "Rotate {}", rotate);
        }
        assert_eq!(page_geometry(&doc, page_id).rotation, 0);
    }

    #[test]
    fn test_crop_box_wins_over_media_box() {
        let (mut doc, page_id) = doc_with_inherited_media_box();
        let page = doc.get_dictionary_mut(page_id).unwrap();
        page.set(
            "CropBox",
            Object::Array(vec![
                Object::Integer(60),
                Object::Integer(20),
                Object::Integer(260),
                Object::Integer(120),
            ]),
        );
        let geometry = page_geometry(&doc, page_id);
        assert_eq!(geometry.bounds, [60.0, 20.0, 260.0, 120.0]);
        assert_eq!(geometry.displayed_size(), (200.0, 100.0));
    }

    #[test]
    fn test_degenerate_crop_box_falls_back_to_media_box() {
        let (mut doc, page_id) = doc_with_inherited_media_box();
        doc.get_dictionary_mut(page_id).unwrap().set(
            "CropBox",
            Object::Array(vec![Object::Integer(0); 4]),
        );
        assert_eq!(page_dimensions(&doc, page_id), (300.0, 400.0));
    }

    #[test]
    fn test_display_matrix_maps_corners() {
        let apply = |m: [f32; 6], (x, y): (f32, f32)| (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5]);
        let bounds = [10.0, 20.0, 110.0, 220.0];

        // The page's lower-left corner lands on each displayed corner in turn
        for (rotation, expected) in [
            (0, (0.0, 0.0)),
            (90, (0.0, 100.0)),
            (180, (100.0, 200.0)),
            (270, (200.0, 0.0)),
        ] {
            let geometry = PageGeometry { bounds, rotation };
            assert_eq!(apply(geometry.display_matrix(), (10.0, 20.0)), expected);
        }
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = open_document("/definitely/not/here.pdf", None).await;
        match result {
            Err(BookletError::DocumentIo { path, .. }) => {
                assert_eq!(path, Path::new("/definitely/not/here.pdf"))
            }
            other => panic!("expected DocumentIo, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_save_and_reopen() {
        let (doc, _) = doc_with_inherited_media_box();
        let file = tempfile::NamedTempFile::new().unwrap();
        save_pdf(doc, file.path()).await.unwrap();

        let reopened = open_document(file.path(), None).await.unwrap();
        assert_eq!(page_count(&reopened), 1);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.pdf");
        let (doc, _) = doc_with_inherited_media_box();

        match save_pdf(doc, &target).await {
            Err(BookletError::DocumentIo { path, .. }) => assert_eq!(path, target),
            other => panic!("expected DocumentIo, got {other:?}"),
        }
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file
        let target = dir.path().join("taken.pdf");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), b"x").unwrap();
        let (doc, _) = doc_with_inherited_media_box();

        assert!(save_pdf(doc, &target).await.is_err());

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("taken.pdf")]);
        assert!(target.is_dir());
    }
}
