//! Form XObjects from source pages
//!
//! Each placed source page becomes a Form XObject in the output document.
//! Its resources are deep-copied from the source; a per-output cache keeps
//! shared resources (fonts, images) from being copied twice.

use crate::store::{inherited_attribute, page_geometry};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Maps source object ids to their copies in the output document
pub type CopyCache = HashMap<ObjectId, ObjectId>;

/// Create a Form XObject drawing `page_id` of `source`.
///
/// The form is clipped to the page's effective CropBox and turned by its
/// `/Rotate`, so it draws the page as a viewer displays it with the displayed
/// lower-left corner at the form's origin.
pub fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut CopyCache,
) -> Result<ObjectId> {
    let page_dict = source.get_dictionary(page_id)?;
    let content = page_content(source, page_dict)?;

    let mut xobject_dict = Dictionary::new();
    xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
    xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    xobject_dict.set("FormType", Object::Integer(1));

    let geometry = page_geometry(source, page_id);
    xobject_dict.set("BBox", real_array(&geometry.bounds));
    let matrix = geometry.display_matrix();
    if matrix != IDENTITY {
        xobject_dict.set("Matrix", real_array(&matrix));
    }

    if let Some(resources) = inherited_attribute(source, page_id, b"Resources") {
        xobject_dict.set(
            "Resources",
            copy_object_deep(output, source, &resources, cache)?,
        );
    }

    Ok(output.add_object(Stream::new(xobject_dict, content)))
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn real_array(values: &[f32]) -> Object {
    Object::Array(values.iter().map(|&v| Object::Real(v)).collect())
}

// =============================================================================
// Page Content Extraction
// =============================================================================

/// Decoded content of a page, streams concatenated in order
fn page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(refs) => concatenated_streams(doc, refs),
            _ => single_stream(doc, *id),
        },
        Object::Array(refs) => concatenated_streams(doc, refs),
        _ => Ok(Vec::new()),
    }
}

fn single_stream(doc: &Document, id: ObjectId) -> Result<Vec<u8>> {
    match doc.get_object(id)?.as_stream() {
        Ok(stream) => Ok(stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone())),
        Err(_) => Ok(Vec::new()),
    }
}

fn concatenated_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    for obj in refs {
        if let Object::Reference(id) = obj {
            result.extend(single_stream(doc, *id)?);
            result.push(b'\n');
        }
    }
    Ok(result)
}

// =============================================================================
// Deep Copy
// =============================================================================

/// Deep copy an object from `source` into `output`, following references.
///
/// Object ids are reserved before recursing so reference cycles terminate.
pub fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut CopyCache,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }

            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                // Dangling references resolve to null
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);

            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, cache,
        )?)),
        Object::Array(arr) => {
            let new_arr: Result<Vec<_>> = arr
                .iter()
                .map(|item| copy_object_deep(output, source, item, cache))
                .collect();
            Ok(Object::Array(new_arr?))
        }
        Object::Stream(stream) => Ok(Object::Stream(Stream {
            dict: copy_dictionary(output, source, &stream.dict, cache)?,
            content: stream.content.clone(),
            allows_compression: stream.allows_compression,
            start_position: None,
        })),
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut CopyCache,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(new_dict)
}
