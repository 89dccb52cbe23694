//! Image XObjects for rasterized pages

use crate::constants::RASTER_JPEG_QUALITY;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageResult};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Embed `image` as a JPEG (DCTDecode) image XObject.
///
/// Transparency is dropped; the image is drawn as opaque RGB.
pub fn create_image_xobject(output: &mut Document, image: &DynamicImage) -> ImageResult<ObjectId> {
    let rgb = image.to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, RASTER_JPEG_QUALITY).encode_image(&rgb)?;

    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(rgb.width()))),
        ("Height", Object::Integer(i64::from(rgb.height()))),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"DCTDecode".to_vec())),
    ]);

    // Already compressed; keep lopdf from flate-wrapping it
    let stream = Stream::new(dict, jpeg).with_compression(false);
    Ok(output.add_object(stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_xobject_dictionary() {
        let mut output = Document::with_version("1.7");
        let image = DynamicImage::new_rgba8(30, 20);

        let id = create_image_xobject(&mut output, &image).unwrap();
        let stream = output.get_object(id).unwrap().as_stream().unwrap();

        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 30);
        assert_eq!(stream.dict.get(b"Height").unwrap().as_i64().unwrap(), 20);
        assert_eq!(stream.dict.get(b"Filter").unwrap().as_name().unwrap(), b"DCTDecode");
        // JPEG SOI marker
        assert_eq!(&stream.content[..2], &[0xFF, 0xD8]);
    }
}
