#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};

/// A document whose page `i` has the content marker `labels[i]`
pub fn create_test_pdf(labels: &[&str]) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for label in labels {
        let content = format!("% {}\nq Q", label).into_bytes();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Write a test document with `pages` pages labelled `{name}:{i}`
pub fn write_test_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let labels: Vec<String> = (0..pages).map(|i| format!("{}:{}", name, i)).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    write_document(dir, name, create_test_pdf(&labels))
}

/// Write `doc` as `{name}.pdf` in `dir`
pub fn write_document(dir: &Path, name: &str, mut doc: Document) -> PathBuf {
    let path = dir.join(format!("{}.pdf", name));
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    std::fs::write(&path, writer).unwrap();
    path
}

/// Password of the encrypted fixture
pub const LOCKED_PASSWORD: &str = "booklet";

/// Copy the encrypted two-page fixture (`locked:0`, `locked:1`) into `dir`.
///
/// It uses the standard security handler (RC4, 40-bit) with user password
/// [`LOCKED_PASSWORD`].
pub fn copy_locked_pdf(dir: &Path) -> PathBuf {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/locked.pdf");
    let path = dir.join("locked.pdf");
    std::fs::copy(fixture, &path).unwrap();
    path
}

fn load(path: &Path) -> Document {
    Document::load(path).unwrap()
}

/// For every output side, the markers drawn in the left and right slot
pub fn slot_markers(path: &Path) -> Vec<[Option<String>; 2]> {
    let doc = load(path);
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();

            let marker = |name: &[u8]| {
                let id = xobjects.get(name).ok()?.as_reference().ok()?;
                let stream = doc.get_object(id).ok()?.as_stream().ok()?;
                let content = String::from_utf8_lossy(&stream.content).into_owned();
                content
                    .lines()
                    .next()
                    .and_then(|line| line.strip_prefix("% "))
                    .map(str::to_owned)
            };
            [marker(&b"P0"[..]), marker(&b"P1"[..])]
        })
        .collect()
}

/// Decoded content stream of every output side
pub fn side_contents(path: &Path) -> Vec<String> {
    let doc = load(path);
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let page = doc.get_dictionary(page_id).unwrap();
            let content_id = page.get(b"Contents").unwrap().as_reference().unwrap();
            let stream = doc.get_object(content_id).unwrap().as_stream().unwrap();
            String::from_utf8_lossy(&stream.content).into_owned()
        })
        .collect()
}

/// MediaBox width and height of the first output side
pub fn side_size(path: &Path) -> (f32, f32) {
    let doc = load(path);
    let page_id = *doc.get_pages().values().next().unwrap();
    let media_box = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .clone();
    let number = |obj: &Object| match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        _ => panic!("not a number"),
    };
    (number(&media_box[2]), number(&media_box[3]))
}

pub fn marker(label: &str) -> Option<String> {
    Some(label.to_string())
}
