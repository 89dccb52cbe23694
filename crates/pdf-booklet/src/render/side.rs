//! Output side rendering
//!
//! A [`SideWriter`] owns the output document of one booklet and appends one
//! PDF page per output side.

use crate::layout::{Placement, SideLayout};
use crate::overlay::page_number_overlay;
use crate::store::finalize_document;
use crate::types::NumberStyle;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Font resource name used for page numbers
const NUMBER_FONT: &str = "F1";

/// A source page already embedded in the output document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Graphic {
    /// Form XObject; drawn at its intrinsic size times the placement scale
    Form(ObjectId),
    /// Image XObject; drawn into the placement rectangle
    Image(ObjectId),
}

impl Graphic {
    pub fn id(self) -> ObjectId {
        match self {
            Graphic::Form(id) | Graphic::Image(id) => id,
        }
    }

    fn draw_operations(self, name: &str, placement: &Placement) -> String {
        let rect = &placement.rect;
        match self {
            Graphic::Form(_) => format!(
                "q {} 0 0 {} {} {} cm /{} Do Q\n",
                placement.scale, placement.scale, rect.x, rect.y, name
            ),
            // Images occupy the unit square
            Graphic::Image(_) => format!(
                "q {} 0 0 {} {} {} cm /{} Do Q\n",
                rect.width, rect.height, rect.x, rect.y, name
            ),
        }
    }
}

/// Builds the output document of one booklet, side by side
pub struct SideWriter {
    output: Document,
    pages_tree_id: ObjectId,
    page_ids: Vec<ObjectId>,
    width: f32,
    height: f32,
    numbering: Option<(NumberStyle, ObjectId)>,
}

impl SideWriter {
    /// Start an output document with sides of `width × height` points.
    ///
    /// With `number_style` set, every placed page gets a page number.
    pub fn new(width: f32, height: f32, number_style: Option<NumberStyle>) -> Self {
        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();

        let numbering = number_style.map(|style| {
            let font_id = output.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Font".to_vec())),
                ("Subtype", Object::Name(b"Type1".to_vec())),
                ("BaseFont", Object::Name(b"Helvetica".to_vec())),
            ]));
            (style, font_id)
        });

        Self {
            output,
            pages_tree_id,
            page_ids: Vec::new(),
            width,
            height,
            numbering,
        }
    }

    /// The document being built, for embedding graphics
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.output
    }

    /// Append one side. `graphics` is indexed by slot (left, right); a slot
    /// without both a placement and a graphic stays blank.
    pub fn add_side(&mut self, side: &SideLayout, graphics: [Option<Graphic>; 2]) -> ObjectId {
        let mut content = String::new();
        let mut xobjects = Dictionary::new();

        for placement in side.placements() {
            let slot = placement.slot.index();
            let Some(graphic) = graphics[slot] else {
                continue;
            };
            let name = format!("P{}", slot);
            xobjects.set(name.as_bytes(), Object::Reference(graphic.id()));
            content.push_str(&graphic.draw_operations(&name, placement));
        }

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        if let Some((style, font_id)) = self.numbering {
            for placement in side.placements() {
                let overlay = page_number_overlay(&placement.page, &placement.rect, style);
                content.push_str(&overlay.to_operations(NUMBER_FONT));
            }
            resources.set(
                "Font",
                Object::Dictionary(Dictionary::from_iter(vec![(
                    NUMBER_FONT,
                    Object::Reference(font_id),
                )])),
            );
        }

        let content_id = self
            .output
            .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(self.pages_tree_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(self.width),
                    Object::Real(self.height),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]);

        let page_id = self.output.add_object(page_dict);
        self.page_ids.push(page_id);
        page_id
    }

    /// Install the page tree and hand out the finished document
    pub fn finish(mut self) -> Document {
        finalize_document(&mut self.output, self.pages_tree_id, &self.page_ids);
        self.output
    }
}
