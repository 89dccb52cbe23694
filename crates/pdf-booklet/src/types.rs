use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookletError {
    #[error("Incorrect password for {0}")]
    IncorrectPassword(String),
    #[error("Malformed page range token: '{0}'")]
    MalformedRange(String),
    #[error("No pages selected")]
    EmptySelection,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Document error for {}: {source}", path.display())]
    DocumentIo {
        path: PathBuf,
        #[source]
        source: DocumentIoCause,
    },
    #[error("Failed to rasterize page {} of {}: {message}", page_index + 1, path.display())]
    Rasterization {
        path: PathBuf,
        page_index: usize,
        message: String,
    },
    #[error("Booklet part {chunk} failed: {source}")]
    Chunk {
        chunk: usize,
        #[source]
        source: Box<BookletError>,
    },
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Underlying cause of a [`BookletError::DocumentIo`]
#[derive(Error, Debug)]
pub enum DocumentIoCause {
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BookletError {
    pub(crate) fn document_io(path: impl Into<PathBuf>, cause: impl Into<DocumentIoCause>) -> Self {
        BookletError::DocumentIo {
            path: path.into(),
            source: cause.into(),
        }
    }

    pub(crate) fn config(field: impl Into<String>) -> Self {
        BookletError::InvalidConfiguration(field.into())
    }
}

pub type Result<T> = std::result::Result<T, BookletError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width and height are swapped
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    /// No explicit choice; resolves to A4
    #[default]
    Auto,
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::Auto | PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Reading direction of the finished booklet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Left-to-right: the spine is on the left of the closed booklet
    #[default]
    Ltr,
    /// Right-to-left: the spine is on the right (Arabic, Hebrew, ...)
    Rtl,
}

/// Which number is stamped when page numbering is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberStyle {
    /// Position in the merged page sequence
    #[default]
    Merged,
    /// Page number within the originating document
    Source,
}

/// How source pages are drawn onto output sides
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenderMode {
    /// Embed each page as a Form XObject (lossless)
    #[default]
    Vector,
    /// Rasterize each page at the given resolution and embed the image
    Raster { dpi: u32 },
}

/// A real page of the merged sequence.
///
/// Blank padding slots are never a `PageRef`; they are `None` wherever an
/// `Option<PageRef>` is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRef {
    /// Position of the source document in the caller's list
    pub document: usize,
    /// 0-based page index inside the source document
    pub page_index: usize,
    /// 0-based index into the merged page sequence
    pub merged_index: usize,
}

/// Statistics about a booklet run
#[derive(Debug, Clone, PartialEq)]
pub struct BookletStatistics {
    /// Pages available after merging
    pub source_pages: usize,
    /// Pages left after range selection
    pub selected_pages: usize,
    /// Number of booklets (output files)
    pub booklets: usize,
    /// Selected pages per booklet, before padding
    pub pages_per_booklet: Vec<usize>,
    /// Physical sheets across all booklets
    pub output_sheets: usize,
    /// Output sides (PDF pages) across all booklets
    pub output_pages: usize,
    /// Number of blank pages added for padding
    pub blank_pages_added: usize,
}
