use crate::constants::DEFAULT_SHEETS_PER_BOOKLET;
use crate::range::PageRange;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One input document and the password that unlocks it
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceFile {
    pub path: PathBuf,
    /// Overrides [`BookletOptions::password`] for this document
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// File name used in error messages
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl From<PathBuf> for SourceFile {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for SourceFile {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Booklet configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BookletOptions {
    // Output
    pub output_path: PathBuf,

    // Page selection, e.g. "1-10, 15"
    pub page_range: String,

    // Layout
    pub direction: Direction,
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub render_mode: RenderMode,

    // Splitting into sub-booklets
    pub split_booklet: bool,
    pub sheets_per_booklet: usize,

    // Page numbering
    pub add_page_numbers: bool,
    pub number_style: NumberStyle,

    // Shared password for sources without their own
    pub password: Option<String>,
}

impl Default for BookletOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("booklet_output.pdf"),
            page_range: String::new(),
            direction: Direction::Ltr,
            paper_size: PaperSize::Auto,
            orientation: Orientation::Portrait,
            render_mode: RenderMode::Vector,
            split_booklet: false,
            sheets_per_booklet: DEFAULT_SHEETS_PER_BOOKLET,
            add_page_numbers: false,
            number_style: NumberStyle::Merged,
            password: None,
        }
    }
}

impl BookletOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes).map_err(|e| {
            BookletError::InvalidConfiguration(format!("Failed to parse config: {}", e))
        })?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            BookletError::InvalidConfiguration(format!("Failed to serialize config: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Sheets per booklet when splitting is enabled
    pub fn chunk_sheets(&self) -> Option<usize> {
        self.split_booklet.then_some(self.sheets_per_booklet)
    }

    /// Output sheet size in points, orientation applied
    pub fn output_size_pt(&self) -> (f32, f32) {
        let (w, h) = self
            .paper_size
            .dimensions_with_orientation(self.orientation);
        (crate::constants::mm_to_pt(w), crate::constants::mm_to_pt(h))
    }

    /// Validate the options.
    ///
    /// Everything that can be checked without opening a document is checked
    /// here, including the syntax of the page range.
    pub fn validate(&self) -> Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(BookletError::config("output_path"));
        }

        if self.split_booklet && self.sheets_per_booklet == 0 {
            return Err(BookletError::config("sheets_per_booklet"));
        }

        if let PaperSize::Custom {
            width_mm,
            height_mm,
        } = self.paper_size
        {
            if !(width_mm.is_finite() && width_mm > 0.0) {
                return Err(BookletError::config("paper_size.width_mm"));
            }
            if !(height_mm.is_finite() && height_mm > 0.0) {
                return Err(BookletError::config("paper_size.height_mm"));
            }
        }

        if let RenderMode::Raster { dpi } = self.render_mode {
            if dpi == 0 {
                return Err(BookletError::config("render_mode.dpi"));
            }
        }

        PageRange::parse(&self.page_range)?;

        Ok(())
    }
}
