//! Layout data types
//!
//! These types represent the intermediate layout calculations between
//! signature ordering and PDF rendering.

use crate::types::PageRef;

/// Physical draw order of one booklet: pairs are output sides, groups of
/// four are sheets. `None` is a blank padding slot.
pub type SignatureOrder = Vec<Option<PageRef>>;

/// Which physical side of the printed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSide {
    /// Front of the sheet (printed first in duplex)
    Front,
    /// Back of the sheet (printed second in duplex)
    Back,
}

impl SheetSide {
    /// Side of the sheet that output side `index` is printed on
    pub fn of_side(index: usize) -> Self {
        if index % 2 == 0 {
            SheetSide::Front
        } else {
            SheetSide::Back
        }
    }
}

/// Half of an output side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPosition {
    Left,
    Right,
}

impl SlotPosition {
    /// Index used for resource naming (0 = left, 1 = right)
    pub fn index(self) -> usize {
        match self {
            SlotPosition::Left => 0,
            SlotPosition::Right => 1,
        }
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Center y coordinate
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Final placement of a source page on an output side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// The page drawn here
    pub page: PageRef,
    /// Position and size of the placed page in points
    pub rect: Rect,
    /// Scale factor applied to the page's intrinsic size
    pub scale: f32,
    /// Output side this placement belongs to
    pub side: usize,
    /// Left or right half
    pub slot: SlotPosition,
}

/// One output side: up to two placements
#[derive(Debug, Clone, PartialEq)]
pub struct SideLayout {
    /// 0-based index of the side within its booklet
    pub index: usize,
    pub left: Option<Placement>,
    pub right: Option<Placement>,
}

impl SideLayout {
    /// Sheet this side is printed on (0-based)
    pub fn sheet(&self) -> usize {
        self.index / 2
    }

    pub fn sheet_side(&self) -> SheetSide {
        SheetSide::of_side(self.index)
    }

    /// Placements present on this side, left first
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.left.iter().chain(self.right.iter())
    }
}
