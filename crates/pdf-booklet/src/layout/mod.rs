//! Layout calculation modules for booklet creation
//!
//! This module handles all the geometric calculations:
//! - Signature ordering (which page lands on which sheet side)
//! - Content placement (two pages per side, scaled and centered)

mod placement;
mod signature;
mod types;

pub use placement::*;
pub use signature::*;
pub use types::*;
