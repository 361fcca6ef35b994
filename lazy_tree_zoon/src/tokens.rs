// Spacing tokens for tree rows

pub const SPACING_2: u32 = 2;
pub const SPACING_4: u32 = 4;
pub const SPACING_8: u32 = 8;

/// Width and height of the expand toggle slot.
pub const TOGGLE_SIZE: u32 = 16;

pub const FONT_SIZE_ROW: u32 = 14;
pub const FONT_SIZE_TOGGLE: u32 = 12;
