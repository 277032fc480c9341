pub mod format;
pub mod grid;
pub mod parse;
pub mod zone;
