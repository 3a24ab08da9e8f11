//! Palette building blocks: the command index, the selection state and its
//! scroll viewport.
pub mod command_index;
pub mod palette;
pub mod viewport;
