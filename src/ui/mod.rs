//! Palette engine: key model, components, shell and hosts.
pub mod components;
pub mod keys;
pub mod render;
pub mod shell;
pub mod shortcuts;
pub mod terminal;
