//! # Rendering Module
//!
//! Text rendering of the cave. Renderers only read game state.

pub mod display;

pub use display::*;
