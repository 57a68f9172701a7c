//! Console user interface: bordered panels, result text, and line input.

pub mod console;
pub mod panel;
pub mod render;

pub use console::{Console, Input};
pub use panel::{Tone, render_panel};
