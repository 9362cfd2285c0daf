//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, header, status bar and overlays
//! - `input`: keyboard event handling
//! - `pages`: one renderer per route
//! - `widgets`: cards, buttons, text fields, banners
//! - `styles`: color palette and text styles

pub mod input;
pub mod pages;
pub mod render;
pub mod styles;
pub mod widgets;
