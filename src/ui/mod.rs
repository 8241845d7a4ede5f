//! Terminal User Interface module.
//!
//! This module provides the TUI for browsing headlines, including:
//! - Main event loop (`run`)
//! - Input handling for the headline list and the search box
//! - Rendering for tabs, search, recent searches and headline cards
//! - Background fetch event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Screen layout
//! - `helpers` - Fetch spawning and browser opening
//! - `header` - Category tabs, search box, recent searches
//! - `articles` - Headline cards
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod articles;
mod events;
mod header;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

// Re-export the public API
pub use loop_runner::{run, Action};
