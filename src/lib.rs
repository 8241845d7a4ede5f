//! Terminal client for top news headlines.
//!
//! Browse headlines by category, narrow them with a keyword search, page
//! through results and open articles in the browser.

pub mod app;
pub mod config;
pub mod keybindings;
pub mod news;
pub mod session;
pub mod theme;
pub mod ui;
pub mod util;
