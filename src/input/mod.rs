//! Translation of terminal key events into game intents

pub mod handler;

pub use handler::{InputHandler, KeyAction};
