//! Grid Snake - a terminal snake game
//!
//! This library provides:
//! - Core game logic, independent of timers and I/O (game module)
//! - A cancellable tick scheduler driven by the engine's speed (scheduler module)
//! - Key translation (input module) and presentation sinks (render module)
//! - Interactive and headless execution modes (modes module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod scheduler;
