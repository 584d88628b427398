//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O, timer or rendering
//! dependencies. Presentation and scheduling live in sibling modules and only
//! talk to the engine through its public operations.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction, ParseDirectionError};
pub use config::{ConfigError, GameConfig};
pub use engine::{EndReason, GameEngine, GameOverSummary, StepInfo, StepResult};
pub use state::{CollisionType, GameState, Position, RunState, Snake};
