use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest snake a game may start with
pub const MIN_SNAKE_LENGTH: usize = 3;

/// Errors raised when a configuration cannot drive a game.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid {width}x{height} cannot hold a {length}-cell snake starting at its center")]
    GridTooSmall {
        width: usize,
        height: usize,
        length: usize,
    },
    #[error("initial snake length {length} is shorter than {min}", min = MIN_SNAKE_LENGTH)]
    SnakeTooShort { length: usize },
    #[error("grid {width}x{height} is too large to address")]
    GridTooLarge { width: usize, height: usize },
    #[error("cell size must be non-zero")]
    ZeroCellSize,
    #[error("minimum tick interval must be non-zero")]
    ZeroMinTick,
    #[error("minimum tick interval {min_ms}ms exceeds initial interval {initial_ms}ms")]
    FloorAboveInitial { min_ms: u64, initial_ms: u64 },
    #[error("canvas {width}x{height}px is not a whole number of {cell}px cells")]
    RaggedCanvas { width: usize, height: usize, cell: usize },
    #[error("failed to read config file: {0}")]
    Io(String),
    #[error("failed to parse config file: {0}")]
    Parse(String),
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Size of one cell on a drawing surface
    pub cell_size: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Speed
    /// Tick interval at the start of a session, in milliseconds
    pub initial_tick_ms: u64,
    /// Amount the interval shrinks per food eaten
    pub speed_step_ms: u64,
    /// The interval never drops below this
    pub min_tick_ms: u64,

    /// Score awarded per food
    pub score_per_food: u32,
    /// Random placements tried before food placement scans for free cells
    pub max_food_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            cell_size: 20,
            initial_snake_length: 3,
            initial_tick_ms: 150,
            speed_step_ms: 2,
            min_tick_ms: 50,
            score_per_food: 10,
            max_food_attempts: 64,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Derive the grid from a pixel canvas and a cell size
    pub fn from_canvas(width_px: usize, height_px: usize, cell_size: usize) -> Result<Self, ConfigError> {
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if width_px % cell_size != 0 || height_px % cell_size != 0 {
            return Err(ConfigError::RaggedCanvas {
                width: width_px,
                height: height_px,
                cell: cell_size,
            });
        }
        let config = Self {
            cell_size,
            ..Self::new(width_px / cell_size, height_px / cell_size)
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }

    pub fn min_tick(&self) -> Duration {
        Duration::from_millis(self.min_tick_ms)
    }

    pub fn speed_step(&self) -> Duration {
        Duration::from_millis(self.speed_step_ms)
    }

    /// Number of cells on the grid, `None` if it does not fit in a `usize`
    pub fn total_cells(&self) -> Option<usize> {
        self.grid_width.checked_mul(self.grid_height)
    }

    /// Ensure the configuration can start a game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_snake_length < MIN_SNAKE_LENGTH {
            return Err(ConfigError::SnakeTooShort {
                length: self.initial_snake_length,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.min_tick_ms == 0 {
            return Err(ConfigError::ZeroMinTick);
        }
        if self.min_tick_ms > self.initial_tick_ms {
            return Err(ConfigError::FloorAboveInitial {
                min_ms: self.min_tick_ms,
                initial_ms: self.initial_tick_ms,
            });
        }
        // Cells are addressed with i32 coordinates.
        let max_side = i32::MAX as usize;
        let total_cells = match self.total_cells() {
            Some(total) if self.grid_width <= max_side && self.grid_height <= max_side => total,
            _ => {
                return Err(ConfigError::GridTooLarge {
                    width: self.grid_width,
                    height: self.grid_height,
                });
            }
        };
        // The snake spawns at the center with its body trailing left, and
        // food needs at least one free cell.
        let center_x = self.grid_width / 2;
        let fits = self.grid_height > 0
            && center_x + 1 >= self.initial_snake_length
            && total_cells > self.initial_snake_length;
        if !fits {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
                length: self.initial_snake_length,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.initial_tick(), Duration::from_millis(150));
        assert_eq!(config.speed_step(), Duration::from_millis(2));
        assert_eq!(config.min_tick(), Duration::from_millis(50));
        assert_eq!(config.score_per_food, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
    }

    #[test]
    fn test_from_canvas() {
        let config = GameConfig::from_canvas(400, 400, 20).unwrap();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config, GameConfig::default());

        assert_eq!(
            GameConfig::from_canvas(410, 400, 20),
            Err(ConfigError::RaggedCanvas {
                width: 410,
                height: 400,
                cell: 20
            })
        );
        assert_eq!(GameConfig::from_canvas(400, 400, 0), Err(ConfigError::ZeroCellSize));
    }

    #[test]
    fn test_validate_rejects_bad_speeds() {
        let config = GameConfig {
            min_tick_ms: 200,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FloorAboveInitial {
                min_ms: 200,
                initial_ms: 150
            })
        );

        let config = GameConfig {
            min_tick_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroMinTick));
    }

    #[test]
    fn test_validate_rejects_tiny_grid() {
        assert!(matches!(
            GameConfig::new(3, 1).validate(),
            Err(ConfigError::GridTooSmall { .. })
        ));
        assert!(matches!(
            GameConfig::new(2, 5).validate(),
            Err(ConfigError::GridTooSmall { .. })
        ));
        assert!(GameConfig::new(4, 1).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_snake() {
        for length in 0..MIN_SNAKE_LENGTH {
            let config = GameConfig {
                initial_snake_length: length,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::SnakeTooShort { length }));
        }

        let config = GameConfig {
            initial_snake_length: 4,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_huge_grid() {
        assert_eq!(GameConfig::new(usize::MAX, 4).total_cells(), None);
        assert_eq!(
            GameConfig::new(usize::MAX, 4).validate(),
            Err(ConfigError::GridTooLarge {
                width: usize::MAX,
                height: 4
            })
        );

        let too_wide = i32::MAX as usize + 1;
        assert_eq!(
            GameConfig::new(too_wide, 1).validate(),
            Err(ConfigError::GridTooLarge {
                width: too_wide,
                height: 1
            })
        );
        assert_eq!(GameConfig::default().total_cells(), Some(400));
    }

    #[test]
    fn test_load_fills_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_width": 12, "min_tick_ms": 80 }}"#).unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.min_tick_ms, 80);
        assert_eq!(config.initial_tick_ms, 150);
    }

    #[test]
    fn test_load_reports_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(GameConfig::load(&missing), Err(ConfigError::Io(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "not json").unwrap();
        assert!(matches!(GameConfig::load(&bad), Err(ConfigError::Parse(_))));

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{ "cell_size": 0 }"#).unwrap();
        assert_eq!(GameConfig::load(&invalid), Err(ConfigError::ZeroCellSize));
    }
}
