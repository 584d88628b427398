//! Logger setup
//!
//! The interactive mode owns the terminal, so records only go to stderr when
//! nothing is drawing there. Otherwise they need an explicit log file.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Builder, Target};

const DEFAULT_FILTER: &str = "info";

/// Where log records should end up
#[derive(Debug, Clone, Copy)]
pub enum LogSink<'a> {
    File(&'a Path),
    Stderr,
    Disabled,
}

/// Install the global logger. `RUST_LOG` overrides the default `info` filter.
pub fn init(sink: LogSink<'_>) -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    if let Some(mut builder) = builder(sink, &filter)? {
        builder.try_init().context("Failed to install logger")?;
    }
    Ok(())
}

fn builder(sink: LogSink<'_>, filter: &str) -> Result<Option<Builder>> {
    let target = match sink {
        LogSink::Disabled => return Ok(None),
        LogSink::Stderr => Target::Stderr,
        LogSink::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            Target::Pipe(Box::new(file))
        }
    };

    let mut builder = Builder::new();
    builder.parse_filters(filter).target(target);
    Ok(Some(builder))
}
