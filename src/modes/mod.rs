pub mod human;
pub mod replay;

pub use human::HumanMode;
pub use replay::{ReplayMode, ReplayOutcome, parse_script};
