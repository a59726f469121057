pub mod collector;
pub mod engine;
pub mod finder;

pub use collector::collect_used_paths;
pub use engine::{clean, CleanMode, CleanOptions, CleanReport};
pub use finder::{find_unused_paths, MatchStrategy, UsedMatcher};
