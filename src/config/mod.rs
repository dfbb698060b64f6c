//! Configuration module for the candle viewer.

// Can all be private now because we have a public re-export.
mod debug;
mod levels;
mod persistence;
mod provider;
mod types;

// Can't be private because we don't re-export it
pub mod plot;

// Re-export commonly used items
pub use debug::DF;
pub use levels::{LEVELS, LevelSettings};
pub use persistence::PERSISTENCE;
pub use provider::PROVIDER;
pub use types::{DetectionMethod, PivotOrder};
