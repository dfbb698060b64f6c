// Domain types and value objects
mod candle;
mod error;
mod instrument;
mod level;

// Re-export commonly used types to the world
pub use candle::{CandleType, PriceBar};
pub use error::{ViewerError, as_viewer_error};
pub use instrument::{Frequency, Instrument};
pub use level::{LevelKind, LevelSet, PriceLevel};
