//! Chunk streaming around a moving observer, height queries and vegetation sync.
#![forbid(unsafe_code)]

mod height_query;
mod streaming;
mod vegetation_sync;
mod window;

pub use height_query::{EDGE_FRACTION, ZERO_BORDER_FLOOR, ZERO_BORDER_INSET, interpolate_grid};
pub use streaming::{StreamingController, StreamingStats, UpdateOutcome, UpdateReport};
pub use vegetation_sync::VegetationLayer;
pub use window::ChunkWindow;
