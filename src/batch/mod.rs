pub mod processor;
pub mod status;

pub use processor::{BatchHandle, BatchProcessor};
pub use status::StatusBoard;
