pub mod aggregator;
pub mod handlers;

pub use aggregator::{compute_progress, ProgressReport};
