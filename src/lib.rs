// Grouping pipeline - the main implementation
pub mod grouping;

pub mod config;
pub mod constants;
pub mod utils;

// Re-export main types for convenience
pub use config::Config;
pub use grouping::{group_file, GroupingProcessor, GroupingStats};
