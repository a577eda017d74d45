pub mod collector;
pub mod connections;
pub mod dsu;
pub mod indexer;
pub mod line;
pub mod processor;
pub mod store;
pub mod writer;

#[cfg(test)]
mod tests;

pub use collector::{collect_groups, Group};
pub use connections::{build_connections, ConnectionStats};
pub use dsu::DisjointSet;
pub use indexer::{IndexStats, LineIndexer, Offer};
pub use line::{field_keys, is_valid_line, parse_fields};
pub use processor::GroupingProcessor;
pub use store::{MemoryStore, Record, RecordId, RecordStore, SpillStore};
pub use writer::{write_report, AtomicReport};

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingStats {
    pub lines_read: usize,
    pub records: usize,
    pub duplicates_removed: usize,
    pub invalid_lines: usize,
    pub distinct_keys: usize,
    pub unions: usize,
    pub groups: usize,
    pub grouped_records: usize,
    pub processing_time_ms: u64,
    pub peak_memory_mb: f64,
}

pub fn group_file(input: &Path, output: &Path, config: Config) -> Result<GroupingStats> {
    let processor = GroupingProcessor::new(config)?;
    processor.process(input, output)
}
