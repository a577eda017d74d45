use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::grouping::collector::collect_groups;
use crate::grouping::connections::build_connections;
use crate::grouping::indexer::LineIndexer;
use crate::grouping::store::{MemoryStore, RecordStore, SpillStore};
use crate::grouping::writer::{write_report, AtomicReport};
use crate::grouping::GroupingStats;
use crate::utils::system::{bytes_to_mb, format_duration, MemoryMonitor};

/// Runs index, connect, collect and write as three sequential phases.
pub struct GroupingProcessor {
    config: Config,
}

impl GroupingProcessor {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Groups the lines of `input` and writes the report to `output`.
    ///
    /// The report is replaced atomically; on any error no report is written.
    pub fn process(&self, input: &Path, output: &Path) -> Result<GroupingStats> {
        info!("Input file: {}", input.display());
        info!("Output file: {}", output.display());

        let file = File::open(input)
            .with_context(|| format!("Failed to open input file {}", input.display()))?;
        let reader = BufReader::with_capacity(self.config.io.io_buffer_size_bytes(), file);

        let mut report = AtomicReport::create(output, self.config.io.io_buffer_size_bytes())?;
        let stats = self
            .process_reader(reader, report.writer_mut())
            .with_context(|| format!("Failed to group {}", input.display()))?;
        report.finish()?;

        Ok(stats)
    }

    /// Groups lines from any reader and renders the report into `sink`.
    pub fn process_reader<R: BufRead, W: Write>(&self, reader: R, sink: &mut W) -> Result<GroupingStats> {
        if self.config.processing.spill_to_disk {
            let store = SpillStore::new(
                &self.config.io.temp_directory,
                self.config.io.io_buffer_size_bytes(),
            )?;
            self.run(store, reader, sink)
        } else {
            self.run(MemoryStore::new(), reader, sink)
        }
    }

    fn run<S: RecordStore, R: BufRead, W: Write>(&self, store: S, reader: R, sink: &mut W) -> Result<GroupingStats> {
        let start_time = Instant::now();
        let monitor = MemoryMonitor::new(
            self.config.processing.memory_check_interval_records,
            self.config.processing.max_memory_usage_bytes(),
        );

        let mut indexer = LineIndexer::with_monitor(store, monitor);
        let index_stats = indexer.index_reader(reader)?;
        let (mut store, mut monitor) = indexer.into_parts();
        debug!("Indexing finished in {}", format_duration(start_time.elapsed()));

        let (mut dsu, connection_stats) = build_connections(&mut store, &mut monitor)?;
        let peak_memory_bytes = monitor.peak_bytes();
        debug!("Connections finished in {}", format_duration(start_time.elapsed()));

        let groups = collect_groups(&mut dsu);
        drop(dsu);
        let grouped_records = groups.iter().map(|group| group.len()).sum();
        info!("Found {} groups covering {} records", groups.len(), grouped_records);

        write_report(sink, &groups, &mut store)?;
        sink.flush().context("Failed to flush report")?;

        let stats = GroupingStats {
            lines_read: index_stats.lines_read,
            records: index_stats.records,
            duplicates_removed: index_stats.duplicates,
            invalid_lines: index_stats.invalid,
            distinct_keys: connection_stats.distinct_keys,
            unions: connection_stats.unions,
            groups: groups.len(),
            grouped_records,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
            peak_memory_mb: bytes_to_mb(peak_memory_bytes),
        };

        info!("Grouping completed in {}", format_duration(start_time.elapsed()));
        Ok(stats)
    }
}
