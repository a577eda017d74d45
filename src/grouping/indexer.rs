use anyhow::{Context, Result};
use std::collections::hash_map::{Entry, RandomState};
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::io::BufRead;
use tracing::{debug, info};

use crate::constants::PROGRESS_REPORT_INTERVAL_RECORDS;
use crate::grouping::line::is_valid_line;
use crate::grouping::store::{RecordId, RecordStore};
use crate::utils::system::MemoryMonitor;

/// Outcome of offering one raw line to the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    Indexed(RecordId),
    Duplicate(RecordId),
    Invalid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub lines_read: usize,
    pub records: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

enum Bucket {
    One(RecordId),
    Many(Vec<RecordId>),
}

/// Deduplicates lines and assigns dense ids in first-occurrence order.
///
/// Lines are bucketed by a 64-bit hash and confirmed against the stored text,
/// so the store holds the only copy of each line.
pub struct LineIndexer<S: RecordStore> {
    store: S,
    seen: HashMap<u64, Bucket>,
    hasher: RandomState,
    stats: IndexStats,
    monitor: MemoryMonitor,
}

impl<S: RecordStore> LineIndexer<S> {
    pub fn new(store: S) -> Self {
        Self::with_monitor(store, MemoryMonitor::disabled())
    }

    pub fn with_monitor(store: S, monitor: MemoryMonitor) -> Self {
        Self {
            store,
            seen: HashMap::new(),
            hasher: RandomState::new(),
            stats: IndexStats::default(),
            monitor,
        }
    }

    pub fn offer(&mut self, line: &str) -> Result<Offer> {
        self.stats.lines_read += 1;

        if !is_valid_line(line) {
            self.stats.invalid += 1;
            return Ok(Offer::Invalid);
        }

        let hash = self.hasher.hash_one(line);
        if let Some(id) = self.find_existing(hash, line)? {
            self.stats.duplicates += 1;
            return Ok(Offer::Duplicate(id));
        }

        let id = self.store.push(line)?;
        match self.seen.entry(hash) {
            Entry::Vacant(slot) => {
                slot.insert(Bucket::One(id));
            }
            Entry::Occupied(mut slot) => {
                let bucket = slot.get_mut();
                if let Bucket::One(first) = *bucket {
                    *bucket = Bucket::Many(vec![first, id]);
                } else if let Bucket::Many(ids) = bucket {
                    ids.push(id);
                }
            }
        }

        self.stats.records += 1;
        self.monitor.tick();
        if self.stats.records % PROGRESS_REPORT_INTERVAL_RECORDS == 0 {
            debug!("Indexed {} records from {} lines", self.stats.records, self.stats.lines_read);
        }

        Ok(Offer::Indexed(id))
    }

    fn find_existing(&mut self, hash: u64, line: &str) -> Result<Option<RecordId>> {
        let candidates: &[RecordId] = match self.seen.get(&hash) {
            None => return Ok(None),
            Some(Bucket::One(id)) => std::slice::from_ref(id),
            Some(Bucket::Many(ids)) => ids,
        };

        for &id in candidates {
            if self.store.line(id)? == line {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Consumes every line of `reader`.
    ///
    /// A line ends at `\n`, `\r` or `\r\n`. A final line without a
    /// terminator is kept if it is nonempty. Lines that are not valid UTF-8
    /// count as invalid.
    pub fn index_reader<R: BufRead>(&mut self, mut reader: R) -> Result<IndexStats> {
        let mut line = Vec::new();
        let mut after_cr = false;
        loop {
            let chunk = reader.fill_buf().context("Failed to read input")?;
            if chunk.is_empty() {
                break;
            }
            let consumed = chunk.len();

            for &byte in chunk {
                match byte {
                    b'\n' if after_cr => after_cr = false,
                    b'\r' | b'\n' => {
                        after_cr = byte == b'\r';
                        self.offer_bytes(&line)?;
                        line.clear();
                    }
                    _ => {
                        after_cr = false;
                        line.push(byte);
                    }
                }
            }
            reader.consume(consumed);
        }

        if !line.is_empty() {
            self.offer_bytes(&line)?;
        }

        info!(
            "Indexed {} unique records from {} lines ({} duplicates, {} invalid skipped)",
            self.stats.records, self.stats.lines_read, self.stats.duplicates, self.stats.invalid
        );
        Ok(self.stats)
    }

    fn offer_bytes(&mut self, bytes: &[u8]) -> Result<Offer> {
        match std::str::from_utf8(bytes) {
            Ok(line) => self.offer(line),
            Err(_) => {
                self.stats.lines_read += 1;
                self.stats.invalid += 1;
                Ok(Offer::Invalid)
            }
        }
    }

    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// Finishes indexing, releasing the dedup table and returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Like [`LineIndexer::into_store`], also handing back the memory monitor
    /// so later phases keep sampling.
    pub fn into_parts(self) -> (S, MemoryMonitor) {
        (self.store, self.monitor)
    }
}
