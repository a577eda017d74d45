use anyhow::Result;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::info;

use crate::grouping::dsu::DisjointSet;
use crate::grouping::line::field_keys;
use crate::grouping::store::{RecordId, RecordStore};
use crate::utils::system::MemoryMonitor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionStats {
    pub distinct_keys: usize,
    pub unions: usize,
}

/// Unions every record with the first record that carried each of its field keys.
///
/// A key is a nonempty `(position, value)` pair. Empty values never connect records.
/// `monitor` is ticked once per record.
pub fn build_connections<S: RecordStore>(
    store: &mut S,
    monitor: &mut MemoryMonitor,
) -> Result<(DisjointSet, ConnectionStats)> {
    let mut dsu = DisjointSet::new(store.len());
    let mut first_seen: HashMap<(u32, String), RecordId> = HashMap::new();
    let mut stats = ConnectionStats::default();

    store.scan(&mut |record| {
        for (position, value) in field_keys(record.text) {
            match first_seen.entry((position, value)) {
                Entry::Occupied(first) => {
                    if dsu.union(record.id, *first.get()) {
                        stats.unions += 1;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(record.id);
                }
            }
        }
        monitor.tick();
        Ok(())
    })?;

    stats.distinct_keys = first_seen.len();
    info!(
        "Connected {} records through {} distinct field keys ({} merges)",
        dsu.len(), stats.distinct_keys, stats.unions
    );

    Ok((dsu, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::store::MemoryStore;

    fn store_of(lines: &[&str]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for line in lines {
            store.push(line).unwrap();
        }
        store
    }

    #[test]
    fn test_shared_key_connects() {
        let mut store = store_of(&["A;1;X", "B;1;Y", "C;2;Z"]);
        let (mut dsu, stats) = build_connections(&mut store, &mut MemoryMonitor::disabled()).unwrap();

        assert_eq!(dsu.find(0), dsu.find(1));
        assert_ne!(dsu.find(0), dsu.find(2));
        assert_eq!(stats.unions, 1);
        assert_eq!(stats.distinct_keys, 8);
    }

    #[test]
    fn test_same_value_different_position_does_not_connect() {
        let mut store = store_of(&["1;A", "B;1"]);
        let (mut dsu, stats) = build_connections(&mut store, &mut MemoryMonitor::disabled()).unwrap();

        assert_ne!(dsu.find(0), dsu.find(1));
        assert_eq!(stats.unions, 0);
    }

    #[test]
    fn test_empty_values_do_not_connect() {
        let mut store = store_of(&["X;;1", "Y;;2", "\"\";Z;3"]);
        let (mut dsu, _) = build_connections(&mut store, &mut MemoryMonitor::disabled()).unwrap();

        assert_eq!(dsu.set_count(), 3);
        assert_ne!(dsu.find(0), dsu.find(1));
    }

    #[test]
    fn test_monitor_ticked_per_record() {
        let mut store = store_of(&["A;1;X", "B;1;Y", "C;2;Z"]);
        let mut monitor = MemoryMonitor::new(1, u64::MAX);
        build_connections(&mut store, &mut monitor).unwrap();

        assert_eq!(monitor.ticks(), 3);
    }

    #[test]
    fn test_chain_through_different_keys() {
        let mut store = store_of(&["a;1;p", "b;1;q", "c;2;q", "d;3;r"]);
        let (mut dsu, _) = build_connections(&mut store, &mut MemoryMonitor::disabled()).unwrap();

        assert_eq!(dsu.find(0), dsu.find(2));
        assert_ne!(dsu.find(0), dsu.find(3));
    }
}
