use sysinfo::{Pid, ProcessesToUpdate, System};
use std::time::Duration;
use tracing::{debug, warn};
use crate::constants::BYTES_PER_MB;

/// Samples the resident memory of this process every `check_interval` ticks.
///
/// Crossing the limit only logs a warning, once per crossing.
#[derive(Debug)]
pub struct MemoryMonitor {
    system: System,
    pid: Option<Pid>,
    check_interval: usize,
    limit_bytes: u64,
    ticks: usize,
    peak_bytes: u64,
    over_limit: bool,
}

impl MemoryMonitor {
    pub fn new(check_interval: usize, limit_bytes: u64) -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                debug!("Memory sampling unavailable: {}", e);
                None
            }
        };

        Self {
            system: System::new(),
            pid,
            check_interval,
            limit_bytes,
            ticks: 0,
            peak_bytes: 0,
            over_limit: false,
        }
    }

    pub fn disabled() -> Self {
        Self::new(0, u64::MAX)
    }

    pub fn is_enabled(&self) -> bool {
        self.check_interval > 0 && self.pid.is_some()
    }

    /// Counts one unit of work and samples memory when the interval is reached.
    pub fn tick(&mut self) {
        self.ticks += 1;
        if self.is_enabled() && self.ticks % self.check_interval == 0 {
            self.sample();
        }
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Returns the sampled resident size in bytes, if one could be taken.
    pub fn sample(&mut self) -> Option<u64> {
        let pid = self.pid?;
        self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        let used = self.system.process(pid)?.memory();
        self.peak_bytes = self.peak_bytes.max(used);

        if used > self.limit_bytes {
            if !self.over_limit {
                warn!(
                    "Memory usage {} exceeds the configured {} after {} records processed; consider spill mode",
                    format_bytes(used),
                    format_bytes(self.limit_bytes),
                    self.ticks
                );
            }
            self.over_limit = true;
        } else {
            self.over_limit = false;
        }

        Some(used)
    }

    pub fn peak_bytes(&self) -> u64 {
        self.peak_bytes
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB as f64
}

/// Formats a duration as "HH:MM:SS.mmm".
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, duration.subsec_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(0)), "00:00:00.000");
        assert_eq!(format_duration(Duration::from_millis(61_250)), "00:01:01.250");
        assert_eq!(format_duration(Duration::from_secs(3661)), "01:01:01.000");
    }

    #[test]
    fn test_disabled_monitor_never_samples() {
        let mut monitor = MemoryMonitor::disabled();
        assert!(!monitor.is_enabled());
        for _ in 0..100 {
            monitor.tick();
        }
        assert_eq!(monitor.ticks(), 100);
        assert_eq!(monitor.peak_bytes(), 0);
    }

    #[test]
    fn test_monitor_records_peak() {
        let mut monitor = MemoryMonitor::new(1, u64::MAX);
        monitor.tick();
        if let Some(used) = monitor.sample() {
            assert!(used > 0);
            assert!(monitor.peak_bytes() >= used);
        }
    }
}
