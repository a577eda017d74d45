use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::constants::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub io: IoConfig,
    pub processing: ProcessingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    pub output_file: PathBuf,
    pub temp_directory: PathBuf,
    pub io_buffer_size_kb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Keep record texts in a temporary file instead of RAM.
    pub spill_to_disk: bool,
    /// How often (in indexed records) process memory is sampled. 0 disables sampling.
    pub memory_check_interval_records: usize,
    pub max_memory_usage_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbosity: String,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            temp_directory: std::env::temp_dir(),
            io_buffer_size_kb: DEFAULT_IO_BUFFER_SIZE_KB,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            spill_to_disk: false,
            memory_check_interval_records: DEFAULT_MEMORY_CHECK_INTERVAL_RECORDS,
            max_memory_usage_mb: DEFAULT_MAX_MEMORY_USAGE_MB,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbosity: VERBOSITY_NORMAL.to_string(),
        }
    }
}

impl IoConfig {
    pub fn io_buffer_size_bytes(&self) -> usize {
        self.io_buffer_size_kb * BYTES_PER_KB
    }
}

impl ProcessingConfig {
    pub fn max_memory_usage_bytes(&self) -> u64 {
        self.max_memory_usage_mb.saturating_mul(BYTES_PER_MB)
    }
}
