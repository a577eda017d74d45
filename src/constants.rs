pub const FIELD_DELIMITER: char = ';';
pub const QUOTE_CHAR: char = '"';

pub const DEFAULT_OUTPUT_FILE: &str = "groups.txt";
pub const SPILL_FILE_PREFIX: &str = "tuonella_lines_";
pub const SPILL_FILE_SUFFIX: &str = ".dat";
pub const REPORT_TEMP_PREFIX: &str = ".groups_";

pub const DEFAULT_MEMORY_CHECK_INTERVAL_RECORDS: usize = 10_000;
pub const DEFAULT_MAX_MEMORY_USAGE_MB: u64 = 900;
pub const MIN_MAX_MEMORY_USAGE_MB: u64 = 16;

pub const DEFAULT_IO_BUFFER_SIZE_KB: usize = 64;
pub const MIN_IO_BUFFER_SIZE_KB: usize = 4;
pub const MAX_IO_BUFFER_SIZE_KB: usize = 16 * 1024;

pub const PROGRESS_REPORT_INTERVAL_RECORDS: usize = 1_000_000;

pub const BYTES_PER_KB: usize = 1024;
pub const BYTES_PER_MB: u64 = 1_048_576;

pub const VERBOSITY_SILENT: &str = "silent";
pub const VERBOSITY_NORMAL: &str = "normal";
pub const VERBOSITY_VERBOSE: &str = "verbose";
