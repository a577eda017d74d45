pub mod model;


use anyhow::{Context, Result};
use std::path::Path;
use crate::constants::*;

// Re-export main types
pub use self::model::{Config, IoConfig, LoggingConfig, ProcessingConfig};

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.io.output_file.as_os_str().is_empty() {
            anyhow::bail!("output_file cannot be empty");
        }

        if self.io.io_buffer_size_kb < MIN_IO_BUFFER_SIZE_KB
            || self.io.io_buffer_size_kb > MAX_IO_BUFFER_SIZE_KB {
            anyhow::bail!(
                "io_buffer_size_kb must be between {} and {}",
                MIN_IO_BUFFER_SIZE_KB, MAX_IO_BUFFER_SIZE_KB
            );
        }

        if self.processing.max_memory_usage_mb < MIN_MAX_MEMORY_USAGE_MB {
            anyhow::bail!("max_memory_usage_mb must be at least {}", MIN_MAX_MEMORY_USAGE_MB);
        }

        if !matches!(
            self.logging.verbosity.as_str(),
            VERBOSITY_SILENT | VERBOSITY_NORMAL | VERBOSITY_VERBOSE
        ) {
            anyhow::bail!("verbosity must be 'silent', 'normal', or 'verbose'");
        }

        Ok(())
    }
}
