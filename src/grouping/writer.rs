use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::constants::REPORT_TEMP_PREFIX;
use crate::grouping::collector::Group;
use crate::grouping::store::RecordStore;

/// Renders the groups report.
///
/// ```text
/// Groups count: <N>
///
/// Group 1
/// <line>
/// <line>
///
/// ```
///
/// Lines inside a group are sorted by byte order.
pub fn write_report<W: Write, S: RecordStore>(
    sink: &mut W,
    groups: &[Group],
    store: &mut S,
) -> Result<()> {
    write!(sink, "Groups count: {}\n\n", groups.len())?;

    let mut lines: Vec<String> = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        lines.clear();
        for &id in &group.members {
            lines.push(store.line(id)?.into_owned());
        }
        lines.sort_unstable();

        writeln!(sink, "Group {}", index + 1)?;
        for line in &lines {
            writeln!(sink, "{}", line)?;
        }
        writeln!(sink)?;
    }

    Ok(())
}

/// Report file that only appears at its destination once fully written.
///
/// Output goes to a temporary file next to the destination. Dropping the
/// report without calling [`AtomicReport::finish`] deletes the temporary file.
pub struct AtomicReport {
    writer: BufWriter<NamedTempFile>,
    final_path: PathBuf,
}

impl AtomicReport {
    pub fn create(final_path: &Path, buffer_size: usize) -> Result<Self> {
        let parent_dir = match final_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp_file = tempfile::Builder::new()
            .prefix(REPORT_TEMP_PREFIX)
            .tempfile_in(&parent_dir)
            .with_context(|| {
                format!("Failed to create temporary report in {}", parent_dir.display())
            })?;

        Ok(Self {
            writer: BufWriter::with_capacity(buffer_size, temp_file),
            final_path: final_path.to_path_buf(),
        })
    }

    pub fn writer_mut(&mut self) -> &mut BufWriter<NamedTempFile> {
        &mut self.writer
    }

    /// Flushes and moves the report to its destination, replacing any existing file.
    pub fn finish(self) -> Result<PathBuf> {
        let temp_file = self
            .writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush report: {}", e.error()))?;
        temp_file.as_file().sync_all().context("Failed to sync report")?;
        temp_file
            .persist(&self.final_path)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", self.final_path.display(), e.error))?;
        Ok(self.final_path)
    }
}
