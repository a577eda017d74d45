use anyhow::{Context, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::constants::{SPILL_FILE_PREFIX, SPILL_FILE_SUFFIX};

/// Dense, zero-based record identifier assigned in first-occurrence order.
pub type RecordId = u32;

/// A deduplicated input line and its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub id: RecordId,
    pub text: &'a str,
}

/// Append-only storage of record texts, addressed by [`RecordId`].
pub trait RecordStore {
    /// Appends a line and returns the id it was stored under.
    fn push(&mut self, text: &str) -> Result<RecordId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn line(&mut self, id: RecordId) -> Result<Cow<'_, str>>;

    /// Visits every record in id order.
    fn scan(&mut self, visit: &mut dyn FnMut(Record<'_>) -> Result<()>) -> Result<()>;
}

fn next_id(len: usize) -> Result<RecordId> {
    RecordId::try_from(len)
        .map_err(|_| anyhow::anyhow!("Record limit of {} distinct lines exceeded", RecordId::MAX))
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    lines: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn push(&mut self, text: &str) -> Result<RecordId> {
        let id = next_id(self.lines.len())?;
        self.lines.push(text.to_string());
        Ok(id)
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn line(&mut self, id: RecordId) -> Result<Cow<'_, str>> {
        self.lines
            .get(id as usize)
            .map(|line| Cow::Borrowed(line.as_str()))
            .ok_or_else(|| anyhow::anyhow!("Unknown record id {}", id))
    }

    fn scan(&mut self, visit: &mut dyn FnMut(Record<'_>) -> Result<()>) -> Result<()> {
        for (id, text) in self.lines.iter().enumerate() {
            visit(Record { id: id as RecordId, text: text.as_str() })?;
        }
        Ok(())
    }
}

/// Keeps record texts in a temporary file, holding only one offset per record in memory.
///
/// The file is deleted when the store is dropped.
pub struct SpillStore {
    writer: BufWriter<NamedTempFile>,
    reader: BufReader<File>,
    offsets: Vec<u64>,
    written: u64,
    dirty: bool,
}

impl SpillStore {
    pub fn new(temp_directory: &Path, buffer_size: usize) -> Result<Self> {
        std::fs::create_dir_all(temp_directory).with_context(|| {
            format!("Failed to create temp directory {}", temp_directory.display())
        })?;

        let file = tempfile::Builder::new()
            .prefix(SPILL_FILE_PREFIX)
            .suffix(SPILL_FILE_SUFFIX)
            .tempfile_in(temp_directory)
            .with_context(|| {
                format!("Failed to create spill file in {}", temp_directory.display())
            })?;
        let reader = BufReader::with_capacity(buffer_size, file.reopen()?);
        debug!("Spilling record texts to {}", file.path().display());

        Ok(Self {
            writer: BufWriter::with_capacity(buffer_size, file),
            reader,
            offsets: Vec::new(),
            written: 0,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    fn sync_reader(&mut self) -> Result<()> {
        if self.dirty {
            self.writer.flush().context("Failed to flush spill file")?;
            self.dirty = false;
        }
        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut String) -> Result<()> {
        buf.clear();
        self.reader.seek(SeekFrom::Start(offset))?;
        self.reader.read_line(buf).context("Failed to read spill file")?;
        if buf.ends_with('\n') {
            buf.pop();
        }
        Ok(())
    }
}

impl RecordStore for SpillStore {
    fn push(&mut self, text: &str) -> Result<RecordId> {
        let id = next_id(self.offsets.len())?;
        self.writer.write_all(text.as_bytes()).context("Failed to write spill file")?;
        self.writer.write_all(b"\n").context("Failed to write spill file")?;
        self.offsets.push(self.written);
        self.written += text.len() as u64 + 1;
        self.dirty = true;
        Ok(id)
    }

    fn len(&self) -> usize {
        self.offsets.len()
    }

    fn line(&mut self, id: RecordId) -> Result<Cow<'_, str>> {
        let offset = *self
            .offsets
            .get(id as usize)
            .ok_or_else(|| anyhow::anyhow!("Unknown record id {}", id))?;
        self.sync_reader()?;
        let mut buf = String::new();
        self.read_at(offset, &mut buf)?;
        Ok(Cow::Owned(buf))
    }

    fn scan(&mut self, visit: &mut dyn FnMut(Record<'_>) -> Result<()>) -> Result<()> {
        self.sync_reader()?;
        self.reader.seek(SeekFrom::Start(0))?;

        let mut buf = String::new();
        for id in 0..self.offsets.len() {
            buf.clear();
            self.reader.read_line(&mut buf).context("Failed to read spill file")?;
            if buf.ends_with('\n') {
                buf.pop();
            }
            visit(Record { id: id as RecordId, text: buf.as_str() })?;
        }
        Ok(())
    }
}
