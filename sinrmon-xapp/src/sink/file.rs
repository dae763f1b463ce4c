//! CSV file sink

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sinrmon_kpm::{csv_header, RecordSink, SinkError};
use tracing::info;

/// Appends records to a CSV file, flushing after every line
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
}

impl FileSink {
    /// Truncates `path` and writes the header for `published` neighbor columns.
    pub fn create<P: AsRef<Path>>(path: P, published: usize) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(writer, "{}", csv_header(published))?;
        writer.flush()?;
        info!("CSV output: {}", path.display());
        Ok(Self {
            path,
            writer,
            lines: 0,
        })
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records written, header excluded
    pub fn lines_written(&self) -> u64 {
        self.lines
    }
}

impl RecordSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()?;
        self.lines += 1;
        Ok(())
    }
}
