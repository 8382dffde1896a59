use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use carefind_core::error::AppError;
use carefind_core::models::{Field, ProviderRecord};
use carefind_core::traits::RecordSink;
use csv::{Terminator, WriterBuilder};

/// Append-only CSV table of provider records.
///
/// Whether the header row has been written is tracked on the sink itself,
/// so one sink used across any number of postal codes produces exactly one
/// header. Every row is flushed before [`append`](RecordSink::append)
/// returns; a killed run leaves a readable prefix of the table.
pub struct CsvSink<W: Write = File> {
    writer: csv::Writer<W>,
    header_written: bool,
    rows: usize,
}

impl CsvSink<File> {
    /// Start a new table at `path`, truncating any existing file.
    pub fn create(path: &Path) -> Result<Self, AppError> {
        let file = File::create(path).map_err(|e| {
            AppError::SinkError(format!("Failed to create {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "Writing new table");
        Ok(Self::from_writer(file))
    }

    /// Continue the table at `path`, creating it if needed.
    ///
    /// A non-empty file is assumed to carry the header already; it is
    /// checked against the expected columns and never written twice.
    pub fn open_append(path: &Path) -> Result<Self, AppError> {
        let has_content = match std::fs::metadata(path) {
            Ok(meta) => meta.len() > 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                return Err(AppError::SinkError(format!(
                    "Failed to inspect {}: {e}",
                    path.display()
                )));
            }
        };

        if has_content {
            check_header(path)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::SinkError(format!("Failed to open {}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), resuming = has_content, "Appending to table");
        let mut sink = Self::from_writer(file);
        sink.header_written = has_content;
        Ok(sink)
    }
}

impl<W: Write> CsvSink<W> {
    /// A fresh table over any writer; the header goes out with the first row.
    pub fn from_writer(inner: W) -> Self {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);
        Self {
            writer,
            header_written: false,
            rows: 0,
        }
    }

    /// Data rows written by this sink (the header is not counted).
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, AppError> {
        self.writer
            .into_inner()
            .map_err(|e| AppError::SinkError(e.to_string()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append(&mut self, record: &ProviderRecord) -> Result<(), AppError> {
        if !self.header_written {
            self.writer
                .write_record(Field::header())
                .map_err(csv_error)?;
            self.header_written = true;
        }

        self.writer
            .write_record(record.values())
            .map_err(csv_error)?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }
}

fn check_header(path: &Path) -> Result<(), AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;
    let found = reader.headers().map_err(csv_error)?;

    if found.iter().ne(Field::header()) {
        return Err(AppError::SinkError(format!(
            "{} does not start with the provider table header",
            path.display()
        )));
    }
    Ok(())
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::SinkError(e.to_string())
}
