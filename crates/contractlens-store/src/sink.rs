//! Result sink: collects contract records and writes them as JSON and CSV.
//!
//! The two outputs are independent. Each is written to a temporary file in
//! the target directory and renamed into place, so a failed write never
//! leaves a truncated file behind.

use std::io::{BufWriter, Write};
use std::path::Path;

use contractlens_core::{ContractResult, output};
use tempfile::NamedTempFile;
use tracing::info;

use crate::SinkError;

/// Outcome of writing both outputs.
#[derive(Debug)]
pub struct SinkReport {
    pub json: Result<(), SinkError>,
    pub csv: Result<(), SinkError>,
}

impl SinkReport {
    /// True when at least one output was written.
    pub fn any_written(&self) -> bool {
        self.json.is_ok() || self.csv.is_ok()
    }
}

/// Accumulates per-contract records in processing order.
#[derive(Debug, Default)]
pub struct ResultSink {
    results: Vec<ContractResult>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: ContractResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[ContractResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Write the records as a pretty-printed JSON array.
    pub fn write_json(&self, path: &Path) -> Result<(), SinkError> {
        write_atomic(path, |file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &self.results)?;
            writer.write_all(b"\n").map_err(|source| SinkError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            writer.flush().map_err(|source| SinkError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        info!(path = %path.display(), records = self.results.len(), "wrote json");
        Ok(())
    }

    /// Write the records as CSV with a header row.
    pub fn write_csv(&self, path: &Path) -> Result<(), SinkError> {
        write_atomic(path, |file| {
            let mut writer = csv::Writer::from_writer(file);
            writer.write_record(output::COLUMNS)?;
            for result in &self.results {
                writer.write_record(output::row(result))?;
            }
            writer.flush().map_err(|source| SinkError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        info!(path = %path.display(), records = self.results.len(), "wrote csv");
        Ok(())
    }

    /// Write both outputs; a failure of one does not prevent the other.
    pub fn write_all(&self, json_path: &Path, csv_path: &Path) -> SinkReport {
        SinkReport {
            json: self.write_json(json_path),
            csv: self.write_csv(csv_path),
        }
    }
}

fn write_atomic<F>(path: &Path, write: F) -> Result<(), SinkError>
where
    F: FnOnce(&mut std::fs::File) -> Result<(), SinkError>,
{
    let io_err = |source: std::io::Error| SinkError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    write(tmp.as_file_mut())?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
