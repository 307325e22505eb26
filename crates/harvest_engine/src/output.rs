use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use harvest_core::{Bucket, FinalizedOutput};
use harvest_logging::harvest_info;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Default file name suffix: `<bucket>_output.txt`.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "output";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes one text file per bucket into a directory, replacing each target
/// atomically (temp file in the same directory, then rename).
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    suffix: String,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    pub fn file_name(&self, bucket: Bucket) -> String {
        format!("{}_{}.txt", bucket.name(), self.suffix)
    }

    pub fn write(&self, output: &FinalizedOutput) -> Result<PathBuf, OutputError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(self.file_name(output.bucket));
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(output.text.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| OutputError::Io(e.error))?;

        harvest_info!("Wrote {} lines to {:?}", output.line_count(), target);
        Ok(target)
    }

    /// Stops at the first failure; files already written stay in place.
    pub fn write_all(&self, outputs: &[FinalizedOutput]) -> Result<Vec<PathBuf>, OutputError> {
        outputs.iter().map(|output| self.write(output)).collect()
    }
}

fn ensure_output_dir(dir: &Path) -> Result<(), OutputError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| OutputError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(OutputError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| OutputError::OutputDir(e.to_string()))
}
