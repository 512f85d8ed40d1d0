//! Writing detector files to disk.

use std::fs;
use std::path::{Path, PathBuf};

use beamline_hist::DetectorFile;
use beamline_node::SavedOutput;

use crate::error::RunError;

/// Write every output into `dir`, creating it if needed.
///
/// Returns the paths written, in output order.
pub fn write_outputs(dir: &Path, outputs: &[SavedOutput]) -> Result<Vec<PathBuf>, RunError> {
    fs::create_dir_all(dir).map_err(|source| RunError::Output {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        let file = DetectorFile::new(&output.instance, &output.filename, &output.snapshot);
        let path = file.write_in(dir).map_err(|source| RunError::Output {
            path: dir.join(&output.filename),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote detector file");
        written.push(path);
    }
    Ok(written)
}
