//! Temporary directories and canned data tables.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A fresh directory under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Create `beamline-<prefix>-<pid>-<n>` in the system temp dir.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    pub fn new(prefix: &str) -> Self {
        let n = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "beamline-{prefix}-{}-{n}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("cannot create {}: {e}", path.display()));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `name` inside the directory.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path.join(name);
        fs::write(&path, contents)
            .unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Linear attenuation of a light filter: energy (keV), μ (1/cm).
pub const FILTER_TABLE: &str = "\
# Beryllium window
# density: 1.848 g/cm3
1.0   2000.0
5.0     20.0
10.0     2.5
20.0     0.5
50.0     0.2
";

/// Flat reflectivity of a Si(111)-like crystal: energy (keV), peak
/// reflectivity, Darwin width (rad). The 0.1 rad rocking curve accepts a
/// slightly divergent beam at close to peak reflectivity.
pub const CRYSTAL_TABLE: &str = "\
# Si(111)
# d_spacing: 3.1356
# debye_waller: 0.2
2.0   0.95  0.1
30.0  0.95  0.1
";
