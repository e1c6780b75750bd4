//! [`TestCfgDir`] builder for resolver test scenarios.

use cfgtree_fs::NormalizedPath;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A temporary directory holding a `cfg/` tree.
///
/// # Example
///
/// ```rust,no_run
/// use cfgtree_test_utils::TestCfgDir;
///
/// let dir = TestCfgDir::new();
/// let path = dir.write_cfg("train", "## a\nx=1\n");
/// assert!(path.is_file());
/// dir.assert_cache_exists("train");
/// ```
pub struct TestCfgDir {
    temp_dir: TempDir,
}

impl Default for TestCfgDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestCfgDir {
    /// Create an empty temporary directory with an empty `cfg/` subdirectory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("cfg")).unwrap();
        Self { temp_dir }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The `cfg/` directory, as used for `cfg_root`.
    pub fn cfg_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.root().join("cfg"))
    }

    /// Path of `cfg/<name>.cfg`.
    pub fn cfg_path(&self, name: &str) -> NormalizedPath {
        self.cfg_root().join(&format!("{name}.cfg"))
    }

    /// Write `cfg/<name>.cfg`, creating subdirectories for nested names.
    pub fn write_cfg(&self, name: &str, content: &str) -> PathBuf {
        self.write(&format!("cfg/{name}.cfg"), content)
    }

    /// Write an arbitrary file relative to the root.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Move the modification time of a file `secs` seconds into the future.
    pub fn touch_ahead(&self, relative: &str, secs: u64) {
        let path = self.root().join(relative);
        let file = fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(secs))
            .unwrap_or_else(|e| panic!("Could not touch {}: {e}", path.display()));
    }

    /// Assert that the cache of `cfg/<name>.cfg` has been written.
    ///
    /// # Panics
    /// Panics with a descriptive message if the cache file does not exist.
    pub fn assert_cache_exists(&self, name: &str) {
        let cache = self.root().join(format!("cfg/.cache/{name}.cfg.cache"));
        assert!(
            cache.is_file(),
            "Expected cfg cache to exist: {}",
            cache.display()
        );
    }

    /// Assert that no cache has been written for `cfg/<name>.cfg`.
    ///
    /// # Panics
    /// Panics if the cache file exists.
    pub fn assert_no_cache(&self, name: &str) {
        let cache = self.root().join(format!("cfg/.cache/{name}.cfg.cache"));
        assert!(
            !cache.exists(),
            "Expected cfg cache NOT to exist: {}",
            cache.display()
        );
    }
}
