//! Tools shared by the unit tests of this crate.

use std::path::{Path, PathBuf};

const TEMP_DIR_ROOT_NAME: &str = "fev_regression_test";

/// A builder of temp directory for tests purpose.
pub struct TempDir {
    module_name: String,
    name: String,
}

impl TempDir {
    /// `TempDir` builder factory
    pub fn new<T: Into<String>>(module: T, name: T) -> Self {
        Self {
            module_name: module.into(),
            name: name.into(),
        }
    }

    /// Generate the path of the temp directory (no IO operation will be executed)
    pub fn build_path(&self) -> PathBuf {
        std::env::temp_dir()
            .join(TEMP_DIR_ROOT_NAME)
            .join(&self.module_name)
            .join(&self.name)
    }

    /// Create an empty directory based of builder configuration in the system temp folder.
    pub fn build(&self) -> PathBuf {
        let path = self.build_path();
        Self::create_dir(&path);

        path
    }

    /// Create on disk an empty temp directory based on the given module & name.
    pub fn create<T: Into<String>>(module: T, name: T) -> PathBuf {
        Self::new(module, name).build()
    }

    fn create_dir(path: &Path) {
        if path.exists() {
            std::fs::remove_dir_all(path)
                .unwrap_or_else(|e| panic!("Could not remove dir {path:?}: {e}"));
        }

        std::fs::create_dir_all(path)
            .unwrap_or_else(|e| panic!("Could not create dir {path:?}: {e}"));
    }
}
