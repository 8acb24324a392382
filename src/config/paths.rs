//! Path management for tillbook
//!
//! Provides XDG-compliant path resolution for configuration and data files.
//!
//! ## Path Resolution Order
//!
//! 1. `TILLBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/tillbook` or `~/.config/tillbook`
//! 3. Windows: `%APPDATA%\tillbook`

use std::path::PathBuf;

use crate::error::TillbookError;

/// Manages all paths used by tillbook
#[derive(Debug, Clone)]
pub struct TillbookPaths {
    /// Base directory for all tillbook data
    base_dir: PathBuf,
}

impl TillbookPaths {
    /// Create a new TillbookPaths instance
    ///
    /// Path resolution:
    /// 1. `TILLBOOK_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/tillbook` or `~/.config/tillbook`
    /// 3. Windows: `%APPDATA%\tillbook`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TillbookError> {
        let base_dir = if let Ok(custom) = std::env::var("TILLBOOK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create TillbookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/tillbook/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/tillbook/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to balances.json (daily balance snapshots)
    pub fn balances_file(&self) -> PathBuf {
        self.data_dir().join("balances.json")
    }

    /// Get the path to expenses.json
    pub fn expenses_file(&self) -> PathBuf {
        self.data_dir().join("expenses.json")
    }

    /// Get the path to sales.json (the transactional store)
    pub fn sales_file(&self) -> PathBuf {
        self.data_dir().join("sales.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), TillbookError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TillbookError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TillbookError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

/// Resolve the platform default base directory
fn resolve_default_path() -> Result<PathBuf, TillbookError> {
    #[cfg(windows)]
    {
        let appdata = std::env::var("APPDATA")
            .map_err(|_| TillbookError::Config("APPDATA not set".to_string()))?;
        Ok(PathBuf::from(appdata).join("tillbook"))
    }

    #[cfg(not(windows))]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg).join("tillbook"));
        }
        let home = std::env::var("HOME")
            .map_err(|_| TillbookError::Config("HOME not set".to_string()))?;
        Ok(PathBuf::from(home).join(".config").join("tillbook"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_with_base_dir() {
        let paths = TillbookPaths::with_base_dir(PathBuf::from("/tmp/tillbook-test"));
        assert_eq!(paths.base_dir(), &PathBuf::from("/tmp/tillbook-test"));
        assert_eq!(
            paths.balances_file(),
            PathBuf::from("/tmp/tillbook-test/data/balances.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TillbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths_live_under_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TillbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(paths.expenses_file().starts_with(paths.data_dir()));
        assert!(paths.sales_file().starts_with(paths.data_dir()));
        assert!(paths.settings_file().starts_with(paths.base_dir()));
    }
}
