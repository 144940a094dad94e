//! Test environment with automatic cleanup.
//!
//! The temporary data directory is removed when the environment is dropped,
//! even if the test panics.

use anyhow::Result;
use tempfile::TempDir;

use super::connection::CsvConnection;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
        })
    }
}
