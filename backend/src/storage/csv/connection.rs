use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use super::expense_repository::ExpenseRepository;
use super::user_repository::UserRepository;
use crate::storage::traits::Connection;

pub const USERS_FILE: &str = "users.csv";
pub const EXPENSES_FILE: &str = "expenses.csv";

pub const USERS_HEADER: [&str; 3] = ["id", "name", "created_at"];
pub const EXPENSES_HEADER: [&str; 10] = [
    "id",
    "user_id",
    "category",
    "quantity",
    "unit_price",
    "type",
    "date",
    "month_year",
    "paid_amount",
    "created_at",
];

/// CsvConnection owns the data directory and serializes file rewrites.
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("creating data directory {}", base_path.display()))?;
            info!("Created data directory {}", base_path.display());
        }

        let connection = Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        };
        connection.ensure_file_exists(USERS_FILE, &USERS_HEADER)?;
        connection.ensure_file_exists(EXPENSES_FILE, &EXPENSES_HEADER)?;
        Ok(connection)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn users_file_path(&self) -> PathBuf {
        self.base_directory.join(USERS_FILE)
    }

    pub fn expenses_file_path(&self) -> PathBuf {
        self.base_directory.join(EXPENSES_FILE)
    }

    /// Write a header-only file if `file_name` does not exist yet
    fn ensure_file_exists(&self, file_name: &str, header: &[&str]) -> Result<()> {
        let path = self.base_directory.join(file_name);
        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            writer.write_record(header)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Held for the whole read-modify-write cycle of a repository call.
    /// Never hold it across an `.await`.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Connection for CsvConnection {
    type UserRepository = UserRepository;
    type ExpenseRepository = ExpenseRepository;

    fn create_user_repository(&self) -> Self::UserRepository {
        UserRepository::new(self.clone())
    }

    fn create_expense_repository(&self) -> Self::ExpenseRepository {
        ExpenseRepository::new(self.clone())
    }
}

/// Replace `path` with `records` by writing a sibling temp file and renaming
/// it over the existing file.
pub(crate) fn write_atomically<I, R>(path: &Path, header: &[&str], records: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let temp_path = path.with_extension("tmp");
    {
        let mut writer = csv::Writer::from_path(&temp_path)
            .with_context(|| format!("creating {}", temp_path.display()))?;
        writer.write_record(header)?;
        for record in records {
            writer.write_record(record)?;
        }
        writer.flush()?;
    }
    fs::rename(&temp_path, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_files_with_headers() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested").join("data");
        let connection = CsvConnection::new(&data_dir).unwrap();

        let users = fs::read_to_string(connection.users_file_path()).unwrap();
        assert_eq!(users.trim(), "id,name,created_at");

        let expenses = fs::read_to_string(connection.expenses_file_path()).unwrap();
        assert!(expenses.starts_with("id,user_id,category,quantity,unit_price,type"));
    }

    #[test]
    fn test_reopening_keeps_existing_data() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        write_atomically(
            &connection.users_file_path(),
            &USERS_HEADER,
            vec![vec!["u1", "ana", "2025-01-01T00:00:00Z"]],
        )
        .unwrap();

        let reopened = CsvConnection::new(temp_dir.path()).unwrap();
        let users = fs::read_to_string(reopened.users_file_path()).unwrap();
        assert!(users.contains("u1,ana"));
        assert!(!reopened.base_directory().join("users.tmp").exists());
    }
}
