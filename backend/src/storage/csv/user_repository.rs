use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use csv::Reader;
use std::fs::File;
use std::io::BufReader;
use tracing::{info, warn};
use uuid::Uuid;

use super::connection::{write_atomically, CsvConnection, USERS_HEADER};
use crate::domain::models::user::User;
use crate::storage::traits::UserStorage;

/// CSV-based user repository
#[derive(Clone)]
pub struct UserRepository {
    connection: CsvConnection,
}

impl UserRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_all(&self) -> Result<Vec<User>> {
        let path = self.connection.users_file_path();
        let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let mut reader = Reader::from_reader(BufReader::new(file));

        let mut users = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping malformed user row {} in {}: {}", line + 2, path.display(), e);
                    continue;
                }
            };
            let id = record.get(0).unwrap_or("").to_string();
            if id.is_empty() {
                continue;
            }
            users.push(User {
                id,
                name: record.get(1).unwrap_or("").to_string(),
                created_at: record.get(2).unwrap_or("").to_string(),
            });
        }
        Ok(users)
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self.read_all()?.into_iter().find(|u| u.name == name))
    }

    async fn find_or_create_user(&self, name: &str) -> Result<User> {
        let _guard = self.connection.lock();
        let mut users = self.read_all()?;
        if let Some(existing) = users.iter().find(|u| u.name == name) {
            return Ok(existing.clone());
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now().to_rfc3339(),
        };
        users.push(user.clone());
        write_atomically(
            &self.connection.users_file_path(),
            &USERS_HEADER,
            users
                .iter()
                .map(|u| [u.id.as_str(), u.name.as_str(), u.created_at.as_str()]),
        )?;

        info!("Created user '{}' ({})", user.name, user.id);
        Ok(user)
    }
}
