//! User lookup and lazy creation.

use std::sync::Arc;
use tracing::debug;

use crate::domain::error::ServiceResult;
use crate::domain::models::user::User;
use crate::domain::validation::validate_user_name;
use crate::storage::{Connection, UserStorage};

#[derive(Clone)]
pub struct UserService<C: Connection> {
    user_repository: C::UserRepository,
}

impl<C: Connection> UserService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            user_repository: connection.create_user_repository(),
        }
    }

    /// Exact-name lookup; an unknown name is not an error.
    pub async fn find_user(&self, name: &str) -> ServiceResult<Option<User>> {
        let name = validate_user_name(name)?;
        Ok(self.user_repository.find_user_by_name(name).await?)
    }

    /// Return the user called `name`, creating it on first use.
    pub async fn find_or_create_user(&self, name: &str) -> ServiceResult<User> {
        let name = validate_user_name(name)?;
        let user = self.user_repository.find_or_create_user(name).await?;
        debug!("Resolved user '{}' to {}", user.name, user.id);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ServiceError;
    use crate::domain::validation::ExpenseValidationError;
    use crate::storage::csv::test_utils::TestEnvironment;

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() {
        let env = TestEnvironment::new().unwrap();
        let service = UserService::new(Arc::new(env.connection.clone()));

        assert!(service.find_user("Luis").await.unwrap().is_none());
        let first = service.find_or_create_user("Luis").await.unwrap();
        let second = service.find_or_create_user("Luis").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(service.find_user("Luis").await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let env = TestEnvironment::new().unwrap();
        let service = UserService::new(Arc::new(env.connection.clone()));

        let result = service.find_or_create_user("  ").await;
        assert!(matches!(
            result,
            Err(ServiceError::Validation(ExpenseValidationError::EmptyUserName))
        ));
    }

    #[tokio::test]
    async fn test_names_match_exactly() {
        let env = TestEnvironment::new().unwrap();
        let service = UserService::new(Arc::new(env.connection.clone()));

        let ana = service.find_or_create_user("Ana").await.unwrap();
        let padded = service.find_or_create_user(" Ana").await.unwrap();
        assert_ne!(ana.id, padded.id);
        assert_eq!(padded.name, " Ana");
        assert!(service.find_user("ana").await.unwrap().is_none());
    }
}
