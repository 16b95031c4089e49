//! User service
//!
//! Account CRUD plus the credential check used by login. There is no session
//! state: login only verifies the password and logout does nothing.

use std::sync::Arc;

use crate::domain::entities::User;
use crate::domain::ports::Storage;
use crate::error::DomainError;

/// Service for managing users
pub struct UserService<S>
where
    S: Storage,
{
    storage: Arc<S>,
}

impl<S> UserService<S>
where
    S: Storage,
{
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn create_user(&self, user: &User) -> Result<(), DomainError> {
        self.storage.create_user(user).await
    }

    pub async fn create_users_with_array(&self, users: &[User]) -> Result<(), DomainError> {
        self.storage.create_many_users(users).await
    }

    pub async fn create_users_with_list(&self, users: &[User]) -> Result<(), DomainError> {
        self.storage.create_many_users(users).await
    }

    /// Verify a username/password pair
    ///
    /// Passwords are stored and compared as plain text.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), DomainError> {
        let user = self.storage.retrieve_user_by_username(username).await?;

        if !user.password_matches(password) {
            tracing::info!(%username, "Rejected login");
            return Err(DomainError::Unauthorized(
                "invalid username and password combination".to_string(),
            ));
        }

        tracing::debug!(%username, "User logged in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), DomainError> {
        Ok(())
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.storage.retrieve_user_by_username(username).await
    }

    /// Replace the user currently named `username` with `user`
    pub async fn update_user_by_username(
        &self,
        username: &str,
        user: &User,
    ) -> Result<User, DomainError> {
        self.storage.update_user_by_username(username, user).await
    }

    pub async fn delete_user_by_username(&self, username: &str) -> Result<(), DomainError> {
        self.storage.delete_user_by_username(username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserId;
    use crate::test_utils::{test_user, test_user_named, InMemoryStorage};

    fn create_service(storage: InMemoryStorage) -> UserService<InMemoryStorage> {
        UserService::new(Arc::new(storage))
    }

    #[tokio::test]
    async fn create_and_get_user() {
        let service = create_service(InMemoryStorage::new());
        let user = test_user();

        service.create_user(&user).await.unwrap();

        let found = service.get_user_by_username(&user.username).await.unwrap();
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn create_user_with_duplicate_id_conflicts() {
        let existing = test_user();
        let service = create_service(InMemoryStorage::new().with_user(existing.clone()));

        let mut other = test_user_named("someone-else");
        other.id = existing.id;

        let err = service.create_user(&other).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_user_with_duplicate_username_conflicts() {
        let existing = test_user();
        let service = create_service(InMemoryStorage::new().with_user(existing.clone()));

        let mut other = test_user();
        other.id = UserId(existing.id.0 + 100);

        let err = service.create_user(&other).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_users_with_array_inserts_all() {
        let storage = Arc::new(InMemoryStorage::new());
        let service = UserService::new(storage.clone());
        let users = vec![test_user_named("alice"), test_user_named("bob")];

        service.create_users_with_array(&users).await.unwrap();

        assert_eq!(storage.user_count(), 2);
    }

    #[tokio::test]
    async fn create_users_with_list_aborts_whole_batch_on_conflict() {
        let existing = test_user_named("carol");
        let storage = Arc::new(InMemoryStorage::new().with_user(existing.clone()));
        let service = UserService::new(storage.clone());

        let users = vec![test_user_named("dave"), existing.clone()];
        let err = service.create_users_with_list(&users).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(storage.user_count(), 1);
    }

    #[tokio::test]
    async fn login_with_matching_password() {
        let user = test_user();
        let service = create_service(InMemoryStorage::new().with_user(user.clone()));

        let result = service.login(&user.username, &user.password).await;

        tokio_test::assert_ok!(result);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let user = test_user();
        let service = create_service(InMemoryStorage::new().with_user(user.clone()));

        let err = service.login(&user.username, "wrong").await.unwrap_err();

        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn login_unknown_user_propagates_not_found() {
        let service = create_service(InMemoryStorage::new());

        let err = service.login("ghost", "pw").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn logout_is_noop() {
        let service = create_service(InMemoryStorage::new());
        assert!(service.logout().await.is_ok());
    }

    #[tokio::test]
    async fn update_replaces_whole_document_including_keys() {
        let user = test_user();
        let service = create_service(InMemoryStorage::new().with_user(user.clone()));

        let replacement = User::new(10, "username-1")
            .with_name("a", "b")
            .with_contact("test@test.com", "456");
        let updated = service
            .update_user_by_username(&user.username, &replacement)
            .await
            .unwrap();

        assert_eq!(updated, replacement);
        assert!(service.get_user_by_username(&user.username).await.is_err());
        assert_eq!(
            service.get_user_by_username("username-1").await.unwrap(),
            replacement
        );
    }

    #[tokio::test]
    async fn update_unknown_user_is_not_found() {
        let service = create_service(InMemoryStorage::new());

        let err = service
            .update_user_by_username("ghost", &test_user())
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_user() {
        let user = test_user();
        let service = create_service(InMemoryStorage::new().with_user(user.clone()));

        service.delete_user_by_username(&user.username).await.unwrap();

        let err = service
            .delete_user_by_username(&user.username)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn store_failures_pass_through_unchanged() {
        let service = create_service(InMemoryStorage::unavailable());

        let err = service.get_user_by_username("anyone").await.unwrap_err();

        assert!(matches!(err, DomainError::Unavailable(_)));
    }
}
