use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Prescription, User};

/// A user together with the stored password hash, for credential checks only.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Port for the domain layer: persistence operations the domain needs.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Load a user with their prescriptions.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Load a user by normalised email, including the password hash.
    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<UserCredentials>>;
    async fn email_exists(&self, email: &str) -> anyhow::Result<bool>;
    /// Insert a new user. Returns false when the email is already taken.
    async fn insert(&self, user: &User, password_hash: &str) -> anyhow::Result<bool>;
    /// Persist the mutable profile fields of `user` (by `user.id`).
    async fn update_profile(&self, user: &User) -> anyhow::Result<()>;
    async fn add_prescription(&self, user_id: Uuid, p: &Prescription) -> anyhow::Result<()>;
    async fn find_prescription(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Prescription>>;
    /// Returns true if a row was deleted.
    async fn delete_prescription(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}
