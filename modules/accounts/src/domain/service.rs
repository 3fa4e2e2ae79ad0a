use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    AuthSession, IncomingFile, NewUser, Prescription, ProfilePatch, User,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{FileStore, PasswordHasher, TokenIssuer};
use crate::domain::repo::UsersRepository;
use crate::domain::{uploads, validation};

/// Verified against when the email is unknown so both login failures do the
/// same hashing work. Never matches any password.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Origin used to build public file URLs, without trailing slash.
    pub public_base_url: String,
    /// URL prefix the uploads directory is served under.
    pub url_prefix: String,
    /// Sub-directory of the uploads root that receives new files.
    pub upload_subdir: String,
    pub max_upload_bytes: u64,
    pub min_password_len: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:5002".to_string(),
            url_prefix: "/uploads".to_string(),
            upload_subdir: "profile-images".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            min_password_len: 6,
        }
    }
}

/// A file accepted and written to the file store.
struct StoredUpload {
    original_name: String,
    relative_path: String,
    url: String,
}

/// Domain service for accounts. Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    hasher: Arc<dyn PasswordHasher>,
    files: Arc<dyn FileStore>,
    tokens: Arc<dyn TokenIssuer>,
    config: ServiceConfig,
}

impl Service {
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        hasher: Arc<dyn PasswordHasher>,
        files: Arc<dyn FileStore>,
        tokens: Arc<dyn TokenIssuer>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            hasher,
            files,
            tokens,
            config,
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.config.max_upload_bytes
    }

    #[instrument(
        name = "accounts.service.register",
        skip(self, new_user),
        fields(email = %new_user.email.trim())
    )]
    pub async fn register(&self, mut new_user: NewUser) -> Result<AuthSession, DomainError> {
        info!("Registering new user");

        new_user.email = validation::normalize_email(&new_user.email);
        validation::validate_new_user(&new_user, self.config.min_password_len)?;

        if self
            .repo
            .email_exists(&new_user.email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::email_already_exists(new_user.email));
        }

        let password_hash = self
            .hasher
            .hash(&new_user.password)
            .map_err(|e| DomainError::auth_internal(e.to_string()))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.trim().to_string(),
            email: new_user.email,
            date_of_birth: new_user.date_of_birth,
            gender: validation::non_blank(new_user.gender),
            phone: validation::non_blank(new_user.phone),
            profile_image: None,
            prescriptions: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let inserted = self
            .repo
            .insert(&user, &password_hash)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !inserted {
            // lost a race with a concurrent registration
            return Err(DomainError::email_already_exists(user.email));
        }

        let token = self.issue_token(user.id)?;
        info!(user_id = %user.id, "Successfully registered user");
        Ok(AuthSession { token, user })
    }

    #[instrument(name = "accounts.service.login", skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        debug!("Checking credentials");

        let email = validation::normalize_email(email);
        let found = self
            .repo
            .find_credentials(&email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        let Some(creds) = found else {
            let _ = self.hasher.verify(password, DUMMY_HASH);
            debug!("Unknown email");
            return Err(DomainError::invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(password, &creds.password_hash)
            .map_err(|e| DomainError::auth_internal(e.to_string()))?;
        if !matches {
            debug!("Password mismatch");
            return Err(DomainError::invalid_credentials());
        }

        let token = self.issue_token(creds.user.id)?;
        info!(user_id = %creds.user.id, "User logged in");
        Ok(AuthSession {
            token,
            user: creds.user,
        })
    }

    #[instrument(name = "accounts.service.get_profile", skip(self), fields(user_id = %user_id))]
    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, DomainError> {
        debug!("Loading profile");
        self.load_user(user_id).await
    }

    #[instrument(name = "accounts.service.update_profile", skip(self, patch), fields(user_id = %user_id))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> Result<User, DomainError> {
        info!("Updating profile");

        let mut user = self.load_user(user_id).await?;
        if let Some(name) = validation::non_blank(patch.name) {
            user.name = name;
        }
        if let Some(dob) = patch.date_of_birth {
            user.date_of_birth = Some(dob);
        }
        if let Some(gender) = validation::non_blank(patch.gender) {
            user.gender = Some(gender);
        }
        if let Some(phone) = validation::non_blank(patch.phone) {
            user.phone = Some(phone);
        }
        user.updated_at = Utc::now();

        self.repo
            .update_profile(&user)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(user)
    }

    /// Store a new profile image and return its public URL.
    #[instrument(name = "accounts.service.upload_profile_image", skip(self, file), fields(user_id = %user_id))]
    pub async fn upload_profile_image(
        &self,
        user_id: Uuid,
        file: Option<IncomingFile>,
    ) -> Result<String, DomainError> {
        info!("Uploading profile image");

        let mut user = self.load_user(user_id).await?;
        let stored = self.store_upload(file).await?;

        user.profile_image = Some(stored.url.clone());
        user.updated_at = Utc::now();
        if let Err(e) = self.repo.update_profile(&user).await {
            self.discard(&stored.relative_path).await;
            return Err(DomainError::database(e.to_string()));
        }
        Ok(stored.url)
    }

    #[instrument(name = "accounts.service.upload_prescription", skip(self, file), fields(user_id = %user_id))]
    pub async fn upload_prescription(
        &self,
        user_id: Uuid,
        file: Option<IncomingFile>,
    ) -> Result<Prescription, DomainError> {
        info!("Uploading prescription");

        self.load_user(user_id).await?;
        let stored = self.store_upload(file).await?;

        let prescription = Prescription {
            id: Uuid::new_v4(),
            name: stored.original_name,
            file_url: stored.url,
            stored_path: stored.relative_path,
            uploaded_at: Utc::now(),
        };
        if let Err(e) = self.repo.add_prescription(user_id, &prescription).await {
            self.discard(&prescription.stored_path).await;
            return Err(DomainError::database(e.to_string()));
        }
        info!(prescription_id = %prescription.id, "Prescription stored");
        Ok(prescription)
    }

    /// Remove a prescription record and its file. `id` comes straight from the
    /// request path; anything that is not a known id is not found.
    #[instrument(name = "accounts.service.delete_prescription", skip(self), fields(user_id = %user_id))]
    pub async fn delete_prescription(&self, user_id: Uuid, id: &str) -> Result<(), DomainError> {
        info!("Deleting prescription");

        let pid = Uuid::parse_str(id).map_err(|_| DomainError::prescription_not_found(id))?;
        let prescription = self
            .repo
            .find_prescription(user_id, pid)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::prescription_not_found(id))?;

        let deleted = self
            .repo
            .delete_prescription(user_id, pid)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !deleted {
            return Err(DomainError::prescription_not_found(id));
        }

        self.discard(&prescription.stored_path).await;
        Ok(())
    }

    async fn load_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(user_id))
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.tokens
            .issue(user_id)
            .map_err(|e| DomainError::auth_internal(e.to_string()))
    }

    async fn store_upload(&self, file: Option<IncomingFile>) -> Result<StoredUpload, DomainError> {
        let file = file.ok_or(DomainError::MissingFile)?;

        if !uploads::is_allowed(&file.content_type, &file.original_name) {
            debug!(content_type = %file.content_type, name = %file.original_name, "Rejected upload type");
            return Err(DomainError::unsupported_file_type(file.original_name));
        }
        let size = file.bytes.len() as u64;
        if size > self.config.max_upload_bytes {
            return Err(DomainError::file_too_large(size, self.config.max_upload_bytes));
        }

        let file_name = uploads::stored_file_name(
            &file.original_name,
            Utc::now().timestamp_millis(),
            uploads::random_suffix(),
        );
        let relative_path = format!("{}/{}", self.config.upload_subdir, file_name);
        self.files
            .save(&relative_path, &file.bytes)
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        let url = format!(
            "{}{}/{}",
            self.config.public_base_url, self.config.url_prefix, relative_path
        );
        debug!(path = %relative_path, size, "Upload stored");
        Ok(StoredUpload {
            original_name: file.original_name,
            relative_path,
            url,
        })
    }

    /// Best-effort removal of a stored file.
    async fn discard(&self, relative_path: &str) {
        match self.files.remove(relative_path).await {
            Ok(true) => debug!(path = %relative_path, "Removed stored file"),
            Ok(false) => warn!(path = %relative_path, "Stored file already missing"),
            Err(e) => warn!(path = %relative_path, error = %e, "Failed to remove stored file"),
        }
    }
}
