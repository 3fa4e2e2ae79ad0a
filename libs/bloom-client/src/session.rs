use std::sync::Arc;

use tracing::{info, warn};

use crate::api::models::{PublicUser, RegisterRequest};
use crate::api::{ApiClient, ClientError};
use crate::store::{load_json, save_json, LocalStore, StoreError};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

/// Login state kept in the local store under `token` and `user`.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn LocalStore>,
}

impl Session {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn require_token(&self) -> Result<String, ClientError> {
        self.token().ok_or(ClientError::Unauthenticated)
    }

    pub fn user(&self) -> Option<PublicUser> {
        load_json(self.store.as_ref(), USER_KEY)
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    fn remember(&self, token: String, user: &PublicUser) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)?;
        save_json(self.store.as_ref(), USER_KEY, user)
    }

    pub async fn login(
        &self,
        api: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<PublicUser, ClientError> {
        let auth = api.login(email, password).await?;
        self.remember(auth.token, &auth.user)?;
        info!(user_id = %auth.user.id, "Logged in");
        Ok(auth.user)
    }

    pub async fn register(
        &self,
        api: &ApiClient,
        req: &RegisterRequest,
    ) -> Result<PublicUser, ClientError> {
        let auth = api.register(req).await?;
        self.remember(auth.token, &auth.user)?;
        info!(user_id = %auth.user.id, "Registered");
        Ok(auth.user)
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)
    }

    /// Check the stored token against the profile endpoint. Any failure,
    /// including network errors, logs the user out.
    pub async fn verify(&self, api: &ApiClient) -> AuthState {
        let Some(token) = self.token() else {
            return AuthState::Unauthenticated;
        };
        match api.get_profile(&token).await {
            Ok(_) => AuthState::Authenticated,
            Err(e) => {
                warn!(error = %e, "Stored token rejected, logging out");
                if let Err(e) = self.logout() {
                    warn!(error = %e, "Failed to clear session");
                }
                AuthState::Unauthenticated
            }
        }
    }
}
