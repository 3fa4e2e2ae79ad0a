//! Identity tokens and the axum guard that enforces them.

pub mod error;
pub mod guard;
pub mod tokens;

pub use error::AuthError;
pub use guard::{require_auth, AuthUser};
pub use tokens::{Claims, JwtTokens, TokenError, TokenVerifier};
