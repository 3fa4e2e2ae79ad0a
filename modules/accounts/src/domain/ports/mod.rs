mod files;
mod hasher;
mod tokens;

pub use files::FileStore;
pub use hasher::PasswordHasher;
pub use tokens::TokenIssuer;
