mod argon2_hasher;
mod jwt_issuer;

pub use argon2_hasher::Argon2Hasher;
