/// Salted one-way password hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> anyhow::Result<String>;
    /// `Ok(false)` on mismatch; errors only for unusable hashes.
    fn verify(&self, password: &str, hash: &str) -> anyhow::Result<bool>;
}
