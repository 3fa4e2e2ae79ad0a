use uuid::Uuid;

/// Issues identity tokens for authenticated users.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: Uuid) -> anyhow::Result<String>;
}
