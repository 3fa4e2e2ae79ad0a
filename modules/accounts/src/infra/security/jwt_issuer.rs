use authn::JwtTokens;
use uuid::Uuid;

use crate::domain::ports::TokenIssuer;

impl TokenIssuer for JwtTokens {
    fn issue(&self, user_id: Uuid) -> anyhow::Result<String> {
        JwtTokens::issue(self, user_id).map_err(anyhow::Error::from)
    }
}
