use std::sync::Arc;

use apikit::ProblemResponse;
use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{header::AUTHORIZATION, request::Parts, Extensions, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AuthError;
use crate::tokens::TokenVerifier;

/// Authenticated caller, placed in request extensions by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let Some(raw) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingToken);
    };
    let value = raw.to_str().map_err(|_| AuthError::InvalidToken)?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };
    if token.is_empty() || token.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Path as the client sent it. Inside a nested router `uri` has the mount
/// prefix stripped; [`OriginalUri`] keeps it.
fn request_path(extensions: &Extensions, uri: &Uri) -> String {
    extensions
        .get::<OriginalUri>()
        .map_or(uri.path(), |o| o.0.path())
        .to_owned()
}

/// Middleware for protected routes: rejects the request with 401 unless it
/// carries a valid bearer token, otherwise attaches [`AuthUser`].
///
/// Install with `axum::middleware::from_fn_with_state(verifier, require_auth)`.
pub async fn require_auth(
    State(verifier): State<Arc<dyn TokenVerifier>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ProblemResponse> {
    let path = request_path(req.extensions(), req.uri());
    let user_id = bearer_token(req.headers())
        .and_then(|token| verifier.verify(token).map_err(AuthError::from))
        .map_err(|e| {
            tracing::debug!(error = %e, path = %path, "request rejected by auth guard");
            e.to_problem(&path)
        })?;

    tracing::Span::current().record("user_id", tracing::field::display(user_id));
    req.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ProblemResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| {
                AuthError::MissingToken.to_problem(&request_path(&parts.extensions, &parts.uri))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(v: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer   abc")).unwrap(), "abc");
    }

    #[test]
    fn bare_value_is_treated_as_token() {
        assert_eq!(bearer_token(&headers("abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn missing_or_empty_header_requires_auth() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer ")),
            Err(AuthError::MissingToken)
        ));
    }
}
