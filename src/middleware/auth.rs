use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use social_core::{
    AppError,
    errors::{MSG_INVALID_AUTH_FORMAT, MSG_NOT_AUTHORIZED},
};
use social_models::{Role, UserId};

use crate::state::AppState;

/// The caller, as vouched for by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: Role,
}

impl Identity {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    /// The subject as a user id.
    pub fn user_id(&self) -> Result<UserId, AppError> {
        UserId::parse(&self.subject)
    }

    /// Whether the subject names the same user as `id`.
    pub fn is(&self, id: &str) -> bool {
        if self.subject == id {
            return true;
        }
        matches!(
            (self.subject.parse::<UserId>(), id.parse::<UserId>()),
            (Ok(a), Ok(b)) if a == b
        )
    }
}

/// Reads the identity stored by [`authenticate`]. Handlers outside the
/// authenticated routes get a 401.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| AppError::unauthenticated(MSG_NOT_AUTHORIZED))
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::unauthenticated(MSG_NOT_AUTHORIZED))?
        .to_str()
        .map_err(|_| AppError::unauthenticated(MSG_INVALID_AUTH_FORMAT))?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AppError::unauthenticated(MSG_INVALID_AUTH_FORMAT)),
    }
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;

    let (subject, role) = state.codec.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "rejected token");
        AppError::unauthenticated(e.to_string())
    })?;

    req.extensions_mut().insert(Identity::new(subject, role));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.message(), MSG_NOT_AUTHORIZED);
    }

    #[test]
    fn test_bearer_token_bad_format() {
        for value in ["abc.def", "Basic abc", "Bearer", "Bearer a b"] {
            let err = bearer_token(&headers(value)).unwrap_err();
            assert_eq!(err.message(), MSG_INVALID_AUTH_FORMAT, "{value}");
        }
    }

    #[test]
    fn test_identity_is() {
        let id = UserId::new();
        let identity = Identity::new(id.to_string(), Role::Client);
        assert!(identity.is(&id.to_string()));
        assert!(identity.is(&id.to_string().to_uppercase()));
        assert!(!identity.is(&UserId::new().to_string()));
    }
}
