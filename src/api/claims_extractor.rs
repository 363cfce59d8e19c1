use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::api::handlers::AppState;
use crate::auth::TokenVerifier;
use crate::model::AuthContext;

/// Axum extractor for the caller's claim set.
///
/// Reads the `Authorization: Bearer` header and verifies it against the
/// configured public key. A missing or unverifiable token yields the
/// anonymous context rather than a rejection; endpoints that require
/// authentication turn that into 401 themselves.
#[async_trait]
impl<S> FromRequestParts<AppState<S>> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        Ok(extract_claims(&parts.headers, &state.verifier))
    }
}

fn extract_claims(headers: &HeaderMap, verifier: &TokenVerifier) -> AuthContext {
    let Some(token) = bearer_token(headers) else {
        return AuthContext::Anonymous;
    };
    match verifier.verify(token) {
        Ok(claims) => AuthContext::Authenticated(claims),
        Err(reason) => {
            log::debug!("rejected bearer token: {}", reason);
            AuthContext::Anonymous
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwdw=="),
        );
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn unverifiable_tokens_fall_back_to_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-a-jwt"),
        );
        let context = extract_claims(&headers, &TokenVerifier::disabled());
        assert_eq!(context, AuthContext::Anonymous);
    }
}
