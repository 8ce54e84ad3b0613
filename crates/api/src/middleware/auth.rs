//! Bearer token authentication extractor.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::Utc;

use crate::error::{AppError, set_sentry_user};
use crate::models::Vendor;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token for a registered vendor.
///
/// Rejects with 401 (`WWW-Authenticate: Bearer`) when the header is missing,
/// the scheme is not `Bearer`, the token fails verification, or its subject is
/// not a registered vendor.
///
/// # Example
///
/// ```rust,ignore
/// async fn me(RequireVendor(vendor): RequireVendor) -> Json<Vendor> {
///     Json(vendor)
/// }
/// ```
pub struct RequireVendor(pub Vendor);

impl FromRequestParts<AppState> for RequireVendor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::Unauthenticated)?;
        let vendor = state.auth().authenticate(token, Utc::now()).await?;

        tracing::Span::current().record("vendor_id", vendor.id.as_i64());
        set_sentry_user(&vendor.id, Some(vendor.email.as_str()));

        Ok(Self(vendor))
    }
}

/// Token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively; an empty token is `None`.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts(Some("BEARER  abc "))), Some("abc"));
    }

    #[test]
    fn test_bearer_token_rejects() {
        assert_eq!(bearer_token(&parts(None)), None);
        assert_eq!(bearer_token(&parts(Some("Bearer"))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer   "))), None);
        assert_eq!(bearer_token(&parts(Some("Basic dXNlcjpwdw=="))), None);
        assert_eq!(bearer_token(&parts(Some("Token abc"))), None);
    }
}
