use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, AppResult};
use crate::services::tokens::TokenIssuer;
use crate::AppState;

/// Verified caller identity, stored in request extensions by
/// `require_auth` for the rest of the pipeline to read.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub i64);

/// First guard layer, applied to every protected router. Requires a
/// Bearer token that passes signature, expiry, issuer and audience
/// checks and carries a numeric subject.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = authenticate(&state, req.headers().get(header::AUTHORIZATION))?;
    req.extensions_mut().insert(CurrentUser(user_id));
    Ok(next.run(req).await)
}

fn authenticate(state: &Arc<AppState>, auth_header: Option<&HeaderValue>) -> AppResult<i64> {
    let auth_header = auth_header
        .and_then(|value| value.to_str().ok())
        .ok_or_else(unauthenticated)?;

    if !auth_header.to_ascii_lowercase().starts_with("bearer ") {
        return Err(unauthenticated());
    }
    let token = auth_header[7..].trim();

    let claims = TokenIssuer::decode(&state.config.jwt, token).map_err(|_| unauthenticated())?;

    // `sub` normally carries the id; older clients put it in `nameid`.
    let subject = if claims.sub.is_empty() {
        claims.nameid.unwrap_or_default()
    } else {
        claims.sub
    };

    subject.parse::<i64>().ok().filter(|id| *id > 0).ok_or_else(|| {
        AppError::MalformedToken("Authenticated user missing numeric subject claim".to_string())
    })
}

fn unauthenticated() -> AppError {
    AppError::InvalidCredentials("Token invalid or missing".to_string())
}

/// Second guard layer. Handlers take the caller id through this extractor,
/// which fails on its own if no verified identity was attached. Route
/// parameters and request bodies are never trusted for identity.
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .map(|current| AuthUser(current.0))
            .ok_or_else(|| {
                AppError::InvalidCredentials(
                    "Authentication failed: missing or invalid user ID in token".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tokens::Claims;
    use crate::test_support::test_state;
    use axum::{http::StatusCode, middleware, routing::get, Router};
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tower::ServiceExt;

    async fn whoami(user: AuthUser) -> String {
        user.0.to_string()
    }

    fn protected_app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .with_state(state)
    }

    fn sign_token(state: &Arc<AppState>, sub: &str, nameid: Option<&str>) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            email: "alice@example.com".to_string(),
            jti: "test-token".to_string(),
            iss: state.config.jwt.issuer.clone(),
            aud: state.config.jwt.audience.clone(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(1)).timestamp() as usize,
            nameid: nameid.map(str::to_string),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(state.config.jwt.secret.as_bytes()),
        )
        .expect("sign token")
    }

    async fn get_whoami(app: Router, auth_header: Option<String>) -> (StatusCode, String) {
        let mut builder = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = builder.body(Body::empty()).expect("build request");

        let response = app.oneshot(request).await.expect("run request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = test_state().await;
        let (status, body) = get_whoami(protected_app(state), None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token invalid or missing"));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let state = test_state().await;
        let (status, body) =
            get_whoami(protected_app(state), Some("Basic dXNlcjpwYXNz".to_string())).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token invalid or missing"));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let state = test_state().await;
        let (status, body) = get_whoami(
            protected_app(state),
            Some("Bearer not.a.token".to_string()),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Token invalid or missing"));
    }

    #[tokio::test]
    async fn non_numeric_subject_is_malformed() {
        let state = test_state().await;
        let token = sign_token(&state, "not-a-number", None);
        let (status, body) =
            get_whoami(protected_app(state), Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Authenticated user missing numeric subject claim"));
    }

    #[tokio::test]
    async fn valid_token_reaches_handler_with_id() {
        let state = test_state().await;
        let token = sign_token(&state, "123", None);
        let (status, body) =
            get_whoami(protected_app(state), Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "123");
    }

    #[tokio::test]
    async fn empty_subject_falls_back_to_nameid() {
        let state = test_state().await;
        let token = sign_token(&state, "", Some("55"));
        let (status, body) =
            get_whoami(protected_app(state), Some(format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "55");
    }

    #[tokio::test]
    async fn extractor_fails_without_middleware() {
        let state = test_state().await;
        let app = Router::new()
            .route("/whoami", get(whoami))
            .with_state(state);

        let (status, body) = get_whoami(app, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Authentication failed: missing or invalid user ID in token"));
    }
}
