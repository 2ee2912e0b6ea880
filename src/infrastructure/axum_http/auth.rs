use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tracing::warn;
use uuid::Uuid;

use crate::infrastructure::{axum_http::error_responses::ApiError, jwt_authentication};

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone)]
pub struct AdminGuard {
    pub jwt_secret: String,
}

/// Authenticated admin id, inserted into request extensions by [`require_admin`].
#[derive(Debug, Clone, Copy)]
pub struct AdminId(pub Uuid);

pub async fn require_admin(
    State(guard): State<Arc<AdminGuard>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = bearer_token(&request).or_else(|| {
        jar.get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    });

    let Some(token) = token else {
        return ApiError::unauthorized("Authentication required").into_response();
    };

    let admin_id = match jwt_authentication::validate_token(&token, &guard.jwt_secret)
        .and_then(|claims| claims.admin_id())
    {
        Ok(admin_id) => admin_id,
        Err(err) => {
            warn!(error = %err, "auth: rejected admin token");
            return ApiError::unauthorized("Invalid or expired token").into_response();
        }
    };

    request.extensions_mut().insert(AdminId(admin_id));

    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        http::{HeaderValue, StatusCode},
        middleware,
        routing::get,
    };
    use axum_test::TestServer;

    const SECRET: &str = "guard-secret";

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
    }

    fn server() -> TestServer {
        let guard = Arc::new(AdminGuard {
            jwt_secret: SECRET.to_string(),
        });
        let app = Router::new()
            .route("/protected", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(guard, require_admin));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let response = server().get("/protected").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn bearer_token_is_accepted() {
        let token = jwt_authentication::generate_token(Uuid::new_v4(), SECRET, 1).unwrap();

        server()
            .get("/protected")
            .add_header(AUTHORIZATION, bearer(&token))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn cookie_token_is_accepted() {
        let token = jwt_authentication::generate_token(Uuid::new_v4(), SECRET, 1).unwrap();

        server()
            .get("/protected")
            .add_cookie(cookie::Cookie::new(TOKEN_COOKIE, token))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn token_from_other_secret_is_unauthorized() {
        let token = jwt_authentication::generate_token(Uuid::new_v4(), "other", 1).unwrap();

        server()
            .get("/protected")
            .add_header(AUTHORIZATION, bearer(&token))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
