use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::extract::CookieJar;
use cookie::{Cookie, SameSite, time::Duration};
use serde::Serialize;

use crate::{
    application::usercases::admin_auth::{AdminAuthUseCase, AdminTokenConfig},
    config::{config_model::DotEnvyConfig, stage::Stage},
    domain::{
        repositories::admins::AdminRepository,
        value_objects::admins::{AdminModel, LoginAdminModel, RegisterAdminModel},
    },
    infrastructure::{
        axum_http::{auth::TOKEN_COOKIE, error_responses::ApiError},
        postgres::{postgres_connection::PgPoolSquad, repositories::admins::AdminPostgres},
    },
};

pub struct AdminAuthState<T>
where
    T: AdminRepository + Send + Sync + 'static,
{
    pub admin_auth_usecase: AdminAuthUseCase<T>,
    pub token_ttl_days: i64,
    pub stage: Stage,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    message: &'static str,
    user: AdminModel,
    token: String,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let admin_repository = AdminPostgres::new(Arc::clone(&db_pool));
    let admin_auth_usecase = AdminAuthUseCase::new(
        Arc::new(admin_repository),
        AdminTokenConfig {
            secret: config.admin_secret.secret.clone(),
            ttl_days: config.admin_secret.token_ttl_days,
        },
    );

    router(Arc::new(AdminAuthState {
        admin_auth_usecase,
        token_ttl_days: config.admin_secret.token_ttl_days,
        stage: config.stage,
    }))
}

pub fn router<T>(state: Arc<AdminAuthState<T>>) -> Router
where
    T: AdminRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(register::<T>))
        .route("/login", post(login::<T>))
        .with_state(state)
}

pub async fn register<T>(
    State(state): State<Arc<AdminAuthState<T>>>,
    payload: Result<Json<RegisterAdminModel>, JsonRejection>,
) -> Response
where
    T: AdminRepository + Send + Sync + 'static,
{
    let Json(register_admin_model) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::json_body(rejection).into_response(),
    };

    match state.admin_auth_usecase.register(register_admin_model).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                success: true,
                message: "Admin registered successfully",
            }),
        )
            .into_response(),
        Err(err) => ApiError::admin_auth(err, state.stage).into_response(),
    }
}

pub async fn login<T>(
    State(state): State<Arc<AdminAuthState<T>>>,
    jar: CookieJar,
    payload: Result<Json<LoginAdminModel>, JsonRejection>,
) -> Response
where
    T: AdminRepository + Send + Sync + 'static,
{
    let Json(login_admin_model) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ApiError::json_body(rejection).into_response(),
    };

    let login_result = match state.admin_auth_usecase.login(login_admin_model).await {
        Ok(login_result) => login_result,
        Err(err) => return ApiError::admin_auth(err, state.stage).into_response(),
    };

    // Read by the browser client, so not HTTP-only.
    let cookie = Cookie::build((TOKEN_COOKIE, login_result.token.clone()))
        .path("/")
        .http_only(false)
        .same_site(SameSite::Lax)
        .max_age(Duration::days(state.token_ttl_days))
        .build();

    (
        StatusCode::OK,
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            message: "Login successful",
            user: login_result.user,
            token: login_result.token,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{entities::admins::AdminEntity, repositories::admins::MockAdminRepository},
        infrastructure::{argon2_hashing, jwt_authentication},
    };
    use axum_test::TestServer;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn server(admins: MockAdminRepository) -> TestServer {
        let state = Arc::new(AdminAuthState {
            admin_auth_usecase: AdminAuthUseCase::new(
                Arc::new(admins),
                AdminTokenConfig {
                    secret: "route-secret".to_string(),
                    ttl_days: 7,
                },
            ),
            token_ttl_days: 7,
            stage: Stage::Production,
        });
        TestServer::new(Router::new().nest("/api/admin", router(state))).unwrap()
    }

    #[tokio::test]
    async fn register_returns_created() {
        let mut admins = MockAdminRepository::new();
        admins
            .expect_register()
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let response = server(admins)
            .post("/api/admin/register")
            .json(&json!({
                "username": "admin",
                "email": "admin@example.com",
                "password": "pw"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn register_missing_field_is_bad_request() {
        let mut admins = MockAdminRepository::new();
        admins.expect_register().never();

        let response = server(admins)
            .post("/api/admin/register")
            .json(&json!({ "username": "admin" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "MISSING_FIELDS");
    }

    #[tokio::test]
    async fn non_json_register_body_gets_error_envelope() {
        let mut admins = MockAdminRepository::new();
        admins.expect_register().never();

        let response = server(admins)
            .post("/api/admin/register")
            .text("username=admin")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn malformed_login_json_gets_error_envelope() {
        let mut admins = MockAdminRepository::new();
        admins.expect_find_by_email().never();

        let response = server(admins)
            .post("/api/admin/login")
            .bytes(r#"{"email": "admin@example.com","#.into())
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "INVALID_BODY");
    }

    #[tokio::test]
    async fn login_sets_readable_token_cookie() {
        let admin = AdminEntity {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: argon2_hashing::hash("pw".to_string()).unwrap(),
            created_at: Utc::now(),
        };
        let admin_id = admin.id;

        let mut admins = MockAdminRepository::new();
        admins
            .expect_find_by_email()
            .returning(move |_| Ok(Some(admin.clone())));

        let response = server(admins)
            .post("/api/admin/login")
            .json(&json!({ "email": "admin@example.com", "password": "pw" }))
            .await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["user"]["id"], admin_id.to_string());
        assert_eq!(body["user"]["email"], "admin@example.com");

        let cookie = response.cookie(TOKEN_COOKIE);
        assert_eq!(cookie.value(), body["token"].as_str().unwrap());
        assert_ne!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));

        let claims = jwt_authentication::validate_token(cookie.value(), "route-secret").unwrap();
        assert_eq!(claims.admin_id().unwrap(), admin_id);
    }

    #[tokio::test]
    async fn login_unknown_admin_is_conflict() {
        let mut admins = MockAdminRepository::new();
        admins.expect_find_by_email().returning(|_| Ok(None));

        let response = server(admins)
            .post("/api/admin/login")
            .json(&json!({ "email": "nobody@example.com", "password": "pw" }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "ADMIN_NOT_FOUND");
    }
}
