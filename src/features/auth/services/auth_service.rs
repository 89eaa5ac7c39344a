use crate::core::error::Result;
use crate::features::auth::clients::{
    GoTrueSession, GoTrueUser, SignupResult, SupabaseAuthClient, UserMetadata,
};
use crate::features::auth::dtos::{
    AuthUserDto, LoginRequestDto, LoginResponseDto, SessionDto, SignupRequestDto,
    SignupResponseDto,
};
use std::sync::Arc;

/// Service for authentication operations, all delegated to Supabase
pub struct AuthService {
    client: Arc<SupabaseAuthClient>,
}

impl AuthService {
    pub fn new(client: Arc<SupabaseAuthClient>) -> Self {
        Self { client }
    }

    /// Register a new user
    pub async fn signup(&self, dto: SignupRequestDto) -> Result<SignupResponseDto> {
        let metadata = UserMetadata {
            full_name: Some(dto.full_name.trim().to_string()),
            username: Some(dto.username.clone()),
        };

        let result = self
            .client
            .sign_up(dto.email.trim(), &dto.password, metadata)
            .await?;

        let response = match result {
            SignupResult::Session(session) => {
                let (user, session) = split_session(session);
                SignupResponseDto {
                    user,
                    session: Some(session),
                }
            }
            SignupResult::User(user) => SignupResponseDto {
                user: user_to_auth_user_dto(user),
                session: None,
            },
        };

        tracing::info!("User signed up: {}", response.user.id);
        Ok(response)
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<LoginResponseDto> {
        let session = self
            .client
            .sign_in_with_password(dto.email.trim(), &dto.password)
            .await?;

        let (user, session) = split_session(session);
        tracing::info!("User logged in: {}", user.id);
        Ok(LoginResponseDto { user, session })
    }

    /// Revoke all sessions belonging to the token's user
    pub async fn logout(&self, access_token: &str) -> Result<()> {
        self.client.sign_out(access_token).await
    }
}

fn split_session(session: GoTrueSession) -> (AuthUserDto, SessionDto) {
    let user = user_to_auth_user_dto(session.user);
    let session = SessionDto {
        access_token: session.access_token,
        token_type: session.token_type,
        expires_in: session.expires_in,
        refresh_token: session.refresh_token,
    };
    (user, session)
}

fn user_to_auth_user_dto(user: GoTrueUser) -> AuthUserDto {
    AuthUserDto {
        id: user.id,
        email: user.email,
        full_name: user.user_metadata.full_name,
        username: user.user_metadata.username,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::error::AppError;
    use axum::{
        extract::Query,
        http::{header, HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    pub const FAKE_ANON_KEY: &str = "fake-anon-key";
    pub const FAKE_USER_TOKEN: &str = "fake-user-access-token";

    fn has_api_key(headers: &HeaderMap) -> bool {
        headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(FAKE_ANON_KEY)
    }

    fn session_body(email: &str, full_name: Option<&str>) -> Value {
        json!({
            "access_token": FAKE_USER_TOKEN,
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "fake-refresh-token",
            "user": {
                "id": "8d0b4b5e-1f27-4d7e-9b9c-5c0c2b1f0a11",
                "email": email,
                "user_metadata": { "full_name": full_name }
            }
        })
    }

    async fn fake_signup(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if !has_api_key(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "msg": "No API key" })));
        }
        let email = body["email"].as_str().unwrap_or_default();
        if email == "taken@example.com" {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "code": 422,
                    "error_code": "user_already_exists",
                    "msg": "User already registered"
                })),
            );
        }
        if email == "autoconfirm@example.com" {
            let full_name = body["data"]["full_name"].as_str();
            return (StatusCode::OK, Json(session_body(email, full_name)));
        }
        (
            StatusCode::OK,
            Json(json!({
                "id": "2f3c9a4e-7d1b-4a52-8e0f-6b9d1c3e5a77",
                "email": email,
                "user_metadata": body["data"].clone()
            })),
        )
    }

    async fn fake_token(
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        if !has_api_key(&headers) || query.get("grant_type").map(String::as_str) != Some("password")
        {
            return (StatusCode::BAD_REQUEST, Json(json!({ "msg": "bad request" })));
        }
        if body["password"] != "correct-horse" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid login credentials"
                })),
            );
        }
        let email = body["email"].as_str().unwrap_or_default();
        (StatusCode::OK, Json(session_body(email, Some("Jane Doe"))))
    }

    async fn fake_logout(headers: HeaderMap) -> StatusCode {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if has_api_key(&headers) && bearer == Some(FAKE_USER_TOKEN) {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::UNAUTHORIZED
        }
    }

    /// Serve a minimal GoTrue stand-in on an ephemeral port; returns its auth base URL
    pub async fn spawn_fake_gotrue() -> String {
        let app = Router::new()
            .route("/auth/v1/signup", post(fake_signup))
            .route("/auth/v1/token", post(fake_token))
            .route("/auth/v1/logout", post(fake_logout));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/auth/v1", addr)
    }

    async fn service() -> AuthService {
        let auth_url = spawn_fake_gotrue().await;
        AuthService::new(Arc::new(SupabaseAuthClient::new(
            auth_url,
            FAKE_ANON_KEY.to_string(),
        )))
    }

    fn signup_dto(email: &str) -> SignupRequestDto {
        SignupRequestDto {
            email: email.to_string(),
            password: "correct-horse".to_string(),
            full_name: "  Jane Doe ".to_string(),
            username: "jane_doe".to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_without_session() {
        let response = service()
            .await
            .signup(signup_dto("jane@example.com"))
            .await
            .unwrap();

        assert_eq!(response.user.email.as_deref(), Some("jane@example.com"));
        assert_eq!(response.user.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(response.user.username.as_deref(), Some("jane_doe"));
        assert!(response.session.is_none());
    }

    #[tokio::test]
    async fn test_signup_with_autoconfirm_session() {
        let response = service()
            .await
            .signup(signup_dto("autoconfirm@example.com"))
            .await
            .unwrap();

        let session = response.session.expect("session issued");
        assert_eq!(session.access_token, FAKE_USER_TOKEN);
        assert_eq!(response.user.full_name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_signup_existing_email_conflicts() {
        let result = service()
            .await
            .signup(signup_dto("taken@example.com"))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let response = service()
            .await
            .login(LoginRequestDto {
                email: "jane@example.com".to_string(),
                password: "correct-horse".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.session.access_token, FAKE_USER_TOKEN);
        assert_eq!(response.session.expires_in, 3600);
        assert_eq!(response.user.full_name.as_deref(), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_login_bad_password_is_unauthorized() {
        let result = service()
            .await
            .login(LoginRequestDto {
                email: "jane@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        match result {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid email or password"),
            other => panic!("expected Unauthorized, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_logout_forwards_token() {
        let service = service().await;
        assert!(service.logout(FAKE_USER_TOKEN).await.is_ok());
        assert!(matches!(
            service.logout("stale-token").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_external_error() {
        let service = AuthService::new(Arc::new(SupabaseAuthClient::new(
            "http://127.0.0.1:9/auth/v1".to_string(),
            FAKE_ANON_KEY.to_string(),
        )));
        assert!(matches!(
            service.logout(FAKE_USER_TOKEN).await,
            Err(AppError::ExternalServiceError(_))
        ));
    }
}
