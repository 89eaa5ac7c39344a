use crate::core::error::{AppError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Profile fields stored in GoTrue `user_metadata` at signup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// GoTrue user object
#[derive(Debug, Clone, Deserialize)]
pub struct GoTrueUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// GoTrue session (password grant, or signup with auto-confirm enabled)
#[derive(Debug, Clone, Deserialize)]
pub struct GoTrueSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: String,
    pub user: GoTrueUser,
}

/// Signup answers with a session when auto-confirm is on, a bare user otherwise
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SignupResult {
    Session(GoTrueSession),
    User(GoTrueUser),
}

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: UserMetadata,
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// GoTrue error body; field names differ between API versions
#[derive(Debug, Default, Deserialize)]
struct GoTrueErrorResponse {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl GoTrueErrorResponse {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn text(&self) -> String {
        self.msg
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.message.clone())
            .unwrap_or_default()
    }
}

/// Client for the Supabase GoTrue auth API
pub struct SupabaseAuthClient {
    auth_url: String,
    anon_key: String,
    http_client: reqwest::Client,
}

impl SupabaseAuthClient {
    /// `auth_url` is the GoTrue base, e.g. `https://<project>.supabase.co/auth/v1`
    pub fn new(auth_url: String, anon_key: String) -> Self {
        Self {
            auth_url: auth_url.trim_end_matches('/').to_string(),
            anon_key,
            http_client: reqwest::Client::new(),
        }
    }

    /// Register a new user with profile metadata
    ///
    /// Returns Conflict if the email is already registered
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: UserMetadata,
    ) -> Result<SignupResult> {
        let url = format!("{}/signup", self.auth_url);

        tracing::debug!("Creating user in Supabase: {}", email);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&SignupRequest {
                email,
                password,
                data: metadata,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Supabase signup: {}", e);
                AppError::ExternalServiceError(format!("Failed to create user: {}", e))
            })?;

        let status = response.status();

        if status.is_success() {
            let result = response.json::<SignupResult>().await.map_err(|e| {
                tracing::error!("Failed to parse Supabase signup response: {}", e);
                AppError::ExternalServiceError(format!("Failed to parse signup response: {}", e))
            })?;
            return Ok(result);
        }

        let body = response.text().await.unwrap_or_default();
        let error = GoTrueErrorResponse::parse(&body);

        if error.error_code.as_deref() == Some("user_already_exists")
            || error.text().contains("already registered")
        {
            return Err(AppError::Conflict(
                "Email or username already in use".to_string(),
            ));
        }

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(AppError::Validation(error.text()));
        }

        tracing::error!("Supabase signup error: HTTP {} - {}", status, body);
        Err(AppError::ExternalServiceError(format!(
            "Supabase auth error: HTTP {}",
            status
        )))
    }

    /// Exchange email and password for a session
    ///
    /// Rejected credentials surface as Unauthorized
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<GoTrueSession> {
        let url = format!("{}/token?grant_type=password", self.auth_url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Supabase token endpoint: {}", e);
                AppError::ExternalServiceError(format!("Failed to sign in: {}", e))
            })?;

        let status = response.status();

        if status.is_success() {
            return response.json::<GoTrueSession>().await.map_err(|e| {
                tracing::error!("Failed to parse Supabase session: {}", e);
                AppError::ExternalServiceError(format!("Failed to parse session: {}", e))
            });
        }

        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                "Login rejected by Supabase: {}",
                GoTrueErrorResponse::parse(&body).text()
            );
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        tracing::error!("Supabase token error: HTTP {} - {}", status, body);
        Err(AppError::ExternalServiceError(format!(
            "Supabase auth error: HTTP {}",
            status
        )))
    }

    /// Revoke every session of the token's user
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/logout?scope=global", self.auth_url);

        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach Supabase logout: {}", e);
                AppError::ExternalServiceError(format!("Failed to sign out: {}", e))
            })?;

        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized("No valid session found".to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("Supabase logout error: HTTP {} - {}", status, body);
        Err(AppError::ExternalServiceError(format!(
            "Supabase auth error: HTTP {}",
            status
        )))
    }
}
