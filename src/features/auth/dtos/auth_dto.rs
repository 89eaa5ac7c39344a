use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::USERNAME_REGEX;

/// Request DTO for user signup
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(min = 2, message = "Full name is required"))]
    pub full_name: String,

    #[validate(
        length(min = 3, max = 20, message = "Username must be 3-20 characters"),
        regex(
            path = *USERNAME_REGEX,
            message = "Username can only contain letters, numbers and underscores"
        )
    )]
    pub username: String,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User info returned by signup and login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    /// Supabase auth user id
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub username: Option<String>,
}

/// Session tokens issued by the auth provider
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub access_token: String,
    /// Token type (always "bearer")
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    pub refresh_token: String,
}

/// Response DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponseDto {
    pub user: AuthUserDto,
    pub session: SessionDto,
}

/// Response DTO for signup
///
/// `session` is absent when the project requires email confirmation first.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponseDto {
    pub user: AuthUserDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionDto>,
}
