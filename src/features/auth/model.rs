use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller identity taken from a verified Supabase access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Supabase auth user id (`sub` claim)
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Postgres role the token maps to, normally "authenticated"
    pub role: String,
}

/// Raw bearer token of the current request, forwarded to the auth provider on logout
#[derive(Clone)]
pub struct BearerToken(pub String);

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(***)")
    }
}
