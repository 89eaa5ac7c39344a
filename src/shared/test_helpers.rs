use jsonwebtoken::{encode, EncodingKey, Header};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-with-enough-entropy-0123456789";

pub const TEST_JWT_AUDIENCE: &str = "authenticated";

/// Sign a Supabase-shaped access token; a negative `ttl_secs` yields an expired token
pub fn sign_test_token(sub: &str, secret: &str, audience: &str, ttl_secs: i64) -> String {
    let claims = serde_json::json!({
        "sub": sub,
        "aud": audience,
        "exp": chrono::Utc::now().timestamp() + ttl_secs,
        "email": format!("{}@example.com", sub),
        "role": "authenticated",
    });

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Valid token for the shared test secret
pub fn test_bearer_token() -> String {
    sign_test_token("test-user", TEST_JWT_SECRET, TEST_JWT_AUDIENCE, 3600)
}

pub fn test_jwt_validator() -> std::sync::Arc<crate::features::auth::JwtValidator> {
    std::sync::Arc::new(crate::features::auth::JwtValidator::new(
        TEST_JWT_SECRET,
        TEST_JWT_AUDIENCE.to_string(),
        std::time::Duration::from_secs(0),
    ))
}
