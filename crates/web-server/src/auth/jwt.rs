use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

fn jwt_secret() -> String {
    std::env::var("CHAT_JWT_SECRET").unwrap_or_else(|_| "dev-jwt-secret-change-me".to_string())
}

fn admin_validation() -> Validation {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation
}

pub fn issue_admin_jwt(username: &str, ttl_hours: i64) -> Result<(String, usize), String> {
    let exp = (Utc::now() + Duration::hours(ttl_hours)).timestamp() as usize;
    let claims = AdminClaims {
        sub: username.to_string(),
        role: "admin".to_string(),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .map(|token| (token, exp))
    .map_err(|err| format!("Failed to sign admin JWT: {}", err))
}

pub fn verify_admin_jwt(token: &str) -> Result<AdminClaims, String> {
    let claims = decode::<AdminClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &admin_validation(),
    )
    .map(|decoded| decoded.claims)
    .map_err(|err| format!("Invalid admin JWT: {}", err))?;

    if claims.role != "admin" {
        return Err("Token does not carry the admin role".to_string());
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let (token, exp) = issue_admin_jwt("admin", 8).unwrap();
        let claims = verify_admin_jwt(&token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, exp);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify_admin_jwt("not-a-token").is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let (token, _) = issue_admin_jwt("admin", -1).unwrap();
        assert!(verify_admin_jwt(&token).is_err());
    }
}
