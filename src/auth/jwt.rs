use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Role, User};

const TOKEN_LIFETIME_HOURS: i64 = 8;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    /// External credential identifier (employee number).
    pub eid: String,
    pub name: Option<String>,
    pub role: Role,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: &User) -> Self {
        Self {
            sub: user.id,
            eid: user.external_id.clone(),
            name: user.name.clone(),
            role: user.role,
            exp: (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
        }
    }
}

pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("JWT encode failed: {e}"))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("JWT decode failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::now_v7(),
            external_id: "emp42".to_string(),
            name: Some("Field User".to_string()),
            password_hash: String::new(),
            role: Role::Approver,
            created_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let user = sample_user();
        let token = encode_token(&Claims::new(&user), "secret").unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.eid, "emp42");
        assert_eq!(claims.role, Role::Approver);
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = encode_token(&Claims::new(&sample_user()), "secret").unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }
}
