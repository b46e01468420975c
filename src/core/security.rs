use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use chrono::{Duration, Local};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use poem::Request;
use poem_openapi::{auth::Bearer, SecurityScheme};
use redis::ConnectionLike;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{model::user::User, repository::user::get_user_by_id, settings::Config, AppState};

use super::session::get_session;

const REFRESH_TYPE_KEY: &str = "refresh";

/// password hashing
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    // Argon2 with default params (Argon2id v19)
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(password_hash)
}

/// password hash verification
pub fn verify_hash_password(
    password: &str,
    password_hash: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(password_hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: String,
    pub user_name: String,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    pub fn new(user: &User, config: &Config) -> Self {
        Self {
            id: user.id.to_string(),
            user_name: user.user_name.clone(),
            exp: (Local::now() + Duration::minutes(config.jwt_exp as i64)).timestamp(),
            jti: Uuid::now_v7().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClaimsRefresh {
    pub id: String,
    pub user_name: String,
    pub exp: i64,
    pub jti: String,
    pub type_key: String,
}

impl ClaimsRefresh {
    pub fn new(user: &User, config: &Config) -> Self {
        Self {
            id: user.id.to_string(),
            user_name: user.user_name.clone(),
            exp: (Local::now() + Duration::minutes(config.jwt_refresh_exp as i64)).timestamp(),
            jti: Uuid::now_v7().to_string(),
            type_key: REFRESH_TYPE_KEY.to_string(),
        }
    }
}

pub fn encode_token<T: Serialize>(claims: &T, jwt_secret: &str) -> anyhow::Result<String> {
    let keys = Keys::new(jwt_secret.as_bytes());
    Ok(encode(&Header::default(), claims, &keys.encoding)?)
}

/// Extract payload and validate signature and expiry
pub fn decode_token<T: DeserializeOwned>(token: &str, jwt_secret: &str) -> anyhow::Result<T> {
    let keys = Keys::new(jwt_secret.as_bytes());
    let token_data = decode::<T>(token, &keys.decoding, &Validation::default())?;
    Ok(token_data.claims)
}

pub fn generate_token_from_user(user: &User, config: &Config) -> anyhow::Result<String> {
    encode_token(&Claims::new(user, config), &config.jwt_secret)
}

pub fn generate_refresh_token_from_user(user: &User, config: &Config) -> anyhow::Result<String> {
    encode_token(&ClaimsRefresh::new(user, config), &config.jwt_secret)
}

/// Resolve the session behind an access token. `None` when the token has
/// no live session.
pub fn get_api_key_from_token<C: ConnectionLike>(
    redis_conn: &mut C,
    jwt_token: String,
) -> anyhow::Result<Option<UserApiKey>> {
    let session = match get_session(redis_conn, jwt_token.clone())? {
        Some(val) => val,
        None => return Ok(None),
    };
    Ok(Some(UserApiKey {
        token: jwt_token,
        user_id: Uuid::parse_str(&session.user_id)?,
    }))
}

/// The session owner, when still live and active.
pub async fn get_user_from_api_key(
    tx: &mut Transaction<'_, Postgres>,
    api_key: &UserApiKey,
) -> anyhow::Result<Option<User>> {
    let user = get_user_by_id(tx, &api_key.user_id).await?;
    Ok(user.filter(|x| x.is_active_user()))
}

pub async fn get_user_from_refresh_token(
    tx: &mut Transaction<'_, Postgres>,
    refresh_token: Option<String>,
    config: &Config,
) -> anyhow::Result<Option<User>> {
    let refresh_token = match refresh_token {
        Some(val) => val,
        None => return Ok(None),
    };
    let claims: ClaimsRefresh = decode_token(&refresh_token, &config.jwt_secret)?;
    if claims.type_key != REFRESH_TYPE_KEY {
        return Ok(None);
    }
    let user_id = Uuid::parse_str(&claims.id)?;
    let user = get_user_by_id(tx, &user_id).await?;
    Ok(user.filter(|x| x.is_active_user()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserApiKey {
    pub token: String,
    pub user_id: Uuid,
}

/// Bearer authorization
#[derive(SecurityScheme)]
#[oai(ty = "bearer", checker = "bearer_checker")]
pub struct BearerAuthorization(pub UserApiKey);

/// Rejects the request unless the bearer token has a session in redis.
pub async fn bearer_checker(req: &Request, api_key: Bearer) -> Option<UserApiKey> {
    let state = req.data::<Arc<AppState>>()?;
    let mut redis_conn = match state.redis_conn.get() {
        Ok(val) => val,
        Err(err) => {
            tracing::error!("bearer_checker failed on get redis pool connection: {}", err);
            return None;
        }
    };
    match get_api_key_from_token(&mut *redis_conn, api_key.token) {
        Ok(val) => val,
        Err(err) => {
            tracing::error!("bearer_checker failed on get session: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;
    use uuid::Uuid;

    use crate::{core::test_utils::test_config, model::user::User};

    use super::*;

    fn sample_user() -> User {
        let now = Local::now().fixed_offset();
        User {
            id: Uuid::now_v7(),
            user_name: "hr_admin".to_string(),
            password: String::new(),
            is_active: Some(true),
            created_date: Some(now),
            updated_date: Some(now),
            deleted_date: None,
        }
    }

    #[test]
    fn test_hashing_password() {
        let hash = hash_password("secretpassword");
        assert!(hash.is_ok());
        let hash = hash.unwrap();
        assert!(verify_hash_password("secretpassword", &hash).unwrap());
        assert!(!verify_hash_password("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config();
        let user = sample_user();
        let token = generate_token_from_user(&user, &config).unwrap();
        let claims: Claims = decode_token(&token, &config.jwt_secret).unwrap();
        assert_eq!(claims.id, user.id.to_string());
        assert_eq!(claims.user_name, "hr_admin");
    }

    #[test]
    fn test_refresh_token_carries_type_key() {
        let config = test_config();
        let token = generate_refresh_token_from_user(&sample_user(), &config).unwrap();
        let claims: ClaimsRefresh = decode_token(&token, &config.jwt_secret).unwrap();
        assert_eq!(claims.type_key, REFRESH_TYPE_KEY);
    }

    #[test]
    fn test_tokens_are_unique_per_issue() {
        let config = test_config();
        let user = sample_user();
        let first = generate_token_from_user(&user, &config).unwrap();
        let second = generate_token_from_user(&user, &config).unwrap();
        assert_ne!(first, second);
        let first = generate_refresh_token_from_user(&user, &config).unwrap();
        let second = generate_refresh_token_from_user(&user, &config).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let config = test_config();
        let token = generate_token_from_user(&sample_user(), &config).unwrap();
        let res: anyhow::Result<Claims> = decode_token(&token, "another-secret");
        assert!(res.is_err());
    }
}
