use redis::ConnectionLike;
use serde::{Deserialize, Serialize};

use crate::{model::user::User, settings::Config};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: String,
    pub refresh_token: String,
}

fn refresh_key(refresh_token: &str) -> String {
    format!("refresh:{}", refresh_token)
}

/// Store the session under the access token, expiring with it, and index
/// the refresh token back to that access token.
pub fn add_session<C: ConnectionLike>(
    redis_conn: &mut C,
    user: &User,
    config: &Config,
    token: String,
    refresh_token: String,
) -> anyhow::Result<()> {
    let refresh_key = refresh_key(&refresh_token);
    let session_data = SessionData {
        user_id: user.id.to_string(),
        refresh_token,
    };
    let session_json = serde_json::to_string(&session_data)?;
    // jwt_exp and jwt_refresh_exp are in minutes
    redis::Cmd::set_ex(token.clone(), session_json, config.jwt_exp as u64 * 60)
        .exec(redis_conn)?;
    redis::Cmd::set_ex(refresh_key, token, config.jwt_refresh_exp as u64 * 60)
        .exec(redis_conn)?;
    Ok(())
}

/// Consume a refresh token. Returns the access token it was issued with,
/// `None` when it was already used or revoked.
pub fn take_refresh_session<C: ConnectionLike>(
    redis_conn: &mut C,
    refresh_token: &str,
) -> anyhow::Result<Option<String>> {
    let token: Option<String> = redis::cmd("GETDEL")
        .arg(refresh_key(refresh_token))
        .query(redis_conn)?;
    Ok(token)
}

pub fn get_session<C: ConnectionLike>(
    redis_conn: &mut C,
    token: String,
) -> anyhow::Result<Option<SessionData>> {
    let res: Option<String> = redis::cmd("GET").arg(token).query(redis_conn)?;
    match res {
        Some(val) => Ok(Some(serde_json::from_str(&val)?)),
        None => Ok(None),
    }
}

/// Returns `false` when there was no session for `token`.
pub fn remove_session<C: ConnectionLike>(
    redis_conn: &mut C,
    token: String,
) -> anyhow::Result<bool> {
    let session = match get_session(redis_conn, token.clone())? {
        Some(val) => val,
        None => return Ok(false),
    };
    redis::cmd("DEL")
        .arg(token)
        .arg(refresh_key(&session.refresh_token))
        .exec(redis_conn)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::refresh_key;

    #[test]
    fn test_refresh_key_is_namespaced() {
        assert_eq!(refresh_key("abc"), "refresh:abc");
    }
}
