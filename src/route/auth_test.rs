use std::sync::Arc;

use poem::{http::StatusCode, test::TestClient};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    core::{
        security::{get_api_key_from_token, hash_password},
        session::get_session,
        test_utils::{lazy_app_state, test_config},
    },
    factory::user::UserFactory,
    init_openapi_route,
    model::user::User,
    settings::Config,
    AppState,
};

async fn init_state_with_user(
    pool: PgPool,
    config: &Config,
) -> anyhow::Result<(Arc<AppState>, Uuid)> {
    let client = redis::Client::open(config.redis_url.clone())?;
    let redis_pool = r2d2::Pool::builder().build(client)?;
    let app_state = Arc::new(AppState {
        db: pool,
        redis_conn: redis_pool,
    });
    let mut user_factory = UserFactory::<Uuid>::new();
    user_factory.modified_one(|data, ext| User {
        id: ext,
        user_name: "test_user".to_string(),
        password: hash_password("password").unwrap(),
        is_active: Some(true),
        ..data.clone()
    });
    let user_id = Uuid::now_v7();
    user_factory.generate_one(&app_state.db, user_id).await?;
    Ok((app_state, user_id))
}

#[tokio::test]
async fn test_logout_without_token() -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let app = init_openapi_route(lazy_app_state(&config)?, &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli.post("/api/auth/logout").send().await;

    // Expect
    resp.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[sqlx::test]
async fn test_login_then_logout(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let (app_state, user_id) = init_state_with_user(pool, &config).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When login
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "user_name": "test_user",
            "password": "password"
        }))
        .send()
        .await;

    // Expect login
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let token = json.value().object().get_opt("token");
    assert!(token.is_some());
    let token: String = token.unwrap().deserialize();
    let mut redis_conn = app_state.redis_conn.get()?;
    let api_key = get_api_key_from_token(&mut *redis_conn, token.clone())?;
    assert_eq!(api_key.map(|x| x.user_id), Some(user_id));

    // When logout
    let resp = cli
        .post("/api/auth/logout")
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await;

    // Expect logout
    resp.assert_status(StatusCode::NO_CONTENT);
    assert!(get_session(&mut *redis_conn, token.clone())?.is_none());

    // When second logout
    let resp = cli
        .post("/api/auth/logout")
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await;

    // Expect second logout
    resp.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[sqlx::test]
async fn test_login_wrong_password(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let (app_state, _) = init_state_with_user(pool, &config).await?;
    let app = init_openapi_route(app_state, &config);
    let cli = TestClient::new(app);

    // When
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "user_name": "test_user",
            "password": "not-the-password"
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[sqlx::test]
async fn test_login_then_refresh(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let config = test_config();
    let (app_state, user_id) = init_state_with_user(pool, &config).await?;
    let app = init_openapi_route(app_state.clone(), &config);
    let cli = TestClient::new(app);

    // When login
    let resp = cli
        .post("/api/auth/login")
        .body_json(&json!({
            "user_name": "test_user",
            "password": "password"
        }))
        .send()
        .await;

    // Expect login
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let old_token: String = json.value().object().get("token").deserialize();
    let refresh_token = json.value().object().get_opt("refresh_token");
    assert!(refresh_token.is_some());
    let refresh_token: String = refresh_token.unwrap().deserialize();

    // When refresh
    let resp = cli
        .post("/api/auth/refresh-token")
        .body_json(&json!({
            "refresh_token": refresh_token,
        }))
        .send()
        .await;

    // Expect refresh
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let token: String = json.value().object().get("token").deserialize();
    let new_refresh_token: String = json.value().object().get("refresh_token").deserialize();
    assert_ne!(token, old_token);
    let mut redis_conn = app_state.redis_conn.get()?;
    let api_key = get_api_key_from_token(&mut *redis_conn, token.clone())?;
    assert_eq!(api_key.map(|x| x.user_id), Some(user_id));

    // Expect the previous access token to be dropped
    assert!(get_session(&mut *redis_conn, old_token.clone())?.is_none());
    let resp = cli
        .get("/api/cs-g-m-list")
        .header("authorization", format!("Bearer {}", old_token))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    // When the same refresh token is used again
    let resp = cli
        .post("/api/auth/refresh-token")
        .body_json(&json!({
            "refresh_token": refresh_token,
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert!(get_session(&mut *redis_conn, token.clone())?.is_some());

    // When refresh with an access token
    let resp = cli
        .post("/api/auth/refresh-token")
        .body_json(&json!({
            "refresh_token": token,
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::UNAUTHORIZED);

    // When refresh after logout
    let resp = cli
        .post("/api/auth/logout")
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await;
    resp.assert_status(StatusCode::NO_CONTENT);
    let resp = cli
        .post("/api/auth/refresh-token")
        .body_json(&json!({
            "refresh_token": new_refresh_token,
        }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}
