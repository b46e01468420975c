use std::sync::Arc;

use chrono::{Duration, Local};
use poem::web::Data;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::{
    core::{
        security::{
            generate_refresh_token_from_user, generate_token_from_user,
            get_user_from_api_key, get_user_from_refresh_token, verify_hash_password,
            BearerAuthorization,
        },
        session::{add_session, remove_session, take_refresh_session},
        utils::datetime_to_string,
    },
    model::user::User,
    repository::user::get_user_by_username,
    schema::{
        auth::{
            LoginRequest, LoginResponses, LogoutResponses, RefreshTokenRequest,
            RefreshTokenResponses, TokenResponse,
        },
        common::{BadRequestResponse, InternalServerErrorResponse, UnauthorizedResponse},
    },
    settings::Config,
    AppState,
};

#[derive(Tags)]
enum ApiAuthTags {
    Auth,
}

pub struct ApiAuth {
    pub config: Config,
}

/// Issue an access/refresh pair for `user` and register the session.
fn issue_tokens<C: redis::ConnectionLike>(
    redis_conn: &mut C,
    user: &User,
    config: &Config,
) -> anyhow::Result<TokenResponse> {
    let token = generate_token_from_user(user, config)?;
    let refresh_token = generate_refresh_token_from_user(user, config)?;
    add_session(redis_conn, user, config, token.clone(), refresh_token.clone())?;

    let now = Local::now();
    let exp = now + Duration::minutes(config.jwt_exp as i64);
    let exp_refresh_token = now + Duration::minutes(config.jwt_refresh_exp as i64);
    Ok(TokenResponse {
        exp: datetime_to_string(exp),
        exp_in: exp.timestamp(),
        exp_refresh_token: datetime_to_string(exp_refresh_token),
        refresh_token,
        token,
        token_type: "Bearer".to_string(),
    })
}

#[OpenApi]
impl ApiAuth {
    #[oai(path = "/auth/login", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_login(
        &self,
        json: Json<LoginRequest>,
        state: Data<&Arc<AppState>>,
    ) -> LoginResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_login",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "get redis pool connection",
                    &err.to_string(),
                )))
            }
        };

        let user = match get_user_by_username(&mut tx, &json.user_name).await {
            Ok(Some(val)) if val.is_active_user() => val,
            Ok(_) => {
                return LoginResponses::BadRequest(Json(BadRequestResponse {
                    message: "Invalid credentials".to_string(),
                }))
            }
            Err(err) => {
                return LoginResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_login",
                        "check user on database",
                        &err.to_string(),
                    ),
                ));
            }
        };

        match verify_hash_password(&json.password, &user.password) {
            Ok(true) => {}
            Ok(false) => {
                return LoginResponses::BadRequest(Json(BadRequestResponse {
                    message: "Invalid credentials".to_string(),
                }))
            }
            Err(err) => {
                return LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_login",
                    "validate user password",
                    &err.to_string(),
                )))
            }
        }

        match issue_tokens(&mut *redis_conn, &user, &self.config) {
            Ok(val) => {
                tracing::info!("{} logged in", user.user_name);
                LoginResponses::Ok(Json(val))
            }
            Err(err) => LoginResponses::InternalServerError(Json(InternalServerErrorResponse::new(
                "route.auth",
                "auth_login",
                "issue tokens",
                &err.to_string(),
            ))),
        }
    }

    #[oai(
        path = "/auth/refresh-token",
        method = "post",
        tag = "ApiAuthTags::Auth"
    )]
    async fn auth_refresh_token(
        &self,
        json: Json<RefreshTokenRequest>,
        state: Data<&Arc<AppState>>,
    ) -> RefreshTokenResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return RefreshTokenResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_refresh_token",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return RefreshTokenResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_refresh_token",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        // an undecodable or expired refresh token is an auth failure, not a server error
        let user = match get_user_from_refresh_token(
            &mut tx,
            Some(json.refresh_token.clone()),
            &self.config,
        )
        .await
        {
            Ok(Some(val)) => val,
            Ok(None) | Err(_) => {
                return RefreshTokenResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
        };

        // a refresh token is single use, the access token it came with ends here
        let old_token = match take_refresh_session(&mut *redis_conn, &json.refresh_token) {
            Ok(Some(val)) => val,
            Ok(None) => {
                return RefreshTokenResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
            Err(err) => {
                return RefreshTokenResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_refresh_token",
                        "take refresh session",
                        &err.to_string(),
                    ),
                ))
            }
        };
        if let Err(err) = remove_session(&mut *redis_conn, old_token) {
            return RefreshTokenResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_refresh_token",
                    "remove previous session",
                    &err.to_string(),
                ),
            ));
        }

        match issue_tokens(&mut *redis_conn, &user, &self.config) {
            Ok(val) => RefreshTokenResponses::Ok(Json(val)),
            Err(err) => RefreshTokenResponses::InternalServerError(Json(
                InternalServerErrorResponse::new(
                    "route.auth",
                    "auth_refresh_token",
                    "issue tokens",
                    &err.to_string(),
                ),
            )),
        }
    }

    #[oai(path = "/auth/logout", method = "post", tag = "ApiAuthTags::Auth")]
    async fn auth_logout(
        &self,
        auth: BearerAuthorization,
        state: Data<&Arc<AppState>>,
    ) -> LogoutResponses {
        // Begin db transaction
        let mut tx = match state.db.begin().await {
            Ok(val) => val,
            Err(err) => {
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
                        "begin transaction",
                        &err.to_string(),
                    ),
                ));
            }
        };

        // get redis conn from pool
        let mut redis_conn = match state.redis_conn.get() {
            Ok(val) => val,
            Err(err) => {
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
                        "get redis pool connection",
                        &err.to_string(),
                    ),
                ))
            }
        };

        let user = match get_user_from_api_key(&mut tx, &auth.0).await {
            Ok(Some(val)) => val,
            Ok(None) => return LogoutResponses::Unauthorized(Json(UnauthorizedResponse::default())),
            Err(err) => {
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
                        "get user from session",
                        &err.to_string(),
                    ),
                ))
            }
        };
        match remove_session(&mut *redis_conn, auth.0.token) {
            Ok(true) => {}
            Ok(false) => {
                return LogoutResponses::Unauthorized(Json(UnauthorizedResponse::default()))
            }
            Err(err) => {
                return LogoutResponses::InternalServerError(Json(
                    InternalServerErrorResponse::new(
                        "route.auth",
                        "auth_logout",
                        "remove session",
                        &err.to_string(),
                    ),
                ))
            }
        }
        tracing::info!("{} logged out", user.user_name);
        LogoutResponses::NoContent
    }
}
