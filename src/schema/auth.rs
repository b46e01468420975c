use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::Deserialize;

use crate::schema::common::{BadRequestResponse, InternalServerErrorResponse, UnauthorizedResponse};

#[derive(Object, Deserialize)]
pub struct LoginRequest {
    #[oai(validator(min_length = 1))]
    pub user_name: String,
    #[oai(validator(min_length = 1))]
    pub password: String,
}

#[derive(Object, Deserialize)]
pub struct TokenResponse {
    pub exp: String,
    pub exp_in: i64,
    pub exp_refresh_token: String,
    pub refresh_token: String,
    pub token: String,
    pub token_type: String,
}

#[derive(ApiResponse)]
pub enum LoginResponses {
    #[oai(status = 200)]
    Ok(Json<TokenResponse>),

    #[oai(status = 400)]
    BadRequest(Json<BadRequestResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(Object, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(ApiResponse)]
pub enum RefreshTokenResponses {
    #[oai(status = 200)]
    Ok(Json<TokenResponse>),

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}

#[derive(ApiResponse)]
pub enum LogoutResponses {
    #[oai(status = 204)]
    NoContent,

    #[oai(status = 401)]
    Unauthorized(Json<UnauthorizedResponse>),

    #[oai(status = 500)]
    InternalServerError(Json<InternalServerErrorResponse>),
}
