use poem_openapi::Object;
use serde::{Deserialize, Serialize};

#[derive(Object, Deserialize, Serialize)]
pub struct BadRequestResponse {
    pub message: String,
}

#[derive(Object, Deserialize, Serialize)]
pub struct UnauthorizedResponse {
    pub message: String,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        Self {
            message: "Not authenticated".to_string(),
        }
    }
}

#[derive(Object, Deserialize, Serialize)]
pub struct InternalServerErrorResponse {
    pub message: String,
}

impl InternalServerErrorResponse {
    /// Logs the failing step and hides it from the client
    pub fn new(module: &str, function: &str, step: &str, err: &str) -> Self {
        tracing::error!("{}.{} failed on {}: {}", module, function, step, err);
        Self {
            message: "Internal server error".to_string(),
        }
    }
}
