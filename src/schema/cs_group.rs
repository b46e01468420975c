use poem::http::StatusCode;
use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::model::cs_group::CsGroup;

pub const CS_GRP_SAVE_MESSAGE: &str = "Cost center group saved successfully";
pub const CS_GRP_LIST_MESSAGE: &str = "Cost center group list fetched successfully";
pub const CS_GRP_ACTIVE_LIST_MESSAGE: &str = "Active cost center group list fetched successfully";
pub const CS_GRP_DETAIL_MESSAGE: &str = "Cost center group detail fetched successfully";
pub const CS_GRP_UPDATE_MESSAGE: &str = "Cost center group updated successfully";
pub const DELETE_SUCCESS: &str = "Data deleted successfully";

#[derive(Object, Deserialize)]
pub struct CsGroupSaveRequest {
    #[oai(validator(min_length = 1, max_length = 50, pattern = r"\S"))]
    pub cs_grp_code: String,
    #[oai(validator(min_length = 1, max_length = 100, pattern = r"\S"))]
    pub cs_grp_name: String,
    #[oai(validator(minimum(value = "1")))]
    pub cs_grp_m_id: Option<i32>,
    #[oai(validator(minimum(value = "0"), maximum(value = "1")))]
    pub status: i32,
}

#[derive(Object, Deserialize)]
pub struct CsGroupUpdateRequest {
    #[oai(validator(min_length = 1, max_length = 100, pattern = r"\S"))]
    pub cs_grp_name: String,
    #[oai(validator(min_length = 1, max_length = 50, pattern = r"\S"))]
    pub cs_grp_code: String,
}

#[derive(Object, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct CsGroupData {
    pub id: i32,
    pub cs_grp_name: String,
    pub cs_grp_code: String,
    pub status: i32,
}

impl From<CsGroup> for CsGroupData {
    fn from(value: CsGroup) -> Self {
        Self {
            id: value.id,
            cs_grp_name: value.cs_grp_name,
            cs_grp_code: value.cs_grp_code,
            status: value.status,
        }
    }
}

/// Body of every cost-center group response, success or not.
#[derive(Object, Deserialize, Serialize, Debug)]
pub struct CsGroupEnvelope {
    pub status_code: u16,
    pub status: bool,
    pub message: String,
    pub data: Vec<CsGroupData>,
}

impl CsGroupEnvelope {
    pub fn success(message: &str, data: Vec<CsGroupData>) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            status: true,
            message: message.to_string(),
            data,
        }
    }

    pub fn failure(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            status: false,
            message,
            data: vec![],
        }
    }
}

#[derive(ApiResponse)]
#[oai(bad_request_handler = "cs_group_bad_request_handler")]
pub enum CsGroupResponses {
    #[oai(status = 200)]
    Ok(Json<CsGroupEnvelope>),

    #[oai(status = 401)]
    Unauthorized(Json<CsGroupEnvelope>),

    #[oai(status = 422)]
    UnprocessableEntity(Json<CsGroupEnvelope>),
}

impl CsGroupResponses {
    pub fn ok(message: &str, data: Vec<CsGroupData>) -> Self {
        let envelope = CsGroupEnvelope::success(message, data);
        log_response(&envelope);
        Self::Ok(Json(envelope))
    }

    pub fn unauthorized() -> Self {
        let envelope =
            CsGroupEnvelope::failure(StatusCode::UNAUTHORIZED, "Not authenticated".to_string());
        log_response(&envelope);
        Self::Unauthorized(Json(envelope))
    }

    pub fn unprocessable(message: String) -> Self {
        let envelope = CsGroupEnvelope::failure(StatusCode::UNPROCESSABLE_ENTITY, message);
        log_response(&envelope);
        Self::UnprocessableEntity(Json(envelope))
    }

    pub fn envelope(&self) -> &CsGroupEnvelope {
        match self {
            Self::Ok(Json(val)) | Self::Unauthorized(Json(val)) | Self::UnprocessableEntity(Json(val)) => val,
        }
    }
}

fn log_response(envelope: &CsGroupEnvelope) {
    match serde_json::to_string(envelope) {
        Ok(val) => tracing::debug!("RESPONSE: {}", val),
        Err(_) => tracing::debug!("RESPONSE: {:?}", envelope),
    }
}

/// Request extraction failures (body, path, bearer) in envelope form.
pub fn cs_group_bad_request_handler(err: poem::Error) -> CsGroupResponses {
    if err.status() == StatusCode::UNAUTHORIZED {
        return CsGroupResponses::unauthorized();
    }
    CsGroupResponses::unprocessable(err.to_string())
}

#[cfg(test)]
mod tests {
    use poem::http::StatusCode;

    use crate::model::cs_group::{CsGroup, ACTIVE_STATUS};

    use super::*;

    #[test]
    fn test_success_envelope() {
        let data = CsGroupData::from(CsGroup {
            id: 7,
            cs_grp_code: "CSG-07".to_string(),
            cs_grp_name: "Finance".to_string(),
            cs_grp_m_id: Some(2),
            status: ACTIVE_STATUS,
            created_at: None,
            updated_at: None,
            deleted_at: None,
        });
        let resp = CsGroupResponses::ok(CS_GRP_SAVE_MESSAGE, vec![data.clone()]);
        assert!(matches!(resp, CsGroupResponses::Ok(_)));
        let envelope = resp.envelope();
        assert_eq!(envelope.status_code, 200);
        assert!(envelope.status);
        assert_eq!(envelope.message, CS_GRP_SAVE_MESSAGE);
        assert_eq!(envelope.data, vec![data]);
    }

    #[test]
    fn test_envelope_serializes_every_field() {
        let envelope = CsGroupEnvelope::success(DELETE_SUCCESS, vec![]);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status_code": 200,
                "status": true,
                "message": DELETE_SUCCESS,
                "data": []
            })
        );
    }

    #[test]
    fn test_bad_request_handler_maps_status() {
        let resp = cs_group_bad_request_handler(poem::Error::from_string(
            "missing field",
            StatusCode::BAD_REQUEST,
        ));
        assert!(matches!(resp, CsGroupResponses::UnprocessableEntity(_)));
        let envelope = resp.envelope();
        assert_eq!(envelope.status_code, 422);
        assert!(!envelope.status);
        assert!(envelope.message.contains("missing field"));
        assert!(envelope.data.is_empty());

        let resp = cs_group_bad_request_handler(poem::Error::from_status(
            StatusCode::UNAUTHORIZED,
        ));
        assert!(matches!(resp, CsGroupResponses::Unauthorized(_)));
        assert_eq!(resp.envelope().status_code, 401);
    }
}
