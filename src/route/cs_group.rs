use std::{fmt::Display, sync::Arc};

use poem::web::Data;
use poem_openapi::{param::Path, payload::Json, OpenApi, Tags};
use sqlx::{Postgres, Transaction};

use crate::{
    core::security::{get_user_from_api_key, BearerAuthorization},
    model::{cs_group::CsGroupFilter, user::User},
    repository::cs_group::{
        create_cs_group, get_active_cs_group, get_all_cs_group, get_cs_group_by_id,
        soft_delete_cs_group, update_cs_group,
    },
    schema::cs_group::{
        CsGroupData, CsGroupResponses, CsGroupSaveRequest, CsGroupUpdateRequest,
        CS_GRP_ACTIVE_LIST_MESSAGE, CS_GRP_DETAIL_MESSAGE, CS_GRP_LIST_MESSAGE,
        CS_GRP_SAVE_MESSAGE, CS_GRP_UPDATE_MESSAGE, DELETE_SUCCESS,
    },
    AppState,
};

#[derive(Tags)]
enum ApiCsGroupTags {
    CostCenterGroup,
}

pub struct ApiCsGroup;

fn processing_error(function: &str, step: &str, err: impl Display) -> CsGroupResponses {
    tracing::error!("route.cs_group.{} failed on {}: {}", function, step, err);
    CsGroupResponses::unprocessable(err.to_string())
}

fn not_found(id: i32) -> CsGroupResponses {
    CsGroupResponses::unprocessable(format!("cost center group with id = {} not found", id))
}

/// Open the request transaction and resolve the active caller. The session
/// itself was already checked by `bearer_checker`.
async fn begin_authenticated(
    state: &Arc<AppState>,
    auth: BearerAuthorization,
    function: &str,
) -> Result<(Transaction<'static, Postgres>, User), CsGroupResponses> {
    let mut tx = state
        .db
        .begin()
        .await
        .map_err(|err| processing_error(function, "begin transaction", err))?;
    let user = get_user_from_api_key(&mut tx, &auth.0)
        .await
        .map_err(|err| processing_error(function, "get user from session", err))?;
    match user {
        Some(user) => Ok((tx, user)),
        None => Err(CsGroupResponses::unauthorized()),
    }
}

#[OpenApi]
impl ApiCsGroup {
    #[oai(
        path = "/cs-g-m-save",
        method = "post",
        tag = "ApiCsGroupTags::CostCenterGroup"
    )]
    async fn cs_group_save_api(
        &self,
        auth: BearerAuthorization,
        Json(json): Json<CsGroupSaveRequest>,
        state: Data<&Arc<AppState>>,
    ) -> CsGroupResponses {
        let (mut tx, request_user) =
            match begin_authenticated(state.0, auth, "cs_group_save_api").await {
                Ok(val) => val,
                Err(resp) => return resp,
            };

        let new_cs_group = match create_cs_group(
            &mut tx,
            json.cs_grp_code.trim().to_string(),
            json.cs_grp_name.trim().to_string(),
            json.cs_grp_m_id,
            json.status,
            None,
        )
        .await
        {
            Ok(val) => val,
            Err(err) => return processing_error("cs_group_save_api", "create_cs_group", err),
        };
        if let Err(err) = tx.commit().await {
            return processing_error("cs_group_save_api", "commit transaction", err);
        }
        tracing::info!(
            "{} saved cost center group {}",
            request_user.user_name,
            new_cs_group.id
        );
        CsGroupResponses::ok(CS_GRP_SAVE_MESSAGE, vec![new_cs_group.into()])
    }

    #[oai(
        path = "/cs-g-m-list",
        method = "get",
        tag = "ApiCsGroupTags::CostCenterGroup"
    )]
    async fn cs_group_list_api(
        &self,
        auth: BearerAuthorization,
        state: Data<&Arc<AppState>>,
    ) -> CsGroupResponses {
        let (mut tx, _) = match begin_authenticated(state.0, auth, "cs_group_list_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };

        let data = match get_all_cs_group(&mut tx).await {
            Ok(val) => val,
            Err(err) => return processing_error("cs_group_list_api", "get_all_cs_group", err),
        };
        CsGroupResponses::ok(
            CS_GRP_LIST_MESSAGE,
            data.into_iter().map(CsGroupData::from).collect(),
        )
    }

    #[oai(
        path = "/cs-g-m-active-list",
        method = "get",
        tag = "ApiCsGroupTags::CostCenterGroup"
    )]
    async fn cs_group_active_list_api(
        &self,
        auth: BearerAuthorization,
        state: Data<&Arc<AppState>>,
    ) -> CsGroupResponses {
        let (mut tx, _) =
            match begin_authenticated(state.0, auth, "cs_group_active_list_api").await {
                Ok(val) => val,
                Err(resp) => return resp,
            };

        let data = match get_active_cs_group(&mut tx).await {
            Ok(val) => val,
            Err(err) => {
                return processing_error("cs_group_active_list_api", "get_active_cs_group", err)
            }
        };
        CsGroupResponses::ok(
            CS_GRP_ACTIVE_LIST_MESSAGE,
            data.into_iter().map(CsGroupData::from).collect(),
        )
    }

    #[oai(
        path = "/cs-g-m-detail/:id",
        method = "get",
        tag = "ApiCsGroupTags::CostCenterGroup"
    )]
    async fn cs_group_detail_api(
        &self,
        auth: BearerAuthorization,
        #[oai(validator(minimum(value = "1")))] id: Path<i32>,
        state: Data<&Arc<AppState>>,
    ) -> CsGroupResponses {
        let id = id.0;
        let (mut tx, _) = match begin_authenticated(state.0, auth, "cs_group_detail_api").await {
            Ok(val) => val,
            Err(resp) => return resp,
        };

        match get_cs_group_by_id(&mut tx, id).await {
            Ok(Some(val)) => CsGroupResponses::ok(CS_GRP_DETAIL_MESSAGE, vec![val.into()]),
            Ok(None) => not_found(id),
            Err(err) => processing_error("cs_group_detail_api", "get_cs_group_by_id", err),
        }
    }

    #[oai(
        path = "/cs-g-m-update/:id",
        method = "post",
        tag = "ApiCsGroupTags::CostCenterGroup"
    )]
    async fn cs_group_update_api(
        &self,
        auth: BearerAuthorization,
        #[oai(validator(minimum(value = "1")))] id: Path<i32>,
        Json(json): Json<CsGroupUpdateRequest>,
        state: Data<&Arc<AppState>>,
    ) -> CsGroupResponses {
        let id = id.0;
        let (mut tx, request_user) =
            match begin_authenticated(state.0, auth, "cs_group_update_api").await {
                Ok(val) => val,
                Err(resp) => return resp,
            };

        let updated = match update_cs_group(
            &mut tx,
            id,
            json.cs_grp_name.trim().to_string(),
            json.cs_grp_code.trim().to_string(),
            None,
        )
        .await
        {
            Ok(Some(val)) => val,
            Ok(None) => return not_found(id),
            Err(err) => return processing_error("cs_group_update_api", "update_cs_group", err),
        };
        if let Err(err) = tx.commit().await {
            return processing_error("cs_group_update_api", "commit transaction", err);
        }
        tracing::info!(
            "{} updated cost center group {}",
            request_user.user_name,
            updated.id
        );
        CsGroupResponses::ok(CS_GRP_UPDATE_MESSAGE, vec![updated.into()])
    }

    #[oai(
        path = "/cs-g-m-soft-delete/:id",
        method = "post",
        tag = "ApiCsGroupTags::CostCenterGroup"
    )]
    async fn cs_group_soft_delete_api(
        &self,
        auth: BearerAuthorization,
        #[oai(validator(minimum(value = "1")))] id: Path<i32>,
        state: Data<&Arc<AppState>>,
    ) -> CsGroupResponses {
        let id = id.0;
        let (mut tx, request_user) =
            match begin_authenticated(state.0, auth, "cs_group_soft_delete_api").await {
                Ok(val) => val,
                Err(resp) => return resp,
            };

        match soft_delete_cs_group(&mut tx, &[CsGroupFilter::Id(id)], None).await {
            Ok(true) => {}
            Ok(false) => return not_found(id),
            Err(err) => {
                return processing_error("cs_group_soft_delete_api", "soft_delete_cs_group", err)
            }
        }
        if let Err(err) = tx.commit().await {
            return processing_error("cs_group_soft_delete_api", "commit transaction", err);
        }
        tracing::info!(
            "{} soft deleted cost center group {}",
            request_user.user_name,
            id
        );
        CsGroupResponses::ok(DELETE_SUCCESS, vec![])
    }
}
