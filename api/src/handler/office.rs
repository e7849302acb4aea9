use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{id::OfficeId, office::event::DeleteOffice};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        office::{CreateOfficeRequest, OfficeResponse, UpdateOfficeRequest},
        ApiResponse, PageQuery, PaginatedResponse,
    },
};

pub async fn register_office(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateOfficeRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;
    registry
        .office_repository()
        .create(req.into(), &user.actor())
        .await
        .map(OfficeResponse::from)
        .map(|res| (StatusCode::CREATED, Json(ApiResponse::ok(res))))
}

pub async fn show_office_list(
    Query(query): Query<PageQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<OfficeResponse>>>> {
    let options = query.list_options()?;
    registry
        .office_repository()
        .find_all(options)
        .await
        .map(PaginatedResponse::from_list)
        .map(|res| Json(ApiResponse::ok(res)))
}

pub async fn show_office(
    Path(office_id): Path<OfficeId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<OfficeResponse>>> {
    registry
        .office_repository()
        .find_by_id(office_id)
        .await?
        .ok_or_else(|| AppError::EntityNotFound(format!("office ({office_id}) was not found")))
        .map(OfficeResponse::from)
        .map(|res| Json(ApiResponse::ok(res)))
}

pub async fn update_office(
    user: AuthorizedUser,
    Path(office_id): Path<OfficeId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateOfficeRequest>,
) -> AppResult<Json<ApiResponse<OfficeResponse>>> {
    req.validate(&())?;
    registry
        .office_repository()
        .update(req.into_event(office_id), &user.actor())
        .await
        .map(OfficeResponse::from)
        .map(|res| Json(ApiResponse::ok(res)))
}

pub async fn delete_office(
    user: AuthorizedUser,
    Path(office_id): Path<OfficeId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .office_repository()
        .delete(DeleteOffice::new(office_id), &user.actor())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
