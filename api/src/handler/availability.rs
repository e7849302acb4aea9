use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{
    availability::event::DeleteAvailability,
    id::{AvailabilityId, OfficeId},
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::{
        availability::{
            AvailabilityRangeQuery, AvailabilityResponse, CreateAvailabilityRequest, SlotQuery,
            SlotsResponse, UpdateAvailabilityRequest,
        },
        ApiResponse,
    },
};

pub async fn register_availability(
    user: AuthorizedUser,
    Path(office_id): Path<OfficeId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateAvailabilityRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;
    registry
        .availability_repository()
        .create(req.into_event(office_id)?, &user.actor())
        .await
        .map(AvailabilityResponse::from)
        .map(|res| (StatusCode::CREATED, Json(ApiResponse::ok(res))))
}

pub async fn show_availability_list(
    Path(office_id): Path<OfficeId>,
    Query(query): Query<AvailabilityRangeQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<Vec<AvailabilityResponse>>>> {
    let range = query.range()?;
    registry
        .availability_repository()
        .find_all(office_id, range)
        .await
        .map(|windows| {
            windows
                .into_iter()
                .map(AvailabilityResponse::from)
                .collect()
        })
        .map(|res| Json(ApiResponse::ok(res)))
}

pub async fn update_availability(
    user: AuthorizedUser,
    Path((office_id, availability_id)): Path<(OfficeId, AvailabilityId)>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateAvailabilityRequest>,
) -> AppResult<Json<ApiResponse<AvailabilityResponse>>> {
    req.validate(&())?;
    registry
        .availability_repository()
        .update(req.into_event(office_id, availability_id), &user.actor())
        .await
        .map(AvailabilityResponse::from)
        .map(|res| Json(ApiResponse::ok(res)))
}

pub async fn delete_availability(
    user: AuthorizedUser,
    Path((office_id, availability_id)): Path<(OfficeId, AvailabilityId)>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .availability_repository()
        .delete(
            DeleteAvailability::new(office_id, availability_id),
            &user.actor(),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn show_available_slots(
    Path(office_id): Path<OfficeId>,
    Query(query): Query<SlotQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<SlotsResponse>>> {
    let range = query.range()?;
    let min_duration = query.min_duration()?;
    registry
        .availability_repository()
        .find_available_slots(office_id, range, min_duration)
        .await
        .map(SlotsResponse::from)
        .map(|res| Json(ApiResponse::ok(res)))
}
