use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::{
    booking::{event::UpdateBookingStatus, BookingStatus},
    id::BookingId,
    list::PaginatedList,
};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::{AuthorizedUser, MaybeAuthorizedUser},
    model::{
        booking::{
            BookingListQuery, BookingResponse, BookingView, CreateBookingRequest,
            UpdateBookingRequest, VisitorEmailQuery,
        },
        ApiResponse, PaginatedResponse,
    },
};

pub async fn register_booking(
    user: MaybeAuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;
    let created_by = user.0.as_ref().map(|u| u.id());
    let event = req.into_event(created_by)?;
    let contact_email = event
        .visitor_email
        .clone()
        .or_else(|| event.visitor.as_ref().and_then(|v| v.email.clone()));
    let actor = user.actor(contact_email);
    let booking = registry.booking_repository().create(event).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(BookingView::for_actor(booking, &actor))),
    ))
}

pub async fn show_booking_list(
    user: MaybeAuthorizedUser,
    Query(query): Query<BookingListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<BookingView>>>> {
    let actor = user.actor(query.visitor_email.clone());
    let filter = query.into_filter()?;
    let PaginatedList {
        total,
        limit,
        offset,
        items,
    } = registry
        .booking_repository()
        .find_all(filter, &actor)
        .await?;
    let items = items
        .into_iter()
        .map(|booking| BookingView::for_actor(booking, &actor))
        .collect();
    Ok(Json(ApiResponse::ok(PaginatedResponse::new(
        items, total, limit, offset,
    ))))
}

pub async fn show_booking(
    user: MaybeAuthorizedUser,
    Path(booking_id): Path<BookingId>,
    Query(query): Query<VisitorEmailQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<BookingView>>> {
    let actor = user.actor(query.visitor_email);
    registry
        .booking_repository()
        .find_by_id(booking_id, &actor)
        .await
        .map(|booking| BookingView::for_actor(booking, &actor))
        .map(|res| Json(ApiResponse::ok(res)))
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<BookingId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateBookingRequest>,
) -> AppResult<Json<ApiResponse<BookingResponse>>> {
    req.validate(&())?;
    let status = req.status;
    let actor = user.actor();
    let mut booking = registry
        .booking_repository()
        .update(req.into_event(booking_id), &actor)
        .await?;
    if let Some(status) = status {
        booking = registry
            .booking_repository()
            .update_status(UpdateBookingStatus::new(booking_id, status.into()), &actor)
            .await?;
    }
    Ok(Json(ApiResponse::ok(BookingResponse::from(booking))))
}

pub async fn cancel_booking(
    user: MaybeAuthorizedUser,
    Path(booking_id): Path<BookingId>,
    Query(query): Query<VisitorEmailQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<BookingView>>> {
    transition(registry, user, booking_id, query, BookingStatus::Cancelled).await
}

pub async fn confirm_booking(
    user: MaybeAuthorizedUser,
    Path(booking_id): Path<BookingId>,
    Query(query): Query<VisitorEmailQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<BookingView>>> {
    transition(registry, user, booking_id, query, BookingStatus::Confirmed).await
}

pub async fn complete_booking(
    user: MaybeAuthorizedUser,
    Path(booking_id): Path<BookingId>,
    Query(query): Query<VisitorEmailQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ApiResponse<BookingView>>> {
    transition(registry, user, booking_id, query, BookingStatus::Completed).await
}

async fn transition(
    registry: AppRegistry,
    user: MaybeAuthorizedUser,
    booking_id: BookingId,
    query: VisitorEmailQuery,
    status: BookingStatus,
) -> AppResult<Json<ApiResponse<BookingView>>> {
    let actor = user.actor(query.visitor_email);
    registry
        .booking_repository()
        .update_status(UpdateBookingStatus::new(booking_id, status), &actor)
        .await
        .map(|booking| BookingView::for_actor(booking, &actor))
        .map(|res| Json(ApiResponse::ok(res)))
}
