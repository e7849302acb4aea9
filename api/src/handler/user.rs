use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::{
        user::{CreateUserRequest, UserResponse},
        ApiResponse,
    },
};

pub async fn register_user(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    req.validate(&())?;
    registry
        .user_repository()
        .create(req.into(), &user.actor())
        .await
        .map(UserResponse::from)
        .map(|res| (StatusCode::CREATED, Json(ApiResponse::ok(res))))
}
