use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::booking::{
    cancel_booking, complete_booking, confirm_booking, register_booking, show_booking,
    show_booking_list, update_booking,
};

pub fn build_booking_routers() -> Router<AppRegistry> {
    let booking_routers = Router::new()
        .route("/", post(register_booking))
        .route("/", get(show_booking_list))
        .route("/:booking_id", get(show_booking))
        .route("/:booking_id", put(update_booking))
        .route("/:booking_id/cancel", post(cancel_booking))
        .route("/:booking_id/confirm", post(confirm_booking))
        .route("/:booking_id/complete", post(complete_booking));

    Router::new().nest("/bookings", booking_routers)
}
