use axum::{
    routing::{delete, get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    availability::{
        delete_availability, register_availability, show_availability_list, show_available_slots,
        update_availability,
    },
    office::{delete_office, register_office, show_office, show_office_list, update_office},
};

pub fn build_office_routers() -> Router<AppRegistry> {
    let availability_routers = Router::new()
        .route("/", post(register_availability))
        .route("/", get(show_availability_list))
        .route("/:availability_id", put(update_availability))
        .route("/:availability_id", delete(delete_availability));

    let office_routers = Router::new()
        .route("/", post(register_office))
        .route("/", get(show_office_list))
        .route("/:office_id", get(show_office))
        .route("/:office_id", put(update_office))
        .route("/:office_id", delete(delete_office))
        .route("/:office_id/slots", get(show_available_slots))
        .nest("/:office_id/availability", availability_routers);

    Router::new().nest("/offices", office_routers)
}
