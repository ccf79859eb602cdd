use axum::{
    http::Method,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod events;
pub mod locations;
pub mod orders;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/v1/orders", get(orders::list_orders))
        .route("/v1/orders/{id}", get(orders::get_order))
        .route("/v1/orders/{id}/actions", post(orders::invoke_action))
        .route("/v1/delivery-locations", get(locations::list_locations))
        .route("/v1/delivery-locations", post(locations::create_location))
        .route("/v1/delivery-locations/{id}", patch(locations::update_location))
        .route("/v1/delivery-locations/{id}", delete(locations::delete_location))
        .route(
            "/v1/delivery-locations/{id}/toggle",
            post(locations::toggle_location),
        )
        .route(
            "/v1/delivery-locations/bulk/toggle",
            post(locations::bulk_toggle_locations),
        )
        .route(
            "/v1/delivery-locations/bulk/delete",
            post(locations::bulk_delete_locations),
        )
        .route(
            "/v1/delivery-locations/import",
            post(locations::import_locations),
        )
        .route(
            "/v1/delivery-locations/export",
            get(locations::export_locations),
        )
        .route("/v1/events", get(events::stream_events))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
