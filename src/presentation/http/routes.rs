use super::{
    handlers::{blueprint, drafts, health, reference, zones},
    middleware::{logging::logging_middleware, request_id::request_id_middleware},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and the small text fields next to the file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    let upload_routes = Router::new()
        .route("/api/v1/zones/upload", post(zones::upload_zone_file))
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
        ));

    let draft_routes = Router::new()
        .route(
            "/api/v1/drafts",
            get(drafts::list_drafts).post(drafts::create_draft),
        )
        .route(
            "/api/v1/drafts/{id}",
            get(drafts::get_draft).delete(drafts::delete_draft),
        )
        .route(
            "/api/v1/drafts/{id}/zones/{code}/select",
            post(drafts::select_zone),
        )
        .route(
            "/api/v1/drafts/{id}/zones/{code}/deselect",
            post(drafts::deselect_zone),
        )
        .route(
            "/api/v1/drafts/{id}/zones/{code}/toggle",
            post(drafts::toggle_zone),
        )
        .route(
            "/api/v1/drafts/{id}/regions/{region}/select",
            post(drafts::select_region),
        )
        .route(
            "/api/v1/drafts/{id}/regions/{region}/deselect",
            post(drafts::deselect_region),
        )
        .route("/api/v1/drafts/{id}/select-all", post(drafts::select_all))
        .route("/api/v1/drafts/{id}/deselect-all", post(drafts::deselect_all))
        .route(
            "/api/v1/drafts/{id}/zones/{code}/available-cities",
            get(drafts::available_cities),
        )
        .route(
            "/api/v1/drafts/{id}/zones/{code}/cities",
            post(drafts::assign_cities).delete(drafts::unassign_cities),
        )
        .route(
            "/api/v1/drafts/{id}/zones/{code}/states",
            post(drafts::assign_state).delete(drafts::unassign_state),
        )
        .route(
            "/api/v1/drafts/{id}/zones/{code}/complete",
            post(drafts::complete_zone),
        )
        .route("/api/v1/drafts/{id}/auto-fill", post(drafts::auto_fill))
        .route(
            "/api/v1/drafts/{id}/warnings",
            get(drafts::selection_warnings),
        )
        .route("/api/v1/drafts/{id}/matrix/cell", put(drafts::set_price))
        .route("/api/v1/drafts/{id}/matrix/paste", post(drafts::paste_prices))
        .route("/api/v1/drafts/{id}/finalize", post(drafts::finalize));

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Zones
        .route("/api/v1/zones/catalog", get(zones::get_catalog))
        .route("/api/v1/zones/template", get(zones::download_template))
        // Reference data
        .route("/api/v1/reference/states", get(reference::list_states))
        .route("/api/v1/reference/cities", get(reference::list_cities))
        .route(
            "/api/v1/reference/pincodes/{pincode}",
            get(reference::get_pincode),
        )
        // Blueprint
        .route(
            "/api/v1/blueprint/zones/{code}",
            get(blueprint::get_zone_info),
        )
        .route("/api/v1/blueprint/resolve", get(blueprint::resolve_city))
        .route(
            "/api/v1/blueprint/states/{state}/zones",
            get(blueprint::state_zones),
        )
        .merge(upload_routes)
        .merge(draft_routes)
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
